use serde::{Deserialize, Serialize};

/// ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// prefix for generated member numbers, e.g. MBR-20260115-4C21A9
    pub member_number_prefix: String,
    /// prefix for generated loan numbers, e.g. LN-20260115-9F03B2
    pub loan_number_prefix: String,
    /// attempts at a unique reference before giving up
    pub number_retry_limit: u32,
    /// months between approval and the first installment due date
    pub first_due_offset_months: u32,
}

impl LedgerConfig {
    /// standard cooperative configuration
    pub fn standard() -> Self {
        Self {
            member_number_prefix: "MBR".to_string(),
            loan_number_prefix: "LN".to_string(),
            number_retry_limit: 16,
            first_due_offset_months: 1,
        }
    }

    /// configuration with custom reference prefixes
    pub fn with_prefixes(member_prefix: &str, loan_prefix: &str) -> Self {
        Self {
            member_number_prefix: member_prefix.to_string(),
            loan_number_prefix: loan_prefix.to_string(),
            ..Self::standard()
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::standard()
    }
}
