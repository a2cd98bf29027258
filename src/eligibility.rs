use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};

/// outcome of a guarantor-backed eligibility assessment
///
/// the maximum a member can borrow is their own savings plus the savings
/// of their two referees; the boundary itself is eligible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityAssessment {
    pub requested: Money,
    pub applicant_savings: Money,
    pub referee_a_savings: Money,
    pub referee_b_savings: Money,
    pub maximum_amount: Money,
}

impl EligibilityAssessment {
    pub fn within_limit(&self) -> bool {
        self.requested <= self.maximum_amount
    }

    /// error with the limit context when the request exceeds the maximum
    pub fn ensure(&self) -> Result<()> {
        if self.within_limit() {
            Ok(())
        } else {
            Err(LedgerError::EligibilityExceeded {
                requested: self.requested,
                maximum: self.maximum_amount,
            })
        }
    }
}

/// assess a requested amount against applicant and referee savings
pub fn assess(
    requested: Money,
    applicant_savings: Money,
    referee_a_savings: Money,
    referee_b_savings: Money,
) -> EligibilityAssessment {
    EligibilityAssessment {
        requested,
        applicant_savings,
        referee_a_savings,
        referee_b_savings,
        maximum_amount: applicant_savings + referee_a_savings + referee_b_savings,
    }
}
