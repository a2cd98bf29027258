use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{
    ActorId, InstallmentId, InstallmentStatus, LoanId, LoanStatus, MemberId, PaymentId,
    PaymentMethod, PostingId,
};

/// a registered cooperative member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    /// human-readable unique code, e.g. MBR-20260115-4C21A9
    pub member_number: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub registered_by: Option<ActorId>,
}

/// one signed movement on a member's savings account
///
/// deposits are positive, withdrawals negative; a member's savings
/// position is always the sum of their postings, never a stored total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsPosting {
    pub id: PostingId,
    pub member_id: MemberId,
    pub amount: Money,
    pub method: PaymentMethod,
    pub recorded_at: DateTime<Utc>,
    pub recorded_by: Option<ActorId>,
}

/// a loan on the book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    /// human-readable unique code, e.g. LN-20260115-9F03B2
    pub loan_number: String,
    pub member_id: MemberId,
    /// guarantors from the eligibility flow; absent for directly created loans
    pub referees: Option<[MemberId; 2]>,
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub purpose: Option<String>,
    pub status: LoanStatus,
    pub applied_at: DateTime<Utc>,
    pub applied_by: Option<ActorId>,
    /// approver or rejecter, set when the application is decided
    pub processed_by: Option<ActorId>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl Loan {
    /// simple interest over the whole term: principal * rate * months / 12
    pub fn total_interest(&self) -> Money {
        let raw = self.principal.as_decimal()
            * self.annual_rate.as_decimal()
            * Decimal::from(self.term_months)
            / Decimal::from(12);
        Money::from_decimal(raw)
    }

    /// principal plus total interest
    pub fn total_payable(&self) -> Money {
        self.principal + self.total_interest()
    }
}

/// one row of a loan's repayment schedule
///
/// status, amount_paid and payment_date are a projection recomputed from
/// the payment ledger; they are never edited directly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentInstallment {
    pub id: InstallmentId,
    pub loan_id: LoanId,
    /// 1-based position in the schedule
    pub number: u32,
    pub due_date: NaiveDate,
    pub amount_due: Money,
    pub status: InstallmentStatus,
    pub amount_paid: Money,
    pub payment_date: Option<NaiveDate>,
}

/// an immutable record of money received against an installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub loan_id: LoanId,
    pub installment_id: InstallmentId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub recorded_by: Option<ActorId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_loan(principal: Money, rate: Rate, term_months: u32) -> Loan {
        Loan {
            id: Uuid::new_v4(),
            loan_number: "LN-20260101-000001".to_string(),
            member_id: Uuid::new_v4(),
            referees: None,
            principal,
            annual_rate: rate,
            term_months,
            purpose: None,
            status: LoanStatus::Pending,
            applied_at: Utc::now(),
            applied_by: None,
            processed_by: None,
            processed_at: None,
        }
    }

    #[test]
    fn test_simple_interest() {
        let loan = sample_loan(Money::from_major(1_200_000), Rate::from_percentage(10), 12);
        assert_eq!(loan.total_interest(), Money::from_major(120_000));
        assert_eq!(loan.total_payable(), Money::from_major(1_320_000));
    }

    #[test]
    fn test_interest_scales_with_term() {
        // half a year at 10% accrues half the annual interest
        let loan = sample_loan(Money::from_major(100_000), Rate::from_percentage(10), 6);
        assert_eq!(loan.total_interest(), Money::from_major(5_000));
    }

    #[test]
    fn test_zero_rate_loan() {
        let loan = sample_loan(Money::from_major(50_000), Rate::ZERO, 10);
        assert_eq!(loan.total_interest(), Money::ZERO);
        assert_eq!(loan.total_payable(), loan.principal);
    }
}
