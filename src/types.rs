use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a member
pub type MemberId = Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a repayment installment
pub type InstallmentId = Uuid;

/// unique identifier for a payment
pub type PaymentId = Uuid;

/// unique identifier for a savings posting
pub type PostingId = Uuid;

/// identifier of the staff account performing an operation
pub type ActorId = Uuid;

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// application on the book, awaiting a decision
    Pending,
    /// approved and disbursed, schedule in force
    Approved,
    /// declined, no schedule exists
    Rejected,
    /// every installment settled
    Completed,
}

impl LoanStatus {
    /// terminal statuses admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoanStatus::Completed | LoanStatus::Rejected)
    }
}

/// repayment installment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    /// not yet settled, due date not passed
    Pending,
    /// settled in full
    Paid,
    /// not settled and past its due date
    Overdue,
}

impl InstallmentStatus {
    /// paid installments accept no further money
    pub fn can_accept_payment(&self) -> bool {
        !matches!(self, InstallmentStatus::Paid)
    }
}

/// channel a payment arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    MobileMoney,
    BankTransfer,
    Cheque,
}

/// financial position of a loan, derived from its payment ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub loan_id: LoanId,
    pub status: LoanStatus,
    pub principal: Money,
    pub total_interest: Money,
    pub total_payable: Money,
    pub total_paid: Money,
    pub outstanding_balance: Money,
    pub completion_percentage: Decimal,
}

/// member together with the savings position derived from their postings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub member: crate::model::Member,
    pub total_savings: Money,
    pub loans_on_book: usize,
}
