use thiserror::Error;
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::types::{InstallmentStatus, LoanStatus};

/// broad families callers branch on when mapping errors to responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    NotFound,
    InvalidState,
    Store,
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("invalid term: {months} months")]
    InvalidTerm {
        months: u32,
    },

    #[error("member name must not be blank")]
    BlankMemberName,

    #[error("payment exceeds amount due: due {due}, provided {provided}")]
    PaymentExceedsDue {
        installment_id: Uuid,
        due: Money,
        provided: Money,
    },

    #[error("requested amount exceeds eligible maximum: requested {requested}, maximum {maximum}")]
    EligibilityExceeded {
        requested: Money,
        maximum: Money,
    },

    #[error("referees must be two distinct members other than the applicant")]
    RefereesNotDistinct,

    #[error("insufficient savings: available {available}, requested {requested}")]
    InsufficientSavings {
        available: Money,
        requested: Money,
    },

    #[error("member not found: {id}")]
    MemberNotFound {
        id: Uuid,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: Uuid,
    },

    #[error("installment not found: {id}")]
    InstallmentNotFound {
        id: Uuid,
    },

    #[error("payment not found: {id}")]
    PaymentNotFound {
        id: Uuid,
    },

    #[error("loan {loan_id} is {status:?}, expected {expected:?}")]
    LoanNotInStatus {
        loan_id: Uuid,
        status: LoanStatus,
        expected: LoanStatus,
    },

    #[error("loan {loan_id} is {status:?}, a terminal status")]
    TerminalStatus {
        loan_id: Uuid,
        status: LoanStatus,
    },

    #[error("transition not allowed: {from:?} -> {to:?}")]
    ForbiddenTransition {
        loan_id: Uuid,
        from: LoanStatus,
        to: LoanStatus,
    },

    #[error("schedule is locked: loan {loan_id} has {payments} recorded payment(s)")]
    ScheduleLocked {
        loan_id: Uuid,
        payments: usize,
    },

    #[error("member {member_id} still has {loans} loan(s) on the book")]
    MemberHasLoans {
        member_id: Uuid,
        loans: usize,
    },

    #[error("member {member_id} stands as referee on {loans} loan(s)")]
    MemberGuaranteesLoans {
        member_id: Uuid,
        loans: usize,
    },

    #[error("installment {installment_id} is {status:?} and cannot accept payment")]
    InstallmentNotPayable {
        installment_id: Uuid,
        status: InstallmentStatus,
    },

    #[error("installment {installment_id} does not belong to loan {loan_id}")]
    InstallmentLoanMismatch {
        installment_id: Uuid,
        loan_id: Uuid,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("could not allocate a unique reference after {attempts} attempts")]
    NumberSpaceExhausted {
        attempts: u32,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// classify into the family callers branch on
    pub fn class(&self) -> ErrorClass {
        match self {
            LedgerError::InvalidAmount { .. }
            | LedgerError::InvalidInterestRate { .. }
            | LedgerError::InvalidTerm { .. }
            | LedgerError::BlankMemberName
            | LedgerError::PaymentExceedsDue { .. }
            | LedgerError::EligibilityExceeded { .. }
            | LedgerError::RefereesNotDistinct
            | LedgerError::InsufficientSavings { .. }
            | LedgerError::ScheduleLocked { .. }
            | LedgerError::MemberHasLoans { .. }
            | LedgerError::MemberGuaranteesLoans { .. }
            | LedgerError::InvalidDate { .. } => ErrorClass::Validation,

            LedgerError::MemberNotFound { .. }
            | LedgerError::LoanNotFound { .. }
            | LedgerError::InstallmentNotFound { .. }
            | LedgerError::PaymentNotFound { .. } => ErrorClass::NotFound,

            LedgerError::LoanNotInStatus { .. }
            | LedgerError::TerminalStatus { .. }
            | LedgerError::ForbiddenTransition { .. }
            | LedgerError::InstallmentNotPayable { .. }
            | LedgerError::InstallmentLoanMismatch { .. } => ErrorClass::InvalidState,

            LedgerError::NumberSpaceExhausted { .. } | LedgerError::Store(_) => ErrorClass::Store,
        }
    }
}

/// failures raised by the backing store itself
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate key: {message}")]
    DuplicateKey {
        message: String,
    },

    #[error("store poisoned: {message}")]
    Poisoned {
        message: String,
    },

    #[error("serialization failed: {message}")]
    Serialization {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let id = Uuid::new_v4();

        assert_eq!(
            LedgerError::InvalidAmount { amount: Money::ZERO }.class(),
            ErrorClass::Validation
        );
        // business-rule refusals classify as validation, not state
        assert_eq!(
            LedgerError::ScheduleLocked { loan_id: id, payments: 1 }.class(),
            ErrorClass::Validation
        );
        assert_eq!(
            LedgerError::MemberHasLoans { member_id: id, loans: 1 }.class(),
            ErrorClass::Validation
        );
        assert_eq!(
            LedgerError::MemberGuaranteesLoans { member_id: id, loans: 2 }.class(),
            ErrorClass::Validation
        );
        assert_eq!(LedgerError::LoanNotFound { id }.class(), ErrorClass::NotFound);
        assert_eq!(
            LedgerError::TerminalStatus { loan_id: id, status: LoanStatus::Completed }.class(),
            ErrorClass::InvalidState
        );
        assert_eq!(
            LedgerError::Store(StoreError::Poisoned { message: "lock".into() }).class(),
            ErrorClass::Store
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::ForbiddenTransition {
            loan_id: Uuid::new_v4(),
            from: LoanStatus::Rejected,
            to: LoanStatus::Approved,
        };
        assert_eq!(err.to_string(), "transition not allowed: Rejected -> Approved");
    }
}
