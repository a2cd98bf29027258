pub mod memory;

pub use memory::MemoryStore;

use crate::errors::Result;
use crate::model::{Loan, Member, Payment, RepaymentInstallment, SavingsPosting};
use crate::types::{InstallmentId, LoanId, MemberId, PaymentId};

/// typed table operations available inside a transaction
///
/// reads take `&self` so the same surface serves read-only views;
/// inserts reject duplicate ids, updates fail on absent rows, deletes
/// report what they removed without erroring
pub trait StoreTx {
    // members
    fn insert_member(&mut self, member: Member) -> Result<()>;
    fn member(&self, id: MemberId) -> Result<Option<Member>>;
    fn delete_member(&mut self, id: MemberId) -> Result<bool>;
    fn member_number_exists(&self, number: &str) -> Result<bool>;
    /// all members ordered by member number
    fn members(&self) -> Result<Vec<Member>>;

    // savings postings
    fn insert_posting(&mut self, posting: SavingsPosting) -> Result<()>;
    /// a member's postings ordered by recording time
    fn postings_for_member(&self, member_id: MemberId) -> Result<Vec<SavingsPosting>>;
    fn delete_postings_for_member(&mut self, member_id: MemberId) -> Result<usize>;

    // loans
    fn insert_loan(&mut self, loan: Loan) -> Result<()>;
    fn loan(&self, id: LoanId) -> Result<Option<Loan>>;
    fn update_loan(&mut self, loan: Loan) -> Result<()>;
    fn delete_loan(&mut self, id: LoanId) -> Result<bool>;
    fn loan_number_exists(&self, number: &str) -> Result<bool>;
    /// a member's loans ordered by application time
    fn loans_for_member(&self, member_id: MemberId) -> Result<Vec<Loan>>;
    fn count_loans_for_member(&self, member_id: MemberId) -> Result<usize>;
    /// loans citing the member as a referee
    fn count_loans_with_referee(&self, member_id: MemberId) -> Result<usize>;
    /// all loans ordered by application time
    fn loans(&self) -> Result<Vec<Loan>>;

    // installments
    fn insert_installment(&mut self, installment: RepaymentInstallment) -> Result<()>;
    fn installment(&self, id: InstallmentId) -> Result<Option<RepaymentInstallment>>;
    fn update_installment(&mut self, installment: RepaymentInstallment) -> Result<()>;
    /// a loan's schedule ordered by installment number
    fn installments_for_loan(&self, loan_id: LoanId) -> Result<Vec<RepaymentInstallment>>;
    fn delete_installments_for_loan(&mut self, loan_id: LoanId) -> Result<usize>;

    // payments
    fn insert_payment(&mut self, payment: Payment) -> Result<()>;
    fn payment(&self, id: PaymentId) -> Result<Option<Payment>>;
    fn delete_payment(&mut self, id: PaymentId) -> Result<bool>;
    /// a loan's payments ordered by payment date, then recording time
    fn payments_for_loan(&self, loan_id: LoanId) -> Result<Vec<Payment>>;
    fn payments_for_installment(&self, installment_id: InstallmentId) -> Result<Vec<Payment>>;
    fn delete_payments_for_loan(&mut self, loan_id: LoanId) -> Result<usize>;
}

/// a backing store providing atomic transactions over the ledger tables
///
/// every multi-step mutation in the crate runs through `transaction`;
/// an implementation must commit all staged writes on `Ok` and discard
/// every one of them on `Err`, never leaving partial state behind
pub trait LedgerStore {
    /// run `f` atomically: commit on Ok, roll back entirely on Err
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T>;

    /// run `f` against a consistent read-only view
    fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn StoreTx) -> Result<T>;
}
