use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result, StoreError};
use crate::model::{Loan, Member, Payment, RepaymentInstallment, SavingsPosting};
use crate::store::{LedgerStore, StoreTx};
use crate::types::{InstallmentId, LoanId, MemberId, PaymentId, PostingId};

/// the five ledger tables
///
/// cloneable so a transaction can stage its writes on a copy and the
/// store can swap the copy in only on commit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    members: BTreeMap<MemberId, Member>,
    postings: BTreeMap<PostingId, SavingsPosting>,
    loans: BTreeMap<LoanId, Loan>,
    installments: BTreeMap<InstallmentId, RepaymentInstallment>,
    payments: BTreeMap<PaymentId, Payment>,
}

impl StoreTx for Tables {
    fn insert_member(&mut self, member: Member) -> Result<()> {
        if self.members.contains_key(&member.id) {
            return Err(StoreError::DuplicateKey { message: format!("member {}", member.id) }.into());
        }
        self.members.insert(member.id, member);
        Ok(())
    }

    fn member(&self, id: MemberId) -> Result<Option<Member>> {
        Ok(self.members.get(&id).cloned())
    }

    fn delete_member(&mut self, id: MemberId) -> Result<bool> {
        Ok(self.members.remove(&id).is_some())
    }

    fn member_number_exists(&self, number: &str) -> Result<bool> {
        Ok(self.members.values().any(|m| m.member_number == number))
    }

    fn members(&self) -> Result<Vec<Member>> {
        let mut members: Vec<Member> = self.members.values().cloned().collect();
        members.sort_by(|a, b| a.member_number.cmp(&b.member_number));
        Ok(members)
    }

    fn insert_posting(&mut self, posting: SavingsPosting) -> Result<()> {
        if self.postings.contains_key(&posting.id) {
            return Err(
                StoreError::DuplicateKey { message: format!("posting {}", posting.id) }.into()
            );
        }
        self.postings.insert(posting.id, posting);
        Ok(())
    }

    fn postings_for_member(&self, member_id: MemberId) -> Result<Vec<SavingsPosting>> {
        let mut postings: Vec<SavingsPosting> = self
            .postings
            .values()
            .filter(|p| p.member_id == member_id)
            .cloned()
            .collect();
        postings.sort_by_key(|p| p.recorded_at);
        Ok(postings)
    }

    fn delete_postings_for_member(&mut self, member_id: MemberId) -> Result<usize> {
        let before = self.postings.len();
        self.postings.retain(|_, p| p.member_id != member_id);
        Ok(before - self.postings.len())
    }

    fn insert_loan(&mut self, loan: Loan) -> Result<()> {
        if self.loans.contains_key(&loan.id) {
            return Err(StoreError::DuplicateKey { message: format!("loan {}", loan.id) }.into());
        }
        self.loans.insert(loan.id, loan);
        Ok(())
    }

    fn loan(&self, id: LoanId) -> Result<Option<Loan>> {
        Ok(self.loans.get(&id).cloned())
    }

    fn update_loan(&mut self, loan: Loan) -> Result<()> {
        match self.loans.get_mut(&loan.id) {
            Some(slot) => {
                *slot = loan;
                Ok(())
            }
            None => Err(LedgerError::LoanNotFound { id: loan.id }),
        }
    }

    fn delete_loan(&mut self, id: LoanId) -> Result<bool> {
        Ok(self.loans.remove(&id).is_some())
    }

    fn loan_number_exists(&self, number: &str) -> Result<bool> {
        Ok(self.loans.values().any(|l| l.loan_number == number))
    }

    fn loans_for_member(&self, member_id: MemberId) -> Result<Vec<Loan>> {
        let mut loans: Vec<Loan> = self
            .loans
            .values()
            .filter(|l| l.member_id == member_id)
            .cloned()
            .collect();
        loans.sort_by_key(|l| l.applied_at);
        Ok(loans)
    }

    fn count_loans_for_member(&self, member_id: MemberId) -> Result<usize> {
        Ok(self.loans.values().filter(|l| l.member_id == member_id).count())
    }

    fn count_loans_with_referee(&self, member_id: MemberId) -> Result<usize> {
        Ok(self
            .loans
            .values()
            .filter(|l| l.referees.map_or(false, |r| r.contains(&member_id)))
            .count())
    }

    fn loans(&self) -> Result<Vec<Loan>> {
        let mut loans: Vec<Loan> = self.loans.values().cloned().collect();
        loans.sort_by_key(|l| l.applied_at);
        Ok(loans)
    }

    fn insert_installment(&mut self, installment: RepaymentInstallment) -> Result<()> {
        if self.installments.contains_key(&installment.id) {
            return Err(StoreError::DuplicateKey {
                message: format!("installment {}", installment.id),
            }
            .into());
        }
        self.installments.insert(installment.id, installment);
        Ok(())
    }

    fn installment(&self, id: InstallmentId) -> Result<Option<RepaymentInstallment>> {
        Ok(self.installments.get(&id).cloned())
    }

    fn update_installment(&mut self, installment: RepaymentInstallment) -> Result<()> {
        match self.installments.get_mut(&installment.id) {
            Some(slot) => {
                *slot = installment;
                Ok(())
            }
            None => Err(LedgerError::InstallmentNotFound { id: installment.id }),
        }
    }

    fn installments_for_loan(&self, loan_id: LoanId) -> Result<Vec<RepaymentInstallment>> {
        let mut installments: Vec<RepaymentInstallment> = self
            .installments
            .values()
            .filter(|i| i.loan_id == loan_id)
            .cloned()
            .collect();
        installments.sort_by_key(|i| i.number);
        Ok(installments)
    }

    fn delete_installments_for_loan(&mut self, loan_id: LoanId) -> Result<usize> {
        let before = self.installments.len();
        self.installments.retain(|_, i| i.loan_id != loan_id);
        Ok(before - self.installments.len())
    }

    fn insert_payment(&mut self, payment: Payment) -> Result<()> {
        if self.payments.contains_key(&payment.id) {
            return Err(
                StoreError::DuplicateKey { message: format!("payment {}", payment.id) }.into()
            );
        }
        self.payments.insert(payment.id, payment);
        Ok(())
    }

    fn payment(&self, id: PaymentId) -> Result<Option<Payment>> {
        Ok(self.payments.get(&id).cloned())
    }

    fn delete_payment(&mut self, id: PaymentId) -> Result<bool> {
        Ok(self.payments.remove(&id).is_some())
    }

    fn payments_for_loan(&self, loan_id: LoanId) -> Result<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .payments
            .values()
            .filter(|p| p.loan_id == loan_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| (p.payment_date, p.recorded_at));
        Ok(payments)
    }

    fn payments_for_installment(&self, installment_id: InstallmentId) -> Result<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .payments
            .values()
            .filter(|p| p.installment_id == installment_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| (p.payment_date, p.recorded_at));
        Ok(payments)
    }

    fn delete_payments_for_loan(&mut self, loan_id: LoanId) -> Result<usize> {
        let before = self.payments.len();
        self.payments.retain(|_, p| p.loan_id != loan_id);
        Ok(before - self.payments.len())
    }
}

/// in-memory reference store with genuine all-or-nothing transactions
///
/// a transaction stages its writes on a clone of the tables; the clone
/// replaces the live tables only when the closure returns Ok, so an
/// error leaves the store exactly as it was
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// serialize the whole store to pretty json
    pub fn export_json(&self) -> Result<String> {
        let guard = self
            .tables
            .lock()
            .map_err(|e| StoreError::Poisoned { message: e.to_string() })?;
        serde_json::to_string_pretty(&*guard)
            .map_err(|e| StoreError::Serialization { message: e.to_string() }.into())
    }

    /// rebuild a store from a json export
    pub fn import_json(json: &str) -> Result<Self> {
        let tables: Tables = serde_json::from_str(json)
            .map_err(|e| StoreError::Serialization { message: e.to_string() })?;
        Ok(Self { tables: Mutex::new(tables) })
    }
}

impl LedgerStore for MemoryStore {
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T>,
    {
        let mut guard = self
            .tables
            .lock()
            .map_err(|e| StoreError::Poisoned { message: e.to_string() })?;
        let mut staged = guard.clone();
        let value = f(&mut staged)?;
        *guard = staged;
        Ok(value)
    }

    fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn StoreTx) -> Result<T>,
    {
        let guard = self
            .tables
            .lock()
            .map_err(|e| StoreError::Poisoned { message: e.to_string() })?;
        f(&*guard)
    }
}
