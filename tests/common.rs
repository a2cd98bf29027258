use std::sync::Arc;

use chrono::{TimeZone, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};

use sacco_ledger_rs::*;

/// shared store, both services, and a pinned clock for flow tests
pub struct Suite {
    pub store: Arc<MemoryStore>,
    pub directory: MemberDirectory<MemoryStore>,
    pub ledger: LoanLedger<MemoryStore>,
    pub time: SafeTimeProvider,
}

impl Suite {
    pub fn setup() -> Self {
        Self::setup_at(2026, 1, 15)
    }

    pub fn setup_at(year: i32, month: u32, day: u32) -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = LedgerConfig::standard();
        Suite {
            directory: MemberDirectory::new(store.clone(), config.clone()),
            ledger: LoanLedger::new(store.clone(), config),
            time: SafeTimeProvider::new(TimeSource::Test(
                Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap(),
            )),
            store,
        }
    }

    pub fn member(&mut self, name: &str) -> Member {
        self.directory.register_member(name, None, None, None, &self.time).unwrap()
    }

    pub fn member_with_savings(&mut self, name: &str, amount: Money) -> Member {
        let member = self.member(name);
        self.directory
            .record_deposit(member.id, amount, PaymentMethod::Cash, None, &self.time)
            .unwrap();
        member
    }

    pub fn loan_request(
        &self,
        member_id: MemberId,
        principal: i64,
        rate_percent: u32,
        term_months: u32,
    ) -> LoanRequest {
        LoanRequest {
            member_id,
            principal: Money::from_major(principal),
            annual_rate: Rate::from_percentage(rate_percent),
            term_months,
            purpose: Some("emergency".to_string()),
            applied_by: None,
        }
    }

    /// create and approve a loan in one step
    pub fn approved_loan(
        &mut self,
        member_id: MemberId,
        principal: i64,
        rate_percent: u32,
        term_months: u32,
    ) -> LoanApproval {
        let request = self.loan_request(member_id, principal, rate_percent, term_months);
        let loan = self.ledger.create_loan(request, &self.time).unwrap();
        self.ledger.approve_loan(loan.id, None, &self.time).unwrap()
    }

    pub fn pay(
        &mut self,
        loan_id: LoanId,
        installment: &RepaymentInstallment,
        amount: Money,
    ) -> PaymentReceipt {
        self.try_pay(loan_id, installment.id, amount).unwrap()
    }

    pub fn try_pay(
        &mut self,
        loan_id: LoanId,
        installment_id: InstallmentId,
        amount: Money,
    ) -> Result<PaymentReceipt> {
        self.ledger.record_payment(
            PaymentRequest {
                loan_id,
                installment_id,
                amount,
                payment_date: self.time.now().date_naive(),
                method: PaymentMethod::MobileMoney,
                reference: None,
                notes: None,
                recorded_by: None,
            },
            &self.time,
        )
    }
}
