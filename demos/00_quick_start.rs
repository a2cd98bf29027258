/// quick start - minimal example to get started
use std::sync::Arc;

use sacco_ledger_rs::{
    LedgerConfig, LoanLedger, LoanRequest, MemberDirectory, MemoryStore, Money, PaymentMethod,
    PaymentRequest, Rate, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let config = LedgerConfig::standard();
    let mut directory = MemberDirectory::new(store.clone(), config.clone());
    let mut ledger = LoanLedger::new(store, config);
    let time = SafeTimeProvider::new(TimeSource::System);

    // register a member
    let member = directory.register_member("Wanjiru Kamau", None, None, None, &time)?;
    println!("registered {}", member.member_number);

    // put a 60,000 loan on the book and approve it
    let loan = ledger.create_loan(
        LoanRequest {
            member_id: member.id,
            principal: Money::from_major(60_000),
            annual_rate: Rate::from_percentage(12),
            term_months: 6,
            purpose: Some("school fees".to_string()),
            applied_by: None,
        },
        &time,
    )?;
    let approval = ledger.approve_loan(loan.id, None, &time)?;
    println!("approved {} over {} installments", loan.loan_number, approval.installments.len());

    // settle the first installment
    let first = &approval.installments[0];
    ledger.record_payment(
        PaymentRequest {
            loan_id: loan.id,
            installment_id: first.id,
            amount: first.amount_due,
            payment_date: time.now().date_naive(),
            method: PaymentMethod::MobileMoney,
            reference: None,
            notes: None,
            recorded_by: None,
        },
        &time,
    )?;

    // print the current position
    let summary = ledger.loan_summary(loan.id)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
