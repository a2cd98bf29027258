/// time control - deterministic repayment flows with a test clock
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use sacco_ledger_rs::{
    LedgerConfig, LoanLedger, LoanRequest, MemberDirectory, MemoryStore, Money, PaymentMethod,
    PaymentRequest, Rate, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();
    println!("starting date: {}", time.now().format("%Y-%m-%d"));

    let store = Arc::new(MemoryStore::new());
    let config = LedgerConfig::standard();
    let mut directory = MemberDirectory::new(store.clone(), config.clone());
    let mut ledger = LoanLedger::new(store, config);

    let member = directory.register_member("Kipchoge Rotich", None, None, None, &time)?;
    let loan = ledger.create_loan(
        LoanRequest {
            member_id: member.id,
            principal: Money::from_major(120_000),
            annual_rate: Rate::from_percentage(10),
            term_months: 12,
            purpose: None,
            applied_by: None,
        },
        &time,
    )?;
    let approval = ledger.approve_loan(loan.id, None, &time)?;
    println!(
        "approved on {}, first installment due {}",
        time.now().format("%Y-%m-%d"),
        approval.installments[0].due_date
    );

    // two months slip past without a payment
    controller.advance(Duration::days(70));
    println!("\nadvanced to: {}", time.now().format("%Y-%m-%d"));

    let overdue = ledger.refresh_overdue(&time)?;
    println!("{} installment(s) now overdue:", overdue.len());
    for installment in &overdue {
        println!("  #{} due {}  {}", installment.number, installment.due_date, installment.amount_due);
    }

    // the member catches up on the oldest one
    let receipt = ledger.record_payment(
        PaymentRequest {
            loan_id: loan.id,
            installment_id: overdue[0].id,
            amount: overdue[0].amount_due,
            payment_date: time.now().date_naive(),
            method: PaymentMethod::Cash,
            reference: None,
            notes: Some("late catch-up".to_string()),
            recorded_by: None,
        },
        &time,
    )?;
    println!(
        "\ninstallment #{} settled, outstanding {}",
        receipt.installment.number, receipt.outstanding_balance
    );

    Ok(())
}
