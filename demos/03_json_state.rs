/// json state - exporting and reloading the whole store
use std::sync::Arc;

use sacco_ledger_rs::{
    LedgerConfig, LoanLedger, LoanRequest, MemberDirectory, MemoryStore, Money, PaymentMethod,
    Rate, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== json state ===\n");

    let store = Arc::new(MemoryStore::new());
    let config = LedgerConfig::standard();
    let mut directory = MemberDirectory::new(store.clone(), config.clone());
    let mut ledger = LoanLedger::new(store.clone(), config.clone());
    let time = SafeTimeProvider::new(TimeSource::System);

    // stage 1: an empty book
    println!("stage 1: empty store");
    println!("--------------------");
    println!("{}\n", store.export_json()?);

    // stage 2: a member with savings
    let member = directory.register_member("Akinyi Were", None, None, None, &time)?;
    directory.record_deposit(member.id, Money::from_major(8_000), PaymentMethod::Cash, None, &time)?;
    println!("stage 2: member registered with savings");
    println!("---------------------------------------");
    println!("{}\n", store.export_json()?);

    // stage 3: an approved loan with its schedule
    let loan = ledger.create_loan(
        LoanRequest {
            member_id: member.id,
            principal: Money::from_major(5_000),
            annual_rate: Rate::from_percentage(12),
            term_months: 3,
            purpose: None,
            applied_by: None,
        },
        &time,
    )?;
    ledger.approve_loan(loan.id, None, &time)?;
    println!("stage 3: approved loan and schedule");
    println!("-----------------------------------");
    println!("{}\n", store.export_json()?);

    // the snapshot reloads into a fresh store
    let snapshot = store.export_json()?;
    let reloaded = Arc::new(MemoryStore::import_json(&snapshot)?);
    let ledger = LoanLedger::new(reloaded, LedgerConfig::standard());
    let summary = ledger.loan_summary(loan.id)?;
    println!("reloaded store sees the same loan:");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
