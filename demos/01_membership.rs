/// membership - savings postings and guaranteed loan applications
use std::sync::Arc;

use sacco_ledger_rs::{
    LedgerConfig, LoanLedger, LoanRequest, MemberDirectory, MemoryStore, Money, PaymentMethod,
    Rate, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== membership and eligibility ===\n");

    let store = Arc::new(MemoryStore::new());
    let config = LedgerConfig::standard();
    let mut directory = MemberDirectory::new(store.clone(), config.clone());
    let mut ledger = LoanLedger::new(store, config);
    let time = SafeTimeProvider::new(TimeSource::System);

    // three members build up savings
    let applicant = directory.register_member("Njeri Kariuki", None, None, None, &time)?;
    let referee_a = directory.register_member("Otieno Ouma", None, None, None, &time)?;
    let referee_b = directory.register_member("Wambui Gitau", None, None, None, &time)?;

    directory.record_deposit(
        applicant.id,
        Money::from_major(40_000),
        PaymentMethod::Cash,
        None,
        &time,
    )?;
    directory.record_deposit(
        referee_a.id,
        Money::from_major(25_000),
        PaymentMethod::MobileMoney,
        None,
        &time,
    )?;
    directory.record_deposit(
        referee_b.id,
        Money::from_major(15_000),
        PaymentMethod::BankTransfer,
        None,
        &time,
    )?;

    for member in directory.members()? {
        let savings = directory.total_savings(member.id)?;
        println!("{}  {}  savings {}", member.member_number, member.full_name, savings);
    }

    // the pooled savings of applicant and referees cap the application
    let assessment = ledger.assess_eligibility(
        applicant.id,
        referee_a.id,
        referee_b.id,
        Money::from_major(75_000),
    )?;
    println!(
        "\nrequested {}  maximum {}  within limit: {}",
        assessment.requested,
        assessment.maximum_amount,
        assessment.within_limit()
    );

    // file the guaranteed application
    let loan = ledger.apply_for_loan(
        LoanRequest {
            member_id: applicant.id,
            principal: Money::from_major(75_000),
            annual_rate: Rate::from_percentage(10),
            term_months: 12,
            purpose: Some("dairy cow".to_string()),
            applied_by: None,
        },
        referee_a.id,
        referee_b.id,
        &time,
    )?;
    println!("\napplication {} on the book, status {:?}", loan.loan_number, loan.status);

    let profile = directory.member_profile(applicant.id)?;
    println!(
        "{} now holds {} loan(s) against savings of {}",
        profile.member.full_name, profile.loans_on_book, profile.total_savings
    );

    Ok(())
}
