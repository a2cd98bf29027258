mod common;

use std::sync::Arc;

use chrono::TimeZone;
use sacco_ledger_rs::*;

use common::Suite;

#[test]
fn registration_allocates_distinct_numbers() {
    let mut s = Suite::setup();
    let first = s.member("Amani Njeri");
    let second = s.member("Bakari Odhiambo");

    assert_ne!(first.member_number, second.member_number);
    assert!(first.member_number.starts_with("MBR-20260115-"));

    let listed = s.directory.members().unwrap();
    assert_eq!(listed.len(), 2);

    let events = s.directory.take_events();
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, Event::MemberRegistered { .. }))
            .count(),
        2
    );
}

#[test]
fn blank_names_are_refused() {
    let mut s = Suite::setup();
    let err = s
        .directory
        .register_member("   ", None, None, None, &s.time)
        .unwrap_err();
    assert!(matches!(err, LedgerError::BlankMemberName));
    assert!(s.directory.members().unwrap().is_empty());
}

#[test]
fn savings_position_follows_postings() {
    let mut s = Suite::setup();
    let member = s.member("Chausiku Wafula");

    s.directory
        .record_deposit(member.id, Money::from_major(1_500), PaymentMethod::Cash, None, &s.time)
        .unwrap();
    s.directory
        .record_deposit(
            member.id,
            Money::from_str_exact("250.50").unwrap(),
            PaymentMethod::MobileMoney,
            None,
            &s.time,
        )
        .unwrap();
    assert_eq!(
        s.directory.total_savings(member.id).unwrap(),
        Money::from_str_exact("1750.50").unwrap()
    );

    s.directory
        .record_withdrawal(member.id, Money::from_major(750), PaymentMethod::Cash, None, &s.time)
        .unwrap();
    assert_eq!(
        s.directory.total_savings(member.id).unwrap(),
        Money::from_str_exact("1000.50").unwrap()
    );

    // drawing past the balance is refused and posts nothing
    let err = s
        .directory
        .record_withdrawal(member.id, Money::from_major(2_000), PaymentMethod::Cash, None, &s.time)
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientSavings { .. }));
    assert_eq!(s.directory.postings(member.id).unwrap().len(), 3);

    // the withdrawal sits in the book as a negative posting
    let postings = s.directory.postings(member.id).unwrap();
    assert_eq!(postings.iter().filter(|p| p.amount.is_negative()).count(), 1);
}

#[test]
fn zero_and_negative_postings_are_refused() {
    let mut s = Suite::setup();
    let member = s.member("Dafina Auma");

    for amount in [Money::ZERO, Money::from_major(-10)] {
        let err = s
            .directory
            .record_deposit(member.id, amount, PaymentMethod::Cash, None, &s.time)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));

        let err = s
            .directory
            .record_withdrawal(member.id, amount, PaymentMethod::Cash, None, &s.time)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));
    }
    assert!(s.directory.postings(member.id).unwrap().is_empty());
}

#[test]
fn eligibility_reads_the_live_savings_position() {
    let mut s = Suite::setup();
    let applicant = s.member_with_savings("Ebele Nwosu", Money::from_major(100));
    let referee_a = s.member_with_savings("Fadhili Maina", Money::from_major(50));
    let referee_b = s.member_with_savings("Gathoni Muthoni", Money::from_major(50));

    let assessment = s
        .ledger
        .assess_eligibility(applicant.id, referee_a.id, referee_b.id, Money::from_major(180))
        .unwrap();
    assert_eq!(assessment.maximum_amount, Money::from_major(200));
    assert!(assessment.within_limit());

    // a fresh deposit moves the ceiling
    s.directory
        .record_deposit(referee_a.id, Money::from_major(50), PaymentMethod::Cash, None, &s.time)
        .unwrap();
    let assessment = s
        .ledger
        .assess_eligibility(applicant.id, referee_a.id, referee_b.id, Money::from_major(250))
        .unwrap();
    assert_eq!(assessment.maximum_amount, Money::from_major(250));
    assert!(assessment.within_limit());
}

#[test]
fn member_profile_summarizes_the_relationship() {
    let mut s = Suite::setup();
    let member = s.member_with_savings("Hawa Nekesa", Money::from_major(5_000));
    s.approved_loan(member.id, 2_000, 10, 4);

    let profile = s.directory.member_profile(member.id).unwrap();
    assert_eq!(profile.member.id, member.id);
    assert_eq!(profile.total_savings, Money::from_major(5_000));
    assert_eq!(profile.loans_on_book, 1);
}

#[test]
fn removal_requires_an_empty_loan_book() {
    let mut s = Suite::setup();
    let member = s.member_with_savings("Isoke Adhiambo", Money::from_major(500));
    let approval = s.approved_loan(member.id, 300, 10, 3);

    let err = s.directory.remove_member(member.id, &s.time).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Validation);
    assert!(matches!(err, LedgerError::MemberHasLoans { loans: 1, .. }));

    s.ledger.delete_loan(approval.loan.id, None, &s.time).unwrap();
    s.directory.remove_member(member.id, &s.time).unwrap();

    assert!(matches!(
        s.directory.member(member.id).unwrap_err(),
        LedgerError::MemberNotFound { .. }
    ));
    let events = s.directory.take_events();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::MemberRemoved { postings_deleted: 1, .. }
    )));
}

#[test]
fn removal_is_blocked_while_cited_as_referee() {
    let mut s = Suite::setup();
    let applicant = s.member_with_savings("Kagendo Mutua", Money::from_major(100));
    let referee_a = s.member_with_savings("Lulu Chepkoech", Money::from_major(50));
    let referee_b = s.member_with_savings("Makena Gitau", Money::from_major(50));

    let request = s.loan_request(applicant.id, 150, 10, 6);
    let loan = s
        .ledger
        .apply_for_loan(request, referee_a.id, referee_b.id, &s.time)
        .unwrap();

    // a guarantor cannot leave while a loan still cites them
    let err = s.directory.remove_member(referee_a.id, &s.time).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Validation);
    assert!(matches!(err, LedgerError::MemberGuaranteesLoans { loans: 1, .. }));

    // both the member row and the citation survive the refusal
    assert!(s.directory.member(referee_a.id).is_ok());
    assert_eq!(
        s.ledger.loan(loan.id).unwrap().referees,
        Some([referee_a.id, referee_b.id])
    );

    // deleting the loan releases the guarantor
    s.ledger.delete_loan(loan.id, None, &s.time).unwrap();
    s.directory.remove_member(referee_a.id, &s.time).unwrap();
    assert!(matches!(
        s.directory.member(referee_a.id).unwrap_err(),
        LedgerError::MemberNotFound { .. }
    ));
}

#[test]
fn number_prefixes_follow_configuration() {
    let store = Arc::new(MemoryStore::new());
    let config = LedgerConfig::with_prefixes("KSC", "KSL");
    let mut directory = MemberDirectory::new(store.clone(), config.clone());
    let mut ledger = LoanLedger::new(store, config);
    let time = SafeTimeProvider::new(TimeSource::Test(
        chrono::Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    ));

    let member = directory.register_member("Juma Barasa", None, None, None, &time).unwrap();
    assert!(member.member_number.starts_with("KSC-20260301-"));

    let loan = ledger
        .create_loan(
            LoanRequest {
                member_id: member.id,
                principal: Money::from_major(1_000),
                annual_rate: Rate::from_percentage(10),
                term_months: 10,
                purpose: None,
                applied_by: None,
            },
            &time,
        )
        .unwrap();
    assert!(loan.loan_number.starts_with("KSL-20260301-"));
}
