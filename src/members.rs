use std::sync::Arc;

use hourglass_rs::SafeTimeProvider;
use tracing::info;
use uuid::Uuid;

use crate::config::LedgerConfig;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::model::{Member, SavingsPosting};
use crate::numbers;
use crate::store::{LedgerStore, StoreTx};
use crate::types::{ActorId, MemberId, MemberProfile, PaymentMethod};

/// sum of a member's savings postings, the only savings figure there is
pub(crate) fn savings_total(tx: &dyn StoreTx, member_id: MemberId) -> Result<Money> {
    Ok(tx.postings_for_member(member_id)?.iter().map(|p| p.amount).sum())
}

/// member registration and savings postings
pub struct MemberDirectory<S: LedgerStore> {
    store: Arc<S>,
    config: LedgerConfig,
    events: EventStore,
}

impl<S: LedgerStore> MemberDirectory<S> {
    pub fn new(store: Arc<S>, config: LedgerConfig) -> Self {
        Self {
            store,
            config,
            events: EventStore::new(),
        }
    }

    /// register a member and allocate their member number
    pub fn register_member(
        &mut self,
        full_name: &str,
        phone: Option<String>,
        email: Option<String>,
        registered_by: Option<ActorId>,
        time_provider: &SafeTimeProvider,
    ) -> Result<Member> {
        let name = full_name.trim();
        if name.is_empty() {
            return Err(LedgerError::BlankMemberName);
        }

        let now = time_provider.now();
        let config = &self.config;
        let member = self.store.transaction(|tx| {
            let member_number = numbers::allocate(
                &config.member_number_prefix,
                now.date_naive(),
                config.number_retry_limit,
                |n| tx.member_number_exists(n),
            )?;
            let member = Member {
                id: Uuid::new_v4(),
                member_number,
                full_name: name.to_string(),
                phone,
                email,
                registered_at: now,
                registered_by,
            };
            tx.insert_member(member.clone())?;
            Ok(member)
        })?;

        info!(member_number = %member.member_number, "member registered");
        self.events.emit(Event::MemberRegistered {
            member_id: member.id,
            member_number: member.member_number.clone(),
            timestamp: now,
        });

        Ok(member)
    }

    /// post a deposit to a member's savings
    pub fn record_deposit(
        &mut self,
        member_id: MemberId,
        amount: Money,
        method: PaymentMethod,
        recorded_by: Option<ActorId>,
        time_provider: &SafeTimeProvider,
    ) -> Result<SavingsPosting> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount { amount });
        }

        let now = time_provider.now();
        let (posting, new_total) = self.store.transaction(|tx| {
            tx.member(member_id)?.ok_or(LedgerError::MemberNotFound { id: member_id })?;
            let posting = SavingsPosting {
                id: Uuid::new_v4(),
                member_id,
                amount,
                method,
                recorded_at: now,
                recorded_by,
            };
            tx.insert_posting(posting.clone())?;
            let total = savings_total(&*tx, member_id)?;
            Ok((posting, total))
        })?;

        info!(%member_id, %amount, "savings deposit recorded");
        self.events.emit(Event::SavingsDeposited {
            member_id,
            amount,
            new_total,
            timestamp: now,
        });

        Ok(posting)
    }

    /// post a withdrawal against a member's savings
    pub fn record_withdrawal(
        &mut self,
        member_id: MemberId,
        amount: Money,
        method: PaymentMethod,
        recorded_by: Option<ActorId>,
        time_provider: &SafeTimeProvider,
    ) -> Result<SavingsPosting> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount { amount });
        }

        let now = time_provider.now();
        let (posting, new_total) = self.store.transaction(|tx| {
            tx.member(member_id)?.ok_or(LedgerError::MemberNotFound { id: member_id })?;
            let available = savings_total(&*tx, member_id)?;
            if amount > available {
                return Err(LedgerError::InsufficientSavings { available, requested: amount });
            }
            let posting = SavingsPosting {
                id: Uuid::new_v4(),
                member_id,
                amount: -amount,
                method,
                recorded_at: now,
                recorded_by,
            };
            tx.insert_posting(posting.clone())?;
            let total = savings_total(&*tx, member_id)?;
            Ok((posting, total))
        })?;

        info!(%member_id, %amount, "savings withdrawal recorded");
        self.events.emit(Event::SavingsWithdrawn {
            member_id,
            amount,
            new_total,
            timestamp: now,
        });

        Ok(posting)
    }

    /// current savings position of a member
    pub fn total_savings(&self, member_id: MemberId) -> Result<Money> {
        self.store.read(|tx| {
            tx.member(member_id)?.ok_or(LedgerError::MemberNotFound { id: member_id })?;
            savings_total(tx, member_id)
        })
    }

    /// member with their derived savings and loan counts
    pub fn member_profile(&self, member_id: MemberId) -> Result<MemberProfile> {
        self.store.read(|tx| {
            let member =
                tx.member(member_id)?.ok_or(LedgerError::MemberNotFound { id: member_id })?;
            let total_savings = savings_total(tx, member_id)?;
            let loans_on_book = tx.count_loans_for_member(member_id)?;
            Ok(MemberProfile { member, total_savings, loans_on_book })
        })
    }

    /// fetch a member by id
    pub fn member(&self, member_id: MemberId) -> Result<Member> {
        self.store
            .read(|tx| tx.member(member_id))?
            .ok_or(LedgerError::MemberNotFound { id: member_id })
    }

    /// all members ordered by member number
    pub fn members(&self) -> Result<Vec<Member>> {
        self.store.read(|tx| tx.members())
    }

    /// a member's savings postings, oldest first
    pub fn postings(&self, member_id: MemberId) -> Result<Vec<SavingsPosting>> {
        self.store.read(|tx| {
            tx.member(member_id)?.ok_or(LedgerError::MemberNotFound { id: member_id })?;
            tx.postings_for_member(member_id)
        })
    }

    /// administrative removal; cascades postings, refused while any loan cites the member
    pub fn remove_member(
        &mut self,
        member_id: MemberId,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let now = time_provider.now();
        let postings_deleted = self.store.transaction(|tx| {
            tx.member(member_id)?.ok_or(LedgerError::MemberNotFound { id: member_id })?;
            let loans = tx.count_loans_for_member(member_id)?;
            if loans > 0 {
                return Err(LedgerError::MemberHasLoans { member_id, loans });
            }
            // referee citations keep the member row pinned too
            let guaranteed = tx.count_loans_with_referee(member_id)?;
            if guaranteed > 0 {
                return Err(LedgerError::MemberGuaranteesLoans { member_id, loans: guaranteed });
            }
            let deleted = tx.delete_postings_for_member(member_id)?;
            tx.delete_member(member_id)?;
            Ok(deleted)
        })?;

        info!(%member_id, postings_deleted, "member removed");
        self.events.emit(Event::MemberRemoved {
            member_id,
            postings_deleted,
            timestamp: now,
        });

        Ok(())
    }

    /// drain events collected by prior operations
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    /// events collected so far
    pub fn events(&self) -> &[Event] {
        self.events.events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn directory() -> MemberDirectory<MemoryStore> {
        MemberDirectory::new(Arc::new(MemoryStore::new()), LedgerConfig::standard())
    }

    fn clock() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_register_member() {
        let mut directory = directory();
        let time = clock();

        let member = directory
            .register_member("Achieng Otieno", Some("0712000001".into()), None, None, &time)
            .unwrap();

        assert!(member.member_number.starts_with("MBR-20260115-"));
        assert_eq!(directory.member(member.id).unwrap().full_name, "Achieng Otieno");

        let events = directory.take_events();
        assert!(events.iter().any(|e| matches!(e, Event::MemberRegistered { .. })));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut directory = directory();
        let err = directory.register_member("   ", None, None, None, &clock()).unwrap_err();
        assert!(matches!(err, LedgerError::BlankMemberName));
    }

    #[test]
    fn test_savings_are_summed_from_postings() {
        let mut directory = directory();
        let time = clock();
        let member = directory.register_member("Baraka Njoroge", None, None, None, &time).unwrap();

        directory
            .record_deposit(member.id, Money::from_major(300), PaymentMethod::Cash, None, &time)
            .unwrap();
        directory
            .record_deposit(member.id, Money::from_major(200), PaymentMethod::MobileMoney, None, &time)
            .unwrap();
        directory
            .record_withdrawal(member.id, Money::from_major(50), PaymentMethod::Cash, None, &time)
            .unwrap();

        assert_eq!(directory.total_savings(member.id).unwrap(), Money::from_major(450));
        assert_eq!(directory.postings(member.id).unwrap().len(), 3);
    }

    #[test]
    fn test_withdrawal_cannot_exceed_savings() {
        let mut directory = directory();
        let time = clock();
        let member = directory.register_member("Chebet Kiprotich", None, None, None, &time).unwrap();
        directory
            .record_deposit(member.id, Money::from_major(100), PaymentMethod::Cash, None, &time)
            .unwrap();

        let err = directory
            .record_withdrawal(member.id, Money::from_str_exact("100.01").unwrap(), PaymentMethod::Cash, None, &time)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientSavings { .. }));
        // nothing was written
        assert_eq!(directory.total_savings(member.id).unwrap(), Money::from_major(100));
    }

    #[test]
    fn test_deposit_to_unknown_member() {
        let mut directory = directory();
        let err = directory
            .record_deposit(Uuid::new_v4(), Money::from_major(10), PaymentMethod::Cash, None, &clock())
            .unwrap_err();
        assert!(matches!(err, LedgerError::MemberNotFound { .. }));
    }

    #[test]
    fn test_remove_member_cascades_postings() {
        let mut directory = directory();
        let time = clock();
        let member = directory.register_member("Dalia Wanjiku", None, None, None, &time).unwrap();
        directory
            .record_deposit(member.id, Money::from_major(75), PaymentMethod::Cash, None, &time)
            .unwrap();

        directory.remove_member(member.id, &time).unwrap();

        assert!(matches!(
            directory.member(member.id).unwrap_err(),
            LedgerError::MemberNotFound { .. }
        ));
        let events = directory.take_events();
        assert!(events.iter().any(
            |e| matches!(e, Event::MemberRemoved { postings_deleted: 1, .. })
        ));
    }

    #[test]
    fn test_profile_reports_position() {
        let mut directory = directory();
        let time = clock();
        let member = directory.register_member("Ekwueme Abara", None, None, None, &time).unwrap();
        directory
            .record_deposit(member.id, Money::from_major(500), PaymentMethod::BankTransfer, None, &time)
            .unwrap();

        let profile = directory.member_profile(member.id).unwrap();
        assert_eq!(profile.total_savings, Money::from_major(500));
        assert_eq!(profile.loans_on_book, 0);
        assert_eq!(profile.member.id, member.id);
    }
}
