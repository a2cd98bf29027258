use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::LedgerConfig;
use crate::decimal::{Money, Rate};
use crate::eligibility::{self, EligibilityAssessment};
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::members::savings_total;
use crate::model::{Loan, Payment, RepaymentInstallment};
use crate::numbers;
use crate::schedule::RepaymentSchedule;
use crate::store::{LedgerStore, StoreTx};
use crate::types::{
    ActorId, InstallmentId, InstallmentStatus, LoanId, LoanStatus, LoanSummary, MemberId,
    PaymentId, PaymentMethod,
};

/// a request to put a new loan on the book
#[derive(Debug, Clone, PartialEq)]
pub struct LoanRequest {
    pub member_id: MemberId,
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub purpose: Option<String>,
    pub applied_by: Option<ActorId>,
}

/// a request to record money received against an installment
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub loan_id: LoanId,
    pub installment_id: InstallmentId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub recorded_by: Option<ActorId>,
}

/// outcome of an approval: the decided loan and its fresh schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApproval {
    pub loan: Loan,
    pub installments: Vec<RepaymentInstallment>,
}

/// outcome of recording a payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub installment: RepaymentInstallment,
    pub outstanding_balance: Money,
    pub loan_completed: bool,
}

/// outcome of reversing a payment; `payment` is the deleted row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReversal {
    pub payment: Payment,
    pub installment: RepaymentInstallment,
    pub outstanding_balance: Money,
}

/// facts collected inside a status-change transaction, emitted after commit
struct Transition {
    loan: Loan,
    old_status: LoanStatus,
    cleared: usize,
    approved: Option<Vec<RepaymentInstallment>>,
    completed_total: Option<Money>,
}

/// sum of surviving payments for a loan, the only paid figure there is
fn loan_total_paid(tx: &dyn StoreTx, loan_id: LoanId) -> Result<Money> {
    Ok(tx.payments_for_loan(loan_id)?.iter().map(|p| p.amount).sum())
}

/// recompute an installment's projection from its surviving payments
fn project_installment(
    tx: &mut dyn StoreTx,
    installment_id: InstallmentId,
    as_of: NaiveDate,
) -> Result<RepaymentInstallment> {
    let mut installment = tx
        .installment(installment_id)?
        .ok_or(LedgerError::InstallmentNotFound { id: installment_id })?;
    let payments = tx.payments_for_installment(installment_id)?;

    installment.amount_paid = payments.iter().map(|p| p.amount).sum();
    if payments.is_empty() {
        installment.status = if installment.due_date < as_of {
            InstallmentStatus::Overdue
        } else {
            InstallmentStatus::Pending
        };
        installment.payment_date = None;
    } else {
        installment.status = InstallmentStatus::Paid;
        installment.payment_date = payments.iter().map(|p| p.payment_date).max();
    }

    tx.update_installment(installment.clone())?;
    Ok(installment)
}

fn summarize(loan: &Loan, total_paid: Money) -> LoanSummary {
    let total_payable = loan.total_payable();
    let completion_percentage = if total_payable.is_zero() {
        Decimal::ZERO
    } else {
        (total_paid.as_decimal() / total_payable.as_decimal() * Decimal::from(100))
            .clamp(Decimal::ZERO, Decimal::from(100))
            .round_dp(2)
    };
    LoanSummary {
        loan_id: loan.id,
        status: loan.status,
        principal: loan.principal,
        total_interest: loan.total_interest(),
        total_payable,
        total_paid,
        outstanding_balance: total_payable - total_paid,
        completion_percentage,
    }
}

/// loan lifecycle and repayment ledger
pub struct LoanLedger<S: LedgerStore> {
    store: Arc<S>,
    config: LedgerConfig,
    events: EventStore,
}

impl<S: LedgerStore> LoanLedger<S> {
    pub fn new(store: Arc<S>, config: LedgerConfig) -> Self {
        Self {
            store,
            config,
            events: EventStore::new(),
        }
    }

    fn validate_terms(request: &LoanRequest) -> Result<()> {
        if !request.principal.is_positive() {
            return Err(LedgerError::InvalidAmount { amount: request.principal });
        }
        if request.annual_rate.is_negative() {
            return Err(LedgerError::InvalidInterestRate { rate: request.annual_rate });
        }
        if request.term_months == 0 {
            return Err(LedgerError::InvalidTerm { months: request.term_months });
        }
        Ok(())
    }

    fn insert_loan_in_tx(
        tx: &mut dyn StoreTx,
        config: &LedgerConfig,
        request: LoanRequest,
        referees: Option<[MemberId; 2]>,
        now: DateTime<Utc>,
    ) -> Result<Loan> {
        let loan_number = numbers::allocate(
            &config.loan_number_prefix,
            now.date_naive(),
            config.number_retry_limit,
            |n| tx.loan_number_exists(n),
        )?;
        let loan = Loan {
            id: Uuid::new_v4(),
            loan_number,
            member_id: request.member_id,
            referees,
            principal: request.principal,
            annual_rate: request.annual_rate,
            term_months: request.term_months,
            purpose: request.purpose,
            status: LoanStatus::Pending,
            applied_at: now,
            applied_by: request.applied_by,
            processed_by: None,
            processed_at: None,
        };
        tx.insert_loan(loan.clone())?;
        Ok(loan)
    }

    /// put a pending loan on the book without an eligibility check
    pub fn create_loan(
        &mut self,
        request: LoanRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        Self::validate_terms(&request)?;

        let now = time_provider.now();
        let config = &self.config;
        let loan = self.store.transaction(|tx| {
            tx.member(request.member_id)?
                .ok_or(LedgerError::MemberNotFound { id: request.member_id })?;
            Self::insert_loan_in_tx(tx, config, request, None, now)
        })?;

        info!(loan_number = %loan.loan_number, principal = %loan.principal, "loan created");
        self.events.emit(Event::LoanCreated {
            loan_id: loan.id,
            member_id: loan.member_id,
            loan_number: loan.loan_number.clone(),
            principal: loan.principal,
            timestamp: now,
        });

        Ok(loan)
    }

    /// put a pending loan on the book after the guarantor-backed
    /// eligibility check
    ///
    /// the requested amount must not exceed the applicant's savings plus
    /// both referees' savings; an over-limit request creates nothing
    pub fn apply_for_loan(
        &mut self,
        request: LoanRequest,
        referee_a: MemberId,
        referee_b: MemberId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        Self::validate_terms(&request)?;
        if referee_a == request.member_id
            || referee_b == request.member_id
            || referee_a == referee_b
        {
            return Err(LedgerError::RefereesNotDistinct);
        }

        let now = time_provider.now();
        let config = &self.config;
        let loan = self.store.transaction(|tx| {
            tx.member(request.member_id)?
                .ok_or(LedgerError::MemberNotFound { id: request.member_id })?;
            tx.member(referee_a)?.ok_or(LedgerError::MemberNotFound { id: referee_a })?;
            tx.member(referee_b)?.ok_or(LedgerError::MemberNotFound { id: referee_b })?;

            let assessment = eligibility::assess(
                request.principal,
                savings_total(&*tx, request.member_id)?,
                savings_total(&*tx, referee_a)?,
                savings_total(&*tx, referee_b)?,
            );
            assessment.ensure()?;

            Self::insert_loan_in_tx(tx, config, request, Some([referee_a, referee_b]), now)
        })?;

        info!(loan_number = %loan.loan_number, principal = %loan.principal, "loan application accepted");
        self.events.emit(Event::LoanCreated {
            loan_id: loan.id,
            member_id: loan.member_id,
            loan_number: loan.loan_number.clone(),
            principal: loan.principal,
            timestamp: now,
        });

        Ok(loan)
    }

    /// assess how a requested amount sits against the guarantor-backed limit
    pub fn assess_eligibility(
        &self,
        member_id: MemberId,
        referee_a: MemberId,
        referee_b: MemberId,
        requested: Money,
    ) -> Result<EligibilityAssessment> {
        if referee_a == member_id || referee_b == member_id || referee_a == referee_b {
            return Err(LedgerError::RefereesNotDistinct);
        }
        self.store.read(|tx| {
            tx.member(member_id)?.ok_or(LedgerError::MemberNotFound { id: member_id })?;
            tx.member(referee_a)?.ok_or(LedgerError::MemberNotFound { id: referee_a })?;
            tx.member(referee_b)?.ok_or(LedgerError::MemberNotFound { id: referee_b })?;
            Ok(eligibility::assess(
                requested,
                savings_total(tx, member_id)?,
                savings_total(tx, referee_a)?,
                savings_total(tx, referee_b)?,
            ))
        })
    }

    fn approve_in_tx(
        tx: &mut dyn StoreTx,
        config: &LedgerConfig,
        mut loan: Loan,
        approved_by: Option<ActorId>,
        now: DateTime<Utc>,
    ) -> Result<(Loan, Vec<RepaymentInstallment>, usize)> {
        // a retried approval must not leave two schedules behind
        let cleared = tx.delete_installments_for_loan(loan.id)?;

        loan.status = LoanStatus::Approved;
        loan.processed_by = approved_by;
        loan.processed_at = Some(now);

        let schedule =
            RepaymentSchedule::generate(&loan, now.date_naive(), config.first_due_offset_months)?;
        for installment in &schedule.installments {
            tx.insert_installment(installment.clone())?;
        }
        tx.update_loan(loan.clone())?;

        Ok((loan, schedule.installments, cleared))
    }

    /// approve a pending loan and persist its repayment schedule
    pub fn approve_loan(
        &mut self,
        loan_id: LoanId,
        approved_by: Option<ActorId>,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanApproval> {
        let now = time_provider.now();
        let config = &self.config;
        let (loan, installments, cleared) = self.store.transaction(|tx| {
            let loan = tx.loan(loan_id)?.ok_or(LedgerError::LoanNotFound { id: loan_id })?;
            if loan.status != LoanStatus::Pending {
                return Err(LedgerError::LoanNotInStatus {
                    loan_id,
                    status: loan.status,
                    expected: LoanStatus::Pending,
                });
            }
            Self::approve_in_tx(tx, config, loan, approved_by, now)
        })?;

        info!(
            loan_number = %loan.loan_number,
            installments = installments.len(),
            "loan approved"
        );
        if cleared > 0 {
            self.events.emit(Event::ScheduleCleared {
                loan_id,
                installments_deleted: cleared,
                timestamp: now,
            });
        }
        self.events.emit(Event::LoanApproved {
            loan_id: loan.id,
            total_payable: loan.total_payable(),
            installments: installments.len(),
            first_due: installments.first().map(|i| i.due_date).unwrap_or(now.date_naive()),
            timestamp: now,
        });

        Ok(LoanApproval { loan, installments })
    }

    /// reject a pending loan
    pub fn reject_loan(
        &mut self,
        loan_id: LoanId,
        rejected_by: Option<ActorId>,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let now = time_provider.now();
        let loan = self.store.transaction(|tx| {
            let mut loan = tx.loan(loan_id)?.ok_or(LedgerError::LoanNotFound { id: loan_id })?;
            if loan.status != LoanStatus::Pending {
                return Err(LedgerError::LoanNotInStatus {
                    loan_id,
                    status: loan.status,
                    expected: LoanStatus::Pending,
                });
            }
            loan.status = LoanStatus::Rejected;
            loan.processed_by = rejected_by;
            loan.processed_at = Some(now);
            tx.update_loan(loan.clone())?;
            Ok(loan)
        })?;

        info!(loan_number = %loan.loan_number, "loan rejected");
        self.events.emit(Event::LoanRejected { loan_id, timestamp: now });

        Ok(loan)
    }

    /// move a loan between statuses, with schedule side effects
    ///
    /// into `Approved` this regenerates the schedule like `approve_loan`;
    /// out of `Approved` it drops the schedule, which is refused once any
    /// payment has been recorded; terminal statuses admit no change
    pub fn change_status(
        &mut self,
        loan_id: LoanId,
        new_status: LoanStatus,
        acted_by: Option<ActorId>,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let now = time_provider.now();
        let config = &self.config;
        let transition = self.store.transaction(|tx| {
            let loan = tx.loan(loan_id)?.ok_or(LedgerError::LoanNotFound { id: loan_id })?;
            let old_status = loan.status;
            if old_status.is_terminal() {
                return Err(LedgerError::TerminalStatus { loan_id, status: old_status });
            }
            if new_status == old_status {
                return Err(LedgerError::ForbiddenTransition {
                    loan_id,
                    from: old_status,
                    to: new_status,
                });
            }

            match (old_status, new_status) {
                (LoanStatus::Pending, LoanStatus::Approved) => {
                    let (loan, installments, cleared) =
                        Self::approve_in_tx(tx, config, loan, acted_by, now)?;
                    Ok(Transition {
                        loan,
                        old_status,
                        cleared,
                        approved: Some(installments),
                        completed_total: None,
                    })
                }
                (LoanStatus::Pending, LoanStatus::Rejected) => {
                    let mut loan = loan;
                    loan.status = LoanStatus::Rejected;
                    loan.processed_by = acted_by;
                    loan.processed_at = Some(now);
                    tx.update_loan(loan.clone())?;
                    Ok(Transition {
                        loan,
                        old_status,
                        cleared: 0,
                        approved: None,
                        completed_total: None,
                    })
                }
                (LoanStatus::Approved, LoanStatus::Completed) => {
                    // manual settlement; the schedule stays as the record
                    let total_paid = loan_total_paid(&*tx, loan_id)?;
                    let mut loan = loan;
                    loan.status = LoanStatus::Completed;
                    tx.update_loan(loan.clone())?;
                    Ok(Transition {
                        loan,
                        old_status,
                        cleared: 0,
                        approved: None,
                        completed_total: Some(total_paid),
                    })
                }
                (LoanStatus::Approved, LoanStatus::Pending | LoanStatus::Rejected) => {
                    let payments = tx.payments_for_loan(loan_id)?.len();
                    if payments > 0 {
                        return Err(LedgerError::ScheduleLocked { loan_id, payments });
                    }
                    let cleared = tx.delete_installments_for_loan(loan_id)?;
                    let mut loan = loan;
                    loan.status = new_status;
                    if new_status == LoanStatus::Pending {
                        loan.processed_by = None;
                        loan.processed_at = None;
                    } else {
                        loan.processed_by = acted_by;
                        loan.processed_at = Some(now);
                    }
                    tx.update_loan(loan.clone())?;
                    Ok(Transition {
                        loan,
                        old_status,
                        cleared,
                        approved: None,
                        completed_total: None,
                    })
                }
                (from, to) => Err(LedgerError::ForbiddenTransition { loan_id, from, to }),
            }
        })?;

        let Transition { loan, old_status, cleared, approved, completed_total } = transition;
        info!(
            loan_number = %loan.loan_number,
            from = ?old_status,
            to = ?loan.status,
            "loan status changed"
        );
        if cleared > 0 {
            self.events.emit(Event::ScheduleCleared {
                loan_id,
                installments_deleted: cleared,
                timestamp: now,
            });
        }
        self.events.emit(Event::StatusChanged {
            loan_id,
            old_status,
            new_status: loan.status,
            timestamp: now,
        });
        if let Some(installments) = approved {
            self.events.emit(Event::LoanApproved {
                loan_id,
                total_payable: loan.total_payable(),
                installments: installments.len(),
                first_due: installments.first().map(|i| i.due_date).unwrap_or(now.date_naive()),
                timestamp: now,
            });
        }
        if let Some(total_paid) = completed_total {
            self.events.emit(Event::LoanCompleted { loan_id, total_paid, timestamp: now });
        }

        Ok(loan)
    }

    /// record money received against an installment
    ///
    /// a payment settles its installment; when the last installment
    /// settles, the loan closes as completed in the same transaction
    pub fn record_payment(
        &mut self,
        request: PaymentRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentReceipt> {
        if !request.amount.is_positive() {
            return Err(LedgerError::InvalidAmount { amount: request.amount });
        }

        let now = time_provider.now();
        let (receipt, total_paid) = self.store.transaction(|tx| {
            let loan =
                tx.loan(request.loan_id)?.ok_or(LedgerError::LoanNotFound { id: request.loan_id })?;
            if loan.status != LoanStatus::Approved {
                return Err(LedgerError::LoanNotInStatus {
                    loan_id: loan.id,
                    status: loan.status,
                    expected: LoanStatus::Approved,
                });
            }

            let installment = tx
                .installment(request.installment_id)?
                .ok_or(LedgerError::InstallmentNotFound { id: request.installment_id })?;
            if installment.loan_id != loan.id {
                return Err(LedgerError::InstallmentLoanMismatch {
                    installment_id: installment.id,
                    loan_id: loan.id,
                });
            }
            if !installment.status.can_accept_payment() {
                return Err(LedgerError::InstallmentNotPayable {
                    installment_id: installment.id,
                    status: installment.status,
                });
            }
            if request.amount > installment.amount_due {
                return Err(LedgerError::PaymentExceedsDue {
                    installment_id: installment.id,
                    due: installment.amount_due,
                    provided: request.amount,
                });
            }

            let payment = Payment {
                id: Uuid::new_v4(),
                loan_id: loan.id,
                installment_id: installment.id,
                amount: request.amount,
                payment_date: request.payment_date,
                method: request.method,
                reference: request.reference,
                notes: request.notes,
                recorded_at: now,
                recorded_by: request.recorded_by,
            };
            tx.insert_payment(payment.clone())?;
            let installment = project_installment(tx, payment.installment_id, now.date_naive())?;

            let all_paid = tx
                .installments_for_loan(loan.id)?
                .iter()
                .all(|i| i.status == InstallmentStatus::Paid);
            let mut loan = loan;
            if all_paid {
                loan.status = LoanStatus::Completed;
                tx.update_loan(loan.clone())?;
            }

            let total_paid = loan_total_paid(&*tx, loan.id)?;
            let receipt = PaymentReceipt {
                payment,
                installment,
                outstanding_balance: loan.total_payable() - total_paid,
                loan_completed: all_paid,
            };
            Ok((receipt, total_paid))
        })?;

        info!(
            loan_id = %receipt.payment.loan_id,
            amount = %receipt.payment.amount,
            outstanding = %receipt.outstanding_balance,
            "payment recorded"
        );
        self.events.emit(Event::PaymentRecorded {
            payment_id: receipt.payment.id,
            loan_id: receipt.payment.loan_id,
            installment_id: receipt.payment.installment_id,
            amount: receipt.payment.amount,
            outstanding_balance: receipt.outstanding_balance,
            timestamp: now,
        });
        if receipt.loan_completed {
            self.events.emit(Event::LoanCompleted {
                loan_id: receipt.payment.loan_id,
                total_paid,
                timestamp: now,
            });
        }

        Ok(receipt)
    }

    /// delete a payment and recompute its installment's projection
    ///
    /// completed loans are closed books; reversing against one is refused
    pub fn reverse_payment(
        &mut self,
        payment_id: PaymentId,
        reversed_by: Option<ActorId>,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentReversal> {
        let now = time_provider.now();
        let reversal = self.store.transaction(|tx| {
            let payment =
                tx.payment(payment_id)?.ok_or(LedgerError::PaymentNotFound { id: payment_id })?;
            let loan = tx
                .loan(payment.loan_id)?
                .ok_or(LedgerError::LoanNotFound { id: payment.loan_id })?;
            if loan.status == LoanStatus::Completed {
                return Err(LedgerError::TerminalStatus { loan_id: loan.id, status: loan.status });
            }

            tx.delete_payment(payment_id)?;
            let installment = project_installment(tx, payment.installment_id, now.date_naive())?;
            let total_paid = loan_total_paid(&*tx, loan.id)?;
            Ok(PaymentReversal {
                payment,
                installment,
                outstanding_balance: loan.total_payable() - total_paid,
            })
        })?;

        info!(%payment_id, reversed_by = ?reversed_by, "payment reversed");
        self.events.emit(Event::PaymentReversed {
            payment_id,
            loan_id: reversal.payment.loan_id,
            installment_id: reversal.payment.installment_id,
            amount: reversal.payment.amount,
            timestamp: now,
        });

        Ok(reversal)
    }

    /// financial position of a loan, derived from its payment ledger
    pub fn loan_summary(&self, loan_id: LoanId) -> Result<LoanSummary> {
        self.store.read(|tx| {
            let loan = tx.loan(loan_id)?.ok_or(LedgerError::LoanNotFound { id: loan_id })?;
            let total_paid = loan_total_paid(tx, loan_id)?;
            Ok(summarize(&loan, total_paid))
        })
    }

    /// flip pending installments past their due date to overdue
    pub fn refresh_overdue(
        &mut self,
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<RepaymentInstallment>> {
        let as_of = time_provider.now().date_naive();
        let flipped = self.store.transaction(|tx| {
            let mut flipped = Vec::new();
            for loan in tx.loans()? {
                if loan.status != LoanStatus::Approved {
                    continue;
                }
                for mut installment in tx.installments_for_loan(loan.id)? {
                    if installment.status == InstallmentStatus::Pending
                        && installment.due_date < as_of
                    {
                        installment.status = InstallmentStatus::Overdue;
                        tx.update_installment(installment.clone())?;
                        flipped.push(installment);
                    }
                }
            }
            Ok(flipped)
        })?;

        if !flipped.is_empty() {
            info!(count = flipped.len(), %as_of, "installments marked overdue");
        }
        Ok(flipped)
    }

    /// refresh overdue statuses with system time
    pub fn refresh_overdue_now(&mut self) -> Result<Vec<RepaymentInstallment>> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.refresh_overdue(&time)
    }

    /// administrative removal of a loan and everything under it
    pub fn delete_loan(
        &mut self,
        loan_id: LoanId,
        deleted_by: Option<ActorId>,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let now = time_provider.now();
        let (installments_deleted, payments_deleted) = self.store.transaction(|tx| {
            tx.loan(loan_id)?.ok_or(LedgerError::LoanNotFound { id: loan_id })?;
            let payments = tx.delete_payments_for_loan(loan_id)?;
            let installments = tx.delete_installments_for_loan(loan_id)?;
            tx.delete_loan(loan_id)?;
            Ok((installments, payments))
        })?;

        info!(%loan_id, deleted_by = ?deleted_by, "loan deleted");
        self.events.emit(Event::LoanDeleted {
            loan_id,
            installments_deleted,
            payments_deleted,
            timestamp: now,
        });

        Ok(())
    }

    /// fetch a loan by id
    pub fn loan(&self, loan_id: LoanId) -> Result<Loan> {
        self.store
            .read(|tx| tx.loan(loan_id))?
            .ok_or(LedgerError::LoanNotFound { id: loan_id })
    }

    /// all loans ordered by application time
    pub fn loans(&self) -> Result<Vec<Loan>> {
        self.store.read(|tx| tx.loans())
    }

    /// a loan's schedule ordered by installment number
    pub fn loan_schedule(&self, loan_id: LoanId) -> Result<Vec<RepaymentInstallment>> {
        self.store.read(|tx| {
            tx.loan(loan_id)?.ok_or(LedgerError::LoanNotFound { id: loan_id })?;
            tx.installments_for_loan(loan_id)
        })
    }

    /// a member's loans ordered by application time
    pub fn loans_for_member(&self, member_id: MemberId) -> Result<Vec<Loan>> {
        self.store.read(|tx| {
            tx.member(member_id)?.ok_or(LedgerError::MemberNotFound { id: member_id })?;
            tx.loans_for_member(member_id)
        })
    }

    /// a loan's payments ordered by payment date
    pub fn payments_for_loan(&self, loan_id: LoanId) -> Result<Vec<Payment>> {
        self.store.read(|tx| {
            tx.loan(loan_id)?.ok_or(LedgerError::LoanNotFound { id: loan_id })?;
            tx.payments_for_loan(loan_id)
        })
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
