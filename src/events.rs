use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{InstallmentId, LoanId, LoanStatus, MemberId, PaymentId};

/// all events that can be emitted by the directory and the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // membership events
    MemberRegistered {
        member_id: MemberId,
        member_number: String,
        timestamp: DateTime<Utc>,
    },
    SavingsDeposited {
        member_id: MemberId,
        amount: Money,
        new_total: Money,
        timestamp: DateTime<Utc>,
    },
    SavingsWithdrawn {
        member_id: MemberId,
        amount: Money,
        new_total: Money,
        timestamp: DateTime<Utc>,
    },
    MemberRemoved {
        member_id: MemberId,
        postings_deleted: usize,
        timestamp: DateTime<Utc>,
    },

    // loan lifecycle events
    LoanCreated {
        loan_id: LoanId,
        member_id: MemberId,
        loan_number: String,
        principal: Money,
        timestamp: DateTime<Utc>,
    },
    LoanApproved {
        loan_id: LoanId,
        total_payable: Money,
        installments: usize,
        first_due: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    LoanRejected {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
    StatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        timestamp: DateTime<Utc>,
    },
    ScheduleCleared {
        loan_id: LoanId,
        installments_deleted: usize,
        timestamp: DateTime<Utc>,
    },
    LoanCompleted {
        loan_id: LoanId,
        total_paid: Money,
        timestamp: DateTime<Utc>,
    },
    LoanDeleted {
        loan_id: LoanId,
        installments_deleted: usize,
        payments_deleted: usize,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        payment_id: PaymentId,
        loan_id: LoanId,
        installment_id: InstallmentId,
        amount: Money,
        outstanding_balance: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentReversed {
        payment_id: PaymentId,
        loan_id: LoanId,
        installment_id: InstallmentId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
