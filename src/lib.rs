pub mod config;
pub mod decimal;
pub mod eligibility;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod members;
pub mod model;
pub mod numbers;
pub mod schedule;
pub mod store;
pub mod types;

// re-export key types
pub use config::LedgerConfig;
pub use decimal::{Money, Rate};
pub use eligibility::EligibilityAssessment;
pub use errors::{ErrorClass, LedgerError, Result, StoreError};
pub use events::{Event, EventStore};
pub use ledger::{
    LoanApproval, LoanLedger, LoanRequest, PaymentReceipt, PaymentRequest, PaymentReversal,
};
pub use members::MemberDirectory;
pub use model::{Loan, Member, Payment, RepaymentInstallment, SavingsPosting};
pub use schedule::RepaymentSchedule;
pub use store::{LedgerStore, MemoryStore, StoreTx};
pub use types::{
    ActorId, InstallmentId, InstallmentStatus, LoanId, LoanStatus, LoanSummary, MemberId,
    MemberProfile, PaymentId, PaymentMethod, PostingId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
