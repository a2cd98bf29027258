use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::model::{Loan, RepaymentInstallment};
use crate::types::InstallmentStatus;

/// a generated repayment schedule, one installment per month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentSchedule {
    pub installments: Vec<RepaymentInstallment>,
}

impl RepaymentSchedule {
    /// generate the equal-installment schedule for a loan
    ///
    /// the per-installment amount is the total payable divided by the term,
    /// truncated at cent precision; the final installment absorbs the
    /// remainder so the schedule sums to the total payable exactly
    pub fn generate(
        loan: &Loan,
        approval_date: NaiveDate,
        first_due_offset_months: u32,
    ) -> Result<Self> {
        if loan.term_months == 0 {
            return Err(LedgerError::InvalidTerm { months: loan.term_months });
        }
        if !loan.principal.is_positive() {
            return Err(LedgerError::InvalidAmount { amount: loan.principal });
        }

        let term = loan.term_months;
        let total_payable = loan.total_payable();
        let per_installment =
            Money::from_decimal_floor(total_payable.as_decimal() / Decimal::from(term));
        let final_installment = total_payable - per_installment * Decimal::from(term - 1);

        let mut installments = Vec::with_capacity(term as usize);
        for number in 1..=term {
            let due_date = add_months(approval_date, first_due_offset_months + number - 1)?;
            let amount_due = if number == term { final_installment } else { per_installment };
            installments.push(RepaymentInstallment {
                id: Uuid::new_v4(),
                loan_id: loan.id,
                number,
                due_date,
                amount_due,
                status: InstallmentStatus::Pending,
                amount_paid: Money::ZERO,
                payment_date: None,
            });
        }

        Ok(Self { installments })
    }

    /// due date of the first installment
    pub fn first_due_date(&self) -> Option<NaiveDate> {
        self.installments.first().map(|i| i.due_date)
    }

    /// sum of all installment amounts
    pub fn total_due(&self) -> Money {
        self.installments.iter().map(|i| i.amount_due).sum()
    }
}

/// advance a date by whole calendar months, clamping the day to the
/// target month's length (jan 31 + 1 month = feb 28 or 29)
fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    let total = date.year() * 12 + date.month0() as i32 + months as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| LedgerError::InvalidDate {
        message: format!("{year}-{month:02}-{day:02} is outside the supported range"),
    })
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
