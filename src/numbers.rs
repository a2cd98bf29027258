use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::{LedgerError, Result};

/// length of the uuid-derived suffix in a generated reference
const SUFFIX_LEN: usize = 6;

/// compose one candidate reference, e.g. LN-20260115-9F03B2
pub fn candidate(prefix: &str, date: NaiveDate) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    let suffix = uuid[..SUFFIX_LEN].to_uppercase();
    format!("{}-{}-{}", prefix, date.format("%Y%m%d"), suffix)
}

/// allocate a reference not yet present in the store
///
/// `taken` is consulted inside the caller's transaction so the uniqueness
/// check and the insert are covered by the same commit
pub fn allocate<F>(prefix: &str, date: NaiveDate, retry_limit: u32, mut taken: F) -> Result<String>
where
    F: FnMut(&str) -> Result<bool>,
{
    for _ in 0..retry_limit {
        let reference = candidate(prefix, date);
        if !taken(&reference)? {
            return Ok(reference);
        }
    }
    Err(LedgerError::NumberSpaceExhausted { attempts: retry_limit })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_reference_shape() {
        let reference = candidate("LN", date());
        let parts: Vec<&str> = reference.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "LN");
        assert_eq!(parts[1], "20260115");
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_allocates_first_free_reference() {
        let reference = allocate("MBR", date(), 4, |_| Ok(false)).unwrap();
        assert!(reference.starts_with("MBR-20260115-"));
    }

    #[test]
    fn test_retries_past_collisions() {
        let mut calls = 0;
        let reference = allocate("LN", date(), 4, |_| {
            calls += 1;
            Ok(calls <= 2) // first two candidates collide
        })
        .unwrap();
        assert_eq!(calls, 3);
        assert!(reference.starts_with("LN-"));
    }

    #[test]
    fn test_exhaustion_after_retry_limit() {
        let err = allocate("LN", date(), 3, |_| Ok(true)).unwrap_err();
        assert!(matches!(err, LedgerError::NumberSpaceExhausted { attempts: 3 }));
    }
}
