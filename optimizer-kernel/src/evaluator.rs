//! Inefficiency evaluation: group records by hostname, count active ones,
//! keep the hostnames at or below the threshold.
//!
//! Hostnames seen only in inactive records are kept in the tally with a count
//! of 0, so fully inactive hostnames are reported as inefficient.

use crate::error::ServiceError;
use crate::models::ServerRecord;
use std::collections::{BTreeSet, HashMap};

pub type ActivityTally = HashMap<String, usize>;

/// Hostnames are kept sorted so responses are stable.
pub type InefficientHostnames = BTreeSet<String>;

/// Counts active records per hostname. Every hostname in `records` gets an entry.
pub fn tally<'a, I>(records: I) -> ActivityTally
where
    I: IntoIterator<Item = &'a ServerRecord>,
{
    let mut counts = ActivityTally::new();
    for record in records {
        let count = counts.entry(record.hostname.clone()).or_insert(0);
        if record.active {
            *count += 1;
        }
    }
    counts
}

/// Hostnames whose active count is `<= threshold`.
pub fn select_inefficient(tally: &ActivityTally, threshold: i32) -> InefficientHostnames {
    let threshold = i64::from(threshold);
    tally
        .iter()
        .filter(|&(_, &count)| i64::try_from(count).is_ok_and(|count| count <= threshold))
        .map(|(hostname, _)| hostname.clone())
        .collect()
}

/// Parses a base-10 signed 32-bit threshold.
pub fn parse_threshold(raw: &str) -> Result<i32, ServiceError> {
    raw.parse::<i32>().map_err(|_| ServiceError::invalid_threshold())
}

pub fn evaluate(records: &[ServerRecord], raw_threshold: &str) -> Result<InefficientHostnames, ServiceError> {
    let threshold = parse_threshold(raw_threshold)?;
    let counts = tally(records);
    Ok(select_inefficient(&counts, threshold))
}
