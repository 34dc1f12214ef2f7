//! Metadata filter
//!
//! Semantic checks on the parsed participant metadata and removal of
//! sensitive fields before the metadata is copied into the result document.
//!
//! The checks are pass/fail predicates returning `Ok(bool)`. Missing keys,
//! non-string dates and unparsable dates are not constraint failures; they
//! surface as [`Error::MalformedData`] and abort the run.

use chrono::{Datelike, NaiveDate};
use dnaetl_common::config::FilterConfig;
use dnaetl_common::{Error, Result};
use serde_json::Value;
use tracing::{debug, info};

use crate::value_walk;

/// Path to the participant's date of birth
const DATE_OF_BIRTH: [&str; 2] = ["individual_metadata", "date_of_birth"];

/// Paths to the dates that must fall inside the accepted range
const RANGE_CHECKED_DATES: [[&str; 2]; 3] = [
    ["test_metadata", "date_requested"],
    ["test_metadata", "date_completed"],
    ["sample_metadata", "collection_date"],
];

/// Thresholds applied by the metadata checks
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRules {
    /// Minimum age in whole years
    pub min_age: u32,
    /// Maximum character length of any string value
    pub max_string_length: usize,
    /// First accepted date (inclusive)
    pub date_range_start: NaiveDate,
    /// Last accepted date (inclusive)
    pub date_range_end: NaiveDate,
}

impl Default for FilterRules {
    fn default() -> Self {
        FilterConfig::default().into()
    }
}

impl From<FilterConfig> for FilterRules {
    fn from(config: FilterConfig) -> Self {
        Self {
            min_age: config.min_age,
            max_string_length: config.max_string_length,
            date_range_start: config.date_range_start,
            date_range_end: config.date_range_end,
        }
    }
}

/// Passes iff the participant is at least `rules.min_age` years old today
pub fn age_check(metadata: &Value, rules: &FilterRules) -> Result<bool> {
    age_check_on(metadata, rules, dnaetl_common::time::today())
}

/// Passes iff the participant is at least `rules.min_age` years old on `today`
pub fn age_check_on(metadata: &Value, rules: &FilterRules, today: NaiveDate) -> Result<bool> {
    let birth_date = date_at(metadata, &DATE_OF_BIRTH)?;
    let age = age_in_years(birth_date, today);
    debug!("Participant age {} (born {})", age, birth_date);
    Ok(age >= i64::from(rules.min_age))
}

/// Whole years between `birth_date` and `today`
///
/// A birthday not yet reached this year does not count.
pub fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> i64 {
    let mut age = i64::from(today.year()) - i64::from(birth_date.year());
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Passes iff the requested, completed and collection dates all fall inside
/// the inclusive accepted range
pub fn date_range_check(metadata: &Value, rules: &FilterRules) -> Result<bool> {
    for path in &RANGE_CHECKED_DATES {
        let date = date_at(metadata, path)?;
        if date < rules.date_range_start || date > rules.date_range_end {
            debug!("{} = {} is outside the accepted range", path.join("."), date);
            return Ok(false);
        }
    }
    Ok(true)
}

/// Passes iff no string value at any depth is longer than
/// `rules.max_string_length` characters
///
/// Object keys are not checked.
pub fn length_check(metadata: &Value, rules: &FilterRules) -> bool {
    value_walk::all_nodes(metadata, &mut |node| match node {
        Value::String(s) => s.chars().count() <= rules.max_string_length,
        _ => true,
    })
}

/// Copy of `metadata` with every key starting with `_` removed at every depth
pub fn sanitize(metadata: &Value) -> Value {
    value_walk::retain_keys(metadata, &|key| !key.starts_with('_'))
}

/// Run age, date-range and length checks in that order, then sanitize
///
/// The first failing check aborts with [`Error::SemanticValidation`].
pub fn filter_metadata(metadata: &Value, rules: &FilterRules) -> Result<Value> {
    filter_metadata_on(metadata, rules, dnaetl_common::time::today())
}

/// [`filter_metadata`] with an explicit "today" for the age check
pub fn filter_metadata_on(metadata: &Value, rules: &FilterRules, today: NaiveDate) -> Result<Value> {
    if !age_check_on(metadata, rules, today)? {
        return Err(Error::SemanticValidation(format!(
            "age check failed: participant is younger than {}",
            rules.min_age
        )));
    }

    if !date_range_check(metadata, rules)? {
        return Err(Error::SemanticValidation(format!(
            "date check failed: test and sample dates must fall within {} to {}",
            rules.date_range_start, rules.date_range_end
        )));
    }

    if !length_check(metadata, rules) {
        return Err(Error::SemanticValidation(format!(
            "length check failed: a string value exceeds {} characters",
            rules.max_string_length
        )));
    }

    info!("Metadata passed age, date and length checks");
    Ok(sanitize(metadata))
}

/// Look up a nested string at `path` and parse it as an ISO date
fn date_at(metadata: &Value, path: &[&str]) -> Result<NaiveDate> {
    let dotted = path.join(".");
    let mut node = metadata;
    for key in path {
        node = node
            .get(key)
            .ok_or_else(|| Error::MalformedData(format!("missing key {}", dotted)))?;
    }

    let text = node
        .as_str()
        .ok_or_else(|| Error::MalformedData(format!("{} is not a string", dotted)))?;

    if !is_iso_date_shape(text) {
        return Err(Error::MalformedData(format!(
            "{} = {:?} is not an ISO date (expected YYYY-MM-DD)",
            dotted, text
        )));
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| Error::MalformedData(format!("{} = {:?} is not an ISO date: {}", dotted, text, e)))
}

/// Exactly `DDDD-DD-DD` with ASCII digits
///
/// chrono alone accepts unpadded fields, leading whitespace and a sign.
fn is_iso_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
