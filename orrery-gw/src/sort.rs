//! Sort stage for the people collection
//!
//! Comparison is lexicographic on the field's string representation,
//! including the numeric-looking `height`/`mass` fields ("9" sorts after
//! "80") — this reproduces the upstream-observed ordering on purpose.
//! The sort is stable: equal-key records keep their pre-sort relative order.

use orrery_common::api::Record;
use serde_json::Value;

/// Allow-listed sort fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Height,
    Mass,
}

impl SortField {
    /// Parse a `sortBy` parameter value; anything off the allow-list is `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(SortField::Name),
            "height" => Some(SortField::Height),
            "mass" => Some(SortField::Mass),
            _ => None,
        }
    }

    fn key(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Height => "height",
            SortField::Mass => "mass",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a `sortOrder` parameter value; anything else is `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Produce a sorted copy of `records`; the input is not mutated
pub fn sort_records(records: &[Record], field: SortField, order: SortOrder) -> Vec<Record> {
    let key = field.key();
    let mut sorted = records.to_vec();
    // Vec::sort_by is stable; reversing the comparator leaves ties untouched
    sorted.sort_by(|a, b| {
        let ordering = field_repr(a, key).cmp(&field_repr(b, key));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

/// String representation of a record field; missing fields compare as empty
fn field_repr(record: &Record, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}
