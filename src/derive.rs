//! Per-row derived columns over the filtered table
//!
//! Customer type depends on the filtered population, so everything here is
//! recomputed whenever the date range changes.

use chrono::{Datelike, Weekday};
use std::collections::{HashMap, HashSet};

use crate::models::{CustomerType, DayPart, OrderLine};

/// A filtered row with its derived columns
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedLine<'a> {
    pub line: &'a OrderLine,
    pub month: String,
    pub weekday: Weekday,
    pub day_part: DayPart,
    pub delayed: bool,
    pub customer_type: CustomerType,
}

/// Calendar month bucket, e.g. `2017-03`
pub fn month_bucket(line: &OrderLine) -> String {
    line.purchased_at.format("%Y-%m").to_string()
}

/// Unique customers with more than one distinct order among `lines`
pub fn repeat_customers<'a>(lines: &[&'a OrderLine]) -> HashSet<&'a str> {
    let mut orders: HashMap<&str, HashSet<&str>> = HashMap::new();
    for line in lines {
        orders
            .entry(line.customer_unique_id.as_str())
            .or_default()
            .insert(line.order_id.as_str());
    }
    orders
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(customer, _)| customer)
        .collect()
}

pub fn enrich<'a>(lines: &[&'a OrderLine]) -> Vec<EnrichedLine<'a>> {
    let repeaters = repeat_customers(lines);
    lines
        .iter()
        .map(|&line| EnrichedLine {
            line,
            month: month_bucket(line),
            weekday: line.purchased_at.weekday(),
            day_part: DayPart::of(&line.purchased_at),
            delayed: line.is_delayed(),
            customer_type: if repeaters.contains(line.customer_unique_id.as_str()) {
                CustomerType::Repeater
            } else {
                CustomerType::NonRepeater
            },
        })
        .collect()
}
