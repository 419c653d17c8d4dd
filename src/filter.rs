//! Purchase-date range filter

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::DashboardError;
use crate::models::OrderLine;

/// Inclusive range of purchase dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DashboardError> {
        if start > end {
            return Err(DashboardError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Min and max purchase date of a table, i.e. the slider bounds
pub fn date_bounds(lines: &[OrderLine]) -> Option<DateRange> {
    let mut dates = lines.iter().map(OrderLine::purchase_date);
    let first = dates.next()?;
    let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(DateRange { start, end })
}

/// Fill in an open-ended user range from the data bounds.
///
/// Returns `Ok(None)` only when there are no bounds and no explicit dates.
pub fn resolve_range(
    bounds: Option<DateRange>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Option<DateRange>, DashboardError> {
    let start = start.or(bounds.map(|b| b.start));
    let end = end.or(bounds.map(|b| b.end));
    match (start, end) {
        (Some(start), Some(end)) => DateRange::new(start, end).map(Some),
        _ => Ok(None),
    }
}

/// Rows whose purchase date lies inside `range`
pub fn filter_by_date(lines: &[OrderLine], range: DateRange) -> Vec<&OrderLine> {
    lines
        .iter()
        .filter(|l| range.contains(l.purchase_date()))
        .collect()
}
