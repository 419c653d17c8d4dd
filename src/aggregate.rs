//! Chart aggregations
//!
//! Each function is an independent groupby/aggregate/sort over the enriched
//! rows and feeds exactly one chart. Category groupings key on
//! `Option<&str>`, so unmapped categories form their own bucket that is only
//! labelled `unknown` on output.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

use crate::derive::EnrichedLine;
use crate::models::{
    category_name, serialize_category, weekday_name, CustomerType, DayPart, WEEKDAYS,
};

pub const TOP_CATEGORIES: usize = 20;
pub const TOP_STATES: usize = 10;
pub const DRILLDOWN_CATEGORY_OPTIONS: usize = 30;
/// Histogram of scores for items above this price (strict)
pub const PREMIUM_PRICE: f64 = 100.0;
/// A category is high-volume when its row count exceeds this multiple of the median
pub const HIGH_VOLUME_FACTOR: f64 = 1.5;

// ============================================================================
// Output Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_sales: f64,
    pub order_count: usize,
    /// `None` when there are no rows
    pub average_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySales {
    pub month: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSales {
    pub key: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewPrice {
    pub review_score: u8,
    pub mean_price: f64,
}

/// Counts for review scores 1 through 5
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreHistogram {
    pub counts: [u64; 5],
}

impl ScoreHistogram {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPortfolio {
    #[serde(serialize_with = "serialize_category")]
    pub category: Option<String>,
    pub average_price: f64,
    pub sales_quantity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallmentBox {
    #[serde(serialize_with = "serialize_category")]
    pub category: Option<String>,
    pub count: usize,
    pub mean: f64,
    pub summary: FiveNumberSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayReview {
    pub delayed: bool,
    pub label: &'static str,
    pub mean_review: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerTypeSummary {
    pub customer_type: CustomerType,
    pub mean_review: f64,
    /// Share of rows, not of customers
    pub row_share: f64,
    pub sales: f64,
    pub sales_share: f64,
}

/// Day-of-week by day-part grid of distinct order counts.
/// Rows follow Monday..Sunday, columns Morning..Night; absent combinations are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub days: Vec<&'static str>,
    pub day_parts: Vec<&'static str>,
    pub cells: Vec<Vec<Option<u64>>>,
}

impl Heatmap {
    pub fn total_orders(&self) -> u64 {
        self.cells.iter().flatten().flatten().sum()
    }
}

// ============================================================================
// Statistics helpers
// ============================================================================

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Median of unsorted values; mean of the two middle values for even counts
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Quantile with linear interpolation between closest ranks; `sorted` must be ascending
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn five_number_summary(values: &[f64]) -> Option<FiveNumberSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(FiveNumberSummary {
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Sum price per key, descending by sales (ties by key), truncated to `top`
fn ranked_sales<'a, K, F>(
    lines: &'a [EnrichedLine<'a>],
    key: F,
    label: fn(K) -> &'a str,
    top: usize,
) -> Vec<RankedSales>
where
    K: Ord,
    F: Fn(&'a EnrichedLine<'a>) -> K,
{
    let mut totals: BTreeMap<K, f64> = BTreeMap::new();
    for e in lines {
        *totals.entry(key(e)).or_default() += e.line.price;
    }
    let mut ranked: Vec<RankedSales> = totals
        .into_iter()
        .map(|(key, sales)| RankedSales {
            key: label(key).to_string(),
            sales,
        })
        .collect();
    // BTreeMap already yields keys ascending, a stable sort keeps that for ties
    ranked.sort_by(|a, b| b.sales.total_cmp(&a.sales));
    ranked.truncate(top);
    ranked
}

// ============================================================================
// Aggregators
// ============================================================================

pub fn kpis(lines: &[EnrichedLine<'_>]) -> Kpis {
    let orders: HashSet<&str> = lines.iter().map(|e| e.line.order_id.as_str()).collect();
    Kpis {
        total_sales: lines.iter().map(|e| e.line.price).sum(),
        order_count: orders.len(),
        average_price: mean(lines.iter().map(|e| e.line.price)),
    }
}

/// Sales per calendar month, in month order
pub fn monthly_sales(lines: &[EnrichedLine<'_>]) -> Vec<MonthlySales> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for e in lines {
        *totals.entry(e.month.as_str()).or_default() += e.line.price;
    }
    totals
        .into_iter()
        .map(|(month, sales)| MonthlySales {
            month: month.to_string(),
            sales,
        })
        .collect()
}

pub fn category_sales(lines: &[EnrichedLine<'_>], top: usize) -> Vec<RankedSales> {
    ranked_sales(lines, |e| e.line.category.as_deref(), category_name, top)
}

pub fn state_sales(lines: &[EnrichedLine<'_>], top: usize) -> Vec<RankedSales> {
    ranked_sales(lines, |e| e.line.customer_state.as_str(), |s| s, top)
}

/// Mean item price per review score, highest mean first
pub fn mean_price_by_review(lines: &[EnrichedLine<'_>]) -> Vec<ReviewPrice> {
    let mut groups: BTreeMap<u8, Vec<f64>> = BTreeMap::new();
    for e in lines {
        groups.entry(e.line.review_score).or_default().push(e.line.price);
    }
    let mut out: Vec<ReviewPrice> = groups
        .into_iter()
        .filter_map(|(review_score, prices)| {
            mean(prices).map(|mean_price| ReviewPrice {
                review_score,
                mean_price,
            })
        })
        .collect();
    out.sort_by(|a, b| b.mean_price.total_cmp(&a.mean_price));
    out
}

/// Review score distribution, optionally restricted to rows priced strictly above `min_price`
pub fn review_histogram(lines: &[EnrichedLine<'_>], min_price: Option<f64>) -> ScoreHistogram {
    let mut counts = [0u64; 5];
    let mut skipped: Vec<u8> = Vec::new();
    for e in lines {
        if min_price.is_some_and(|p| e.line.price <= p) {
            continue;
        }
        match e.line.review_score {
            score @ 1..=5 => counts[usize::from(score - 1)] += 1,
            score => skipped.push(score),
        }
    }
    if !skipped.is_empty() {
        debug!(
            "Review histogram skipped {} rows with scores outside 1-5: {:?}",
            skipped.len(),
            skipped
        );
    }
    ScoreHistogram { counts }
}

/// Mean price and row count per category, in category order
pub fn category_portfolio(lines: &[EnrichedLine<'_>]) -> Vec<CategoryPortfolio> {
    let mut groups: BTreeMap<Option<&str>, (f64, usize)> = BTreeMap::new();
    for e in lines {
        let entry = groups.entry(e.line.category.as_deref()).or_default();
        entry.0 += e.line.price;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(category, (sum, n))| CategoryPortfolio {
            category: category.map(str::to_string),
            average_price: sum / n as f64,
            sales_quantity: n,
        })
        .collect()
}

/// Categories whose row count is strictly above 1.5x the median across categories
pub fn high_volume_categories(portfolio: &[CategoryPortfolio]) -> Vec<Option<String>> {
    let quantities: Vec<f64> = portfolio.iter().map(|c| c.sales_quantity as f64).collect();
    let Some(median) = median(&quantities) else {
        return Vec::new();
    };
    let threshold = median * HIGH_VOLUME_FACTOR;
    portfolio
        .iter()
        .filter(|c| c.sales_quantity as f64 > threshold)
        .map(|c| c.category.clone())
        .collect()
}

/// Payment installment distribution for each of `categories`
pub fn installments_by_category(
    lines: &[EnrichedLine<'_>],
    categories: &[Option<String>],
) -> Vec<InstallmentBox> {
    let wanted: HashSet<Option<&str>> = categories.iter().map(Option::as_deref).collect();
    let mut groups: BTreeMap<Option<&str>, Vec<f64>> = BTreeMap::new();
    for e in lines {
        let category = e.line.category.as_deref();
        if wanted.contains(&category) {
            groups
                .entry(category)
                .or_default()
                .push(f64::from(e.line.payment_installments));
        }
    }
    groups
        .into_iter()
        .filter_map(|(category, values)| {
            let summary = five_number_summary(&values)?;
            Some(InstallmentBox {
                category: category.map(str::to_string),
                count: values.len(),
                mean: mean(values.iter().copied())?,
                summary,
            })
        })
        .collect()
}

/// Mean review score for on-time and delayed rows, on-time first
pub fn review_by_delay(lines: &[EnrichedLine<'_>]) -> Vec<DelayReview> {
    [false, true]
        .into_iter()
        .filter_map(|delayed| {
            let scores = lines
                .iter()
                .filter(|e| e.delayed == delayed)
                .map(|e| f64::from(e.line.review_score));
            mean(scores).map(|mean_review| DelayReview {
                delayed,
                label: if delayed { "Delayed" } else { "On time" },
                mean_review,
            })
        })
        .collect()
}

/// Review, row share and sales share per customer type
pub fn customer_type_summary(lines: &[EnrichedLine<'_>]) -> Vec<CustomerTypeSummary> {
    let total_rows = lines.len();
    let total_sales: f64 = lines.iter().map(|e| e.line.price).sum();

    let mut groups: BTreeMap<CustomerType, (f64, f64, usize)> = BTreeMap::new();
    for e in lines {
        let entry = groups.entry(e.customer_type).or_default();
        entry.0 += f64::from(e.line.review_score);
        entry.1 += e.line.price;
        entry.2 += 1;
    }

    groups
        .into_iter()
        .map(|(customer_type, (review_sum, sales, n))| CustomerTypeSummary {
            customer_type,
            mean_review: review_sum / n as f64,
            row_share: n as f64 / total_rows as f64,
            sales,
            sales_share: if total_sales > 0.0 { sales / total_sales } else { 0.0 },
        })
        .collect()
}

/// Distinct orders per (weekday, day part), reindexed onto the canonical grid
pub fn purchase_heatmap<'a, 'b, I>(lines: I) -> Heatmap
where
    'b: 'a,
    I: IntoIterator<Item = &'a EnrichedLine<'b>>,
{
    let mut orders: HashMap<(usize, usize), HashSet<&str>> = HashMap::new();
    for e in lines {
        let day = e.weekday.num_days_from_monday() as usize;
        let part = e.day_part as usize;
        orders
            .entry((day, part))
            .or_default()
            .insert(e.line.order_id.as_str());
    }

    let cells = (0..WEEKDAYS.len())
        .map(|day| {
            (0..DayPart::ALL.len())
                .map(|part| orders.get(&(day, part)).map(|ids| ids.len() as u64))
                .collect()
        })
        .collect();

    Heatmap {
        days: WEEKDAYS.iter().map(|d| weekday_name(*d)).collect(),
        day_parts: DayPart::ALL.iter().map(DayPart::label).collect(),
        cells,
    }
}

/// Names of the most frequent categories by row count, ties by name
pub fn top_categories_by_frequency(lines: &[EnrichedLine<'_>], top: usize) -> Vec<String> {
    let mut counts: BTreeMap<Option<&str>, usize> = BTreeMap::new();
    for e in lines {
        *counts.entry(e.line.category.as_deref()).or_default() += 1;
    }
    let mut ranked: Vec<(Option<&str>, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    // a real category named like the unmapped bucket shares one selector entry
    let mut seen = HashSet::new();
    ranked
        .into_iter()
        .map(|(c, _)| category_name(c))
        .filter(|name| seen.insert(*name))
        .take(top)
        .map(str::to_string)
        .collect()
}

/// All customer states, alphabetical
pub fn states(lines: &[EnrichedLine<'_>]) -> Vec<String> {
    lines
        .iter()
        .map(|e| e.line.customer_state.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::enrich;
    use crate::filter::test_support::line;
    use crate::filter::{filter_by_date, DateRange};
    use crate::models::OrderLine;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn with(mut l: OrderLine, category: Option<&str>, state: &str) -> OrderLine {
        l.category = category.map(str::to_string);
        l.customer_state = state.into();
        l
    }

    fn refs(lines: &[OrderLine]) -> Vec<&OrderLine> {
        lines.iter().collect()
    }

    #[test]
    fn test_three_row_example() {
        let lines = vec![
            line("o1", "2017-01-01 10:00:00", 10.0),
            line("o2", "2017-02-01 10:00:00", 20.0),
            line("o3", "2017-03-01 10:00:00", 30.0),
        ];
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2017, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2017, 2, 15).unwrap(),
        )
        .unwrap();
        let filtered = filter_by_date(&lines, range);
        let enriched = enrich(&filtered);
        let k = kpis(&enriched);
        assert_relative_eq!(k.total_sales, 20.0);
        assert_relative_eq!(k.average_price.unwrap(), 20.0);
        assert_eq!(k.order_count, 1);
    }

    #[test]
    fn test_kpis_on_empty_rows() {
        let k = kpis(&[]);
        assert_eq!(k.total_sales, 0.0);
        assert_eq!(k.order_count, 0);
        assert_eq!(k.average_price, None);
    }

    #[test]
    fn test_total_sales_is_additive_over_partition() {
        let lines: Vec<OrderLine> = (1..=12)
            .map(|m| line(&format!("o{m}"), &format!("2017-{m:02}-10 08:00:00"), m as f64 * 3.5))
            .collect();
        let all = enrich(&refs(&lines));
        let total = kpis(&all).total_sales;

        let d = |m: u32, day: u32| NaiveDate::from_ymd_opt(2017, m, day).unwrap();
        let parts = [
            DateRange::new(d(1, 1), d(3, 31)).unwrap(),
            DateRange::new(d(4, 1), d(4, 1)).unwrap(),
            DateRange::new(d(4, 2), d(12, 31)).unwrap(),
        ];
        let summed: f64 = parts
            .iter()
            .map(|r| kpis(&enrich(&filter_by_date(&lines, *r))).total_sales)
            .sum();
        assert_relative_eq!(total, summed);
    }

    #[test]
    fn test_monthly_sales_in_month_order() {
        let lines = vec![
            line("o1", "2017-03-01 10:00:00", 5.0),
            line("o2", "2017-01-01 10:00:00", 1.0),
            line("o3", "2017-01-20 10:00:00", 2.0),
        ];
        let monthly = monthly_sales(&enrich(&refs(&lines)));
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month, "2017-01");
        assert_relative_eq!(monthly[0].sales, 3.0);
        assert_eq!(monthly[1].month, "2017-03");
    }

    #[test]
    fn test_category_ranking_includes_unknown_bucket() {
        let lines = vec![
            with(line("o1", "2017-01-01 10:00:00", 50.0), Some("toys"), "SP"),
            with(line("o2", "2017-01-01 10:00:00", 70.0), None, "RJ"),
            with(line("o3", "2017-01-01 10:00:00", 30.0), Some("garden"), "SP"),
            with(line("o4", "2017-01-01 10:00:00", 30.0), Some("toys"), "MG"),
        ];
        let enriched = enrich(&refs(&lines));
        let ranked = category_sales(&enriched, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].key, "toys");
        assert_relative_eq!(ranked[0].sales, 80.0);
        assert_eq!(ranked[1].key, "unknown");

        let by_state = state_sales(&enriched, TOP_STATES);
        assert_eq!(by_state.len(), 3);
        assert_eq!(by_state[0].key, "SP");
        assert_relative_eq!(by_state[0].sales, 80.0);
        assert_eq!(by_state[1].key, "RJ");
        assert_eq!(by_state[2].key, "MG");
    }

    #[test]
    fn test_category_named_unknown_stays_apart_from_unmapped() {
        let lines = vec![
            with(line("o1", "2017-01-01 10:00:00", 10.0), Some("unknown"), "SP"),
            with(line("o2", "2017-01-01 10:00:00", 10.0), None, "SP"),
        ];
        let enriched = enrich(&refs(&lines));

        let ranked = category_sales(&enriched, TOP_CATEGORIES);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.sales == 10.0));

        let portfolio = category_portfolio(&enriched);
        assert_eq!(portfolio.len(), 2);
        assert_eq!(portfolio[0].category, None);
        assert_eq!(portfolio[1].category.as_deref(), Some("unknown"));
        assert!(portfolio.iter().all(|c| c.sales_quantity == 1));

        let json = serde_json::to_value(&portfolio[0]).unwrap();
        assert_eq!(json["category"], "unknown");

        let boxes = installments_by_category(&enriched, &[None]);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].count, 1);
    }

    #[test]
    fn test_mean_price_by_review_sorted_by_price() {
        let mut a = line("o1", "2017-01-01 10:00:00", 10.0);
        let mut b = line("o2", "2017-01-01 10:00:00", 30.0);
        let mut c = line("o3", "2017-01-01 10:00:00", 100.0);
        a.review_score = 5;
        b.review_score = 5;
        c.review_score = 1;
        let out = mean_price_by_review(&enrich(&[&a, &b, &c]));
        assert_eq!(out[0].review_score, 1);
        assert_relative_eq!(out[0].mean_price, 100.0);
        assert_eq!(out[1].review_score, 5);
        assert_relative_eq!(out[1].mean_price, 20.0);
    }

    #[test]
    fn test_review_histograms() {
        let mut lines = vec![
            line("o1", "2017-01-01 10:00:00", 100.0),
            line("o2", "2017-01-01 10:00:00", 150.0),
            line("o3", "2017-01-01 10:00:00", 20.0),
        ];
        lines[0].review_score = 1;
        lines[1].review_score = 4;
        lines[2].review_score = 4;
        let enriched = enrich(&refs(&lines));

        let all = review_histogram(&enriched, None);
        assert_eq!(all.counts, [1, 0, 0, 2, 0]);
        // exactly 100 is not above 100
        let premium = review_histogram(&enriched, Some(PREMIUM_PRICE));
        assert_eq!(premium.counts, [0, 0, 0, 1, 0]);
        assert_eq!(premium.total(), 1);
    }

    #[test]
    fn test_review_histogram_skips_out_of_range_scores() {
        let mut lines = vec![
            line("o1", "2017-01-01 10:00:00", 10.0),
            line("o2", "2017-01-01 10:00:00", 10.0),
            line("o3", "2017-01-01 10:00:00", 10.0),
        ];
        lines[0].review_score = 0;
        lines[1].review_score = 6;
        lines[2].review_score = 3;
        let histogram = review_histogram(&enrich(&refs(&lines)), None);
        assert_eq!(histogram.counts, [0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_high_volume_threshold_is_strict() {
        let portfolio = |qs: &[usize]| -> Vec<CategoryPortfolio> {
            qs.iter()
                .enumerate()
                .map(|(i, q)| CategoryPortfolio {
                    category: Some(format!("c{i}")),
                    average_price: 1.0,
                    sales_quantity: *q,
                })
                .collect()
        };

        // median 2, threshold 3: a count of exactly 3 is excluded
        assert!(high_volume_categories(&portfolio(&[1, 2, 3])).is_empty());
        assert_eq!(
            high_volume_categories(&portfolio(&[1, 2, 4])),
            vec![Some("c2".to_string())]
        );
        // even count: median (2+4)/2 = 3, threshold 4.5
        assert_eq!(
            high_volume_categories(&portfolio(&[1, 2, 4, 5])),
            vec![Some("c3".to_string())]
        );
        assert!(high_volume_categories(&[]).is_empty());
    }

    #[test]
    fn test_portfolio_and_installments() {
        let mut lines = Vec::new();
        for (i, installments) in [1u32, 2, 3, 4, 10].iter().enumerate() {
            let mut l = with(
                line(&format!("t{i}"), "2017-01-01 10:00:00", 10.0 * (i + 1) as f64),
                Some("toys"),
                "SP",
            );
            l.payment_installments = *installments;
            lines.push(l);
        }
        lines.push(with(line("g1", "2017-01-01 10:00:00", 5.0), Some("garden"), "SP"));

        let enriched = enrich(&refs(&lines));
        let portfolio = category_portfolio(&enriched);
        assert_eq!(portfolio[0].category.as_deref(), Some("garden"));
        assert_eq!(portfolio[1].category.as_deref(), Some("toys"));
        assert_eq!(portfolio[1].sales_quantity, 5);
        assert_relative_eq!(portfolio[1].average_price, 30.0);

        let boxes = installments_by_category(&enriched, &[Some("toys".to_string())]);
        assert_eq!(boxes.len(), 1);
        let s = &boxes[0].summary;
        assert_relative_eq!(s.min, 1.0);
        assert_relative_eq!(s.q1, 2.0);
        assert_relative_eq!(s.median, 3.0);
        assert_relative_eq!(s.q3, 4.0);
        assert_relative_eq!(s.max, 10.0);
        assert_relative_eq!(boxes[0].mean, 4.0);
    }

    #[test]
    fn test_quartiles_interpolate() {
        let s = five_number_summary(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_relative_eq!(s.q1, 1.75);
        assert_relative_eq!(s.median, 2.5);
        assert_relative_eq!(s.q3, 3.25);
        assert!(five_number_summary(&[]).is_none());
    }

    #[test]
    fn test_review_by_delay() {
        let est = NaiveDate::from_ymd_opt(2017, 1, 10).unwrap().and_hms_opt(0, 0, 0);
        let late = NaiveDate::from_ymd_opt(2017, 1, 12).unwrap().and_hms_opt(0, 0, 0);

        let mut a = line("o1", "2017-01-01 10:00:00", 10.0);
        a.estimated_delivery_at = est;
        a.delivered_at = late;
        a.review_score = 1;
        let mut b = line("o2", "2017-01-01 10:00:00", 10.0);
        b.review_score = 5;
        let mut c = line("o3", "2017-01-01 10:00:00", 10.0);
        c.review_score = 4;

        let out = review_by_delay(&enrich(&[&a, &b, &c]));
        assert_eq!(out.len(), 2);
        assert!(!out[0].delayed);
        assert_relative_eq!(out[0].mean_review, 4.5);
        assert!(out[1].delayed);
        assert_relative_eq!(out[1].mean_review, 1.0);

        let only_on_time = review_by_delay(&enrich(&[&b]));
        assert_eq!(only_on_time.len(), 1);
    }

    #[test]
    fn test_customer_type_summary_shares() {
        let mut a = line("o1", "2017-01-01 10:00:00", 30.0);
        let mut b = line("o2", "2017-01-02 10:00:00", 10.0);
        let mut c = line("o3", "2017-01-03 10:00:00", 60.0);
        a.customer_unique_id = "u1".into();
        b.customer_unique_id = "u1".into();
        a.review_score = 5;
        b.review_score = 3;
        c.review_score = 2;

        let out = customer_type_summary(&enrich(&[&a, &b, &c]));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].customer_type, CustomerType::Repeater);
        assert_relative_eq!(out[0].mean_review, 4.0);
        assert_relative_eq!(out[0].row_share, 2.0 / 3.0);
        assert_relative_eq!(out[0].sales, 40.0);
        assert_relative_eq!(out[0].sales_share, 0.4);
        assert_eq!(out[1].customer_type, CustomerType::NonRepeater);
        assert_relative_eq!(out[1].sales_share, 0.6);
    }

    #[test]
    fn test_heatmap_counts_distinct_orders_on_fixed_grid() {
        // 2017-01-02 was a Monday
        let lines = vec![
            line("o1", "2017-01-02 09:00:00", 1.0),
            line("o1", "2017-01-02 09:00:00", 2.0),
            line("o2", "2017-01-02 10:30:00", 3.0),
            line("o3", "2017-01-08 23:00:00", 4.0),
        ];
        let heatmap = purchase_heatmap(&enrich(&refs(&lines)));
        assert_eq!(heatmap.days.first(), Some(&"Monday"));
        assert_eq!(heatmap.days.last(), Some(&"Sunday"));
        assert_eq!(heatmap.day_parts, vec!["Morning (5-12)", "Afternoon (12-18)", "Evening (18-22)", "Night (22-5)"]);
        assert_eq!(heatmap.cells.len(), 7);
        assert!(heatmap.cells.iter().all(|row| row.len() == 4));
        assert_eq!(heatmap.cells[0][0], Some(2));
        assert_eq!(heatmap.cells[6][3], Some(1));
        assert_eq!(heatmap.cells[0][1], None);
        assert_eq!(heatmap.total_orders(), 3);
    }

    #[test]
    fn test_selector_options() {
        let lines = vec![
            with(line("o1", "2017-01-01 10:00:00", 1.0), Some("toys"), "SP"),
            with(line("o2", "2017-01-01 10:00:00", 1.0), Some("toys"), "RJ"),
            with(line("o3", "2017-01-01 10:00:00", 1.0), Some("garden"), "AC"),
            with(line("o4", "2017-01-01 10:00:00", 1.0), Some("books"), "SP"),
        ];
        let enriched = enrich(&refs(&lines));
        assert_eq!(
            top_categories_by_frequency(&enriched, 2),
            vec!["toys".to_string(), "books".to_string()]
        );
        assert_eq!(states(&enriched), vec!["AC", "RJ", "SP"]);
    }
}
