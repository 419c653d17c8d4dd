//! Dashboard rendering
//!
//! `render` is the whole pipeline for one interaction: filter the loaded
//! dataset to the chosen date range, derive the helper columns, and run every
//! aggregation. It holds no state between calls.

use serde::Serialize;
use tracing::debug;

use crate::aggregate::{
    self, CategoryPortfolio, CustomerTypeSummary, DelayReview, Heatmap, InstallmentBox, Kpis,
    MonthlySales, RankedSales, ReviewPrice, ScoreHistogram, DRILLDOWN_CATEGORY_OPTIONS,
    PREMIUM_PRICE, TOP_CATEGORIES, TOP_STATES,
};
use crate::derive::{enrich, EnrichedLine};
use crate::error::DashboardError;
use crate::filter::{filter_by_date, DateRange};
use crate::loader::Dataset;
use crate::models::category_name;

pub const NO_DATA_IN_RANGE: &str = "no data in the selected date range";
pub const NO_DATA_FOR_SELECTION: &str = "no data for this selection";

/// Chart payload, or the reason there is nothing to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready { data: T },
    Empty { message: String },
}

impl<T> Panel<T> {
    pub fn empty(message: &str) -> Self {
        Panel::Empty {
            message: message.to_string(),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Panel::Ready { data } => Some(data),
            Panel::Empty { .. } => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Panel::Empty { .. })
    }
}

/// User choice of drill-down category and state. Unset fields fall back to the first option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrillDownSelection {
    pub category: Option<String>,
    pub state: Option<String>,
}

/// Values of all interactive controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    /// `None` means the full data range
    pub range: Option<DateRange>,
    pub selection: DrillDownSelection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerTypes {
    pub by_type: Vec<CustomerTypeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallmentDistribution {
    pub high_volume_categories: Vec<String>,
    pub boxes: Vec<InstallmentBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillDown {
    pub category_options: Vec<String>,
    pub state_options: Vec<String>,
    pub category: String,
    pub state: String,
    pub heatmap: Panel<Heatmap>,
}

/// Every chart of the page, in display order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub bounds: Option<DateRange>,
    pub range: Option<DateRange>,
    pub rows: usize,
    pub kpis: Panel<Kpis>,
    pub monthly_sales: Panel<Vec<MonthlySales>>,
    pub top_categories: Panel<Vec<RankedSales>>,
    pub top_states: Panel<Vec<RankedSales>>,
    pub price_by_review: Panel<Vec<ReviewPrice>>,
    pub review_histogram: Panel<ScoreHistogram>,
    pub premium_review_histogram: Panel<ScoreHistogram>,
    pub category_portfolio: Panel<Vec<CategoryPortfolio>>,
    pub installments: Panel<InstallmentDistribution>,
    pub review_by_delay: Panel<Vec<DelayReview>>,
    pub customer_types: Panel<CustomerTypes>,
    pub purchase_heatmap: Panel<Heatmap>,
    pub drilldown: Panel<DrillDown>,
}

fn ready<T>(data: T) -> Panel<T> {
    Panel::Ready { data }
}

/// Filter to the effective range and derive columns
fn prepare<'a>(
    dataset: &'a Dataset,
    state: &DashboardState,
) -> (Option<DateRange>, Vec<EnrichedLine<'a>>) {
    let range = state.range.or(dataset.bounds());
    let filtered = match range {
        Some(range) => filter_by_date(dataset.lines(), range),
        None => Vec::new(),
    };
    debug!("Filtered {} of {} rows to {:?}", filtered.len(), dataset.len(), range);
    (range, enrich(&filtered))
}

/// Drill-down: restrict to one (category, state) pair and rebuild the purchase heatmap
pub fn drill_down(lines: &[EnrichedLine<'_>], selection: &DrillDownSelection) -> Panel<DrillDown> {
    let category_options =
        aggregate::top_categories_by_frequency(lines, DRILLDOWN_CATEGORY_OPTIONS);
    let state_options = aggregate::states(lines);

    let category = selection
        .category
        .clone()
        .or_else(|| category_options.first().cloned());
    let state = selection
        .state
        .clone()
        .or_else(|| state_options.first().cloned());
    let (Some(category), Some(state)) = (category, state) else {
        return Panel::empty(NO_DATA_IN_RANGE);
    };

    let selected: Vec<&EnrichedLine<'_>> = lines
        .iter()
        .filter(|e| e.line.category_label() == category && e.line.customer_state == state)
        .collect();

    let heatmap = if selected.is_empty() {
        Panel::empty(NO_DATA_FOR_SELECTION)
    } else {
        ready(aggregate::purchase_heatmap(selected))
    };

    ready(DrillDown {
        category_options,
        state_options,
        category,
        state,
        heatmap,
    })
}

/// Run the whole pipeline for one set of control values
pub fn render(dataset: &Dataset, state: &DashboardState) -> Result<Dashboard, DashboardError> {
    if let Some(range) = state.range {
        DateRange::new(range.start, range.end)?;
    }
    let (range, lines) = prepare(dataset, state);

    if lines.is_empty() {
        fn empty<T>() -> Panel<T> {
            Panel::empty(NO_DATA_IN_RANGE)
        }
        return Ok(Dashboard {
            bounds: dataset.bounds(),
            range,
            rows: 0,
            kpis: empty(),
            monthly_sales: empty(),
            top_categories: empty(),
            top_states: empty(),
            price_by_review: empty(),
            review_histogram: empty(),
            premium_review_histogram: empty(),
            category_portfolio: empty(),
            installments: empty(),
            review_by_delay: empty(),
            customer_types: empty(),
            purchase_heatmap: empty(),
            drilldown: empty(),
        });
    }

    let portfolio = aggregate::category_portfolio(&lines);
    let high_volume = aggregate::high_volume_categories(&portfolio);
    let boxes = aggregate::installments_by_category(&lines, &high_volume);

    let premium = aggregate::review_histogram(&lines, Some(PREMIUM_PRICE));
    let premium_review_histogram = if premium.total() == 0 {
        Panel::empty("no items above the premium price in this range")
    } else {
        ready(premium)
    };

    let installments = if boxes.is_empty() {
        Panel::empty("no high-volume categories in this range")
    } else {
        ready(InstallmentDistribution {
            high_volume_categories: high_volume
                .iter()
                .map(|c| category_name(c.as_deref()).to_string())
                .collect(),
            boxes,
        })
    };

    Ok(Dashboard {
        bounds: dataset.bounds(),
        range,
        rows: lines.len(),
        kpis: ready(aggregate::kpis(&lines)),
        monthly_sales: ready(aggregate::monthly_sales(&lines)),
        top_categories: ready(aggregate::category_sales(&lines, TOP_CATEGORIES)),
        top_states: ready(aggregate::state_sales(&lines, TOP_STATES)),
        price_by_review: ready(aggregate::mean_price_by_review(&lines)),
        review_histogram: ready(aggregate::review_histogram(&lines, None)),
        premium_review_histogram,
        category_portfolio: ready(portfolio),
        installments,
        review_by_delay: ready(aggregate::review_by_delay(&lines)),
        customer_types: ready(CustomerTypes {
            by_type: aggregate::customer_type_summary(&lines),
        }),
        purchase_heatmap: ready(aggregate::purchase_heatmap(&lines)),
        drilldown: drill_down(&lines, &state.selection),
    })
}

/// Only the drill-down panel, for callers that re-run the selectors alone
pub fn render_drilldown(
    dataset: &Dataset,
    state: &DashboardState,
) -> Result<Panel<DrillDown>, DashboardError> {
    if let Some(range) = state.range {
        DateRange::new(range.start, range.end)?;
    }
    let (_, lines) = prepare(dataset, state);
    Ok(drill_down(&lines, &state.selection))
}
