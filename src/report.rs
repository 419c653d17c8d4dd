//! Terminal rendering of a `Dashboard`

use clap::ValueEnum;
use std::fmt::{self, Write};

use crate::aggregate::{Heatmap, ScoreHistogram};
use crate::dashboard::{Dashboard, Panel};
use crate::models::category_name;

/// Report section selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    All,
    Kpi,
    Sales,
    Reviews,
    Customers,
    Patterns,
}

impl Section {
    fn includes(self, other: Section) -> bool {
        self == Section::All || self == other
    }
}

fn section_header(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "\n{}", "═".repeat(72))?;
    writeln!(out, "  {}", title)?;
    writeln!(out, "{}\n", "═".repeat(72))
}

fn subsection(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "\n{}", title)?;
    writeln!(out, "{}", "─".repeat(60))
}

fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return String::new();
    }
    "#".repeat(((value / max) * width as f64).round() as usize)
}

/// Body of a panel, or its empty-state message
fn panel<T>(
    out: &mut String,
    panel: &Panel<T>,
    body: impl FnOnce(&mut String, &T) -> fmt::Result,
) -> fmt::Result {
    match panel {
        Panel::Ready { data } => body(out, data),
        Panel::Empty { message } => writeln!(out, "  ({})", message),
    }
}

fn write_kpis(out: &mut String, d: &Dashboard) -> fmt::Result {
    section_header(out, "KEY FIGURES")?;
    if let Some(range) = d.range {
        writeln!(out, "  Period:        {} .. {}", range.start, range.end)?;
    }
    if let Some(bounds) = d.bounds {
        writeln!(out, "  Data covers:   {} .. {}", bounds.start, bounds.end)?;
    }
    writeln!(out, "  Order lines:   {}", d.rows)?;
    panel(out, &d.kpis, |out, k| {
        writeln!(out, "  Total sales:   R$ {:>14.0}", k.total_sales)?;
        writeln!(out, "  Orders:        {:>17}", k.order_count)?;
        match k.average_price {
            Some(avg) => writeln!(out, "  Average price: R$ {:>14.2}", avg),
            None => writeln!(out, "  Average price: {:>17}", "n/a"),
        }
    })
}

fn write_sales(out: &mut String, d: &Dashboard) -> fmt::Result {
    section_header(out, "SALES")?;

    subsection(out, "Monthly sales")?;
    panel(out, &d.monthly_sales, |out, months| {
        let max = months.iter().map(|m| m.sales).fold(0.0, f64::max);
        for m in months {
            writeln!(out, "  {:8} {:>12.2} {}", m.month, m.sales, bar(m.sales, max, 30))?;
        }
        Ok(())
    })?;

    subsection(out, "Top categories by sales")?;
    panel(out, &d.top_categories, |out, ranked| {
        for (i, c) in ranked.iter().enumerate() {
            writeln!(out, "  {:>2}. {:40} {:>12.2}", i + 1, c.key, c.sales)?;
        }
        Ok(())
    })?;

    subsection(out, "Top customer states by sales")?;
    panel(out, &d.top_states, |out, ranked| {
        for (i, s) in ranked.iter().enumerate() {
            writeln!(out, "  {:>2}. {:4} {:>12.2}", i + 1, s.key, s.sales)?;
        }
        Ok(())
    })?;

    subsection(out, "Category portfolio (average price vs. quantity)")?;
    panel(out, &d.category_portfolio, |out, portfolio| {
        writeln!(out, "  {:40} {:>10} {:>8}", "Category", "Avg price", "Qty")?;
        for c in portfolio {
            writeln!(
                out,
                "  {:40} {:>10.2} {:>8}",
                category_name(c.category.as_deref()),
                c.average_price,
                c.sales_quantity
            )?;
        }
        Ok(())
    })?;

    subsection(out, "Payment installments in high-volume categories")?;
    panel(out, &d.installments, |out, dist| {
        writeln!(
            out,
            "  {:32} {:>6} {:>5} {:>5} {:>6} {:>5} {:>5} {:>6}",
            "Category", "Rows", "Min", "Q1", "Median", "Q3", "Max", "Mean"
        )?;
        for b in &dist.boxes {
            let s = &b.summary;
            writeln!(
                out,
                "  {:32} {:>6} {:>5.1} {:>5.1} {:>6.1} {:>5.1} {:>5.1} {:>6.2}",
                category_name(b.category.as_deref()),
                b.count,
                s.min,
                s.q1,
                s.median,
                s.q3,
                s.max,
                b.mean
            )?;
        }
        Ok(())
    })
}

fn write_reviews(out: &mut String, d: &Dashboard) -> fmt::Result {
    section_header(out, "REVIEWS")?;

    subsection(out, "Average item price by review score")?;
    panel(out, &d.price_by_review, |out, rows| {
        for r in rows {
            writeln!(out, "  score {}  R$ {:>8.2}", r.review_score, r.mean_price)?;
        }
        Ok(())
    })?;

    let histogram = |out: &mut String, h: &ScoreHistogram| -> fmt::Result {
        let total = h.total().max(1) as f64;
        for (i, count) in h.counts.iter().enumerate() {
            let pct = *count as f64 / total * 100.0;
            writeln!(
                out,
                "  {} {:>8} ({:>5.1}%) {}",
                i + 1,
                count,
                pct,
                bar(pct, 100.0, 40)
            )?;
        }
        Ok(())
    };

    subsection(out, "Review score distribution")?;
    panel(out, &d.review_histogram, histogram)?;

    subsection(out, "Review score distribution, items above R$ 100")?;
    panel(out, &d.premium_review_histogram, histogram)?;

    subsection(out, "Delivery delay vs. review")?;
    panel(out, &d.review_by_delay, |out, rows| {
        for r in rows {
            writeln!(out, "  {:10} {:>5.2}", r.label, r.mean_review)?;
        }
        Ok(())
    })
}

fn write_customers(out: &mut String, d: &Dashboard) -> fmt::Result {
    section_header(out, "CUSTOMERS")?;
    panel(out, &d.customer_types, |out, types| {
        writeln!(
            out,
            "  {:12} {:>10} {:>10} {:>14} {:>11}",
            "Type", "Avg review", "Row share", "Sales", "Sales share"
        )?;
        for t in &types.by_type {
            writeln!(
                out,
                "  {:12} {:>10.2} {:>9.1}% {:>14.2} {:>10.1}%",
                t.customer_type.label(),
                t.mean_review,
                t.row_share * 100.0,
                t.sales,
                t.sales_share * 100.0
            )?;
        }
        Ok(())
    })
}

fn write_heatmap(out: &mut String, heatmap: &Heatmap) -> fmt::Result {
    write!(out, "  {:10}", "")?;
    for part in &heatmap.day_parts {
        write!(out, " {:>18}", part)?;
    }
    writeln!(out)?;
    for (day, row) in heatmap.days.iter().zip(&heatmap.cells) {
        write!(out, "  {:10}", day)?;
        for cell in row {
            match cell {
                Some(n) => write!(out, " {:>18}", n)?,
                None => write!(out, " {:>18}", "-")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_patterns(out: &mut String, d: &Dashboard) -> fmt::Result {
    section_header(out, "PURCHASE TIME PATTERNS")?;

    subsection(out, "Orders by weekday and time of day")?;
    panel(out, &d.purchase_heatmap, write_heatmap)?;

    panel(out, &d.drilldown, |out, drill| {
        subsection(
            out,
            &format!("Purchase pattern for {} in {}", drill.category, drill.state),
        )?;
        panel(out, &drill.heatmap, write_heatmap)?;
        writeln!(
            out,
            "\n  {} categories and {} states available for drill-down",
            drill.category_options.len(),
            drill.state_options.len()
        )
    })
}

fn write_dashboard(out: &mut String, d: &Dashboard, section: Section) -> fmt::Result {
    if section.includes(Section::Kpi) {
        write_kpis(out, d)?;
    }
    if section.includes(Section::Sales) {
        write_sales(out, d)?;
    }
    if section.includes(Section::Reviews) {
        write_reviews(out, d)?;
    }
    if section.includes(Section::Customers) {
        write_customers(out, d)?;
    }
    if section.includes(Section::Patterns) {
        write_patterns(out, d)?;
    }
    Ok(())
}

/// Plain-text report of the selected section(s)
pub fn render_text(d: &Dashboard, section: Section) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_dashboard(&mut out, d, section);
    out
}
