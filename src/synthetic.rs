//! Synthetic Olist-shaped dataset
//!
//! Produces all seven source tables with controlled random variation: repeat
//! customers, untranslated categories, late and undelivered orders, and the
//! occasional split payment.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use csv::WriterBuilder;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::DataPaths;
use crate::models::{
    CustomerRecord, ItemRecord, OrderRecord, PaymentRecord, ProductRecord, ReviewRecord,
    TranslationRecord,
};

/// (Portuguese code, English label); `None` marks a code left out of the translation table
const CATEGORIES: &[(&str, Option<&str>)] = &[
    ("cama_mesa_banho", Some("bed_bath_table")),
    ("beleza_saude", Some("health_beauty")),
    ("esporte_lazer", Some("sports_leisure")),
    ("moveis_decoracao", Some("furniture_decor")),
    ("informatica_acessorios", Some("computers_accessories")),
    ("utilidades_domesticas", Some("housewares")),
    ("relogios_presentes", Some("watches_gifts")),
    ("telefonia", Some("telephony")),
    ("ferramentas_jardim", Some("garden_tools")),
    ("automotivo", Some("auto")),
    ("brinquedos", Some("toys")),
    ("cool_stuff", Some("cool_stuff")),
    ("perfumaria", Some("perfumery")),
    ("bebes", Some("baby")),
    ("eletronicos", Some("electronics")),
    ("pc_gamer", None),
    ("portateis_cozinha_e_preparadores_de_alimentos", None),
];

/// Customer states with rough population weights
const STATES: &[(&str, u32)] = &[
    ("SP", 42),
    ("RJ", 13),
    ("MG", 12),
    ("RS", 6),
    ("PR", 5),
    ("SC", 4),
    ("BA", 3),
    ("DF", 2),
    ("ES", 2),
    ("GO", 2),
    ("PE", 2),
    ("CE", 1),
    ("PA", 1),
    ("MT", 1),
    ("AC", 1),
];

/// Purchase hour weights, midnight first
const HOUR_WEIGHTS: [u32; 24] = [
    5, 3, 2, 1, 1, 1, 2, 4, 6, 9, 11, 12, 11, 12, 13, 12, 11, 11, 10, 10, 12, 12, 10, 8,
];

#[derive(Debug, Clone)]
pub struct SyntheticOptions {
    pub orders: usize,
    pub products: usize,
    pub start: NaiveDate,
    pub days: i64,
    /// Probability an order is placed by an already seen customer
    pub repeat_rate: f64,
    /// Probability an order arrives after its estimated date
    pub late_rate: f64,
    /// Probability an order is not delivered yet
    pub undelivered_rate: f64,
    /// Probability a product has no category at all
    pub missing_category_rate: f64,
    pub seed: Option<u64>,
}

impl Default for SyntheticOptions {
    fn default() -> Self {
        Self {
            orders: 2000,
            products: 300,
            start: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or_default(),
            days: 365,
            repeat_rate: 0.08,
            late_rate: 0.1,
            undelivered_rate: 0.03,
            missing_category_rate: 0.02,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyntheticTables {
    pub orders: Vec<OrderRecord>,
    pub items: Vec<ItemRecord>,
    pub products: Vec<ProductRecord>,
    pub customers: Vec<CustomerRecord>,
    pub payments: Vec<PaymentRecord>,
    pub reviews: Vec<ReviewRecord>,
    pub translations: Vec<TranslationRecord>,
}

fn hex_id(rng: &mut impl Rng) -> String {
    format!("{:032x}", rng.gen::<u128>())
}

fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Skewed item price: mostly cheap, with a long tail
fn item_price(rng: &mut impl Rng) -> f64 {
    let base: f64 = rng.gen_range(0.0..1.0);
    let price = 8.0 + 600.0 * base.powi(3);
    (price * 100.0).round() / 100.0
}

/// Review score weights for scores 1..=5
const ON_TIME_SCORES: [u32; 5] = [8, 3, 8, 21, 60];
const LATE_SCORES: [u32; 5] = [40, 12, 15, 15, 18];

pub fn generate(options: &SyntheticOptions) -> anyhow::Result<SyntheticTables> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut tables = SyntheticTables {
        translations: CATEGORIES
            .iter()
            .filter_map(|(code, label)| {
                label.map(|label| TranslationRecord {
                    product_category_name: code.to_string(),
                    product_category_name_english: label.to_string(),
                })
            })
            .collect(),
        ..Default::default()
    };

    for _ in 0..options.products.max(1) {
        let category = if rng.gen_bool(options.missing_category_rate) {
            None
        } else {
            CATEGORIES.choose(&mut rng).map(|(code, _)| code.to_string())
        };
        tables.products.push(ProductRecord {
            product_id: hex_id(&mut rng),
            product_category_name: category,
        });
    }

    let state_dist = WeightedIndex::new(STATES.iter().map(|(_, w)| *w))?;
    let hour_dist = WeightedIndex::new(HOUR_WEIGHTS)?;
    let on_time_scores = WeightedIndex::new(ON_TIME_SCORES)?;
    let late_scores = WeightedIndex::new(LATE_SCORES)?;
    let sellers: Vec<String> = (0..40).map(|_| hex_id(&mut rng)).collect();

    // (unique id, zip, state) of customers seen so far
    let mut known: Vec<(String, String, &str)> = Vec::new();

    for _ in 0..options.orders {
        let order_id = hex_id(&mut rng);
        let customer_id = hex_id(&mut rng);

        let repeat = !known.is_empty() && rng.gen_bool(options.repeat_rate);
        let (unique_id, zip, state) = if repeat {
            known[rng.gen_range(0..known.len())].clone()
        } else {
            let fresh = (
                hex_id(&mut rng),
                format!("{:05}", rng.gen_range(1000..99999)),
                STATES[state_dist.sample(&mut rng)].0,
            );
            known.push(fresh.clone());
            fresh
        };
        tables.customers.push(CustomerRecord {
            customer_id: customer_id.clone(),
            customer_unique_id: unique_id,
            customer_zip_code_prefix: zip,
            customer_city: "cidade".to_string(),
            customer_state: state.to_string(),
        });

        let day = rng.gen_range(0..options.days.max(1));
        let hour = hour_dist.sample(&mut rng) as u32;
        let purchased = options
            .start
            .and_hms_opt(hour, rng.gen_range(0..60), rng.gen_range(0..60))
            .unwrap_or_default()
            + Duration::days(day);
        let estimated = (purchased + Duration::days(rng.gen_range(10..30)))
            .date()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default();

        let late = rng.gen_bool(options.late_rate);
        let delivered = if rng.gen_bool(options.undelivered_rate) {
            None
        } else if late {
            Some(estimated + Duration::hours(rng.gen_range(24..24 * 20)))
        } else {
            let window = (estimated - purchased).num_hours().max(25);
            Some(purchased + Duration::hours(rng.gen_range(24..window)))
        };

        tables.orders.push(OrderRecord {
            order_id: order_id.clone(),
            customer_id,
            order_status: if delivered.is_some() { "delivered" } else { "shipped" }.to_string(),
            order_purchase_timestamp: format_datetime(&purchased),
            order_delivered_customer_date: delivered.as_ref().map(format_datetime),
            order_estimated_delivery_date: Some(format_datetime(&estimated)),
        });

        let item_count = *[1u32, 1, 1, 1, 2, 2, 3].choose(&mut rng).unwrap_or(&1);
        let mut order_total = 0.0;
        for n in 1..=item_count {
            let product = &tables.products[rng.gen_range(0..tables.products.len())];
            let price = item_price(&mut rng);
            let freight_value = (rng.gen_range(5.0..40.0_f64) * 100.0).round() / 100.0;
            order_total += price + freight_value;
            tables.items.push(ItemRecord {
                order_id: order_id.clone(),
                order_item_id: n,
                product_id: product.product_id.clone(),
                seller_id: sellers[rng.gen_range(0..sellers.len())].clone(),
                price,
                freight_value,
            });
        }

        let installments = if rng.gen_bool(0.45) { 1 } else { rng.gen_range(2..=10) };
        if rng.gen_bool(0.03) {
            let voucher = (order_total * 0.3 * 100.0).round() / 100.0;
            tables.payments.push(PaymentRecord {
                order_id: order_id.clone(),
                payment_sequential: 1,
                payment_type: "credit_card".to_string(),
                payment_installments: installments,
                payment_value: order_total - voucher,
            });
            tables.payments.push(PaymentRecord {
                order_id: order_id.clone(),
                payment_sequential: 2,
                payment_type: "voucher".to_string(),
                payment_installments: 1,
                payment_value: voucher,
            });
        } else {
            tables.payments.push(PaymentRecord {
                order_id: order_id.clone(),
                payment_sequential: 1,
                payment_type: if installments == 1 && rng.gen_bool(0.4) {
                    "boleto"
                } else {
                    "credit_card"
                }
                .to_string(),
                payment_installments: installments,
                payment_value: order_total,
            });
        }

        let scores = match delivered {
            Some(d) if d > estimated => &late_scores,
            _ => &on_time_scores,
        };
        tables.reviews.push(ReviewRecord {
            review_id: hex_id(&mut rng),
            order_id,
            review_score: scores.sample(&mut rng) as u8 + 1,
        });
    }

    info!(
        "Generated {} orders, {} items, {} customers",
        tables.orders.len(),
        tables.items.len(),
        tables.customers.len()
    );
    Ok(tables)
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

/// Write the seven files under `dir` with their canonical names
pub fn write_tables(tables: &SyntheticTables, dir: &Path) -> anyhow::Result<DataPaths> {
    fs::create_dir_all(dir)?;
    let paths = DataPaths::from_dir(dir);
    write_csv(&paths.orders, &tables.orders)?;
    write_csv(&paths.items, &tables.items)?;
    write_csv(&paths.products, &tables.products)?;
    write_csv(&paths.customers, &tables.customers)?;
    write_csv(&paths.payments, &tables.payments)?;
    write_csv(&paths.reviews, &tables.reviews)?;
    write_csv(&paths.translation, &tables.translations)?;
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{render, DashboardState};
    use crate::loader::Dataset;

    fn options() -> SyntheticOptions {
        SyntheticOptions {
            orders: 400,
            seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate(&options()).unwrap();
        let b = generate(&options()).unwrap();
        assert_eq!(a.orders.len(), 400);
        assert_eq!(a.reviews.len(), 400);
        assert_eq!(
            a.orders.iter().map(|o| &o.order_id).collect::<Vec<_>>(),
            b.orders.iter().map(|o| &o.order_id).collect::<Vec<_>>()
        );
        assert!(a.items.len() >= 400);
        assert!(a.payments.len() >= 400);
    }

    #[test]
    fn test_generated_files_feed_the_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_tables(&generate(&options()).unwrap(), dir.path()).unwrap();

        let dataset = Dataset::load(&paths).unwrap();
        assert!(dataset.len() >= 400);
        assert_eq!(dataset.report().orders, 400);

        let dashboard = render(&dataset, &DashboardState::default()).unwrap();
        assert_eq!(dashboard.rows, dataset.len());
        let kpis = dashboard.kpis.data().unwrap();
        assert_eq!(kpis.order_count, 400);
        assert!(!dashboard.drilldown.is_empty());
    }
}
