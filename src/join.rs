//! Inner joins of the six source tables into one row per order item
//!
//! Join order: orders ⋈ items (order_id) ⋈ products (product_id)
//! ⋈ customers (customer_id) ⋈ payments (order_id) ⋈ reviews (order_id).
//! Rows missing a partner in any table are dropped. Orders with several
//! payments or reviews fan out into one row per combination.

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{info, warn};

use crate::models::{
    CustomerRecord, ItemRecord, Order, OrderLine, PaymentRecord, Product, ReviewRecord,
};

/// Row counts after each join step, plus cardinality diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    pub orders: usize,
    pub with_items: usize,
    pub with_products: usize,
    pub with_customers: usize,
    pub with_payments: usize,
    pub with_reviews: usize,
    pub orders_with_multiple_payments: usize,
    pub orders_with_multiple_reviews: usize,
}

/// Borrowed inputs of the join
pub struct JoinInputs<'a> {
    pub orders: &'a [Order],
    pub items: &'a [ItemRecord],
    pub products: &'a [Product],
    pub customers: &'a [CustomerRecord],
    pub payments: &'a [PaymentRecord],
    pub reviews: &'a [ReviewRecord],
}

fn index_by<'a, T, K, F>(rows: &'a [T], key: F) -> HashMap<K, Vec<&'a T>>
where
    K: Eq + Hash,
    F: Fn(&'a T) -> K,
{
    let mut index: HashMap<K, Vec<&'a T>> = HashMap::new();
    for row in rows {
        index.entry(key(row)).or_default().push(row);
    }
    index
}

fn multi_count<K, T>(index: &HashMap<K, Vec<T>>) -> usize {
    index.values().filter(|rows| rows.len() > 1).count()
}

/// Build the denormalized order-line table
pub fn join_tables(inputs: &JoinInputs<'_>) -> (Vec<OrderLine>, JoinReport) {
    let items = index_by(inputs.items, |i| i.order_id.as_str());
    let products = index_by(inputs.products, |p| p.product_id.as_str());
    let customers = index_by(inputs.customers, |c| c.customer_id.as_str());
    let payments = index_by(inputs.payments, |p| p.order_id.as_str());
    let reviews = index_by(inputs.reviews, |r| r.order_id.as_str());

    let mut report = JoinReport {
        orders: inputs.orders.len(),
        orders_with_multiple_payments: multi_count(&payments),
        orders_with_multiple_reviews: multi_count(&reviews),
        ..Default::default()
    };

    let mut lines = Vec::new();
    for order in inputs.orders {
        let id = order.order_id.as_str();
        let Some(order_items) = items.get(id) else { continue };
        for item in order_items {
            report.with_items += 1;
            let Some(item_products) = products.get(item.product_id.as_str()) else { continue };
            for product in item_products {
                report.with_products += 1;
                let Some(order_customers) = customers.get(order.customer_id.as_str()) else {
                    continue;
                };
                for customer in order_customers {
                    report.with_customers += 1;
                    let Some(order_payments) = payments.get(id) else { continue };
                    for payment in order_payments {
                        report.with_payments += 1;
                        let Some(order_reviews) = reviews.get(id) else { continue };
                        for review in order_reviews {
                            report.with_reviews += 1;
                            lines.push(OrderLine {
                                order_id: order.order_id.clone(),
                                purchased_at: order.purchased_at,
                                delivered_at: order.delivered_at,
                                estimated_delivery_at: order.estimated_delivery_at,
                                price: item.price,
                                category: product.category.clone(),
                                customer_id: customer.customer_id.clone(),
                                customer_unique_id: customer.customer_unique_id.clone(),
                                customer_state: customer.customer_state.clone(),
                                payment_installments: payment.payment_installments,
                                review_score: review.review_score,
                            });
                        }
                    }
                }
            }
        }
    }

    info!(
        "Joined {} orders -> {} items -> {} products -> {} customers -> {} payments -> {} rows",
        report.orders,
        report.with_items,
        report.with_products,
        report.with_customers,
        report.with_payments,
        report.with_reviews
    );
    if report.orders_with_multiple_payments > 0 {
        warn!(
            "{} orders have more than one payment record; their rows fan out",
            report.orders_with_multiple_payments
        );
    }
    if report.orders_with_multiple_reviews > 0 {
        warn!(
            "{} orders have more than one review; their rows fan out",
            report.orders_with_multiple_reviews
        );
    }

    (lines, report)
}
