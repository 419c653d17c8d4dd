//! Input file locations

use std::path::{Path, PathBuf};

/// Environment variable overriding the default data directory
pub const DATA_DIR_ENV: &str = "OLIST_DATA_DIR";

pub const DEFAULT_DATA_DIR: &str = "data";

pub const ORDERS_FILE: &str = "olist_orders_dataset.csv";
pub const ITEMS_FILE: &str = "olist_order_items_dataset.csv";
pub const PRODUCTS_FILE: &str = "olist_products_dataset.csv";
pub const CUSTOMERS_FILE: &str = "olist_customers_dataset.csv";
pub const PAYMENTS_FILE: &str = "olist_order_payments_dataset.csv";
pub const REVIEWS_FILE: &str = "olist_order_reviews_dataset.csv";
pub const TRANSLATION_FILE: &str = "product_category_name_translation.csv";

/// Paths of the seven tabular inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub orders: PathBuf,
    pub items: PathBuf,
    pub products: PathBuf,
    pub customers: PathBuf,
    pub payments: PathBuf,
    pub reviews: PathBuf,
    pub translation: PathBuf,
}

impl DataPaths {
    /// Canonical file names under a single directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            orders: dir.join(ORDERS_FILE),
            items: dir.join(ITEMS_FILE),
            products: dir.join(PRODUCTS_FILE),
            customers: dir.join(CUSTOMERS_FILE),
            payments: dir.join(PAYMENTS_FILE),
            reviews: dir.join(REVIEWS_FILE),
            translation: dir.join(TRANSLATION_FILE),
        }
    }

    /// Resolve the data directory: explicit argument, then `OLIST_DATA_DIR`, then `data/`
    pub fn resolve(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::from_dir(data_dir_from_env()),
        }
    }

    pub fn all(&self) -> [&Path; 7] {
        [
            &self.orders,
            &self.items,
            &self.products,
            &self.customers,
            &self.payments,
            &self.reviews,
            &self.translation,
        ]
    }
}

fn data_dir_from_env() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dir_uses_canonical_names() {
        let paths = DataPaths::from_dir("/tmp/olist");
        assert_eq!(paths.orders, PathBuf::from("/tmp/olist/olist_orders_dataset.csv"));
        assert_eq!(
            paths.translation,
            PathBuf::from("/tmp/olist/product_category_name_translation.csv")
        );
        assert_eq!(paths.all().len(), 7);
    }

    #[test]
    fn test_explicit_dir_wins() {
        let paths = DataPaths::resolve(Some(Path::new("elsewhere")));
        assert!(paths.items.starts_with("elsewhere"));
    }
}
