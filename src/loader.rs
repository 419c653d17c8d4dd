//! CSV loading and the once-built dataset handle

use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::info;

use crate::config::DataPaths;
use crate::error::LoadError;
use crate::filter::{date_bounds, DateRange};
use crate::join::{join_tables, JoinInputs, JoinReport};
use crate::models::{
    CustomerRecord, ItemRecord, Order, OrderLine, OrderRecord, PaymentRecord, ProductRecord,
    ReviewRecord, TranslationRecord,
};
use crate::translate::CategoryTranslator;

/// The source tables as read from disk
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub orders: Vec<Order>,
    pub items: Vec<ItemRecord>,
    pub products: Vec<ProductRecord>,
    pub customers: Vec<CustomerRecord>,
    pub payments: Vec<PaymentRecord>,
    pub reviews: Vec<ReviewRecord>,
    pub translations: Vec<TranslationRecord>,
}

/// Deserialize every row of a headed CSV file. Any bad row fails the whole file.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    if !path.is_file() {
        return Err(LoadError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_error)?;

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_error)?;

    info!("Read {} rows from {:?}", rows.len(), path);
    Ok(rows)
}

fn read_orders(path: &Path) -> Result<Vec<Order>, LoadError> {
    let records: Vec<OrderRecord> = read_table(path)?;
    records
        .iter()
        .map(|r| {
            r.to_order().ok_or_else(|| LoadError::Timestamp {
                path: path.to_path_buf(),
                value: r.order_purchase_timestamp.clone(),
            })
        })
        .collect()
}

/// Read all seven inputs
pub fn load_tables(paths: &DataPaths) -> Result<RawTables, LoadError> {
    Ok(RawTables {
        orders: read_orders(&paths.orders)?,
        items: read_table(&paths.items)?,
        products: read_table(&paths.products)?,
        customers: read_table(&paths.customers)?,
        payments: read_table(&paths.payments)?,
        reviews: read_table(&paths.reviews)?,
        translations: read_table(&paths.translation)?,
    })
}

/// Joined, immutable order-line table. Built once, then shared read-only.
#[derive(Debug, Clone)]
pub struct Dataset {
    lines: Vec<OrderLine>,
    bounds: Option<DateRange>,
    report: JoinReport,
}

impl Dataset {
    /// Load, translate and join the files under `paths`
    pub fn load(paths: &DataPaths) -> Result<Self, LoadError> {
        let tables = load_tables(paths)?;
        Ok(Self::from_tables(&tables))
    }

    pub fn from_tables(tables: &RawTables) -> Self {
        let translator = CategoryTranslator::from_records(&tables.translations);
        let products = translator.apply(&tables.products);

        let (lines, report) = join_tables(&JoinInputs {
            orders: &tables.orders,
            items: &tables.items,
            products: &products,
            customers: &tables.customers,
            payments: &tables.payments,
            reviews: &tables.reviews,
        });

        let mut dataset = Self::from_lines(lines);
        dataset.report = report;
        dataset
    }

    /// Wrap an already joined table
    pub fn from_lines(lines: Vec<OrderLine>) -> Self {
        let bounds = date_bounds(&lines);
        Self {
            lines,
            bounds,
            report: JoinReport::default(),
        }
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Earliest and latest purchase date; `None` when the join produced nothing
    pub fn bounds(&self) -> Option<DateRange> {
        self.bounds
    }

    pub fn report(&self) -> &JoinReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    fn write_fixture(dir: &Path) {
        fs::write(
            dir.join(crate::config::ORDERS_FILE),
            "order_id,customer_id,order_status,order_purchase_timestamp,order_approved_at,order_delivered_customer_date,order_estimated_delivery_date\n\
             o1,c1,delivered,2017-01-01 09:00:00,2017-01-01 09:10:00,2017-01-10 12:00:00,2017-01-20 00:00:00\n\
             o2,c2,delivered,2017-02-01 13:00:00,,2017-02-25 08:00:00,2017-02-20 00:00:00\n\
             o3,c3,shipped,2017-03-01 23:30:00,,,2017-03-20 00:00:00\n",
        )
        .unwrap();
        fs::write(
            dir.join(crate::config::ITEMS_FILE),
            "order_id,order_item_id,product_id,seller_id,shipping_limit_date,price,freight_value\n\
             o1,1,p1,s1,2017-01-05 00:00:00,10.0,1.5\n\
             o2,1,p2,s1,2017-02-05 00:00:00,20.0,2.5\n\
             o3,1,p3,s2,2017-03-05 00:00:00,30.0,3.5\n",
        )
        .unwrap();
        fs::write(
            dir.join(crate::config::PRODUCTS_FILE),
            "product_id,product_category_name,product_name_lenght,product_weight_g\n\
             p1,beleza_saude,40,500\n\
             p2,brinquedos,35,300\n\
             p3,,20,100\n",
        )
        .unwrap();
        fs::write(
            dir.join(crate::config::CUSTOMERS_FILE),
            "customer_id,customer_unique_id,customer_zip_code_prefix,customer_city,customer_state\n\
             c1,u1,01000,sao paulo,SP\n\
             c2,u2,20000,rio de janeiro,RJ\n\
             c3,u1,01000,sao paulo,SP\n",
        )
        .unwrap();
        fs::write(
            dir.join(crate::config::PAYMENTS_FILE),
            "order_id,payment_sequential,payment_type,payment_installments,payment_value\n\
             o1,1,credit_card,2,11.5\n\
             o2,1,boleto,1,22.5\n\
             o3,1,credit_card,8,33.5\n",
        )
        .unwrap();
        fs::write(
            dir.join(crate::config::REVIEWS_FILE),
            "review_id,order_id,review_score,review_comment_title,review_comment_message\n\
             r1,o1,5,,\"Chegou antes,\nmuito bom\"\n\
             r2,o2,2,,atrasou\n\
             r3,o3,4,,\n",
        )
        .unwrap();
        fs::write(
            dir.join(crate::config::TRANSLATION_FILE),
            "product_category_name,product_category_name_english\n\
             beleza_saude,health_beauty\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_joins_all_files() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let dataset = Dataset::load(&DataPaths::from_dir(dir.path())).unwrap();
        assert_eq!(dataset.len(), 3);

        let bounds = dataset.bounds().unwrap();
        assert_eq!(bounds.start, NaiveDate::from_ymd_opt(2017, 1, 1).unwrap());
        assert_eq!(bounds.end, NaiveDate::from_ymd_opt(2017, 3, 1).unwrap());

        let first = &dataset.lines()[0];
        assert_eq!(first.category.as_deref(), Some("health_beauty"));
        assert_eq!(first.payment_installments, 2);
        assert_eq!(first.review_score, 5);

        // brinquedos has no translation, p3 has no category at all
        assert_eq!(dataset.lines()[1].category, None);
        assert_eq!(dataset.lines()[2].category, None);
        assert_eq!(dataset.lines()[2].delivered_at, None);
        assert_eq!(dataset.report().with_reviews, 3);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        fs::remove_file(dir.path().join(crate::config::REVIEWS_FILE)).unwrap();

        let err = Dataset::load(&DataPaths::from_dir(dir.path())).unwrap_err();
        assert!(matches!(err, LoadError::MissingFile { .. }));
    }

    #[test]
    fn test_malformed_row_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        fs::write(
            dir.path().join(crate::config::ITEMS_FILE),
            "order_id,order_item_id,product_id,seller_id,price,freight_value\n\
             o1,1,p1,s1,not-a-price,1.5\n",
        )
        .unwrap();

        let err = Dataset::load(&DataPaths::from_dir(dir.path())).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn test_bad_purchase_timestamp_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        fs::write(
            dir.path().join(crate::config::ORDERS_FILE),
            "order_id,customer_id,order_status,order_purchase_timestamp,order_delivered_customer_date,order_estimated_delivery_date\n\
             o1,c1,delivered,yesterday,,\n",
        )
        .unwrap();

        let err = Dataset::load(&DataPaths::from_dir(dir.path())).unwrap_err();
        match err {
            LoadError::Timestamp { value, .. } => assert_eq!(value, "yesterday"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_dataset_has_no_bounds() {
        let dataset = Dataset::from_lines(Vec::new());
        assert!(dataset.is_empty());
        assert_eq!(dataset.bounds(), None);
    }
}
