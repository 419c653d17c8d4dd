use chrono::{NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize, Serializer};

/// Bucket label for products whose category is missing or has no translation
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Display name of a category grouping key; `None` is the unmapped bucket
pub fn category_name(category: Option<&str>) -> &str {
    category.unwrap_or(UNKNOWN_CATEGORY)
}

/// Serialize a category grouping key by its display name
pub fn serialize_category<S: Serializer>(
    category: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(category_name(category.as_deref()))
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Raw CSV records
// ============================================================================

/// Raw row of `olist_orders_dataset.csv`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    pub order_status: String,
    pub order_purchase_timestamp: String,
    pub order_delivered_customer_date: Option<String>,
    pub order_estimated_delivery_date: Option<String>,
}

/// Raw row of `olist_order_items_dataset.csv`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemRecord {
    pub order_id: String,
    pub order_item_id: u32,
    pub product_id: String,
    pub seller_id: String,
    pub price: f64,
    pub freight_value: f64,
}

/// Raw row of `olist_products_dataset.csv`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductRecord {
    pub product_id: String,
    pub product_category_name: Option<String>,
}

/// Raw row of `olist_customers_dataset.csv`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub customer_unique_id: String,
    pub customer_zip_code_prefix: String,
    pub customer_city: String,
    pub customer_state: String,
}

/// Raw row of `olist_order_payments_dataset.csv`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentRecord {
    pub order_id: String,
    pub payment_sequential: u32,
    pub payment_type: String,
    pub payment_installments: u32,
    pub payment_value: f64,
}

/// Raw row of `olist_order_reviews_dataset.csv`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewRecord {
    pub review_id: String,
    pub order_id: String,
    pub review_score: u8,
}

/// Raw row of `product_category_name_translation.csv`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranslationRecord {
    pub product_category_name: String,
    pub product_category_name_english: String,
}

// ============================================================================
// Typed entities
// ============================================================================

/// Order with parsed timestamps
#[derive(Debug, Clone)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub purchased_at: NaiveDateTime,
    pub delivered_at: Option<NaiveDateTime>,
    pub estimated_delivery_at: Option<NaiveDateTime>,
}

impl OrderRecord {
    /// Parse timestamps. Purchase time is mandatory; an unreadable delivery
    /// timestamp counts as missing.
    pub fn to_order(&self) -> Option<Order> {
        let purchased_at = parse_timestamp(&self.order_purchase_timestamp)?;
        Some(Order {
            order_id: self.order_id.clone(),
            customer_id: self.customer_id.clone(),
            purchased_at,
            delivered_at: self
                .order_delivered_customer_date
                .as_deref()
                .and_then(parse_timestamp),
            estimated_delivery_at: self
                .order_estimated_delivery_date
                .as_deref()
                .and_then(parse_timestamp),
        })
    }
}

/// Product with its category already translated to English
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: String,
    pub category: Option<String>,
}

/// One joined row: a single item of an order, with customer, payment and review
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub order_id: String,
    pub purchased_at: NaiveDateTime,
    pub delivered_at: Option<NaiveDateTime>,
    pub estimated_delivery_at: Option<NaiveDateTime>,
    pub price: f64,
    pub category: Option<String>,
    pub customer_id: String,
    pub customer_unique_id: String,
    pub customer_state: String,
    pub payment_installments: u32,
    pub review_score: u8,
}

impl OrderLine {
    pub fn purchase_date(&self) -> NaiveDate {
        self.purchased_at.date()
    }

    /// Category name, or the `unknown` bucket
    pub fn category_label(&self) -> &str {
        category_name(self.category.as_deref())
    }

    /// Delivered strictly after the estimate. Missing timestamps never count as late.
    pub fn is_delayed(&self) -> bool {
        match (self.delivered_at, self.estimated_delivery_at) {
            (Some(delivered), Some(estimated)) => delivered > estimated,
            _ => false,
        }
    }
}

// ============================================================================
// Derived categories
// ============================================================================

/// Coarse time-of-day bucket of the purchase hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DayPart {
    #[serde(rename = "Morning (5-12)")]
    Morning,
    #[serde(rename = "Afternoon (12-18)")]
    Afternoon,
    #[serde(rename = "Evening (18-22)")]
    Evening,
    #[serde(rename = "Night (22-5)")]
    Night,
}

impl DayPart {
    /// Canonical heatmap column order
    pub const ALL: [DayPart; 4] = [
        DayPart::Morning,
        DayPart::Afternoon,
        DayPart::Evening,
        DayPart::Night,
    ];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => DayPart::Morning,
            12..=17 => DayPart::Afternoon,
            18..=21 => DayPart::Evening,
            _ => DayPart::Night,
        }
    }

    pub fn of(ts: &NaiveDateTime) -> Self {
        Self::from_hour(ts.hour())
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayPart::Morning => "Morning (5-12)",
            DayPart::Afternoon => "Afternoon (12-18)",
            DayPart::Evening => "Evening (18-22)",
            DayPart::Night => "Night (22-5)",
        }
    }
}

/// Repeat vs one-time buyer within the currently filtered rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CustomerType {
    Repeater,
    NonRepeater,
}

impl CustomerType {
    pub fn label(&self) -> &'static str {
        match self {
            CustomerType::Repeater => "Repeater",
            CustomerType::NonRepeater => "NonRepeater",
        }
    }
}

/// Canonical heatmap row order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse an Olist timestamp (`2017-10-02 10:56:33`), accepting bare dates too
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
