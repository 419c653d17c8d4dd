//! Category name translation
//! Maps Portuguese product category codes to English labels

use std::collections::HashMap;
use tracing::{info, warn};

use crate::models::{Product, ProductRecord, TranslationRecord};

/// Lookup from source-language category code to English label
#[derive(Debug, Clone, Default)]
pub struct CategoryTranslator {
    labels: HashMap<String, String>,
}

impl CategoryTranslator {
    /// Build the lookup. A duplicated source key keeps its last label.
    pub fn from_records(records: &[TranslationRecord]) -> Self {
        let mut labels = HashMap::with_capacity(records.len());
        for record in records {
            let previous = labels.insert(
                record.product_category_name.clone(),
                record.product_category_name_english.clone(),
            );
            if let Some(previous) = previous {
                warn!(
                    "Duplicate translation for '{}': '{}' replaced by '{}'",
                    record.product_category_name, previous, record.product_category_name_english
                );
            }
        }
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn translate(&self, code: &str) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    /// Translate every product's category. Missing or unmapped codes become `None`.
    pub fn apply(&self, products: &[ProductRecord]) -> Vec<Product> {
        let mut unmapped = 0usize;
        let translated: Vec<Product> = products
            .iter()
            .map(|p| {
                let category = p
                    .product_category_name
                    .as_deref()
                    .and_then(|code| self.translate(code))
                    .map(str::to_string);
                if category.is_none() {
                    unmapped += 1;
                }
                Product {
                    product_id: p.product_id.clone(),
                    category,
                }
            })
            .collect();

        info!(
            "Translated {} product categories ({} without an English label)",
            translated.len(),
            unmapped
        );
        translated
    }
}
