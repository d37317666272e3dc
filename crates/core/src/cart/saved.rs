//! Saved carts

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::cart::line_item::StoredLineItem;

/// Snapshot of a cart put aside for later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCart {
    /// Epoch milliseconds at save time
    pub id: i64,

    /// Line items at save time
    pub items: Vec<StoredLineItem>,

    /// Save time
    pub date: Timestamp,

    /// Display name ("Saved Cart N")
    pub name: String,
}

impl SavedCart {
    /// Snapshot `items`, naming the cart after its position in the saved list.
    #[must_use]
    pub fn new(items: Vec<StoredLineItem>, now: Timestamp, position: usize) -> Self {
        Self {
            id: now.as_millisecond(),
            items,
            date: now,
            name: format!("Saved Cart {position}"),
        }
    }

    /// Total number of units across the saved lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_derives_id_from_timestamp() -> TestResult {
        let now: Timestamp = "2024-03-01T12:00:00Z".parse()?;

        let saved = SavedCart::new(Vec::new(), now, 2);

        assert_eq!(saved.id, 1_709_294_400_000);
        assert_eq!(saved.name, "Saved Cart 2");

        Ok(())
    }

    #[test]
    fn date_serializes_as_iso_8601() -> TestResult {
        let now: Timestamp = "2024-03-01T12:00:00Z".parse()?;

        let json = serde_json::to_value(SavedCart::new(Vec::new(), now, 1))?;

        assert_eq!(json["date"], "2024-03-01T12:00:00Z");
        assert_eq!(json["name"], "Saved Cart 1");

        Ok(())
    }
}
