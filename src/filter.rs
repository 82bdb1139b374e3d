//! # Filter engine
//!
//! Projects the displayed subset out of the full inventory list. Four
//! independent fields, all conjunctive: substring on name, description and
//! vendor (case-insensitive, empty pattern matches everything) plus a
//! minimum-quantity threshold. The projection is pure and order-preserving.

use serde::{Deserialize, Deserializer};

use crate::inventory::InventoryItem;

/// Per-request filter fields. Defaults (empty substrings, threshold 0)
/// match every item.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub name: String,
    pub description: String,
    pub vendor: String,
    #[serde(deserialize_with = "lenient_min_quantity")]
    pub min_quantity: u32,
}

/// Malformed numeric input falls back to the all-matching threshold 0
/// instead of rejecting the request; fractional input floors.
fn lenient_min_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    Ok(raw.trim().parse::<f64>().map_or(0, |f| {
        if f.is_finite() && f > 0.0 {
            f.floor() as u32
        } else {
            0
        }
    }))
}

/// The ordered sub-sequence of `items` matching every filter field. Never
/// mutates its input; identical inputs yield identical output.
pub fn filter_items(items: &[InventoryItem], filter: &FilterState) -> Vec<InventoryItem> {
    let name = filter.name.to_lowercase();
    let description = filter.description.to_lowercase();
    let vendor = filter.vendor.to_lowercase();

    items
        .iter()
        .filter(|item| {
            item.name.to_lowercase().contains(&name)
                && item.description.to_lowercase().contains(&description)
                && item.vendor.to_lowercase().contains(&vendor)
                && item.quantity >= filter.min_quantity
        })
        .cloned()
        .collect()
}
