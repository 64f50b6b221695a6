//! Owned-but-unequipped parts stored as an open-ended JSON blob.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::listing::ItemKind;

/// Player inventory grouped into buckets by item kind.
///
/// Item payloads are opaque; the backend only appends and counts them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub engines: Vec<Value>,
    pub turbos: Vec<Value>,
    pub suspensions: Vec<Value>,
    pub subwoofers: Vec<Value>,
    pub body_kits: Vec<Value>,
    pub cars: Vec<Value>,
    pub misc: Vec<Value>,
}

impl Inventory {
    /// Append an item to the bucket matching `kind`.
    pub fn push(&mut self, kind: ItemKind, item: Value) {
        self.bucket_mut(kind).push(item);
    }

    /// Items held in the bucket for `kind`.
    #[must_use]
    pub fn bucket(&self, kind: ItemKind) -> &[Value] {
        match kind {
            ItemKind::Engine => &self.engines,
            ItemKind::Turbo => &self.turbos,
            ItemKind::Suspension => &self.suspensions,
            ItemKind::Subwoofer => &self.subwoofers,
            ItemKind::BodyKit => &self.body_kits,
            ItemKind::Car => &self.cars,
            ItemKind::Other => &self.misc,
        }
    }

    /// Total number of items across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        ItemKind::ALL.iter().map(|kind| self.bucket(*kind).len()).sum()
    }

    /// Whether every bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bucket_mut(&mut self, kind: ItemKind) -> &mut Vec<Value> {
        match kind {
            ItemKind::Engine => &mut self.engines,
            ItemKind::Turbo => &mut self.turbos,
            ItemKind::Suspension => &mut self.suspensions,
            ItemKind::Subwoofer => &mut self.subwoofers,
            ItemKind::BodyKit => &mut self.body_kits,
            ItemKind::Car => &mut self.cars,
            ItemKind::Other => &mut self.misc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn push_targets_matching_bucket() {
        let mut inventory = Inventory::default();
        inventory.push(ItemKind::Turbo, json!({ "level": 2 }));
        inventory.push(ItemKind::Car, json!({ "name": "Lada" }));

        assert_eq!(inventory.bucket(ItemKind::Turbo), &[json!({ "level": 2 })]);
        assert_eq!(inventory.bucket(ItemKind::Car).len(), 1);
        assert_eq!(inventory.len(), 2);
    }

    #[rstest]
    fn deserialises_legacy_blob_without_newer_buckets() {
        let inventory: Inventory = serde_json::from_value(json!({
            "engines": [],
            "turbos": [{ "level": 1 }],
            "suspensions": [],
            "subwoofers": [],
            "body_kits": []
        }))
        .expect("legacy inventory parses");

        assert_eq!(inventory.turbos.len(), 1);
        assert!(inventory.cars.is_empty());
        assert!(inventory.misc.is_empty());
    }
}
