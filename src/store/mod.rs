use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod sqlite;

/// Storage key for admin-authored page layout overrides.
pub const LAYOUT_KEY: &str = "admin.__layout";

/// Storage key for the submitted-testimonials list.
pub const TESTIMONIALS_KEY: &str = "sb_testimonials";

/// One block descriptor of a page layout override. Unknown fields are
/// tolerated; missing ones default to empty so any object parses.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LayoutBlock {
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default)]
    pub data: BlockData,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BlockData {
    #[serde(default)]
    pub key: String,
}

/// A submitted testimonial. The form fields are configuration-driven, so
/// everything beyond the date travels as a flat name → value map.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TestimonialEntry {
    #[serde(default)]
    pub date: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl TestimonialEntry {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }
}

/// Minimal key/value persistence capability. The site keeps two records
/// here (layout overrides and testimonials); any backend that can store
/// strings under keys can stand in.
pub trait Store: Send + Sync {
    fn run_migrations(&self) -> Result<(), String>;

    fn kv_get(&self, key: &str) -> Option<String>;
    fn kv_set(&self, key: &str, value: &str) -> Result<(), String>;
    fn kv_delete(&self, key: &str) -> Result<(), String>;

    /// Layout override for one page, or `None` when absent, malformed, or
    /// empty — a bad override must never break rendering.
    fn layout_override(&self, page: &str) -> Option<Vec<LayoutBlock>> {
        let raw = self.kv_get(LAYOUT_KEY)?;
        let all: Value = serde_json::from_str(&raw).ok()?;
        let arr = all.get(page.to_lowercase())?.as_array()?;
        if arr.is_empty() {
            return None;
        }
        let blocks: Vec<LayoutBlock> = arr
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect();
        if blocks.is_empty() {
            None
        } else {
            Some(blocks)
        }
    }

    /// Replace the override list for one page, preserving other pages.
    fn layout_override_set(&self, page: &str, blocks: &[LayoutBlock]) -> Result<(), String> {
        let mut all: Value = self
            .kv_get(LAYOUT_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_else(|| Value::Object(Default::default()));
        if !all.is_object() {
            all = Value::Object(Default::default());
        }
        let entry = serde_json::to_value(blocks).map_err(|e| e.to_string())?;
        all.as_object_mut()
            .expect("layout map is an object")
            .insert(page.to_lowercase(), entry);
        self.kv_set(LAYOUT_KEY, &all.to_string())
    }

    /// All stored testimonials, newest first. Malformed data reads as empty.
    fn testimonials(&self) -> Vec<TestimonialEntry> {
        self.kv_get(TESTIMONIALS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Prepend a testimonial (newest first, append-only list).
    fn testimonial_add(&self, entry: &TestimonialEntry) -> Result<(), String> {
        let mut items = self.testimonials();
        items.insert(0, entry.clone());
        let raw = serde_json::to_string(&items).map_err(|e| e.to_string())?;
        self.kv_set(TESTIMONIALS_KEY, &raw)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::store::sqlite::SqliteStore;

    /// Fresh in-memory store with migrations applied.
    pub fn test_store() -> SqliteStore {
        let manager = r2d2_sqlite::SqliteConnectionManager::memory();
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .build(manager)
            .expect("Failed to create in-memory pool");
        let store = SqliteStore::new(pool);
        store.run_migrations().expect("migrations failed");
        store
    }

    #[test]
    fn kv_roundtrip() {
        let s = test_store();
        assert!(s.kv_get("missing").is_none());
        s.kv_set("k", "v1").unwrap();
        assert_eq!(s.kv_get("k"), Some("v1".to_string()));
        s.kv_set("k", "v2").unwrap();
        assert_eq!(s.kv_get("k"), Some("v2".to_string()));
        s.kv_delete("k").unwrap();
        assert!(s.kv_get("k").is_none());
    }

    #[test]
    fn layout_override_roundtrip() {
        let s = test_store();
        let blocks = vec![
            LayoutBlock {
                block_type: "image".into(),
                data: BlockData { key: "hero".into() },
            },
            LayoutBlock {
                block_type: "text".into(),
                data: BlockData { key: String::new() },
            },
        ];
        s.layout_override_set("Home", &blocks).unwrap();
        let loaded = s.layout_override("home").expect("override present");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].data.key, "hero");
        // Other pages untouched
        assert!(s.layout_override("products").is_none());
    }

    #[test]
    fn malformed_layout_override_reads_as_absent() {
        let s = test_store();
        s.kv_set(LAYOUT_KEY, "not json at all").unwrap();
        assert!(s.layout_override("home").is_none());

        s.kv_set(LAYOUT_KEY, r#"{"home": "not an array"}"#).unwrap();
        assert!(s.layout_override("home").is_none());

        s.kv_set(LAYOUT_KEY, r#"{"home": []}"#).unwrap();
        assert!(s.layout_override("home").is_none());
    }

    #[test]
    fn testimonials_newest_first() {
        let s = test_store();
        assert!(s.testimonials().is_empty());

        let mut first = TestimonialEntry::default();
        first.date = "Jan 01, 2026".into();
        first.fields.insert("name".into(), "Alice".into());
        s.testimonial_add(&first).unwrap();

        let mut second = TestimonialEntry::default();
        second.date = "Feb 01, 2026".into();
        second.fields.insert("name".into(), "Bob".into());
        s.testimonial_add(&second).unwrap();

        let all = s.testimonials();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].field("name"), "Bob");
        assert_eq!(all[1].field("name"), "Alice");
    }

    #[test]
    fn malformed_testimonials_read_as_empty() {
        let s = test_store();
        s.kv_set(TESTIMONIALS_KEY, "{broken").unwrap();
        assert!(s.testimonials().is_empty());
    }
}
