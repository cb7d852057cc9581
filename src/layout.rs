use crate::config::SiteConfig;
use crate::sections;
use crate::store::Store;

/// Resolve an admin layout override for `page` into rendered content.
/// Returns `None` — sending the router to the default composition — when
/// no override exists or the override yields zero content blocks; a
/// malformed override is indistinguishable from an absent one (the Store
/// already collapses those). Rendering never fails on bad override data.
pub fn resolve(config: &SiteConfig, store: &dyn Store, page: &str) -> Option<String> {
    let blocks = store.layout_override(page)?;

    // Block mappings exist for the home page; other pages keep their
    // default composition even when an override entry names them.
    if page != "home" {
        return None;
    }

    let mut out = String::new();
    for block in &blocks {
        let key = block.data.key.as_str();
        let section = match block.block_type.to_lowercase().as_str() {
            // Header and footer build outside the content area
            "header" | "footer" => None,
            "image" if key == "hero" || key == "brand" => {
                sections::hero(config).or_else(|| sections::brand(config))
            }
            "image" if key == "imageTextBlocks" => sections::image_text_blocks(config),
            "image" if key == "carousel" => sections::carousel(config),
            "text" => sections::bulleted_list(config),
            _ => None,
        };
        if let Some(html) = section {
            out.push_str(&html);
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::test_store;
    use crate::store::{BlockData, LayoutBlock, LAYOUT_KEY};

    fn block(block_type: &str, key: &str) -> LayoutBlock {
        LayoutBlock {
            block_type: block_type.to_string(),
            data: BlockData {
                key: key.to_string(),
            },
        }
    }

    fn home_config() -> SiteConfig {
        serde_json::from_str(
            r#"{"home":{
                "brandSection":{"title":"Acme"},
                "bulletedList":{"items":["Fast","Reliable"]},
                "carousel":{"items":[{"image":"c.jpg"}]}
            }}"#,
        )
        .unwrap()
    }

    #[test]
    fn no_override_falls_through() {
        let store = test_store();
        assert!(resolve(&home_config(), &store, "home").is_none());
    }

    #[test]
    fn override_reorders_home_sections() {
        let store = test_store();
        store
            .layout_override_set(
                "home",
                &[
                    block("image", "carousel"),
                    block("text", ""),
                    block("image", "hero"),
                ],
            )
            .unwrap();
        let html = resolve(&home_config(), &store, "home").unwrap();
        let carousel = html.find("home-carousel").unwrap();
        let bullets = html.find("home-bullets").unwrap();
        let hero = html.find("home-hero").unwrap();
        assert!(carousel < bullets && bullets < hero);
    }

    #[test]
    fn header_and_footer_blocks_are_noops() {
        let store = test_store();
        store
            .layout_override_set("home", &[block("header", ""), block("footer", "")])
            .unwrap();
        // Only no-op blocks → zero content → default composition
        assert!(resolve(&home_config(), &store, "home").is_none());
    }

    #[test]
    fn empty_or_malformed_override_uses_defaults() {
        let store = test_store();
        store.kv_set(LAYOUT_KEY, r#"{"home":[]}"#).unwrap();
        assert!(resolve(&home_config(), &store, "home").is_none());
        store.kv_set(LAYOUT_KEY, r#"{"home":42}"#).unwrap();
        assert!(resolve(&home_config(), &store, "home").is_none());
        store.kv_set(LAYOUT_KEY, "garbage").unwrap();
        assert!(resolve(&home_config(), &store, "home").is_none());
    }

    #[test]
    fn other_pages_keep_default_composition() {
        let store = test_store();
        store
            .layout_override_set("products", &[block("image", "hero")])
            .unwrap();
        assert!(resolve(&home_config(), &store, "products").is_none());
    }
}
