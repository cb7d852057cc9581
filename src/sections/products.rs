use crate::config::{MediaItem, Product, SiteConfig};
use crate::gallery::{self, GalleryState};
use crate::render::{html_escape, normalize_media_path, strip_tags};

/// Case-insensitive substring search over the product's title, its
/// tag-stripped description, and its joined bullet text. An empty query
/// matches everything.
pub fn matches(product: &Product, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    let title = product.title.as_deref().unwrap_or("").to_lowercase();
    let desc = strip_tags(product.description_html.as_deref().unwrap_or("")).to_lowercase();
    let bullets = product.bullets.join(" ").to_lowercase();
    title.contains(&q) || desc.contains(&q) || bullets.contains(&q)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    Desktop,
    Mobile,
}

/// Which gallery items a thumbnail strip shows and what overflows.
/// Images render first; a single video slot renders last carrying a
/// `+N` badge for any further videos; overflowing images collapse into a
/// `+N` button that opens the gallery modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbPlan {
    pub image_indices: Vec<usize>,
    pub extra_images: usize,
    pub video_index: Option<usize>,
    pub extra_videos: usize,
    /// Small strips scroll instead of collapsing into overflow buttons.
    pub scrollable: bool,
}

const DESKTOP_SLOTS: usize = 7;
const MOBILE_IMAGE_SLOTS: usize = 4;

pub fn plan_thumbs(gallery: &[MediaItem], viewport: Viewport) -> ThumbPlan {
    let images: Vec<usize> = gallery
        .iter()
        .enumerate()
        .filter(|(_, it)| !it.is_video())
        .map(|(i, _)| i)
        .collect();
    let videos: Vec<usize> = gallery
        .iter()
        .enumerate()
        .filter(|(_, it)| it.is_video())
        .map(|(i, _)| i)
        .collect();
    let video_index = videos.first().copied();
    let extra_videos = videos.len().saturating_sub(1);

    // Small galleries show everything in a scrollable strip
    if !gallery.is_empty() && gallery.len() < DESKTOP_SLOTS {
        return ThumbPlan {
            image_indices: images,
            extra_images: 0,
            video_index,
            extra_videos,
            scrollable: true,
        };
    }

    let image_slots = match viewport {
        Viewport::Mobile => MOBILE_IMAGE_SLOTS,
        Viewport::Desktop => DESKTOP_SLOTS - if video_index.is_some() { 1 } else { 0 },
    };
    let shown = images.len().min(image_slots);
    ThumbPlan {
        extra_images: images.len() - shown,
        image_indices: images.into_iter().take(shown).collect(),
        video_index,
        extra_videos,
        scrollable: false,
    }
}

/// The products page: search box plus every matching visible product.
pub fn render(config: &SiteConfig, query: Option<&str>) -> String {
    let q = query.unwrap_or("");
    let mut html = String::from(r#"<section class="products-page">"#);

    html.push_str(&format!(
        r#"<form class="product-search" method="get" action="/products"><input type="search" name="q" value="{}" placeholder="Search products..." aria-label="Search products"><button class="btn" type="submit">Search</button></form>"#,
        html_escape(q)
    ));

    let blocks: Vec<String> = config
        .products
        .items
        .iter()
        .filter(|p| p.visible.is_on())
        .filter(|p| matches(p, q))
        .map(|p| render_product_block(p, config))
        .collect();

    if blocks.is_empty() {
        html.push_str(
            r#"<div class="products-list"><p class="text-muted">No products match your search.</p></div>"#,
        );
    } else {
        html.push_str(&format!(
            r#"<div class="products-list">{}</div>"#,
            blocks.concat()
        ));
    }

    html.push_str("</section>");
    html
}

fn render_product_block(product: &Product, config: &SiteConfig) -> String {
    let title = product.title.as_deref().unwrap_or("Product");
    let gallery_items = &product.gallery;

    let desktop_plan = plan_thumbs(gallery_items, Viewport::Desktop);
    let mobile_plan = plan_thumbs(gallery_items, Viewport::Mobile);

    // Initial main media: first planned image, else the video slot
    let initial_idx = desktop_plan
        .image_indices
        .first()
        .copied()
        .or(desktop_plan.video_index)
        .unwrap_or(0);

    let mut html = format!(
        r#"<section class="product-block" data-gallery='{}'>"#,
        gallery_json(gallery_items)
    );
    html.push_str(&format!(
        r#"<h2 class="product-title">{}</h2>"#,
        html_escape(title)
    ));
    if let Some(subtitle) = &product.subtitle {
        html.push_str(&format!(
            r#"<div class="product-subtitle">{}</div>"#,
            html_escape(subtitle)
        ));
    }

    html.push_str(r#"<div class="product-grid"><div class="product-gallery">"#);
    html.push_str(&render_thumb_strip(&desktop_plan, product, config, "thumbs thumbs-desktop"));
    html.push_str(&render_thumb_strip(&mobile_plan, product, config, "thumbs thumbs-mobile"));
    html.push_str(&render_main_media(gallery_items, initial_idx, title));
    html.push_str("</div>");

    // Right column: buy buttons, description, details
    html.push_str(r#"<div class="product-info">"#);
    let buttons: String = product
        .buy_buttons
        .iter()
        .take(4)
        .filter(|b| b.visible.is_on())
        .map(|b| {
            let icon = b
                .icon
                .as_deref()
                .map(|i| {
                    format!(
                        r#"<img class="btn-icon" src="{}" alt="{}"> "#,
                        html_escape(i),
                        html_escape(b.text.as_deref().unwrap_or("Buy"))
                    )
                })
                .unwrap_or_default();
            format!(
                r#"<a class="btn btn-primary" href="{}" target="_blank" rel="noopener">{}{}</a>"#,
                html_escape(b.url.as_deref().unwrap_or("#")),
                icon,
                html_escape(b.text.as_deref().unwrap_or("Buy"))
            )
        })
        .collect();
    if !buttons.is_empty() {
        html.push_str(&format!(r#"<div class="buy-buttons">{}</div>"#, buttons));
    }
    if let Some(desc) = &product.description_html {
        html.push_str(&format!(r#"<div class="product-desc">{}</div>"#, desc));
    }
    if let Some(details) = &product.details_html {
        html.push_str(&format!(r#"<div class="product-details">{}</div>"#, details));
    }
    html.push_str("</div></div>");

    if !product.bullets.is_empty() {
        let items: String = product
            .bullets
            .iter()
            .take(20)
            .map(|b| format!("<li>{}</li>", html_escape(b)))
            .collect();
        html.push_str(&format!(
            r#"<ul class="product-bullets-wide">{}</ul>"#,
            items
        ));
    }

    // Pre-rendered modal skeleton in its opening state
    let state = GalleryState::open(gallery_items, initial_idx);
    let info = modal_info_html(product);
    html.push_str(&gallery::render_modal(&state, title, &info));

    html.push_str("</section>");
    html
}

fn render_thumb_strip(
    plan: &ThumbPlan,
    product: &Product,
    config: &SiteConfig,
    class: &str,
) -> String {
    let thumb_w = config.products.thumbnail.width.unwrap_or(64);
    let thumb_h = config.products.thumbnail.height.unwrap_or(64);
    let gallery = &product.gallery;

    let scroll_style = if plan.scrollable {
        r#" style="overflow-x:auto""#
    } else {
        ""
    };
    let mut html = format!(r#"<div class="{}"{}>"#, class, scroll_style);

    for idx in &plan.image_indices {
        if let Some(item) = gallery.get(*idx) {
            html.push_str(&format!(
                r#"<button class="thumb" type="button" data-main-idx="{}"><img src="{}" width="{}" height="{}" loading="lazy" alt=""></button>"#,
                idx,
                html_escape(&normalize_media_path(item.source())),
                thumb_w,
                thumb_h
            ));
        }
    }

    if plan.extra_images > 0 {
        html.push_str(&format!(
            r#"<button class="thumb plus" type="button" data-more="+{n}" title="+{n} more images" data-open-gallery="0"></button>"#,
            n = plan.extra_images
        ));
    }

    if let Some(vid_idx) = plan.video_index {
        if let Some(item) = gallery.get(vid_idx) {
            let more = if plan.extra_videos > 0 {
                format!(
                    r#" data-more="+{n}" title="+{n} more videos""#,
                    n = plan.extra_videos
                )
            } else {
                String::new()
            };
            let inner = match &item.poster {
                Some(poster) => format!(
                    r#"<img src="{}" width="{}" height="{}" loading="lazy" alt="video">"#,
                    html_escape(&normalize_media_path(poster)),
                    thumb_w,
                    thumb_h
                ),
                None => r#"<span class="thumb-video">&#9658;</span>"#.to_string(),
            };
            html.push_str(&format!(
                r#"<button class="thumb video" type="button" data-main-idx="{}"{}>{}</button>"#,
                vid_idx, more, inner
            ));
        }
    }

    html.push_str("</div>");
    html
}

fn render_main_media(gallery: &[MediaItem], initial_idx: usize, title: &str) -> String {
    let initial = gallery.get(initial_idx);
    let is_video = initial.map(|it| it.is_video()).unwrap_or(false);

    let img_src = initial
        .filter(|_| !is_video)
        .map(|it| normalize_media_path(it.source()))
        .unwrap_or_default();
    let video_src = initial
        .filter(|_| is_video)
        .map(|it| normalize_media_path(it.source()))
        .unwrap_or_default();
    let poster = initial
        .filter(|_| is_video)
        .and_then(|it| it.poster.as_deref())
        .map(normalize_media_path)
        .unwrap_or_default();

    format!(
        r#"<div class="main-media" data-open-gallery="{idx}"><img class="main-image" src="{img}" alt="{alt}"{img_hide}><video class="main-video" controls playsinline src="{video}" poster="{poster}"{video_hide}></video><button class="media-enlarge btn" type="button" title="Fullscreen"{enlarge_hide}>&#x2922;</button></div>"#,
        idx = initial_idx,
        img = html_escape(&img_src),
        alt = html_escape(title),
        img_hide = if is_video { r#" style="display:none""# } else { "" },
        video = html_escape(&video_src),
        poster = html_escape(&poster),
        video_hide = if is_video { "" } else { r#" style="display:none""# },
        enlarge_hide = if is_video { "" } else { r#" style="display:none""# },
    )
}

/// Gallery item list serialized into the block's `data-gallery` attribute
/// (single-quoted, so the JSON's double quotes survive).
fn gallery_json(items: &[MediaItem]) -> String {
    let list: Vec<serde_json::Value> = items
        .iter()
        .map(|it| {
            serde_json::json!({
                "type": if it.is_video() { "video" } else { "image" },
                "src": normalize_media_path(it.source()),
                "poster": it.poster.as_deref().map(normalize_media_path),
            })
        })
        .collect();
    serde_json::Value::Array(list)
        .to_string()
        .replace('&', "&amp;")
        .replace('\'', "&#39;")
        .replace('<', "&lt;")
}

/// Modal side panel: the description when present, else the bullets.
fn modal_info_html(product: &Product) -> String {
    match product.description_html.as_deref() {
        Some(desc) if !desc.trim().is_empty() => {
            format!(r#"<div class="gm-rich">{}</div>"#, desc)
        }
        _ if !product.bullets.is_empty() => {
            let items: String = product
                .bullets
                .iter()
                .map(|b| format!("<li>{}</li>", html_escape(b)))
                .collect();
            format!(r#"<ul class="gm-bullets">{}</ul>"#, items)
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_from(json: &str) -> Product {
        serde_json::from_str(json).unwrap()
    }

    fn gallery_of(images: usize, videos: usize) -> Vec<MediaItem> {
        let mut items = Vec::new();
        for i in 0..images {
            items.push(serde_json::from_str(&format!(r#"{{"src":"i{}.jpg"}}"#, i)).unwrap());
        }
        for i in 0..videos {
            items.push(
                serde_json::from_str(&format!(r#"{{"type":"video","src":"v{}.mp4"}}"#, i))
                    .unwrap(),
            );
        }
        items
    }

    #[test]
    fn search_matches_bullet_only_terms() {
        let p = product_from(
            r#"{"title":"Anvil","descriptionHtml":"<p>Cast iron</p>","bullets":["Lifetime warranty"]}"#,
        );
        assert!(matches(&p, "warranty"));
        assert!(matches(&p, "WARRANTY"));
        assert!(matches(&p, "anvil"));
        assert!(matches(&p, "cast"));
        assert!(!matches(&p, "plastic"));
        assert!(matches(&p, ""));
    }

    #[test]
    fn search_ignores_description_markup() {
        let p = product_from(r#"{"title":"T","descriptionHtml":"<div class=\"spec\">x</div>"}"#);
        assert!(!matches(&p, "spec"));
    }

    #[test]
    fn small_galleries_show_everything_scrollable() {
        let plan = plan_thumbs(&gallery_of(3, 2), Viewport::Desktop);
        assert!(plan.scrollable);
        assert_eq!(plan.image_indices, vec![0, 1, 2]);
        assert_eq!(plan.extra_images, 0);
        assert_eq!(plan.video_index, Some(3));
        assert_eq!(plan.extra_videos, 1);
    }

    #[test]
    fn desktop_plan_reserves_a_video_slot() {
        let plan = plan_thumbs(&gallery_of(10, 2), Viewport::Desktop);
        assert!(!plan.scrollable);
        assert_eq!(plan.image_indices.len(), 6); // 7 slots minus the video
        assert_eq!(plan.extra_images, 4);
        assert_eq!(plan.video_index, Some(10));
        assert_eq!(plan.extra_videos, 1);
    }

    #[test]
    fn desktop_plan_without_videos_uses_all_slots() {
        let plan = plan_thumbs(&gallery_of(10, 0), Viewport::Desktop);
        assert_eq!(plan.image_indices.len(), 7);
        assert_eq!(plan.extra_images, 3);
        assert!(plan.video_index.is_none());
    }

    #[test]
    fn mobile_plan_fixes_four_image_slots() {
        let plan = plan_thumbs(&gallery_of(9, 1), Viewport::Mobile);
        assert_eq!(plan.image_indices.len(), 4);
        assert_eq!(plan.extra_images, 5);
        assert_eq!(plan.video_index, Some(9));
    }

    #[test]
    fn empty_gallery_plans_nothing() {
        let plan = plan_thumbs(&[], Viewport::Desktop);
        assert!(plan.image_indices.is_empty());
        assert!(plan.video_index.is_none());
        assert!(!plan.scrollable);
    }

    #[test]
    fn hidden_products_never_render() {
        let config: SiteConfig = serde_json::from_str(
            r#"{"products":{"items":[
                {"title":"Shown"},
                {"title":"Ghost","visible":"N"}
            ]}}"#,
        )
        .unwrap();
        let html = render(&config, None);
        assert!(html.contains("Shown"));
        assert!(!html.contains("Ghost"));
    }

    #[test]
    fn unmatched_search_reports_no_products() {
        let config: SiteConfig =
            serde_json::from_str(r#"{"products":{"items":[{"title":"Anvil"}]}}"#).unwrap();
        let html = render(&config, Some("zzz"));
        assert!(html.contains("No products match your search."));
        // The query survives in the search box
        assert!(html.contains(r#"value="zzz""#));
    }

    #[test]
    fn overflow_button_carries_the_extra_count() {
        let config: SiteConfig = serde_json::from_str(&format!(
            r#"{{"products":{{"items":[{{"title":"Big","gallery":[{}]}}]}}}}"#,
            (0..12)
                .map(|i| format!(r#"{{"src":"g{}.jpg"}}"#, i))
                .collect::<Vec<_>>()
                .join(",")
        ))
        .unwrap();
        let html = render(&config, None);
        assert!(html.contains(r#"data-more="+5""#)); // desktop: 12 - 7
        assert!(html.contains(r#"data-more="+8""#)); // mobile: 12 - 4
    }

    #[test]
    fn product_block_embeds_modal_and_gallery_data() {
        let config: SiteConfig = serde_json::from_str(
            r#"{"products":{"items":[{"title":"Anvil","gallery":[{"src":"a.jpg"},{"type":"video","src":"/videos/v.mp4"}],"bullets":["Heavy"]}]}}"#,
        )
        .unwrap();
        let html = render(&config, None);
        assert!(html.contains("gallery-modal"));
        assert!(html.contains("data-gallery="));
        // Legacy video path normalized inside the embedded JSON
        assert!(html.contains("/video/v.mp4"));
        assert!(html.contains("Image 1 of 1"));
    }
}
