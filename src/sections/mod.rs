use std::sync::OnceLock;

use regex::Regex;

use crate::config::{yn_on, SiteConfig};
use crate::render::{html_escape, normalize_media_path};
use crate::theme;

pub mod forms;
pub mod home2;
pub mod products;

/// Default home composition: hero, brand, bullet list, alternating
/// image/text blocks, carousel.
pub fn home_body(config: &SiteConfig) -> String {
    [
        hero(config),
        brand(config),
        bulleted_list(config),
        image_text_blocks(config),
        carousel(config),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Hero banner. The image source falls back from `home.hero` to
/// `home.banner` to a stock asset, so the section practically always
/// renders. Overlay custom properties are written straight onto the
/// section element — the one builder with a styling side channel.
pub fn hero(config: &SiteConfig) -> Option<String> {
    let home = &config.home;
    let styles = &config.site.styles.home;

    let (src, alt) = home
        .hero
        .as_ref()
        .and_then(|h| h.image.clone().map(|img| (img, h.alt.clone())))
        .or_else(|| {
            home.banner
                .as_ref()
                .and_then(|b| b.image.clone().map(|img| (img, b.alt.clone())))
        })
        .unwrap_or_else(|| {
            (
                "/static/images/header-banner.jpg".to_string(),
                Some("Homepage banner".to_string()),
            )
        });

    let mut img_style = String::new();
    if let Some(h) = styles.hero_height.as_ref().and_then(|v| v.css_px()) {
        img_style.push_str(&format!("height:{};", h));
    }
    img_style.push_str(&format!(
        "object-fit:{};object-position:left top;",
        hero_object_fit(config)
    ));

    let mut inner = format!(
        r#"<img src="{}" alt="{}" style="{}">"#,
        html_escape(&normalize_media_path(&src)),
        html_escape(alt.as_deref().unwrap_or("Homepage banner")),
        img_style
    );

    // Centered text lines above the overlay
    let lines: String = [&styles.hero_text1, &styles.hero_text2]
        .into_iter()
        .filter_map(|part| {
            let text = part.text.as_deref()?;
            let mut style = String::new();
            if let Some(size) = &part.font_size {
                style.push_str(&format!("font-size:{};", size));
            }
            if let Some(color) = &part.color {
                style.push_str(&format!("color:{};", color));
            }
            if yn_on(part.bold) {
                style.push_str("font-weight:700;");
            }
            if yn_on(part.italic) {
                style.push_str("font-style:italic;");
            }
            Some(format!(
                r#"<div style="{}">{}</div>"#,
                style,
                html_escape(text)
            ))
        })
        .collect();
    if !lines.is_empty() {
        inner.push_str(&format!(
            r#"<div class="hero-text"><div class="hero-text-inner">{}</div></div>"#,
            lines
        ));
    }

    // Tint layer; reads the overlay custom properties, so the forced-off
    // values win here too
    if styles.hero_overlay_enabled.is_on() && styles.hero_overlay_opacity.unwrap_or(0.0) > 0.0 {
        inner.push_str(r#"<div class="hero-overlay"></div>"#);
    }

    Some(format!(
        r#"<section class="home-hero" style="{}">{}</section>"#,
        theme::hero_overlay_inline(config),
        inner
    ))
}

/// Map the hero scaling flags to a CSS object-fit keyword.
fn hero_object_fit(config: &SiteConfig) -> &'static str {
    let styles = &config.site.styles.home;
    if !styles.hero_scale.is_on() {
        return "none";
    }
    if !styles.hero_maintain_aspect.is_on() {
        return "fill";
    }
    match styles
        .hero_fit
        .as_deref()
        .unwrap_or("cover")
        .to_lowercase()
        .as_str()
    {
        "fit" | "contain" => "contain",
        "stretch" | "fill" => "fill",
        "none" => "none",
        "scale-down" | "scaledown" => "scale-down",
        _ => "cover",
    }
}

/// Brand block: title, text, optional call-to-action.
pub fn brand(config: &SiteConfig) -> Option<String> {
    let brand = &config.home.brand_section;
    if !brand.visible.is_on() {
        return None;
    }
    let title_raw = brand.title.as_deref().or(config.site.title.as_deref());
    if title_raw.is_none() && brand.text.is_none() {
        return None;
    }

    let mut html = String::from(r#"<section class="home-brand">"#);
    if let Some(title) = title_raw {
        html.push_str(&format!(
            r#"<h1 class="brand-title">{}</h1>"#,
            html_escape(first_title_line(title))
        ));
    }
    if let Some(text) = &brand.text {
        html.push_str(&format!("<p>{}</p>", html_escape(text)));
    }
    if let Some(cta) = &brand.cta {
        if yn_on(cta.visible) {
            if let Some(text) = &cta.text {
                html.push_str(&format!(
                    r#"<button class="btn btn-primary">{}</button>"#,
                    html_escape(text)
                ));
            }
        }
    }
    html.push_str("</section>");
    Some(html)
}

/// Multi-line titles keep only their first line in the brand heading.
fn first_title_line(title: &str) -> &str {
    static BR_RE: OnceLock<Regex> = OnceLock::new();
    let re = BR_RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?").expect("valid br regex"));
    re.split(title).next().unwrap_or(title)
}

pub fn bulleted_list(config: &SiteConfig) -> Option<String> {
    let list = &config.home.bulleted_list;
    if !list.visible.is_on() || list.items.is_empty() {
        return None;
    }
    let items: String = list
        .items
        .iter()
        .map(|item| format!("<li>{}</li>", html_escape(item)))
        .collect();
    Some(format!(
        r#"<section class="home-bullets"><ul>{}</ul></section>"#,
        items
    ))
}

/// Alternating image/text rows, at most ten.
pub fn image_text_blocks(config: &SiteConfig) -> Option<String> {
    let blocks = &config.home.image_text_blocks;
    if !blocks.visible.is_on() || blocks.items.is_empty() {
        return None;
    }

    let rows: String = blocks
        .items
        .iter()
        .take(10)
        .map(|blk| {
            let pos = blk.alignment();
            let side = if pos.contains("right") {
                "image-right"
            } else {
                "image-left"
            };
            let top = if pos.contains("top") { " top-align" } else { "" };

            let mut img_style = String::new();
            if let Some(w) = blk.width.as_ref().and_then(|v| v.css_size()) {
                img_style.push_str(&format!("width:{};", w));
            }
            if let Some(h) = blk.height.as_ref().and_then(|v| v.css_px()) {
                img_style.push_str(&format!("height:{};", h));
            }

            let text = blk
                .text
                .as_deref()
                .map(|t| format!("<p>{}</p>", html_escape(t)))
                .unwrap_or_default();

            format!(
                r#"<div class="alt-row {side}{top}"><img src="{src}" alt="{alt}" style="{img_style}"><div class="alt-text"><h3>{title}</h3>{text}</div></div>"#,
                side = side,
                top = top,
                src = html_escape(blk.image.as_deref().unwrap_or("")),
                alt = html_escape(blk.title.as_deref().unwrap_or("")),
                img_style = img_style,
                title = html_escape(blk.title.as_deref().unwrap_or("")),
                text = text,
            )
        })
        .collect();

    Some(format!(
        r#"<section class="home-alt-blocks">{}</section>"#,
        rows
    ))
}

/// Media carousel, at most fifteen cards. Autoplaying videos loop muted;
/// the embedded carousel script pauses them while mostly off-screen.
pub fn carousel(config: &SiteConfig) -> Option<String> {
    let carousel = &config.home.carousel;
    if !carousel.visible.is_on() || carousel.items.is_empty() {
        return None;
    }

    let height = carousel.media_height.as_ref().and_then(|v| v.css_px());
    let width = carousel.media_width.as_ref().and_then(|v| v.css_size());
    let mut media_style = String::new();
    if let Some(h) = &height {
        media_style.push_str(&format!("height:{};", h));
    }
    if let Some(w) = &width {
        media_style.push_str(&format!("width:{};", w));
    }

    let cards: String = carousel
        .items
        .iter()
        .take(15)
        .map(|item| {
            let media = if item.is_video() {
                let poster = item
                    .poster
                    .as_deref()
                    .map(|p| format!(r#" poster="{}""#, html_escape(&normalize_media_path(p))))
                    .unwrap_or_default();
                let autoplay = if item.autoplay {
                    let muted = if item.effective_muted() { " muted" } else { "" };
                    format!(" autoplay{} loop", muted)
                } else {
                    String::new()
                };
                format!(
                    r#"<video controls{}{} src="{}" style="{}"></video>"#,
                    autoplay,
                    poster,
                    html_escape(&normalize_media_path(item.source())),
                    media_style
                )
            } else {
                format!(
                    r#"<img src="{}" alt="{}" style="{}">"#,
                    html_escape(&normalize_media_path(item.source())),
                    html_escape(item.text.as_deref().unwrap_or("")),
                    media_style
                )
            };

            let text = item
                .text
                .as_deref()
                .map(|t| format!(r#"<div class="carousel-text">{}</div>"#, html_escape(t)))
                .unwrap_or_default();
            let link = item
                .link
                .as_deref()
                .map(|l| {
                    format!(
                        r#"<a class="carousel-link" href="{}">Learn more</a>"#,
                        html_escape(l)
                    )
                })
                .unwrap_or_default();

            format!(
                r#"<div class="carousel-card">{}{}{}</div>"#,
                media, text, link
            )
        })
        .collect();

    Some(format!(
        r#"<section class="home-carousel"><div class="carousel-track">{}</div></section>"#,
        cards
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::YnFlag;

    fn config_from(json: &str) -> SiteConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn hero_falls_back_from_hero_to_banner_to_default() {
        let cfg = config_from(r#"{"home":{"hero":{"image":"h.jpg"},"banner":{"image":"b.jpg"}}}"#);
        assert!(hero(&cfg).unwrap().contains("h.jpg"));

        let cfg = config_from(r#"{"home":{"banner":{"image":"b.jpg"}}}"#);
        assert!(hero(&cfg).unwrap().contains("b.jpg"));

        let cfg = config_from("{}");
        assert!(hero(&cfg).unwrap().contains("/static/images/header-banner.jpg"));
    }

    #[test]
    fn hero_object_fit_honors_scaling_flags() {
        let mut cfg = SiteConfig::default();
        assert_eq!(hero_object_fit(&cfg), "cover");
        cfg.site.styles.home.hero_fit = Some("stretch".to_string());
        assert_eq!(hero_object_fit(&cfg), "fill");
        cfg.site.styles.home.hero_maintain_aspect = YnFlag(false);
        assert_eq!(hero_object_fit(&cfg), "fill");
        cfg.site.styles.home.hero_scale = YnFlag(false);
        assert_eq!(hero_object_fit(&cfg), "none");
    }

    #[test]
    fn hero_text_lines_carry_their_own_styling() {
        let cfg = config_from(
            r#"{"site":{"styles":{"home":{"heroText1":{"text":"Big","fontSize":"42px","bold":"Y"},"heroText2":{"text":"Small","italic":"Y"}}}}}"#,
        );
        let html = hero(&cfg).unwrap();
        assert!(html.contains("font-size:42px;"));
        assert!(html.contains("font-weight:700;"));
        assert!(html.contains("font-style:italic;"));
        assert!(html.contains("Big"));
        assert!(html.contains("Small"));
    }

    #[test]
    fn brand_hides_when_not_visible() {
        let cfg = config_from(r#"{"home":{"brandSection":{"visible":"N","title":"Acme"}}}"#);
        assert!(brand(&cfg).is_none());
    }

    #[test]
    fn brand_title_keeps_first_line_only() {
        let cfg =
            config_from(r#"{"home":{"brandSection":{"title":"Acme Forge<br/>Est. 1901"}}}"#);
        let html = brand(&cfg).unwrap();
        assert!(html.contains("Acme Forge"));
        assert!(!html.contains("1901"));
    }

    #[test]
    fn brand_cta_requires_visible_flag() {
        let cfg = config_from(
            r#"{"home":{"brandSection":{"title":"Acme","cta":{"text":"Shop now"}}}}"#,
        );
        assert!(!brand(&cfg).unwrap().contains("Shop now"));
        let cfg = config_from(
            r#"{"home":{"brandSection":{"title":"Acme","cta":{"visible":"Y","text":"Shop now"}}}}"#,
        );
        assert!(brand(&cfg).unwrap().contains("Shop now"));
    }

    #[test]
    fn empty_sections_render_nothing() {
        let cfg = SiteConfig::default();
        assert!(bulleted_list(&cfg).is_none());
        assert!(image_text_blocks(&cfg).is_none());
        assert!(carousel(&cfg).is_none());
    }

    #[test]
    fn image_text_blocks_cap_at_ten() {
        let items: Vec<String> = (0..14)
            .map(|i| format!(r#"{{"image":"i{}.jpg","title":"Block {}"}}"#, i, i))
            .collect();
        let cfg = config_from(&format!(
            r#"{{"home":{{"imageTextBlocks":{{"items":[{}]}}}}}}"#,
            items.join(",")
        ));
        let html = image_text_blocks(&cfg).unwrap();
        assert!(html.contains("Block 9"));
        assert!(!html.contains("Block 10"));
    }

    #[test]
    fn image_text_block_alignment_classes() {
        let cfg = config_from(
            r#"{"home":{"imageTextBlocks":{"items":[{"position":"right-top","image":"a.jpg"}]}}}"#,
        );
        let html = image_text_blocks(&cfg).unwrap();
        assert!(html.contains("image-right"));
        assert!(html.contains("top-align"));
    }

    #[test]
    fn carousel_caps_at_fifteen_and_loops_autoplay_muted() {
        let mut items: Vec<String> = (0..17).map(|i| format!(r#"{{"image":"c{}.jpg"}}"#, i)).collect();
        items[0] = r#"{"type":"video","src":"v.mp4","autoplay":true}"#.to_string();
        let cfg = config_from(&format!(
            r#"{{"home":{{"carousel":{{"items":[{}]}}}}}}"#,
            items.join(",")
        ));
        let html = carousel(&cfg).unwrap();
        assert!(html.contains("autoplay muted loop"));
        assert!(html.contains("c14.jpg"));
        assert!(!html.contains("c15.jpg"));
    }

    #[test]
    fn home_body_concatenates_visible_sections() {
        let cfg = config_from(
            r#"{"home":{"brandSection":{"title":"Acme"},"bulletedList":{"items":["Fast"]}}}"#,
        );
        let body = home_body(&cfg);
        assert!(body.contains("home-hero"));
        assert!(body.contains("home-brand"));
        assert!(body.contains("home-bullets"));
        assert!(!body.contains("home-carousel"));
    }
}
