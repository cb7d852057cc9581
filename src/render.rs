use std::sync::OnceLock;

use regex::Regex;

use crate::config::{yn_on, SiteConfig};
use crate::layout;
use crate::router;
use crate::sections;
use crate::site::SiteContext;
use crate::store::Store;
use crate::theme;

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Legacy media URLs use `/videos/`; the served tree uses `/video/`.
pub fn normalize_media_path(url: &str) -> String {
    if url.contains("/videos/") {
        url.replace("/videos/", "/video/")
    } else {
        url.to_string()
    }
}

/// Reduce an HTML fragment to its text for search matching.
pub fn strip_tags(html: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
    re.replace_all(html, " ").to_string()
}

pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !c.is_alphanumeric();
    }
    out
}

/// Render a full page. `page` must already be resolved by the router;
/// `query` carries the products search term; `flash` carries a
/// success/error banner for the contact page.
pub fn render_page(
    ctx: &SiteContext,
    store: &dyn Store,
    page: &str,
    query: Option<&str>,
    flash: Option<(&str, &str)>,
) -> String {
    ctx.count_render();
    let config = &ctx.config;

    // Admin layout override wins when it yields content
    let body = match layout::resolve(config, store, page) {
        Some(html) => html,
        None => default_body(config, store, page, query, flash),
    };

    let title = match config.site.title.as_deref() {
        Some(site_title) if page == "home" => site_title.to_string(),
        Some(site_title) => format!("{} — {}", site_title, title_case(page)),
        None => title_case(page),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css_vars}
{base_css}
    </style>
</head>
<body{body_attrs}>
    <header id="site-header">{header}
        <nav id="primary-navigation" aria-label="Primary">
            <button class="mobile-menu-toggle" aria-expanded="false" aria-label="Menu">&#9776;</button>
            <ul class="nav-menu">{nav}</ul>
        </nav>
    </header>
    {breadcrumbs}
    <main id="main-content" tabindex="-1" autofocus>{body}</main>
    <footer id="site-footer">{footer}</footer>
    <script>{site_js}</script>
    <script>{carousel_js}</script>
    <script>{gallery_js}</script>
</body>
</html>"#,
        title = html_escape(&title),
        body_attrs = body_attrs(config),
        css_vars = theme::build_css_variables(config),
        base_css = BASE_CSS,
        header = build_header(config),
        nav = build_nav(config, page),
        breadcrumbs = build_breadcrumbs(config, page),
        body = body,
        footer = build_footer(config),
        site_js = SITE_JS,
        carousel_js = CAROUSEL_JS,
        gallery_js = GALLERY_JS,
    )
}

/// Desktop product thumbnails can be moved below the main media.
fn body_attrs(config: &SiteConfig) -> String {
    match config.products.desktop_thumbs.as_deref() {
        Some(pos) if pos.eq_ignore_ascii_case("bottom") => {
            r#" data-desktop-thumbs="bottom""#.to_string()
        }
        _ => String::new(),
    }
}

/// Default section composition per page (used when no layout override
/// applies).
fn default_body(
    config: &SiteConfig,
    store: &dyn Store,
    page: &str,
    query: Option<&str>,
    flash: Option<(&str, &str)>,
) -> String {
    match page {
        "home2" => sections::home2::render(config),
        "products" => sections::products::render(config, query),
        "contact" => sections::forms::contact_page(config, flash),
        "testimonials" => sections::forms::testimonials_page(config, store),
        _ => sections::home_body(config),
    }
}

// ── Header ──────────────────────────────────────────────────

fn build_header(config: &SiteConfig) -> String {
    let header = &config.header;
    let mut html = String::new();

    let logo_src = header.logo.as_deref().unwrap_or("/static/images/logo.png");
    let logo_alt = config.site.title.as_deref().unwrap_or("Logo");
    html.push_str(&format!(
        r#"<a class="site-logo-link" href="/home"><img id="site-logo" src="{}" alt="{}"></a>"#,
        html_escape(logo_src),
        html_escape(logo_alt)
    ));

    // Contact strip, rendered twice: top row for mobile, bottom for desktop
    let strip = contact_strip(config);
    if !strip.is_empty() {
        html.push_str(&format!(
            r#"<div class="header-contact header-contact-top">{strip}</div><div class="header-contact header-contact-bottom">{strip}</div>"#,
        ));
    }

    if let Some(banner) = &header.banner {
        let alt = config
            .site
            .title
            .as_deref()
            .map(|t| format!("{} banner", t))
            .unwrap_or_else(|| "Banner".to_string());
        html.push_str(&format!(
            r#"<img class="header-banner" src="{}" alt="{}">"#,
            html_escape(banner),
            html_escape(&alt)
        ));
    }

    html
}

/// Email/phone rows for the header. Unlike the contact card, absent
/// visibility flags hide these.
fn contact_strip(config: &SiteConfig) -> String {
    let contact = &config.contact;
    let card = contact.card.as_ref();

    let email = card
        .and_then(|c| c.email.as_deref())
        .or_else(|| contact.email_recipients.first().map(String::as_str))
        .unwrap_or("");
    let phone = card.and_then(|c| c.phone.as_deref()).unwrap_or("");
    let email_visible = card
        .and_then(|c| c.email_visible)
        .map(|f| f.is_on())
        .unwrap_or(false);
    let phone_visible = card
        .and_then(|c| c.phone_visible)
        .map(|f| f.is_on())
        .unwrap_or(false);

    let mut parts = Vec::new();
    if email_visible && !email.is_empty() {
        parts.push(format!(
            r#"<span><a href="mailto:{0}">{0}</a></span>"#,
            html_escape(email)
        ));
    }
    if phone_visible && !phone.is_empty() {
        let tel: String = phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        parts.push(format!(
            r#"<span><a href="tel:{}">{}</a></span>"#,
            html_escape(&tel),
            html_escape(phone)
        ));
    }
    parts.join(" ")
}

// ── Navigation ──────────────────────────────────────────────

fn build_nav(config: &SiteConfig, active_page: &str) -> String {
    let configured = &config.header.menu;

    let items: Vec<(String, String)> = if !configured.is_empty() {
        configured
            .iter()
            .filter(|m| m.visible.is_on())
            .filter_map(|m| {
                let hash = m.hash.as_deref().unwrap_or("");
                let route = router::route_from_path(hash);
                if !hash.is_empty() && !router::is_page_enabled(config, &route) {
                    return None;
                }
                Some((m.text.clone().unwrap_or_default(), route))
            })
            .collect()
    } else {
        router::ROUTES
            .iter()
            .filter(|r| router::is_page_enabled(config, r))
            .map(|r| (title_case(r), r.to_string()))
            .collect()
    };

    items
        .iter()
        .map(|(text, route)| {
            let active = if route == active_page { " class=\"active\"" } else { "" };
            format!(
                r#"<li><a href="/{}"{}>{}</a></li>"#,
                html_escape(route),
                active,
                html_escape(text)
            )
        })
        .collect()
}

// ── Breadcrumbs ─────────────────────────────────────────────

fn build_breadcrumbs(config: &SiteConfig, page: &str) -> String {
    if !yn_on(config.header.breadcrumbs) {
        return String::new();
    }
    let mut crumbs = String::from(r#"<a href="/home">Home</a>"#);
    if page != "home" {
        crumbs.push_str(&format!(
            r#"<span class="crumb-sep">&rsaquo;</span><span class="crumb-current">{}</span>"#,
            html_escape(&title_case(page))
        ));
    }
    format!(
        r#"<div class="breadcrumbs-wrap"><nav id="breadcrumbs" aria-label="Breadcrumb">{}</nav></div>"#,
        crumbs
    )
}

// ── Footer ──────────────────────────────────────────────────

fn build_footer(config: &SiteConfig) -> String {
    let footer = &config.footer;
    let header = &config.header;
    let mut html = String::new();

    if !footer.links.is_empty() {
        let mut list = String::new();
        for link in footer.links.iter().take(25) {
            let visible = link.visible.is_on();
            list.push_str(&format!(
                r#"<li class="{}" data-visible="{}"><a href="{}">{}</a></li>"#,
                if visible { "visibility-visible" } else { "visibility-hidden" },
                if visible { "Y" } else { "N" },
                html_escape(link.url.as_deref().unwrap_or("#")),
                html_escape(link.text.as_deref().unwrap_or("Link"))
            ));
        }
        html.push_str(&format!(
            r#"<ul id="footer-links-list">{}</ul>"#,
            list
        ));
    }

    if !header.social_media.is_empty() {
        let default_size = header.social_icon_size.as_ref();
        let padding = config.site.styles.header.social_icon_padding.as_deref();
        let mut icons = String::new();
        for social in header.social_media.iter().take(10) {
            let visible = social.visible.is_on();
            let mut style = String::new();
            let width = social.width.as_ref().or(default_size).and_then(|v| v.css_size());
            let height = social.height.as_ref().or(default_size).and_then(|v| v.css_size());
            if let Some(w) = width {
                style.push_str(&format!("width:{};", w));
            }
            if let Some(h) = height {
                style.push_str(&format!("height:{};", h));
            }
            if let Some(p) = padding {
                style.push_str(&format!("padding:{};", p));
            }
            let img = match &social.icon {
                Some(icon) => format!(
                    r#"<img src="{}" alt="{}" style="{}">"#,
                    html_escape(icon),
                    html_escape(social.name.as_deref().unwrap_or("social")),
                    style
                ),
                None => String::new(),
            };
            icons.push_str(&format!(
                r#"<a class="footer-social-link {}" data-visible="{}" href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                if visible { "visibility-visible" } else { "visibility-hidden" },
                if visible { "Y" } else { "N" },
                html_escape(social.url.as_deref().unwrap_or("#")),
                img
            ));
        }
        html.push_str(&format!(r#"<div id="footer-social">{}</div>"#, icons));
    }

    let bi = &footer.business_info;
    let mut info = String::new();
    if let Some(name) = &bi.name {
        info.push_str(&format!("<strong>{}</strong>", html_escape(name)));
    }
    for line in [&bi.address, &bi.phone, &bi.email].into_iter().flatten() {
        info.push_str(&format!("<div>{}</div>", html_escape(line)));
    }
    if !info.is_empty() {
        html.push_str(&format!(r#"<div id="business-info">{}</div>"#, info));
    }

    if !footer.badges.is_empty() {
        let mut badges = String::new();
        for badge in &footer.badges {
            let visible = badge.visible.is_on();
            let mut style = String::new();
            // Per-item size wins; footer.badgeSize is the fallback
            let width = badge.width.as_ref().or(footer.badge_size.as_ref());
            let height = badge.height.as_ref().or(footer.badge_size.as_ref());
            if let Some(w) = width.and_then(|v| v.css_size()) {
                style.push_str(&format!("width:{};", w));
            }
            if let Some(h) = height.and_then(|v| v.css_size()) {
                style.push_str(&format!("height:{};", h));
            }
            badges.push_str(&format!(
                r#"<img class="{}" data-visible="{}" src="{}" alt="{}" style="{}">"#,
                if visible { "visibility-visible" } else { "visibility-hidden" },
                if visible { "Y" } else { "N" },
                html_escape(badge.image.as_deref().unwrap_or("")),
                html_escape(badge.alt.as_deref().unwrap_or("")),
                style
            ));
        }
        html.push_str(&format!(
            r#"<div id="footer-badges-bottom">{}</div>"#,
            badges
        ));
    }

    html
}

// ── Baseline styles ─────────────────────────────────────────

const BASE_CSS: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg, #fff); color: var(--text, #111); }
#site-header { display: flex; align-items: center; gap: 16px; padding: 10px 20px; background: var(--surface, #fff); border-bottom: 1px solid rgba(128,128,128,.2); }
#site-logo { width: var(--logo-width, auto); height: var(--logo-height, 48px); }
.header-contact a { color: inherit; text-decoration: none; }
.header-contact-top { display: none; }
.nav-menu { display: flex; gap: 18px; list-style: none; margin: 0; padding: 0; }
.nav-menu a { color: inherit; text-decoration: none; }
.nav-menu a.active { color: var(--primary, #0a58ca); font-weight: 700; }
.mobile-menu-toggle { display: none; background: none; border: none; font-size: 22px; cursor: pointer; }
.breadcrumbs-wrap { padding: 8px 20px; font-size: 14px; color: var(--muted, #666); }
.crumb-sep { margin: 0 6px; }
main { min-height: 50vh; }
.visibility-hidden { display: none; }
.btn { display: inline-block; padding: 10px 22px; border: none; border-radius: 4px; cursor: pointer; text-decoration: none; }
.btn-primary { background: var(--primary, #0a58ca); color: #fff; }
.home-hero { position: relative; overflow: hidden; }
.home-hero img { display: block; width: var(--home_hero_width, 100%); }
.hero-overlay { position: absolute; inset: 0; background-color: var(--hero-overlay-color, #000); opacity: var(--hero-overlay-opacity, 0); backdrop-filter: blur(var(--hero-overlay-blur, 0)); mix-blend-mode: var(--hero-overlay-blend, normal); }
.hero-text { position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; text-align: center; z-index: 2; }
.home-brand, .home-bullets, .home-alt-blocks, .home2-page, .products-page, .contact-page, .testimonials-page { padding: 24px 20px; max-width: 1100px; margin: 0 auto; }
.alt-row { display: flex; gap: 24px; align-items: center; margin-bottom: 24px; }
.alt-row.image-right { flex-direction: row-reverse; }
.alt-row.top-align { align-items: flex-start; }
.carousel-track { display: flex; gap: 16px; overflow-x: auto; padding: 12px 20px; }
.carousel-card { flex: 0 0 auto; }
.home2-list { display: flex; flex-direction: column; gap: 8px; float: left; width: 180px; }
.home2-item { border: 1px solid rgba(128,128,128,.3); background: none; cursor: pointer; padding: 6px; }
.home2-item.selected { border-color: var(--primary, #0a58ca); }
.home2-item img { width: 100%; display: block; }
.home2-content { margin-left: 204px; min-height: 220px; }
.home2-panel[hidden] { display: none; }
.product-block { margin-bottom: 48px; }
.product-grid { display: flex; gap: 24px; }
.product-gallery { display: flex; gap: 12px; }
.thumbs { display: flex; flex-direction: column; gap: 8px; }
.thumb { background: none; border: 1px solid rgba(128,128,128,.3); padding: 2px; cursor: pointer; position: relative; }
.thumb img { display: block; }
.thumb[data-more]::after { content: attr(data-more); position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; background: rgba(0,0,0,.55); color: #fff; font-weight: 700; }
.thumbs-mobile { display: none; }
.main-media { position: relative; }
.main-media img, .main-media video { max-width: 100%; display: block; }
.media-enlarge { position: absolute; right: 8px; bottom: 8px; }
.product-search input { padding: 8px 12px; width: 280px; }
.gallery-modal { position: fixed; inset: 0; z-index: 100; }
.gallery-modal[hidden] { display: none; }
.gm-backdrop { position: absolute; inset: 0; background: rgba(0,0,0,.8); }
.gm-dialog { position: relative; margin: 4vh auto; width: min(1000px, 94vw); background: var(--surface, #fff); padding: 16px; border-radius: 6px; }
.gm-stage { overflow: hidden; min-height: 320px; display: flex; align-items: center; justify-content: center; }
.gm-stage img, .gm-stage video { max-width: 100%; max-height: 70vh; }
.gm-thumbs { display: flex; gap: 6px; overflow-x: auto; margin: 8px 0; }
.gm-thumb { background: none; border: 1px solid transparent; padding: 1px; cursor: pointer; }
.gm-thumb.active { border-color: var(--primary, #0a58ca); }
.gm-thumb img { height: 48px; display: block; }
.gm-body { display: flex; gap: 16px; }
.gm-main { position: relative; flex: 2; }
.gm-info { flex: 1; }
.gm-nav { position: absolute; top: 50%; transform: translateY(-50%); z-index: 2; font-size: 28px; background: rgba(0,0,0,.35); color: #fff; border: none; cursor: pointer; }
.gm-prev { left: 4px; }
.gm-next { right: 4px; }
.gm-zoombar { position: absolute; bottom: 8px; left: 8px; display: flex; gap: 6px; }
.form-field { display: block; margin-bottom: 14px; }
.form-field .label { display: block; font-size: .9em; font-weight: 600; margin-bottom: 4px; }
.form-field .input { width: 100%; padding: 9px 12px; border: 1px solid rgba(128,128,128,.3); border-radius: 4px; font-family: inherit; }
.form-row-2 { display: flex; gap: 16px; }
.form-row-2 .form-field { flex: 1; }
.req { color: #c00; margin-left: 2px; }
.form-success { padding: 12px; margin-bottom: 16px; border-radius: 6px; background: rgba(34,197,94,.12); color: #16a34a; }
.form-error-global { padding: 12px; margin-bottom: 16px; border-radius: 6px; background: rgba(239,68,68,.12); color: #ef4444; }
.contact-page.with-card { display: flex; gap: 40px; flex-wrap: wrap; }
.contact-page.with-card form { flex: 2; min-width: 280px; }
.contact-info-card { flex: 1; min-width: 240px; }
.biz-logo { max-width: 180px; display: block; margin-bottom: 12px; }
.biz-icon { vertical-align: middle; }
.testimonial-card { border: 1px solid rgba(128,128,128,.2); border-radius: 6px; padding: 14px; margin-bottom: 12px; }
.testimonial-meta { font-size: .85em; color: var(--muted, #666); margin-bottom: 6px; }
#site-footer { padding: 24px 20px; background: var(--surface, #f7f7f7); border-top: 1px solid rgba(128,128,128,.2); }
#footer-links-list { list-style: none; display: flex; gap: 16px; padding: 0; flex-wrap: wrap; }
@media (max-width: 980px) {
  .header-contact-top { display: block; }
  .header-contact-bottom { display: none; }
  .mobile-menu-toggle { display: block; }
  .nav-menu { display: none; flex-direction: column; }
  #primary-navigation.open .nav-menu { display: flex; }
  .product-grid, .product-gallery { flex-direction: column; }
  .thumbs-desktop { display: none; }
  .thumbs-mobile { display: flex; flex-direction: row; }
  .home2-list { float: none; width: auto; flex-direction: row; overflow-x: auto; }
  .home2-content { margin-left: 0; }
}
body[data-desktop-thumbs="bottom"] .product-gallery { flex-direction: column-reverse; }
body[data-desktop-thumbs="bottom"] .thumbs { flex-direction: row; }
"#;

// ── Embedded client scripts ─────────────────────────────────

/// Mobile menu toggle + home2 master/detail selector.
const SITE_JS: &str = r#"
(function() {
    var btn = document.querySelector('.mobile-menu-toggle');
    var nav = document.getElementById('primary-navigation');
    if (btn && nav) {
        btn.addEventListener('click', function(e) {
            e.preventDefault();
            var open = btn.getAttribute('aria-expanded') === 'true';
            btn.setAttribute('aria-expanded', open ? 'false' : 'true');
            nav.classList.toggle('open', !open);
        });
        document.addEventListener('keydown', function(e) {
            if (e.key === 'Escape') { btn.setAttribute('aria-expanded', 'false'); nav.classList.remove('open'); }
        });
    }

    var items = document.querySelectorAll('.home2-item');
    var panels = document.querySelectorAll('.home2-panel');
    items.forEach(function(item, idx) {
        item.addEventListener('click', function() {
            items.forEach(function(b, i) { b.classList.toggle('selected', i === idx); });
            panels.forEach(function(p, i) { p.hidden = i !== idx; });
        });
    });
})();
"#;

/// Carousel videos play only while at least half visible.
const CAROUSEL_JS: &str = r#"
(function() {
    var vids = document.querySelectorAll('.carousel-track video');
    if (!vids.length || !('IntersectionObserver' in window)) return;
    var io = new IntersectionObserver(function(entries) {
        entries.forEach(function(ent) {
            var v = ent.target;
            if (ent.isIntersecting && ent.intersectionRatio > 0.5) v.play().catch(function(){});
            else v.pause();
        });
    }, { threshold: [0, 0.5, 1] });
    vids.forEach(function(v) { io.observe(v); });
})();
"#;

/// Gallery modal wiring. Each product block carries its item list in
/// `data-gallery` and a pre-rendered modal skeleton; this script opens the
/// modal, repaints stage/thumbs per interaction, and mirrors the
/// server-side state rules: clamped index, tab switch resets to 0, zoom
/// 1–3 in 0.25 steps with pan reset at minimum, pan cool-down suppressing
/// click-to-advance.
const GALLERY_JS: &str = r#"
(function() {
    var ZOOM_MIN = 1, ZOOM_MAX = 3, ZOOM_STEP = 0.25;

    document.querySelectorAll('.product-block').forEach(function(block) {
        var items;
        try { items = JSON.parse(block.dataset.gallery || '[]'); } catch (e) { items = []; }
        if (!items.length) return;

        var modal = block.querySelector('.gallery-modal');
        if (!modal) return;
        var stage = modal.querySelector('.gm-stage');
        var thumbsWrap = modal.querySelector('.gm-thumbs');
        var counter = modal.querySelector('.gm-counter');
        var zoombar = modal.querySelector('.gm-zoombar');
        var tabs = modal.querySelectorAll('.gm-tab');

        var imagesList = items.filter(function(it) { return it.type !== 'video'; });
        var videosList = items.filter(function(it) { return it.type === 'video'; });
        var activeTab = 'images', index = 0;
        var zoom = ZOOM_MIN, panX = 0, panY = 0;
        var panning = false, startX = 0, startY = 0, didPanRecently = false, lastX = 0, lastY = 0;

        function list() { return activeTab === 'videos' ? videosList : imagesList; }

        function applyZoom() {
            var img = stage.querySelector('img.gm-image');
            if (!img) return;
            img.style.transform = 'translate(' + panX + 'px, ' + panY + 'px) scale(' + zoom + ')';
            img.style.cursor = zoom > ZOOM_MIN ? 'grab' : 'default';
        }

        function paintThumbs() {
            thumbsWrap.innerHTML = list().map(function(it, i) {
                var src = it.type === 'video' ? (it.poster || '') : (it.src || '');
                var inner = src ? '<img src="' + src + '" alt="thumb ' + (i + 1) + '" loading="lazy">'
                                : '<span class="gm-thumb-video">&#9658;</span>';
                return '<button class="gm-thumb' + (i === index ? ' active' : '') + '" data-idx="' + i + '">' + inner + '</button>';
            }).join('');
            thumbsWrap.querySelectorAll('.gm-thumb').forEach(function(b) {
                b.addEventListener('click', function() { show(parseInt(b.dataset.idx, 10) || 0); });
            });
        }

        function show(idx) {
            var l = list();
            index = Math.min(Math.max(0, idx | 0), Math.max(0, l.length - 1));
            var it = l[index];
            if (!it) { stage.innerHTML = ''; return; }
            if (it.type === 'video') {
                stage.innerHTML = '<video class="gm-video" controls preload="metadata"'
                    + (it.poster ? ' poster="' + it.poster + '"' : '') + ' src="' + (it.src || '') + '"></video>';
                if (zoombar) zoombar.style.display = 'none';
            } else {
                stage.innerHTML = '<img class="gm-image" src="' + (it.src || '') + '" alt="">';
                if (zoombar) zoombar.style.display = '';
            }
            zoom = ZOOM_MIN; panX = 0; panY = 0;
            thumbsWrap.querySelectorAll('.gm-thumb').forEach(function(b, i) {
                b.classList.toggle('active', i === index);
            });
            counter.textContent = (activeTab === 'videos' ? 'Video ' : 'Image ') + (index + 1) + ' of ' + l.length;
        }

        function open(startAt) {
            var it = items[Math.min(Math.max(0, startAt | 0), Math.max(0, items.length - 1))];
            activeTab = (it && it.type === 'video') ? 'videos' : 'images';
            index = it ? Math.max(0, list().indexOf(it)) : 0;
            tabs.forEach(function(t) { t.setAttribute('aria-selected', t.dataset.tab === activeTab ? 'true' : 'false'); });
            paintThumbs();
            show(index);
            modal.hidden = false;
            document.body.style.overflow = 'hidden';
            document.addEventListener('keydown', onKey);
            var dlg = modal.querySelector('.gm-dialog');
            if (dlg) dlg.focus();
        }

        function close() {
            modal.hidden = true;
            document.body.style.overflow = '';
            document.removeEventListener('keydown', onKey);
        }

        function onKey(e) {
            if (e.key === 'Escape') close();
            if (e.key === 'ArrowLeft') { e.preventDefault(); show(index - 1); }
            if (e.key === 'ArrowRight') { e.preventDefault(); show(index + 1); }
        }

        modal.querySelector('.gm-backdrop').addEventListener('click', close);
        modal.querySelector('.gm-close').addEventListener('click', close);
        modal.querySelector('.gm-prev').addEventListener('click', function() { show(index - 1); });
        modal.querySelector('.gm-next').addEventListener('click', function() { show(index + 1); });

        tabs.forEach(function(tab) {
            tab.addEventListener('click', function() {
                var name = tab.dataset.tab;
                if (!name || name === activeTab) return;
                activeTab = name;
                tabs.forEach(function(t) { t.setAttribute('aria-selected', t === tab ? 'true' : 'false'); });
                index = 0;
                paintThumbs();
                show(0);
            });
        });

        modal.querySelector('.gm-zoom-in').addEventListener('click', function(e) {
            e.preventDefault();
            zoom = Math.min(ZOOM_MAX, zoom + ZOOM_STEP);
            applyZoom();
        });
        modal.querySelector('.gm-zoom-out').addEventListener('click', function(e) {
            e.preventDefault();
            zoom = Math.max(ZOOM_MIN, zoom - ZOOM_STEP);
            if (zoom === ZOOM_MIN) { panX = 0; panY = 0; }
            applyZoom();
        });

        var fsBtn = modal.querySelector('.gm-fullscreen');
        if (fsBtn) fsBtn.addEventListener('click', function() {
            var media = modal.querySelector('.gm-video') || modal.querySelector('.gm-image');
            var target = media || modal.querySelector('.gm-dialog');
            if (target && target.requestFullscreen) { try { target.requestFullscreen(); } catch (e) {} }
        });

        stage.addEventListener('mousedown', function(e) {
            var img = stage.querySelector('img.gm-image');
            if (!img || zoom <= ZOOM_MIN) return;
            panning = true;
            startX = e.clientX - panX; startY = e.clientY - panY;
            img.style.cursor = 'grabbing';
            e.preventDefault();
        });
        window.addEventListener('mousemove', function(e) {
            if (!panning) return;
            panX = e.clientX - startX; panY = e.clientY - startY;
            var dx = e.clientX - lastX, dy = e.clientY - lastY;
            if (Math.hypot(dx, dy) > 3) didPanRecently = true;
            lastX = e.clientX; lastY = e.clientY;
            applyZoom();
        });
        window.addEventListener('mouseup', function() {
            if (!panning) return;
            panning = false;
            applyZoom();
            setTimeout(function() { didPanRecently = false; }, 50);
        });

        stage.addEventListener('click', function() {
            if (stage.querySelector('.gm-video')) return;
            if (zoom > ZOOM_MIN || didPanRecently) return;
            show(index + 1);
        });

        var touchStartX = null;
        stage.addEventListener('touchstart', function(e) {
            touchStartX = (e.touches && e.touches[0]) ? e.touches[0].clientX : null;
        }, { passive: true });
        stage.addEventListener('touchend', function(e) {
            if (touchStartX == null) return;
            var x = (e.changedTouches && e.changedTouches[0]) ? e.changedTouches[0].clientX : touchStartX;
            var delta = x - touchStartX;
            if (delta > 40) show(index - 1);
            if (delta < -40) show(index + 1);
            touchStartX = null;
        });

        // Openers: main media click, overflow "+N" thumbs
        block.querySelectorAll('[data-open-gallery]').forEach(function(opener) {
            opener.addEventListener('click', function(e) {
                if (e.target.closest('.media-enlarge')) return;
                e.preventDefault();
                open(parseInt(opener.dataset.openGallery, 10) || 0);
            });
        });

        // Thumb strip: swap the main viewer media
        var mainImg = block.querySelector('.main-image');
        var mainVideo = block.querySelector('.main-video');
        block.querySelectorAll('[data-main-idx]').forEach(function(t) {
            t.addEventListener('click', function() {
                var it = items[parseInt(t.dataset.mainIdx, 10) || 0];
                if (!it) return;
                var mainWrap = block.querySelector('.main-media');
                if (mainWrap) mainWrap.dataset.openGallery = t.dataset.mainIdx;
                if (it.type === 'video') {
                    if (mainImg) mainImg.style.display = 'none';
                    if (mainVideo) {
                        mainVideo.src = it.src || '';
                        if (it.poster) mainVideo.poster = it.poster;
                        mainVideo.style.display = '';
                    }
                } else {
                    if (mainVideo) { mainVideo.pause(); mainVideo.style.display = 'none'; }
                    if (mainImg) { mainImg.src = it.src || ''; mainImg.style.display = ''; }
                }
            });
        });

        var enlarge = block.querySelector('.media-enlarge');
        if (enlarge) enlarge.addEventListener('click', function(e) {
            e.stopPropagation();
            var media = (mainVideo && mainVideo.style.display !== 'none') ? mainVideo : mainImg;
            if (media && media.requestFullscreen) { try { media.requestFullscreen(); } catch (err) {} }
        });
    });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::YnFlag;
    use crate::store::tests::test_store;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            html_escape(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn strip_tags_leaves_text() {
        let text = strip_tags("<p>Hand <b>forged</b> steel</p>");
        assert!(text.contains("Hand"));
        assert!(text.contains("forged"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn media_paths_normalize_legacy_segment() {
        assert_eq!(normalize_media_path("/videos/a.mp4"), "/video/a.mp4");
        assert_eq!(normalize_media_path("/img/a.jpg"), "/img/a.jpg");
    }

    #[test]
    fn title_case_capitalizes_words() {
        assert_eq!(title_case("testimonials"), "Testimonials");
        assert_eq!(title_case("home 2"), "Home 2");
    }

    #[test]
    fn repeated_renders_always_count() {
        let ctx = SiteContext::new(SiteConfig::default());
        let store = test_store();
        render_page(&ctx, &store, "home", None, None);
        render_page(&ctx, &store, "home", None, None);
        assert_eq!(ctx.renders(), 2);
    }

    #[test]
    fn nav_marks_active_page_and_filters_disabled() {
        let mut config = SiteConfig::default();
        config
            .site
            .pages
            .insert("products".to_string(), YnFlag(false));
        let nav = build_nav(&config, "contact");
        assert!(nav.contains(r#"<a href="/contact" class="active">"#));
        assert!(!nav.contains("/products"));
    }

    #[test]
    fn breadcrumbs_render_only_when_enabled() {
        let mut config = SiteConfig::default();
        assert!(build_breadcrumbs(&config, "contact").is_empty());
        config.header.breadcrumbs = Some(YnFlag(true));
        let html = build_breadcrumbs(&config, "contact");
        assert!(html.contains("Contact"));
        assert!(html.contains(r#"href="/home""#));
    }

    #[test]
    fn disabled_overlay_reaches_the_page_head() {
        let mut config = SiteConfig::default();
        config.site.styles.home.hero_overlay_enabled = YnFlag(false);
        config.site.styles.home.hero_overlay_opacity = Some(0.9);
        let ctx = SiteContext::new(config);
        let store = test_store();
        let html = render_page(&ctx, &store, "home", None, None);
        assert!(html.contains("--hero-overlay-opacity: 0;"));
    }
}
