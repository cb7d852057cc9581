use crate::config::SiteConfig;

/// The fixed route set, in fallback priority order.
pub const ROUTES: [&str; 5] = ["home", "home2", "products", "contact", "testimonials"];

/// Extract a route name from a request path or `#/page` fragment.
/// Empty input means home.
pub fn route_from_path(raw: &str) -> String {
    let name = raw
        .trim()
        .trim_start_matches("#/")
        .trim_start_matches('/')
        .trim_end_matches('/');
    if name.is_empty() {
        "home".to_string()
    } else {
        name.to_lowercase()
    }
}

/// A page absent from the `site.pages` map is enabled.
pub fn is_page_enabled(config: &SiteConfig, page: &str) -> bool {
    match config.site.pages.get(page) {
        Some(flag) => flag.is_on(),
        None => true,
    }
}

/// First enabled page in priority order; home when every page is disabled.
pub fn first_enabled_page(config: &SiteConfig) -> &'static str {
    ROUTES
        .iter()
        .find(|r| is_page_enabled(config, r))
        .copied()
        .unwrap_or("home")
}

/// Resolve a raw location to the page that will actually render:
/// unrecognized names collapse to home, disabled pages substitute the
/// first enabled one.
pub fn resolve(config: &SiteConfig, raw: &str) -> String {
    let name = route_from_path(raw);
    let name = if ROUTES.contains(&name.as_str()) {
        name
    } else {
        "home".to_string()
    };
    if is_page_enabled(config, &name) {
        name
    } else {
        first_enabled_page(config).to_string()
    }
}
