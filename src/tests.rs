#![cfg(test)]

use std::sync::Arc;

use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;

use crate::build_rocket;
use crate::config::SiteConfig;
use crate::email;
use crate::site::SiteContext;
use crate::store::sqlite::SqliteStore;
use crate::store::{BlockData, LayoutBlock, Store};

/// Fresh in-memory store with migrations applied.
fn memory_store() -> SqliteStore {
    let manager = r2d2_sqlite::SqliteConnectionManager::memory();
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .build(manager)
        .expect("Failed to create in-memory pool");
    let store = SqliteStore::new(pool);
    store.run_migrations().expect("migrations failed");
    store
}

fn client_with(config: SiteConfig, store: Arc<dyn Store>) -> Client {
    Client::tracked(build_rocket(config, store)).expect("valid rocket instance")
}

fn client(config: SiteConfig) -> Client {
    client_with(config, Arc::new(memory_store()))
}

fn config_from(json: &str) -> SiteConfig {
    serde_json::from_str(json).expect("valid test document")
}

// ═══════════════════════════════════════════════════════════
// API contract
// ═══════════════════════════════════════════════════════════

#[test]
fn health_reports_ok() {
    let c = client(SiteConfig::default());
    let resp = c.get("/api/health").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["ok"], true);
}

#[test]
fn contact_requires_email_and_message() {
    let c = client(SiteConfig::default());

    // Email only — message missing
    let resp = c
        .post("/api/contact")
        .header(ContentType::JSON)
        .body(r#"{"email":"a@b.com"}"#)
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["ok"], false);

    // Message only — email missing
    let resp = c
        .post("/api/contact")
        .header(ContentType::JSON)
        .body(r#"{"message":"hello"}"#)
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
}

#[test]
fn contact_without_smtp_environment_is_a_server_error() {
    let _guard = email::ENV_LOCK.lock().unwrap();
    email::clear_mail_env();

    let c = client(SiteConfig::default());
    let resp = c
        .post("/api/contact")
        .header(ContentType::JSON)
        .body(r#"{"first":"Ada","email":"a@b.com","message":"hello"}"#)
        .dispatch();
    assert_eq!(resp.status(), Status::InternalServerError);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["ok"], false);
    // Generic operator-facing text, no transport detail
    assert_eq!(body["error"], "Email is not configured on the server");
}

#[test]
fn contact_rate_limit_kicks_in() {
    let _guard = email::ENV_LOCK.lock().unwrap();
    email::clear_mail_env();

    let c = client(SiteConfig::default());
    for _ in 0..5 {
        let resp = c
            .post("/api/contact")
            .header(ContentType::JSON)
            .body(r#"{"email":"a@b.com","message":"hi"}"#)
            .dispatch();
        assert_ne!(resp.status(), Status::TooManyRequests);
    }
    let resp = c
        .post("/api/contact")
        .header(ContentType::JSON)
        .body(r#"{"email":"a@b.com","message":"hi"}"#)
        .dispatch();
    assert_eq!(resp.status(), Status::TooManyRequests);
}

// ═══════════════════════════════════════════════════════════
// Routing
// ═══════════════════════════════════════════════════════════

#[test]
fn disabled_page_renders_first_enabled_instead() {
    let c = client(config_from(
        r#"{"site":{"pages":{"home":"N","home2":"N"}},"products":{"items":[{"title":"Anvil"}]}}"#,
    ));
    let resp = c.get("/home").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let body = resp.into_string().unwrap();
    assert!(body.contains(r#"<section class="products-page">"#));
    assert!(body.contains("Anvil"));
}

#[test]
fn all_pages_disabled_renders_home() {
    let c = client(config_from(
        r#"{"site":{"pages":{"home":"N","home2":"N","products":"N","contact":"N","testimonials":"N"}}}"#,
    ));
    let body = c.get("/contact").dispatch().into_string().unwrap();
    assert!(body.contains(r#"<section class="home-hero""#));
}

#[test]
fn unknown_route_renders_home() {
    let c = client(SiteConfig::default());
    let body = c.get("/does-not-exist").dispatch().into_string().unwrap();
    assert!(body.contains(r#"<section class="home-hero""#));
}

#[test]
fn repeated_identical_navigation_always_re_renders() {
    let c = client(SiteConfig::default());
    c.get("/home").dispatch();
    let after_first = c
        .rocket()
        .state::<SiteContext>()
        .unwrap()
        .renders();
    c.get("/home").dispatch();
    let after_second = c
        .rocket()
        .state::<SiteContext>()
        .unwrap()
        .renders();
    assert!(after_second > after_first);
}

// ═══════════════════════════════════════════════════════════
// Layout overrides
// ═══════════════════════════════════════════════════════════

#[test]
fn layout_override_reorders_home() {
    let store = Arc::new(memory_store());
    store
        .layout_override_set(
            "home",
            &[
                LayoutBlock {
                    block_type: "text".into(),
                    data: BlockData::default(),
                },
                LayoutBlock {
                    block_type: "image".into(),
                    data: BlockData { key: "hero".into() },
                },
            ],
        )
        .unwrap();
    let c = client_with(
        config_from(r#"{"home":{"bulletedList":{"items":["Fast"]}}}"#),
        store,
    );
    let body = c.get("/home").dispatch().into_string().unwrap();
    // Anchor on the markup, not the style block in the head
    let main = &body[body.find("main-content").expect("main renders")..];
    let bullets = main
        .find(r#"<section class="home-bullets">"#)
        .expect("bullets render");
    let hero = main
        .find(r#"<section class="home-hero""#)
        .expect("hero renders");
    assert!(bullets < hero);
}

#[test]
fn malformed_override_still_renders_default_page() {
    let store = Arc::new(memory_store());
    store
        .kv_set(crate::store::LAYOUT_KEY, r#"{"home": "garbage"}"#)
        .unwrap();
    let c = client_with(
        config_from(r#"{"home":{"bulletedList":{"items":["Fast"]}}}"#),
        store,
    );
    let body = c.get("/home").dispatch().into_string().unwrap();
    // Default composition, not a blank page
    assert!(body.contains(r#"<section class="home-hero""#));
    assert!(body.contains(r#"<section class="home-bullets">"#));
}

// ═══════════════════════════════════════════════════════════
// Products
// ═══════════════════════════════════════════════════════════

#[test]
fn product_search_matches_bullet_text() {
    let c = client(config_from(
        r#"{"products":{"items":[
            {"title":"Anvil","bullets":["Lifetime warranty"]},
            {"title":"Hammer","bullets":["Oak handle"]}
        ]}}"#,
    ));
    let body = c.get("/products?q=warranty").dispatch().into_string().unwrap();
    assert!(body.contains("Anvil"));
    assert!(!body.contains("Hammer"));
}

// ═══════════════════════════════════════════════════════════
// Forms
// ═══════════════════════════════════════════════════════════

#[test]
fn testimonial_submit_stores_and_lists_newest_first() {
    let c = client(config_from(
        r#"{"testimonials":{"form":{"name":{},"email":{},"testimonial":{"type":"textarea"}}}}"#,
    ));

    for name in ["Alice", "Bob"] {
        let resp = c
            .post("/testimonials")
            .header(ContentType::Form)
            .body(format!(
                "name={}&email={0}@example.com&testimonial=Great+work",
                name
            ))
            .dispatch();
        assert_eq!(resp.status(), Status::SeeOther);
    }

    let body = c.get("/testimonials").dispatch().into_string().unwrap();
    let bob = body.find("Bob").expect("newest entry listed");
    let alice = body.find("Alice").expect("older entry listed");
    assert!(bob < alice);
    assert!(body.contains("Great work"));
}

#[test]
fn contact_form_without_smtp_redirects_with_error_flash() {
    let _guard = email::ENV_LOCK.lock().unwrap();
    email::clear_mail_env();

    let c = client(SiteConfig::default());
    let resp = c
        .post("/contact")
        .header(ContentType::Form)
        .body("firstName=Ada&email=a%40b.com&message=hello")
        .dispatch();
    assert_eq!(resp.status(), Status::SeeOther);
    let location = resp.headers().get_one("Location").unwrap();
    assert_eq!(location, "/contact?error=1");

    // The error flash renders and field values are the browser's to keep
    let body = c.get("/contact?error=1").dispatch().into_string().unwrap();
    assert!(body.contains(r#"<div class="form-error-global" role="alert">"#));
}

#[test]
fn contact_success_flash_uses_configured_message() {
    let c = client(config_from(
        r#"{"contact":{"successMessage":"Thanks, we got it."}}"#,
    ));
    let body = c.get("/contact?sent=1").dispatch().into_string().unwrap();
    assert!(body.contains(r#"<div class="form-success">"#));
    assert!(body.contains("Thanks, we got it."));
}
