#[macro_use]
extern crate rocket;

use std::path::Path;
use std::sync::Arc;

use rocket::fs::FileServer;
use rocket::response::content::RawHtml;

mod boot;
mod config;
mod db;
mod email;
mod gallery;
mod layout;
mod rate_limit;
mod render;
mod router;
mod routes;
mod sections;
mod site;
mod store;
mod theme;

#[cfg(test)]
mod tests;

use config::SiteConfig;
use rate_limit::RateLimiter;
use site::SiteContext;
use store::sqlite::SqliteStore;
use store::Store;

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

/// Assemble the Rocket instance. Static file mounts are added by the
/// launch path only, so tests can build an instance without a website/
/// tree on disk.
pub fn build_rocket(config: SiteConfig, store: Arc<dyn Store>) -> rocket::Rocket<rocket::Build> {
    rocket::build()
        .manage(SiteContext::new(config))
        .manage(store)
        .manage(RateLimiter::new())
        .mount("/", routes::public::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![not_found, server_error])
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    // Boot check — verify/create directories, require the site document
    boot::run();

    let pool = db::init_pool().expect("Failed to initialize database pool");
    let store = SqliteStore::new(pool);
    store
        .run_migrations()
        .expect("Failed to run store migrations");

    // The site document is loaded exactly once; a bad document halts
    // initialization here with no partial server coming up
    let config = SiteConfig::load(Path::new("website/site.json")).unwrap_or_else(|e| {
        log::error!("Fatal: {}", e);
        std::process::exit(1);
    });

    build_rocket(config, Arc::new(store))
        .mount("/static", FileServer::from("website/static"))
        .mount("/uploads", FileServer::from("website/uploads"))
}
