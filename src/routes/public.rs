use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rocket::form::Form;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::State;

use crate::email::{self, MailEnv};
use crate::rate_limit::RateLimiter;
use crate::render;
use crate::router;
use crate::routes::ClientIp;
use crate::site::SiteContext;
use crate::store::{Store, TestimonialEntry};

const SUBMIT_WINDOW: Duration = Duration::from_secs(15 * 60);
const SUBMIT_MAX: u64 = 5;

// ── Pages ──────────────────────────────────────────────────

#[get("/")]
pub fn index(ctx: &State<SiteContext>, store: &State<Arc<dyn Store>>) -> RawHtml<String> {
    let page = router::resolve(&ctx.config, "home");
    RawHtml(render::render_page(ctx, &***store, &page, None, None))
}

#[get("/<page>?<q>&<sent>&<error>")]
pub fn page_view(
    ctx: &State<SiteContext>,
    store: &State<Arc<dyn Store>>,
    page: &str,
    q: Option<&str>,
    sent: Option<&str>,
    error: Option<&str>,
) -> RawHtml<String> {
    let resolved = router::resolve(&ctx.config, page);

    let success_message = ctx
        .config
        .contact
        .success_message
        .clone()
        .unwrap_or_else(|| "Your message has been sent.".to_string());
    let flash = if sent.is_some() {
        Some(("success", success_message.as_str()))
    } else if error.is_some() {
        Some(("error", "Failed to send message. Please try again later."))
    } else {
        None
    };

    RawHtml(render::render_page(ctx, &***store, &resolved, q, flash))
}

// ── Contact form (HTML path) ───────────────────────────────

#[post("/contact", data = "<form>")]
pub fn contact_submit(
    limiter: &State<RateLimiter>,
    client_ip: ClientIp,
    form: Form<HashMap<String, String>>,
) -> Redirect {
    if !limiter.check_and_record(
        &format!("contact:{}", client_ip.0),
        SUBMIT_MAX,
        SUBMIT_WINDOW,
    ) {
        return Redirect::to("/contact?error=1");
    }

    let value = |key: &str| form.get(key).map(|v| v.trim()).unwrap_or("");
    let first = value("firstName");
    let last = value("lastName");
    let email_addr = value("email");
    // Message textarea name varies with the configured form
    let message = ["message", "msg", "messageText"]
        .iter()
        .map(|k| value(k))
        .find(|v| !v.is_empty())
        .unwrap_or("");

    if email_addr.is_empty() || message.is_empty() {
        return Redirect::to("/contact?error=1");
    }

    let Some(mail_env) = MailEnv::from_env() else {
        log::error!("Contact form submitted but email is not configured");
        return Redirect::to("/contact?error=1");
    };

    match email::send_contact(&mail_env, first, last, email_addr, message) {
        Ok(id) => {
            log::info!("Contact email {} sent for {}", id, email_addr);
            Redirect::to("/contact?sent=1")
        }
        Err(e) => {
            log::error!("Contact email failed: {}", e);
            Redirect::to("/contact?error=1")
        }
    }
}

// ── Testimonial form ───────────────────────────────────────

#[post("/testimonials", data = "<form>")]
pub fn testimonial_submit(
    store: &State<Arc<dyn Store>>,
    limiter: &State<RateLimiter>,
    client_ip: ClientIp,
    form: Form<HashMap<String, String>>,
) -> Redirect {
    if !limiter.check_and_record(
        &format!("testimonial:{}", client_ip.0),
        SUBMIT_MAX,
        SUBMIT_WINDOW,
    ) {
        return Redirect::to("/testimonials");
    }

    let mut entry = TestimonialEntry {
        date: chrono::Utc::now().format("%b %d, %Y").to_string(),
        ..Default::default()
    };
    for (key, value) in form.iter() {
        let value = value.trim();
        if !value.is_empty() {
            entry.fields.insert(key.clone(), value.to_string());
        }
    }

    if entry.fields.is_empty() {
        return Redirect::to("/testimonials");
    }
    if let Err(e) = store.testimonial_add(&entry) {
        log::error!("Failed to store testimonial: {}", e);
    }
    Redirect::to("/testimonials")
}

pub fn routes() -> Vec<rocket::Route> {
    routes![index, page_view, contact_submit, testimonial_submit]
}
