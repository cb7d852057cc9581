use std::time::Duration;

use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::email::{self, MailEnv};
use crate::rate_limit::RateLimiter;
use crate::routes::ClientIp;

const CONTACT_WINDOW: Duration = Duration::from_secs(15 * 60);
const CONTACT_MAX: u64 = 5;

#[get("/health")]
pub fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

#[derive(Debug, Deserialize)]
pub struct ContactSubmit {
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub last: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Contact-form proxy: validates the payload, then relays it to the SMTP
/// transport configured in the environment. Transport and configuration
/// failures surface as a generic 500 — never credentials or error detail.
#[post("/contact", format = "json", data = "<form>")]
pub fn contact(
    limiter: &State<RateLimiter>,
    client_ip: ClientIp,
    form: Json<ContactSubmit>,
) -> status::Custom<Json<Value>> {
    if !limiter.check_and_record(
        &format!("contact:{}", client_ip.0),
        CONTACT_MAX,
        CONTACT_WINDOW,
    ) {
        return status::Custom(
            Status::TooManyRequests,
            Json(json!({ "ok": false, "error": "Too many submissions. Please wait before trying again." })),
        );
    }

    let email_addr = form.email.trim();
    let message = form.message.trim();
    if email_addr.is_empty() || message.is_empty() {
        return status::Custom(
            Status::BadRequest,
            Json(json!({ "ok": false, "error": "Missing required fields" })),
        );
    }

    let Some(mail_env) = MailEnv::from_env() else {
        return status::Custom(
            Status::InternalServerError,
            Json(json!({ "ok": false, "error": "Email is not configured on the server" })),
        );
    };

    match email::send_contact(&mail_env, form.first.trim(), form.last.trim(), email_addr, message) {
        Ok(id) => status::Custom(Status::Ok, Json(json!({ "ok": true, "id": id }))),
        Err(e) => {
            log::error!("Contact email failed: {}", e);
            status::Custom(
                Status::InternalServerError,
                Json(json!({ "ok": false, "error": "Failed to send email" })),
            )
        }
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![health, contact]
}
