use rocket::request::{FromRequest, Outcome, Request};

pub mod api;
pub mod public;

/// Requesting client's IP for rate limiting, preferring the proxy header.
pub struct ClientIp(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientIp {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        if let Some(forwarded) = request.headers().get_one("X-Forwarded-For") {
            let ip = forwarded.split(',').next().unwrap_or("").trim();
            if !ip.is_empty() {
                return Outcome::Success(ClientIp(ip.to_string()));
            }
        }
        let ip = request
            .client_ip()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Outcome::Success(ClientIp(ip))
    }
}
