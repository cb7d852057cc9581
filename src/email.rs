use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// SMTP transport settings, read from the environment:
/// `SMTP_HOST`, `SMTP_PORT`, `SMTP_SECURE`, `SMTP_USER`, `SMTP_PASS`,
/// `MAIL_TO`, `MAIL_FROM` (defaults to `SMTP_USER`).
pub struct MailEnv {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub user: String,
    pub pass: String,
    pub to: String,
    pub from: String,
}

impl MailEnv {
    /// `None` when any required variable is missing — the caller turns
    /// that into an operator-facing "not configured" error.
    pub fn from_env() -> Option<MailEnv> {
        let host = non_empty(std::env::var("SMTP_HOST").ok()?)?;
        let port: u16 = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(587);
        let user = non_empty(std::env::var("SMTP_USER").ok()?)?;
        let pass = non_empty(std::env::var("SMTP_PASS").ok()?)?;
        let to = non_empty(std::env::var("MAIL_TO").ok()?)?;
        let secure = std::env::var("SMTP_SECURE")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);
        let from = std::env::var("MAIL_FROM")
            .ok()
            .and_then(non_empty)
            .unwrap_or_else(|| user.clone());
        Some(MailEnv {
            host,
            port,
            secure,
            user,
            pass,
            to,
            from,
        })
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Send a contact-form submission to the configured recipient. Returns a
/// message id for the API response.
pub fn send_contact(
    env: &MailEnv,
    first: &str,
    last: &str,
    reply_to: &str,
    message: &str,
) -> Result<String, String> {
    let full_name = format!("{} {}", first, last).trim().to_string();
    let full_name = if full_name.is_empty() {
        "Website Visitor".to_string()
    } else {
        full_name
    };

    let subject = format!("Contact form: {}", full_name);
    let body = format!(
        "Name: {}\nEmail: {}\n\nMessage:\n{}",
        full_name, reply_to, message
    );

    send_smtp(env, &subject, &body)?;
    Ok(uuid::Uuid::new_v4().to_string())
}

fn send_smtp(env: &MailEnv, subject: &str, body: &str) -> Result<(), String> {
    let email = Message::builder()
        .from(env
            .from
            .parse()
            .map_err(|e| format!("Invalid from address: {}", e))?)
        .to(env
            .to
            .parse()
            .map_err(|e| format!("Invalid to address: {}", e))?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| format!("Failed to build email: {}", e))?;

    let creds = Credentials::new(env.user.clone(), env.pass.clone());

    // SMTP_SECURE=true means implicit TLS; otherwise STARTTLS on the
    // submission port
    let relay = if env.secure {
        SmtpTransport::relay(&env.host)
    } else {
        SmtpTransport::starttls_relay(&env.host)
    };
    let mailer = relay
        .map_err(|e| format!("SMTP relay error: {}", e))?
        .port(env.port)
        .credentials(creds)
        .build();

    mailer
        .send(&email)
        .map_err(|e| format!("SMTP send error: {}", e))?;
    Ok(())
}

/// Serializes SMTP env-var mutation across the test suite.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) fn clear_mail_env() {
    for key in [
        "SMTP_HOST",
        "SMTP_PORT",
        "SMTP_SECURE",
        "SMTP_USER",
        "SMTP_PASS",
        "MAIL_TO",
        "MAIL_FROM",
    ] {
        std::env::remove_var(key);
    }
}
