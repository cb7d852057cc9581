use crate::config::{FormField, SiteConfig};
use crate::render::html_escape;
use crate::store::Store;

/// The contact form's country select, "United States" pinned first and
/// the rest alphabetical.
const COUNTRIES: &[&str] = &[
    "United States", "Afghanistan", "Albania", "Algeria", "Andorra", "Angola",
    "Antigua and Barbuda", "Argentina", "Armenia", "Australia", "Austria", "Azerbaijan",
    "Bahamas", "Bahrain", "Bangladesh", "Barbados", "Belarus", "Belgium", "Belize", "Benin",
    "Bhutan", "Bolivia", "Bosnia and Herzegovina", "Botswana", "Brazil", "Brunei", "Bulgaria",
    "Burkina Faso", "Burundi", "Cabo Verde", "Cambodia", "Cameroon", "Canada",
    "Central African Republic", "Chad", "Chile", "China", "Colombia", "Comoros",
    "Congo (Congo-Brazzaville)", "Costa Rica", "Cote d'Ivoire", "Croatia", "Cuba", "Cyprus",
    "Czechia", "Democratic Republic of the Congo", "Denmark", "Djibouti", "Dominica",
    "Dominican Republic", "Ecuador", "Egypt", "El Salvador", "Equatorial Guinea", "Eritrea",
    "Estonia", "Eswatini", "Ethiopia", "Fiji", "Finland", "France", "Gabon", "Gambia",
    "Georgia", "Germany", "Ghana", "Greece", "Grenada", "Guatemala", "Guinea",
    "Guinea-Bissau", "Guyana", "Haiti", "Honduras", "Hungary", "Iceland", "India",
    "Indonesia", "Iran", "Iraq", "Ireland", "Israel", "Italy", "Jamaica", "Japan", "Jordan",
    "Kazakhstan", "Kenya", "Kiribati", "Kuwait", "Kyrgyzstan", "Laos", "Latvia", "Lebanon",
    "Lesotho", "Liberia", "Libya", "Liechtenstein", "Lithuania", "Luxembourg", "Madagascar",
    "Malawi", "Malaysia", "Maldives", "Mali", "Malta", "Marshall Islands", "Mauritania",
    "Mauritius", "Mexico", "Micronesia", "Moldova", "Monaco", "Mongolia", "Montenegro",
    "Morocco", "Mozambique", "Myanmar", "Namibia", "Nauru", "Nepal", "Netherlands",
    "New Zealand", "Nicaragua", "Niger", "Nigeria", "North Korea", "North Macedonia",
    "Norway", "Oman", "Pakistan", "Palau", "Panama", "Papua New Guinea", "Paraguay", "Peru",
    "Philippines", "Poland", "Portugal", "Qatar", "Romania", "Russia", "Rwanda",
    "Saint Kitts and Nevis", "Saint Lucia", "Saint Vincent and the Grenadines", "Samoa",
    "San Marino", "Sao Tome and Principe", "Saudi Arabia", "Senegal", "Serbia", "Seychelles",
    "Sierra Leone", "Singapore", "Slovakia", "Slovenia", "Solomon Islands", "Somalia",
    "South Africa", "South Korea", "South Sudan", "Spain", "Sri Lanka", "Sudan", "Suriname",
    "Sweden", "Switzerland", "Syria", "Taiwan", "Tajikistan", "Tanzania", "Thailand",
    "Timor-Leste", "Togo", "Tonga", "Trinidad and Tobago", "Tunisia", "Turkey",
    "Turkmenistan", "Tuvalu", "Uganda", "Ukraine", "United Arab Emirates", "United Kingdom",
    "Uruguay", "Uzbekistan", "Vanuatu", "Vatican City", "Venezuela", "Vietnam", "Yemen",
    "Zambia", "Zimbabwe",
];

pub fn country_options() -> Vec<&'static str> {
    let mut rest: Vec<&'static str> = COUNTRIES
        .iter()
        .copied()
        .filter(|c| *c != "United States")
        .collect();
    rest.sort_unstable();
    let mut out = vec!["United States"];
    out.extend(rest);
    out
}

// ── Contact page ────────────────────────────────────────────

/// Contact page: configuration-driven form plus the business info card.
/// `flash` carries a `("success" | "error", message)` banner from the
/// previous submit.
pub fn contact_page(config: &SiteConfig, flash: Option<(&str, &str)>) -> String {
    let contact = &config.contact;
    let card_visible = contact
        .card
        .as_ref()
        .map(|c| c.visible.is_on())
        .unwrap_or(true);

    let mut html = format!(
        r#"<section class="contact-page {}">"#,
        if card_visible { "with-card" } else { "no-card" }
    );
    html.push_str("<h2>Contact Us</h2>");

    let mut form = String::from(r#"<form class="contact-form" method="post" action="/contact" novalidate>"#);

    match flash {
        Some(("success", msg)) => {
            form.push_str(&format!(
                r#"<div class="form-success">{}</div>"#,
                html_escape(msg)
            ));
        }
        Some(("error", msg)) => {
            form.push_str(&format!(
                r#"<div class="form-error-global" role="alert">{}</div>"#,
                html_escape(msg)
            ));
        }
        _ => {}
    }

    // First/last name side by side when configured
    let field = |name: &str| {
        contact
            .form
            .0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
    };
    let mut row = String::new();
    if let Some(f) = field("firstName") {
        row.push_str(&render_field("firstName", f, "First Name"));
    }
    if let Some(f) = field("lastName") {
        row.push_str(&render_field("lastName", f, "Last Name"));
    }
    if !row.is_empty() {
        form.push_str(&format!(r#"<div class="form-row-2">{}</div>"#, row));
    }

    for (name, f) in &contact.form.0 {
        if matches!(name.as_str(), "firstName" | "lastName" | "middleName") {
            continue;
        }
        if !f.visible.is_on() {
            continue;
        }
        if name == "country" {
            form.push_str(&render_country_select(f));
        } else {
            form.push_str(&render_field(name, f, name));
        }
    }

    form.push_str(&format!(
        r#"<div class="form-actions center"><button class="btn btn-primary btn-lg" type="submit">{}</button></div>"#,
        html_escape(contact.submit_text.as_deref().unwrap_or("Send Message"))
    ));
    form.push_str("</form>");
    html.push_str(&form);

    if card_visible {
        html.push_str(&render_info_card(config));
    }

    html.push_str("</section>");
    html
}

fn render_field(name: &str, field: &FormField, default_label: &str) -> String {
    let required = field.is_required();
    let label = format!(
        r#"<span class="label">{}{}</span>"#,
        html_escape(field.label.as_deref().unwrap_or(default_label)),
        if required { r#"<span class="req">*</span>"# } else { "" }
    );

    let input_type = field.input_type.as_deref().unwrap_or("text").to_lowercase();
    let required_attr = if required { " required" } else { "" };
    let input = if input_type == "textarea" {
        format!(
            r#"<textarea class="input" name="{}"{}></textarea>"#,
            html_escape(name),
            required_attr
        )
    } else {
        // Email fields always get the email input type
        let t = if name.eq_ignore_ascii_case("email") {
            "email".to_string()
        } else {
            input_type
        };
        format!(
            r#"<input class="input" type="{}" name="{}"{}>"#,
            html_escape(&t),
            html_escape(name),
            required_attr
        )
    };

    format!(r#"<label class="form-field">{}{}</label>"#, label, input)
}

fn render_country_select(field: &FormField) -> String {
    let required = field.is_required();
    let options: String = country_options()
        .iter()
        .map(|c| format!(r#"<option value="{0}">{0}</option>"#, html_escape(c)))
        .collect();
    format!(
        r#"<label class="form-field"><span class="label">{}{}</span><select class="input" name="country"{}>{}</select></label>"#,
        html_escape(field.label.as_deref().unwrap_or("Country")),
        if required { r#"<span class="req">*</span>"# } else { "" },
        if required { " required" } else { "" },
        options
    )
}

fn render_info_card(config: &SiteConfig) -> String {
    let contact = &config.contact;
    let site_title = config.site.title.as_deref();
    let mut html = String::from(r#"<aside class="contact-info-card">"#);

    let shown = |flag: Option<crate::config::YnFlag>| flag.map(|f| f.is_on()).unwrap_or(true);

    match &contact.card {
        Some(card) => {
            let logo_src = card
                .logo
                .as_ref()
                .and_then(|l| l.image.as_deref())
                .or(config.header.logo.as_deref())
                .unwrap_or("/static/images/logo.png");
            let logo_alt = card
                .logo
                .as_ref()
                .and_then(|l| l.alt.as_deref())
                .or(site_title)
                .unwrap_or("Business Logo");
            html.push_str(&format!(
                r#"<img class="biz-logo" src="{}" alt="{}">"#,
                html_escape(logo_src),
                html_escape(logo_alt)
            ));

            let mut line = |visible: bool, icon: Option<&str>, body: String| {
                if !visible || body.is_empty() {
                    return;
                }
                let icon_html = icon
                    .map(|i| {
                        format!(
                            r#"<img class="biz-icon" src="{}" alt="" width="16" height="16"> "#,
                            html_escape(i)
                        )
                    })
                    .unwrap_or_default();
                html.push_str(&format!(
                    r#"<p class="biz-line">{}{}</p>"#,
                    icon_html, body
                ));
            };

            let name = card.name.as_deref().or(site_title).unwrap_or("");
            line(
                shown(card.name_visible),
                None,
                if name.is_empty() {
                    String::new()
                } else {
                    format!("<strong>{}</strong>", html_escape(name))
                },
            );
            line(
                shown(card.title_visible),
                None,
                card.title.as_deref().map(html_escape).unwrap_or_default(),
            );
            line(
                shown(card.address_visible),
                card.icons.address.as_deref(),
                card.address.as_deref().map(html_escape).unwrap_or_default(),
            );
            let email = card
                .email
                .as_deref()
                .or_else(|| contact.email_recipients.first().map(String::as_str))
                .unwrap_or("");
            line(
                shown(card.email_visible),
                card.icons.email.as_deref(),
                html_escape(email),
            );
            line(
                shown(card.phone_visible),
                card.icons.phone.as_deref(),
                card.phone.as_deref().map(html_escape).unwrap_or_default(),
            );
        }
        None => {
            // No card configured: assemble one from site/footer data
            let logo_src = config.header.logo.as_deref().unwrap_or("/static/images/logo.png");
            html.push_str(&format!(
                r#"<img class="biz-logo" src="{}" alt="{}">"#,
                html_escape(logo_src),
                html_escape(site_title.unwrap_or("Business Logo"))
            ));
            let bi = &config.footer.business_info;
            let name = site_title.unwrap_or("Business Name");
            let email = contact
                .email_recipients
                .first()
                .map(String::as_str)
                .or(bi.email.as_deref())
                .unwrap_or("info@example.com");
            html.push_str(&format!(
                r#"<p class="biz-line"><strong>{}</strong></p>"#,
                html_escape(name)
            ));
            html.push_str(&format!(
                r#"<p class="biz-line">{}</p>"#,
                html_escape(bi.address.as_deref().unwrap_or("Address not set"))
            ));
            html.push_str(&format!(r#"<p class="biz-line">{}</p>"#, html_escape(email)));
            if let Some(phone) = &bi.phone {
                html.push_str(&format!(r#"<p class="biz-line">{}</p>"#, html_escape(phone)));
            }
        }
    }

    html.push_str("</aside>");
    html
}

// ── Testimonials page ───────────────────────────────────────

/// Testimonials: configuration-driven form plus the stored list,
/// newest first.
pub fn testimonials_page(config: &SiteConfig, store: &dyn Store) -> String {
    let mut html = String::from(r#"<section class="testimonials-page"><h2>User Testimonials</h2>"#);

    let mut form =
        String::from(r#"<form class="testimonial-form" method="post" action="/testimonials">"#);
    for (name, field) in &config.testimonials.form.0 {
        form.push_str(&render_field(name, field, name));
    }
    form.push_str(
        r#"<div class="form-actions center"><button class="btn btn-primary btn-lg" type="submit">Submit Testimonial</button></div>"#,
    );
    form.push_str("</form>");
    html.push_str(&form);

    let mut list = String::from(r#"<div class="testimonial-list">"#);
    for entry in store.testimonials() {
        list.push_str(&format!(
            r#"<div class="testimonial-card"><div class="testimonial-meta">{} &bull; {} &bull; {}</div><p class="testimonial-text">{}</p></div>"#,
            html_escape(entry.field("name")),
            html_escape(entry.field("email")),
            html_escape(&entry.date),
            html_escape(entry.field("testimonial")),
        ));
    }
    list.push_str("</div>");
    html.push_str(&list);

    html.push_str("</section>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::test_store;
    use crate::store::TestimonialEntry;

    fn config_from(json: &str) -> SiteConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn country_list_pins_united_states_first() {
        let options = country_options();
        assert_eq!(options[0], "United States");
        let rest = &options[1..];
        let mut sorted = rest.to_vec();
        sorted.sort_unstable();
        assert_eq!(rest, &sorted[..]);
        assert!(rest.contains(&"Zimbabwe"));
        assert_eq!(rest.iter().filter(|c| **c == "United States").count(), 0);
    }

    #[test]
    fn contact_form_renders_fields_in_document_order() {
        let cfg = config_from(
            r#"{"contact":{"form":{
                "firstName":{"label":"First Name"},
                "lastName":{"label":"Last Name"},
                "email":{"label":"Email","required":"Y"},
                "country":{"label":"Country"},
                "message":{"label":"Message","type":"textarea","required":"Y"}
            }}}"#,
        );
        let html = contact_page(&cfg, None);
        assert!(html.contains("form-row-2"));
        let email_pos = html.find(r#"name="email""#).unwrap();
        let country_pos = html.find(r#"name="country""#).unwrap();
        let message_pos = html.find("<textarea").unwrap();
        assert!(email_pos < country_pos && country_pos < message_pos);
        assert!(html.contains(r#"type="email""#));
        assert!(html.contains(r#"<span class="req">*</span>"#));
        assert!(html.contains("<option value=\"United States\">"));
    }

    #[test]
    fn invisible_fields_are_skipped() {
        let cfg = config_from(
            r#"{"contact":{"form":{"email":{},"fax":{"visible":"N","label":"Fax"}}}}"#,
        );
        let html = contact_page(&cfg, None);
        assert!(!html.contains("Fax"));
    }

    #[test]
    fn flash_banners_render() {
        let cfg = SiteConfig::default();
        let ok = contact_page(&cfg, Some(("success", "Your message has been sent.")));
        assert!(ok.contains("form-success"));
        let err = contact_page(&cfg, Some(("error", "Failed to send message.")));
        assert!(err.contains("form-error-global"));
    }

    #[test]
    fn card_hides_when_disabled() {
        let cfg = config_from(r#"{"contact":{"card":{"visible":"N","name":"Acme"}}}"#);
        let html = contact_page(&cfg, None);
        assert!(html.contains("no-card"));
        assert!(!html.contains("contact-info-card"));
    }

    #[test]
    fn card_lines_default_visible_with_flag_overrides() {
        let cfg = config_from(
            r#"{"contact":{"card":{"name":"Acme Forge","phone":"(555) 111-2222","phoneVisible":"N","address":"1 Forge Rd"}}}"#,
        );
        let html = contact_page(&cfg, None);
        assert!(html.contains("Acme Forge"));
        assert!(html.contains("1 Forge Rd"));
        assert!(!html.contains("(555) 111-2222"));
    }

    #[test]
    fn testimonials_render_stored_entries_newest_first() {
        let cfg = config_from(
            r#"{"testimonials":{"form":{"name":{"required":"Y"},"email":{},"testimonial":{"type":"textarea","required":"Y"}}}}"#,
        );
        let store = test_store();
        for (name, when) in [("Older", "Jan 01, 2026"), ("Newer", "Feb 01, 2026")] {
            let mut entry = TestimonialEntry::default();
            entry.date = when.to_string();
            entry.fields.insert("name".into(), name.into());
            entry.fields.insert("testimonial".into(), "Great".into());
            store.testimonial_add(&entry).unwrap();
        }
        let html = testimonials_page(&cfg, &store);
        let newer = html.find("Newer").unwrap();
        let older = html.find("Older").unwrap();
        assert!(newer < older);
        assert!(html.contains("<textarea"));
    }
}
