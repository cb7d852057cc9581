use crate::config::{yn_on, SiteConfig, TextPart};
use crate::render::html_escape;
use crate::sections;

/// Home2: the home hero/brand/bullets followed by a master/detail
/// selector — up to six picker items on the left, one content panel
/// visible at a time. All panels render; the embedded site script swaps
/// the hidden flags on click. The first item starts selected.
pub fn render(config: &SiteConfig) -> String {
    let cfg = &config.home2;
    let mut html = String::new();

    for section in [
        sections::hero(config),
        sections::brand(config),
        sections::bulleted_list(config),
    ]
    .into_iter()
    .flatten()
    {
        html.push_str(&section);
    }

    html.push_str(r#"<section class="home2-page">"#);
    html.push_str(&format!(
        "<h2>{}</h2>",
        html_escape(cfg.title.as_deref().unwrap_or("Home 2"))
    ));

    let items: Vec<_> = cfg.items.iter().take(6).collect();

    let mut list = String::from(r#"<div class="home2-list">"#);
    for (idx, item) in items.iter().enumerate() {
        let selected = if idx == 0 { " selected" } else { "" };
        let label = item
            .title
            .clone()
            .unwrap_or_else(|| format!("Item {}", idx + 1));
        let label_style = if yn_on(item.bold) {
            r#" style="font-weight:700""#
        } else {
            ""
        };
        let alt = item
            .alt
            .as_deref()
            .or(item.title.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Item {}", idx + 1));
        list.push_str(&format!(
            r#"<button type="button" class="home2-item{selected}"><img src="{src}" alt="{alt}"><div class="home2-item-label"{label_style}>{label}</div></button>"#,
            selected = selected,
            src = html_escape(item.image.as_deref().unwrap_or("")),
            alt = html_escape(&alt),
            label_style = label_style,
            label = html_escape(&label),
        ));
    }
    list.push_str("</div>");
    html.push_str(&list);

    let mut content = String::from(r#"<div class="home2-content">"#);
    for (idx, item) in items.iter().enumerate() {
        let hidden = if idx == 0 { "" } else { " hidden" };
        content.push_str(&format!(r#"<div class="home2-panel"{}>"#, hidden));
        if let Some(parts) = &item.content {
            content.push_str(&render_text_part(&parts.header, "h3", "home2-header"));
            content.push_str(&render_text_part(&parts.sub_header, "div", "home2-subheader"));
            content.push_str(&render_text_part(&parts.paragraph1, "p", "home2-p"));
            content.push_str(&render_bullets(&parts.bullets));
            content.push_str(&render_text_part(&parts.paragraph2, "p", "home2-p"));
        }
        content.push_str("</div>");
    }
    content.push_str("</div>");
    html.push_str(&content);

    html.push_str("</section>");
    html
}

fn render_text_part(part: &Option<TextPart>, tag: &str, class: &str) -> String {
    let Some(part) = part else {
        return String::new();
    };
    if !part.visible.is_on() {
        return String::new();
    }
    let Some(text) = part.text.as_deref() else {
        return String::new();
    };
    format!(
        r#"<{tag} class="{class}" style="{style}">{text}</{tag}>"#,
        tag = tag,
        class = class,
        style = part_style(part),
        text = html_escape(text),
    )
}

fn render_bullets(part: &Option<TextPart>) -> String {
    let Some(part) = part else {
        return String::new();
    };
    if !part.visible.is_on() || part.items.is_empty() {
        return String::new();
    }
    let style = part_style(part);
    let items: String = part
        .items
        .iter()
        .map(|t| format!(r#"<li style="{}">{}</li>"#, style, html_escape(t)))
        .collect();
    format!(r#"<ul class="home2-bullets">{}</ul>"#, items)
}

fn part_style(part: &TextPart) -> String {
    let mut style = String::new();
    if let Some(size) = &part.font_size {
        style.push_str(&format!("font-size:{};", size));
    }
    if yn_on(part.bold) {
        style.push_str("font-weight:700;");
    }
    if yn_on(part.italic) {
        style.push_str("font-style:italic;");
    }
    if yn_on(part.underline) {
        style.push_str("text-decoration:underline;");
    }
    style
}
