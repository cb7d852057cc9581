use crate::config::SiteConfig;

/// Build the `:root` CSS custom-property block from the site document's
/// theme and style sections. Only configured values are emitted, except
/// the hero overlay trio which is always decided here: when the overlay
/// switch is off, opacity/blur/blend are forced neutral no matter what
/// the other overlay fields say.
pub fn build_css_variables(config: &SiteConfig) -> String {
    let mut vars: Vec<(&str, String)> = Vec::new();
    let mut push = |name: &'static str, value: Option<String>| {
        if let Some(v) = value {
            if !v.trim().is_empty() {
                vars.push((name, v));
            }
        }
    };

    let theme = &config.site.theme;
    push("--primary", theme.primary.clone());
    push("--secondary", theme.secondary.clone());
    push("--bg", theme.background.clone());
    push("--text", theme.text.clone());
    push("--surface", theme.surface.clone());
    push("--muted", theme.muted.clone());

    let header = &config.site.styles.header;
    push("--logo-width", header.logo_width.as_ref().and_then(|v| v.css_size()));
    push("--logo-height", header.logo_height.as_ref().and_then(|v| v.css_size()));
    push("--social-icon-bg", header.social_icon_bg.clone());

    let home = &config.site.styles.home;
    push("--home_hero_height", home.hero_height.as_ref().and_then(|v| v.css_size()));
    push("--home_hero_width", home.hero_width.as_ref().and_then(|v| v.css_size()));

    if home.hero_overlay_enabled.is_on() {
        push("--hero-overlay-color", home.hero_overlay_color.clone());
        push(
            "--hero-overlay-opacity",
            home.hero_overlay_opacity.map(|o| format!("{}", o)),
        );
        push("--hero-overlay-blur", home.hero_overlay_blur.clone());
        push("--hero-overlay-blend", home.hero_overlay_blend_mode.clone());
    } else {
        // Overlay forced off globally; this always wins
        vars.push(("--hero-overlay-opacity", "0".to_string()));
        vars.push(("--hero-overlay-blur", "none".to_string()));
        vars.push(("--hero-overlay-blend", "normal".to_string()));
    }

    let body: String = vars
        .iter()
        .map(|(name, value)| format!("    {}: {};\n", name, value))
        .collect();

    format!(":root {{\n{}}}", body)
}

/// Inline overlay custom properties set directly on the hero section
/// element so the overlay takes effect with the fragment itself. Mirrors
/// the global decision above, with the overlay opacity clamped to [0, 1].
pub fn hero_overlay_inline(config: &SiteConfig) -> String {
    let home = &config.site.styles.home;
    if home.hero_overlay_enabled.is_on() {
        let color = home.hero_overlay_color.as_deref().unwrap_or("#000000");
        let opacity = home.hero_overlay_opacity.unwrap_or(0.0).clamp(0.0, 1.0);
        let mut style = format!(
            "--hero-overlay-color: {}; --hero-overlay-opacity: {};",
            color, opacity
        );
        if let Some(blur) = &home.hero_overlay_blur {
            style.push_str(&format!(" --hero-overlay-blur: {};", blur));
        }
        if let Some(blend) = &home.hero_overlay_blend_mode {
            style.push_str(&format!(" --hero-overlay-blend: {};", blend));
        }
        style
    } else {
        "--hero-overlay-opacity: 0; --hero-overlay-blur: none; --hero-overlay-blend: normal;"
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::YnFlag;

    fn config_with_overlay(enabled: bool) -> SiteConfig {
        let mut config = SiteConfig::default();
        let home = &mut config.site.styles.home;
        home.hero_overlay_enabled = YnFlag(enabled);
        home.hero_overlay_color = Some("#ff0000".to_string());
        home.hero_overlay_opacity = Some(0.8);
        home.hero_overlay_blur = Some("4px".to_string());
        home.hero_overlay_blend_mode = Some("multiply".to_string());
        config
    }

    #[test]
    fn theme_colors_become_variables() {
        let mut config = SiteConfig::default();
        config.site.theme.primary = Some("#123456".to_string());
        config.site.theme.muted = Some("#999".to_string());
        let css = build_css_variables(&config);
        assert!(css.contains("--primary: #123456;"));
        assert!(css.contains("--muted: #999;"));
        assert!(!css.contains("--secondary"));
    }

    #[test]
    fn overlay_enabled_passes_values_through() {
        let css = build_css_variables(&config_with_overlay(true));
        assert!(css.contains("--hero-overlay-color: #ff0000;"));
        assert!(css.contains("--hero-overlay-opacity: 0.8;"));
        assert!(css.contains("--hero-overlay-blur: 4px;"));
        assert!(css.contains("--hero-overlay-blend: multiply;"));
    }

    #[test]
    fn overlay_disabled_forces_neutral_values() {
        // Explicit overlay values are supplied, and must lose
        let css = build_css_variables(&config_with_overlay(false));
        assert!(css.contains("--hero-overlay-opacity: 0;"));
        assert!(css.contains("--hero-overlay-blur: none;"));
        assert!(css.contains("--hero-overlay-blend: normal;"));
        assert!(!css.contains("#ff0000"));
        assert!(!css.contains("multiply"));
    }

    #[test]
    fn inline_overlay_clamps_opacity() {
        let mut config = config_with_overlay(true);
        config.site.styles.home.hero_overlay_opacity = Some(3.5);
        let style = hero_overlay_inline(&config);
        assert!(style.contains("--hero-overlay-opacity: 1;"));
    }

    #[test]
    fn inline_overlay_disabled_is_neutral() {
        let style = hero_overlay_inline(&config_with_overlay(false));
        assert!(style.contains("--hero-overlay-opacity: 0;"));
        assert!(style.contains("--hero-overlay-blur: none;"));
    }
}
