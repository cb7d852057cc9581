use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Y/N flag as found throughout the site document. Only a case-insensitive
/// "Y" (or a literal boolean `true`) counts as yes; everything else is no.
/// Normalized to a bool once at load time. An absent flag reads as Y;
/// fields that hide by default carry `Option<YnFlag>` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YnFlag(pub bool);

impl YnFlag {
    pub fn is_on(self) -> bool {
        self.0
    }
}

impl Default for YnFlag {
    fn default() -> Self {
        YnFlag(true)
    }
}

/// Absent-means-no reading for the `Option<YnFlag>` fields.
pub fn yn_on(flag: Option<YnFlag>) -> bool {
    flag.map(|f| f.0).unwrap_or(false)
}

impl<'de> Deserialize<'de> for YnFlag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct YnVisitor;

        impl<'de> Visitor<'de> for YnVisitor {
            type Value = YnFlag;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a \"Y\"/\"N\" string or boolean")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<YnFlag, E> {
                Ok(YnFlag(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<YnFlag, E> {
                Ok(YnFlag(v.trim().eq_ignore_ascii_case("y")))
            }

            // Numbers and nulls never spell "Y"
            fn visit_i64<E: de::Error>(self, _: i64) -> Result<YnFlag, E> {
                Ok(YnFlag(false))
            }

            fn visit_u64<E: de::Error>(self, _: u64) -> Result<YnFlag, E> {
                Ok(YnFlag(false))
            }

            fn visit_f64<E: de::Error>(self, _: f64) -> Result<YnFlag, E> {
                Ok(YnFlag(false))
            }

            fn visit_unit<E: de::Error>(self) -> Result<YnFlag, E> {
                Ok(YnFlag(false))
            }
        }

        deserializer.deserialize_any(YnVisitor)
    }
}

/// A size value from the document: either a bare number (pixels implied)
/// or a string that may carry its own CSS units ("40px", "2rem").
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SizeValue {
    Num(f64),
    Str(String),
}

impl SizeValue {
    /// Convert to a CSS size string. Bare numbers and digit-only strings
    /// become pixels; anything else passes through as-is.
    pub fn css_size(&self) -> Option<String> {
        match self {
            SizeValue::Num(n) if n.is_finite() => Some(format!("{}px", trim_float(*n))),
            SizeValue::Num(_) => None,
            SizeValue::Str(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                if s.bytes().all(|b| b.is_ascii_digit()) {
                    Some(format!("{}px", s))
                } else {
                    Some(s.to_string())
                }
            }
        }
    }

    /// Force the value into pixel units. Used for heights which must be
    /// pixels; a string with foreign units is reduced to its leading number.
    pub fn css_px(&self) -> Option<String> {
        match self {
            SizeValue::Num(n) if n.is_finite() => Some(format!("{}px", trim_float(*n))),
            SizeValue::Num(_) => None,
            SizeValue::Str(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                let digits: String = s
                    .chars()
                    .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                    .collect();
                let n: f64 = digits.parse().ok()?;
                if n.is_finite() {
                    Some(format!("{}px", trim_float(n)))
                } else {
                    None
                }
            }
        }
    }
}

fn trim_float(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Ordered form-field map. The document's field order drives the rendered
/// field order, so a plain HashMap would scramble the form.
#[derive(Debug, Clone, Default)]
pub struct FormFields(pub Vec<(String, FormField)>);

impl<'de> Deserialize<'de> for FormFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = FormFields;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field name to field definition")
            }

            fn visit_map<A>(self, mut map: A) -> Result<FormFields, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut out = Vec::new();
                while let Some((name, field)) = map.next_entry::<String, FormField>()? {
                    out.push((name, field));
                }
                Ok(FormFields(out))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FormField {
    pub label: Option<String>,
    pub required: Option<YnFlag>,
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub visible: YnFlag,
}

impl FormField {
    pub fn is_required(&self) -> bool {
        yn_on(self.required)
    }
}

// ── Root document ───────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub header: HeaderSection,
    pub footer: FooterSection,
    pub home: HomeSection,
    pub home2: Home2Section,
    pub products: ProductsSection,
    pub contact: ContactSection,
    pub testimonials: TestimonialsSection,
}

impl SiteConfig {
    /// Load and parse the site document. Called once at boot; the result is
    /// read-only for the life of the process.
    pub fn load(path: &Path) -> Result<SiteConfig, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        serde_json::from_str(&raw).map_err(|e| format!("Cannot parse {}: {}", path.display(), e))
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SiteSection {
    pub title: Option<String>,
    /// Page enablement map. A page absent from the map is enabled.
    pub pages: HashMap<String, YnFlag>,
    pub theme: Theme,
    pub styles: Styles,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Theme {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub background: Option<String>,
    pub text: Option<String>,
    pub surface: Option<String>,
    pub muted: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Styles {
    pub header: HeaderStyles,
    pub home: HomeStyles,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderStyles {
    pub logo_width: Option<SizeValue>,
    pub logo_height: Option<SizeValue>,
    pub social_icon_bg: Option<String>,
    pub social_icon_padding: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct HomeStyles {
    pub hero_height: Option<SizeValue>,
    pub hero_width: Option<SizeValue>,
    pub hero_overlay_enabled: YnFlag,
    pub hero_overlay_color: Option<String>,
    pub hero_overlay_opacity: Option<f64>,
    pub hero_overlay_blur: Option<String>,
    pub hero_overlay_blend_mode: Option<String>,
    pub hero_scale: YnFlag,
    pub hero_maintain_aspect: YnFlag,
    pub hero_fit: Option<String>,
    pub hero_text1: HeroText,
    pub hero_text2: HeroText,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroText {
    pub text: Option<String>,
    pub font_size: Option<String>,
    pub color: Option<String>,
    pub bold: Option<YnFlag>,
    pub italic: Option<YnFlag>,
}

// ── Header / footer ─────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderSection {
    pub logo: Option<String>,
    pub banner: Option<String>,
    /// Breadcrumb trail is opt-in
    pub breadcrumbs: Option<YnFlag>,
    pub menu: Vec<MenuItem>,
    pub social_media: Vec<SocialLink>,
    pub social_icon_size: Option<SizeValue>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct MenuItem {
    pub text: Option<String>,
    pub hash: Option<String>,
    pub visible: YnFlag,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SocialLink {
    pub name: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub visible: YnFlag,
    pub width: Option<SizeValue>,
    pub height: Option<SizeValue>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterSection {
    pub links: Vec<FooterLink>,
    pub business_info: BusinessInfo,
    pub badges: Vec<Badge>,
    pub badge_size: Option<SizeValue>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FooterLink {
    pub text: Option<String>,
    pub url: Option<String>,
    pub visible: YnFlag,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct BusinessInfo {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Badge {
    pub image: Option<String>,
    pub alt: Option<String>,
    pub visible: YnFlag,
    pub width: Option<SizeValue>,
    pub height: Option<SizeValue>,
}

// ── Home ────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct HomeSection {
    pub hero: Option<HeroImage>,
    pub banner: Option<HeroImage>,
    pub brand_section: BrandSection,
    pub bulleted_list: BulletedList,
    pub image_text_blocks: ImageTextBlocks,
    pub carousel: Carousel,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct HeroImage {
    pub image: Option<String>,
    pub alt: Option<String>,
    pub visible: YnFlag,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct BrandSection {
    pub visible: YnFlag,
    pub title: Option<String>,
    pub text: Option<String>,
    pub cta: Option<CallToAction>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CallToAction {
    /// The call-to-action is opt-in
    pub visible: Option<YnFlag>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct BulletedList {
    pub visible: YnFlag,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ImageTextBlocks {
    pub visible: YnFlag,
    pub items: Vec<ImageTextBlock>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ImageTextBlock {
    pub image: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub position: Option<String>,
    pub align: Option<String>,
    pub width: Option<SizeValue>,
    pub height: Option<SizeValue>,
}

impl ImageTextBlock {
    /// Alignment keyword: `align` wins over `position`, default "left".
    pub fn alignment(&self) -> String {
        self.align
            .as_deref()
            .or(self.position.as_deref())
            .unwrap_or("left")
            .to_lowercase()
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Carousel {
    pub visible: YnFlag,
    pub items: Vec<MediaItem>,
    pub media_height: Option<SizeValue>,
    pub media_width: Option<SizeValue>,
}

// ── Media ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub src: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
    pub poster: Option<String>,
    pub autoplay: bool,
    pub muted: Option<bool>,
    pub link: Option<String>,
    pub text: Option<String>,
}

impl MediaItem {
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    /// Best source for this item: videos prefer `video`, images prefer
    /// `image`, both fall back to `src`.
    pub fn source(&self) -> &str {
        let primary = if self.is_video() {
            self.video.as_deref()
        } else {
            self.image.as_deref()
        };
        primary.or(self.src.as_deref()).unwrap_or("")
    }

    /// Autoplaying videos are muted unless the document says otherwise.
    pub fn effective_muted(&self) -> bool {
        self.muted.unwrap_or(self.autoplay)
    }
}

// ── Home2 ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Home2Section {
    pub title: Option<String>,
    pub items: Vec<Home2Item>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Home2Item {
    pub image: Option<String>,
    pub alt: Option<String>,
    pub title: Option<String>,
    pub bold: Option<YnFlag>,
    pub content: Option<Home2Content>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Home2Content {
    pub header: Option<TextPart>,
    pub sub_header: Option<TextPart>,
    pub paragraph1: Option<TextPart>,
    pub bullets: Option<TextPart>,
    pub paragraph2: Option<TextPart>,
}

/// One stylable content part of a home2 panel. `text` for line parts,
/// `items` for the bullet part.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TextPart {
    pub visible: YnFlag,
    pub text: Option<String>,
    pub items: Vec<String>,
    pub font_size: Option<String>,
    pub bold: Option<YnFlag>,
    pub italic: Option<YnFlag>,
    pub underline: Option<YnFlag>,
}

// ── Products ────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductsSection {
    pub items: Vec<Product>,
    pub thumbnail: ThumbnailSize,
    pub desktop_thumbs: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThumbnailSize {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub gallery: Vec<MediaItem>,
    pub bullets: Vec<String>,
    pub buy_buttons: Vec<BuyButton>,
    pub description_html: Option<String>,
    pub details_html: Option<String>,
    pub visible: YnFlag,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct BuyButton {
    pub text: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub visible: YnFlag,
}

// ── Contact / testimonials ──────────────────────────────────

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactSection {
    pub form: FormFields,
    pub card: Option<ContactCard>,
    pub email_recipients: Vec<String>,
    pub submit_text: Option<String>,
    pub success_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactCard {
    pub visible: YnFlag,
    pub logo: Option<CardLogo>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    // Absent visibility flags default per use site: card lines show,
    // the header contact strip hides.
    pub name_visible: Option<YnFlag>,
    pub title_visible: Option<YnFlag>,
    pub address_visible: Option<YnFlag>,
    pub email_visible: Option<YnFlag>,
    pub phone_visible: Option<YnFlag>,
    pub icons: CardIcons,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CardLogo {
    pub image: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CardIcons {
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TestimonialsSection {
    pub form: FormFields,
}
