use crate::config::MediaItem;
use crate::render::{html_escape, normalize_media_path};

pub const ZOOM_MIN: f32 = 1.0;
pub const ZOOM_MAX: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.25;

/// Pixels of pointer travel before a drag counts as a pan gesture.
const PAN_THRESHOLD: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Images,
    Videos,
}

/// Interaction state of the gallery modal: two independently-paginated
/// tabs, a clamped current index, and zoom/pan for the image stage.
///
/// Invariant: `index` stays within `[0, current_list().len() - 1]`
/// (0 when the current tab is empty); switching tabs resets it to 0.
#[derive(Debug, Clone)]
pub struct GalleryState {
    images: Vec<MediaItem>,
    videos: Vec<MediaItem>,
    tab: Tab,
    index: usize,
    zoom: f32,
    pan: (f32, f32),
    panning: bool,
    pan_travel: f32,
    recent_pan: bool,
}

impl GalleryState {
    /// Open the modal on `items` at the global `start` index. The start
    /// item's media type selects the tab; the index is remapped to the
    /// item's position within that tab.
    pub fn open(items: &[MediaItem], start: usize) -> Self {
        let images: Vec<MediaItem> = items.iter().filter(|it| !it.is_video()).cloned().collect();
        let videos: Vec<MediaItem> = items.iter().filter(|it| it.is_video()).cloned().collect();

        let overall = start.min(items.len().saturating_sub(1));
        let (tab, index) = match items.get(overall) {
            Some(item) if item.is_video() => {
                let local = items[..overall].iter().filter(|it| it.is_video()).count();
                (Tab::Videos, local)
            }
            Some(_) => {
                let local = items[..overall].iter().filter(|it| !it.is_video()).count();
                (Tab::Images, local)
            }
            None => (Tab::Images, 0),
        };

        GalleryState {
            images,
            videos,
            tab,
            index,
            zoom: ZOOM_MIN,
            pan: (0.0, 0.0),
            panning: false,
            pan_travel: 0.0,
            recent_pan: false,
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> (f32, f32) {
        self.pan
    }

    pub fn current_list(&self) -> &[MediaItem] {
        match self.tab {
            Tab::Images => &self.images,
            Tab::Videos => &self.videos,
        }
    }

    pub fn current(&self) -> Option<&MediaItem> {
        self.current_list().get(self.index)
    }

    /// Move to `idx`, clamped to the current tab's bounds. Never wraps.
    pub fn show(&mut self, idx: i64) {
        let len = self.current_list().len();
        let max = len.saturating_sub(1) as i64;
        self.index = idx.clamp(0, max) as usize;
    }

    pub fn next(&mut self) {
        self.show(self.index as i64 + 1);
    }

    pub fn prev(&mut self) {
        self.show(self.index as i64 - 1);
    }

    /// Switch tabs; the index resets to the first item of the new tab.
    pub fn switch_tab(&mut self, tab: Tab) {
        if tab != self.tab {
            self.tab = tab;
            self.index = 0;
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(ZOOM_MAX);
    }

    /// Zooming back out to the minimum recenters the image.
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(ZOOM_MIN);
        if self.zoom <= ZOOM_MIN {
            self.pan = (0.0, 0.0);
        }
    }

    /// Begin a drag. Panning only engages while zoomed in.
    pub fn start_pan(&mut self) {
        if self.zoom > ZOOM_MIN {
            self.panning = true;
            self.pan_travel = 0.0;
        }
    }

    pub fn move_pan(&mut self, dx: f32, dy: f32) {
        if !self.panning {
            return;
        }
        self.pan.0 += dx;
        self.pan.1 += dy;
        self.pan_travel += (dx * dx + dy * dy).sqrt();
        if self.pan_travel > PAN_THRESHOLD {
            self.recent_pan = true;
        }
    }

    /// End the drag. The recent-pan cool-down stays set until
    /// `clear_pan_cooldown` runs (a deferred reset in the browser).
    pub fn end_pan(&mut self) {
        self.panning = false;
    }

    pub fn clear_pan_cooldown(&mut self) {
        self.recent_pan = false;
    }

    /// Whether a click on the stage advances to the next item. Suppressed
    /// on videos, while zoomed in, and during the pan cool-down so a drag
    /// never doubles as an accidental advance.
    pub fn click_advances(&self) -> bool {
        if self.current().map(|it| it.is_video()).unwrap_or(false) {
            return false;
        }
        self.zoom <= ZOOM_MIN && !self.recent_pan
    }

    pub fn counter_label(&self) -> String {
        let noun = match self.tab {
            Tab::Images => "Image",
            Tab::Videos => "Video",
        };
        format!(
            "{} {} of {}",
            noun,
            self.index + 1,
            self.current_list().len()
        )
    }
}

/// Render the modal skeleton for a product's gallery in its opening
/// state. Ships hidden; the embedded gallery script activates it and
/// drives the live interactions from there.
pub fn render_modal(state: &GalleryState, title: &str, info_html: &str) -> String {
    let tab_images_selected = state.tab() == Tab::Images;

    let mut thumbs = String::new();
    for (i, item) in state.current_list().iter().enumerate() {
        let active = if i == state.index() { " active" } else { "" };
        let inner = if item.is_video() {
            match &item.poster {
                Some(poster) => format!(
                    r#"<img src="{}" alt="thumb {}" loading="lazy">"#,
                    html_escape(&normalize_media_path(poster)),
                    i + 1
                ),
                None => r#"<span class="gm-thumb-video">&#9658;</span>"#.to_string(),
            }
        } else {
            format!(
                r#"<img src="{}" alt="thumb {}" loading="lazy">"#,
                html_escape(&normalize_media_path(item.source())),
                i + 1
            )
        };
        thumbs.push_str(&format!(
            r#"<button class="gm-thumb{}" data-idx="{}">{}</button>"#,
            active, i, inner
        ));
    }

    let stage = match state.current() {
        Some(item) if item.is_video() => {
            let poster = item
                .poster
                .as_deref()
                .map(|p| format!(r#" poster="{}""#, html_escape(&normalize_media_path(p))))
                .unwrap_or_default();
            format!(
                r#"<video class="gm-video" controls preload="metadata"{} src="{}"></video>"#,
                poster,
                html_escape(&normalize_media_path(item.source()))
            )
        }
        Some(item) => format!(
            r#"<img class="gm-image" src="{}" alt="{}">"#,
            html_escape(&normalize_media_path(item.source())),
            html_escape(title)
        ),
        None => String::new(),
    };

    format!(
        r#"<div class="gallery-modal" hidden>
  <div class="gm-backdrop"></div>
  <div class="gm-dialog" role="dialog" aria-label="{title}" aria-modal="true" tabindex="-1">
    <button class="gm-close" aria-label="Close">&times;</button>
    <div class="gm-tabs" role="tablist">
      <button class="gm-tab" role="tab" aria-selected="{imgs_sel}" data-tab="images">Images</button>
      <button class="gm-tab" role="tab" aria-selected="{vids_sel}" data-tab="videos">Videos</button>
    </div>
    <div class="gm-thumbs">{thumbs}</div>
    <div class="gm-counter" aria-live="polite">{counter}</div>
    <div class="gm-hint">Esc to close &bull; &larr; &rarr; to navigate &bull; Click image to advance</div>
    <div class="gm-body">
      <div class="gm-main">
        <button class="gm-nav gm-prev" aria-label="Previous">&lsaquo;</button>
        <div class="gm-stage">{stage}</div>
        <button class="gm-nav gm-next" aria-label="Next">&rsaquo;</button>
        <div class="gm-zoombar">
          <button class="gm-zoom gm-zoom-in" aria-label="Zoom in">+</button>
          <button class="gm-zoom gm-zoom-out" aria-label="Zoom out">&minus;</button>
          <button class="gm-fullscreen" aria-label="Fullscreen">&#x2922;</button>
        </div>
      </div>
      <aside class="gm-info">
        <h3 class="gm-title">{title}</h3>
        <div class="gm-info-content">{info}
          <div class="gm-notes" contenteditable="true" aria-label="Notes" data-placeholder="Type notes here..."></div>
        </div>
      </aside>
    </div>
  </div>
</div>"#,
        title = html_escape(title),
        imgs_sel = tab_images_selected,
        vids_sel = !tab_images_selected,
        thumbs = thumbs,
        counter = state.counter_label(),
        stage = stage,
        info = info_html,
    )
}
