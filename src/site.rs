use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::SiteConfig;

/// Process-wide application context: the parsed site document plus a
/// render counter. Created at startup, populated once from the document
/// load, read-only thereafter (the counter is the only mutable cell).
/// Shared via Rocket managed state so routes and builders can reach it.
pub struct SiteContext {
    pub config: SiteConfig,
    renders: AtomicU64,
}

impl SiteContext {
    pub fn new(config: SiteConfig) -> Self {
        SiteContext {
            config,
            renders: AtomicU64::new(0),
        }
    }

    /// Count one page render. Every navigation — including repeated
    /// navigation to the same page — passes through here, so the counter
    /// strictly increases across identical requests.
    pub fn count_render(&self) -> u64 {
        self.renders.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn renders(&self) -> u64 {
        self.renders.load(Ordering::SeqCst)
    }
}
