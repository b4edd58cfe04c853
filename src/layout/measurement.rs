//! Text measurement surface shared between engines
//!
//! A [`MeasurementSurface`] holds the font metrics that have been loaded so far and
//! turns a run of text into an intrinsic size. Surfaces are handed out by a
//! [`MeasurementPool`]: the first `acquire` allocates the surface, later calls share
//! it, and it is released once the last handle is dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock, Weak};

use tracing::debug;

use super::config::LayoutConfig;
use super::types::Size;

/// Per-family metrics, expressed as fractions of the font size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Average glyph advance
    pub char_width: f64,
    /// Line box height
    pub line_height: f64,
}

impl FontMetrics {
    pub fn new(char_width: f64, line_height: f64) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

/// Off-screen measurement state
#[derive(Debug, Default)]
pub struct MeasurementSurface {
    fonts: RwLock<HashMap<String, FontMetrics>>,
}

impl MeasurementSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metrics for a font family, e.g. after the font finished loading
    pub fn register_font(&self, family: impl Into<String>, metrics: FontMetrics) {
        let mut fonts = self.fonts.write().unwrap_or_else(PoisonError::into_inner);
        fonts.insert(family.into(), metrics);
    }

    pub fn font(&self, family: &str) -> Option<FontMetrics> {
        let fonts = self.fonts.read().unwrap_or_else(PoisonError::into_inner);
        fonts.get(family).copied()
    }

    /// Measure a single line of text.
    ///
    /// Falls back to the ratios in [`LayoutConfig`] when no metrics are registered for
    /// `family`, so the result is deterministic whether or not fonts have loaded.
    pub fn measure_text(
        &self,
        text: &str,
        font_size: f64,
        family: Option<&str>,
        config: &LayoutConfig,
    ) -> Size {
        let metrics = family.and_then(|f| self.font(f)).unwrap_or_else(|| {
            if let Some(f) = family {
                debug!(family = f, "no metrics loaded, using fallback text metrics");
            }
            FontMetrics::new(config.char_width_ratio, config.line_height_ratio)
        });

        let chars = text.chars().count() as f64;
        Size::new(
            chars * metrics.char_width * font_size,
            metrics.line_height * font_size,
        )
    }
}

/// Reference-counted source of [`MeasurementSurface`] handles
#[derive(Debug, Default)]
pub struct MeasurementPool {
    slot: Mutex<Weak<MeasurementSurface>>,
}

impl MeasurementPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide pool used by [`LayoutEngine::new`](super::LayoutEngine::new)
    pub fn global() -> &'static MeasurementPool {
        static GLOBAL: OnceLock<MeasurementPool> = OnceLock::new();
        GLOBAL.get_or_init(MeasurementPool::new)
    }

    /// Get a handle to the shared surface, allocating it if no handle is alive
    pub fn acquire(&self) -> Arc<MeasurementSurface> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(surface) = slot.upgrade() {
            return surface;
        }
        debug!("allocating measurement surface");
        let surface = Arc::new(MeasurementSurface::new());
        *slot = Arc::downgrade(&surface);
        surface
    }

    /// Number of live handles; zero means the surface has been released
    pub fn active_handles(&self) -> usize {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.strong_count()
    }
}
