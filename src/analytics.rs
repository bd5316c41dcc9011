//! Usage analytics with an explicit, idempotent initialisation step.
//!
//! Events route to a host-installed sink. Until [`ensure_initialized`] runs,
//! or when the config disables tracking, every event is dropped silently.

use once_cell::sync::Lazy;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMethod {
    NativeShare,
    Download,
}

impl ShareMethod {
    pub fn as_label(self) -> &'static str {
        match self {
            ShareMethod::NativeShare => "native_share",
            ShareMethod::Download => "download",
        }
    }
}

/// Everything the engine reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsEvent {
    DrawingSaved,
    DrawingShared { method: ShareMethod },
    DrawingDeleted,
    GalleryOpened { drawing_count: usize },
    Undo,
    Redo,
    CanvasCleared,
}

impl AnalyticsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::DrawingSaved => "drawing_saved",
            AnalyticsEvent::DrawingShared { .. } => "drawing_shared",
            AnalyticsEvent::DrawingDeleted => "drawing_deleted",
            AnalyticsEvent::GalleryOpened { .. } => "gallery_opened",
            AnalyticsEvent::Undo => "drawing_undo",
            AnalyticsEvent::Redo => "drawing_redo",
            AnalyticsEvent::CanvasCleared => "canvas_cleared",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            AnalyticsEvent::DrawingSaved
            | AnalyticsEvent::DrawingShared { .. }
            | AnalyticsEvent::DrawingDeleted => "engagement",
            AnalyticsEvent::GalleryOpened { .. } => "navigation",
            AnalyticsEvent::Undo | AnalyticsEvent::Redo | AnalyticsEvent::CanvasCleared => {
                "canvas_action"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub enabled: bool,
    pub app_tag: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_tag: "tiny-doodle".to_string(),
        }
    }
}

pub type AnalyticsSink = Box<dyn Fn(&AnalyticsEvent) + Send + Sync>;

static CONFIG: Lazy<Mutex<Option<AnalyticsConfig>>> = Lazy::new(|| Mutex::new(None));
static SINK: Lazy<Mutex<Option<AnalyticsSink>>> = Lazy::new(|| Mutex::new(None));

/// Installs the analytics config once. Later calls keep the first config and
/// report `false`, so every startup path can call this unconditionally.
pub fn ensure_initialized(config: AnalyticsConfig) -> bool {
    let Ok(mut slot) = CONFIG.lock() else {
        return false;
    };
    if slot.is_some() {
        return false;
    }
    tracing::debug!(app_tag = %config.app_tag, enabled = config.enabled, "analytics initialised");
    *slot = Some(config);
    true
}

pub fn is_initialized() -> bool {
    CONFIG.lock().map(|slot| slot.is_some()).unwrap_or(false)
}

pub fn config() -> Option<AnalyticsConfig> {
    CONFIG.lock().ok().and_then(|slot| slot.clone())
}

/// Installs or removes the delivery sink.
pub fn set_sink(sink: Option<AnalyticsSink>) {
    if let Ok(mut slot) = SINK.lock() {
        *slot = sink;
    }
}

/// Reports one event. A no-op before initialisation and when disabled.
pub fn track(event: AnalyticsEvent) {
    let enabled = match CONFIG.lock() {
        Ok(slot) => slot.as_ref().map(|config| config.enabled),
        Err(_) => None,
    };
    if enabled != Some(true) {
        return;
    }
    tracing::debug!(event = event.name(), category = event.category(), "analytics event");
    if let Ok(slot) = SINK.lock() {
        if let Some(sink) = slot.as_ref() {
            sink(&event);
        }
    }
}

/// Clears config and sink so tests can exercise initialisation again.
pub fn reset_for_test() {
    if let Ok(mut slot) = CONFIG.lock() {
        *slot = None;
    }
    set_sink(None);
}
