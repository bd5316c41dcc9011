use std::time::{Duration, Instant};

/// How long the tray stays up after the last qualifying interaction.
pub const DEFAULT_HIDE_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayVisibility {
    Visible,
    Hidden,
}

/// Visibility driver for the floating action buttons.
///
/// The tray shows on every qualifying interaction and re-arms a hide
/// deadline; starting a stroke hides it immediately so buttons never sit
/// over fresh ink. Purely deadline driven: callers feed `now` into
/// [`ActionTray::tick`], nothing here reads the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTray {
    visibility: TrayVisibility,
    hide_deadline: Option<Instant>,
    delay: Duration,
}

impl ActionTray {
    pub fn new(delay: Duration) -> Self {
        Self {
            visibility: TrayVisibility::Visible,
            hide_deadline: None,
            delay,
        }
    }

    pub fn visibility(&self) -> TrayVisibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == TrayVisibility::Visible
    }

    /// A qualifying interaction: show the tray and restart the countdown.
    pub fn interact(&mut self, now: Instant) {
        self.set_visibility(TrayVisibility::Visible);
        self.hide_deadline = Some(now + self.delay);
    }

    /// A stroke just started; hide immediately and stop any countdown.
    pub fn stroke_began(&mut self) {
        self.hide_deadline = None;
        self.set_visibility(TrayVisibility::Hidden);
    }

    /// Stops the countdown without changing visibility. Used on unmount.
    pub fn cancel(&mut self) {
        self.hide_deadline = None;
    }

    /// Applies a pending hide once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        let Some(deadline) = self.hide_deadline else {
            return;
        };
        if now >= deadline {
            self.hide_deadline = None;
            self.set_visibility(TrayVisibility::Hidden);
        }
    }

    fn set_visibility(&mut self, next: TrayVisibility) {
        if self.visibility != next {
            tracing::debug!(from = ?self.visibility, to = ?next, "tray visibility changed");
            self.visibility = next;
        }
    }
}

impl Default for ActionTray {
    fn default() -> Self {
        Self::new(DEFAULT_HIDE_DELAY)
    }
}
