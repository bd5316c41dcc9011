//! The drawing session: one mounted surface, its stroke recorder, history
//! and action tray, plus the restore/resize plumbing that ties them together.
//!
//! All painting happens synchronously on the caller's thread. The only
//! asynchronous work is decoding a persisted token back into pixels, which
//! runs on a worker thread and is applied from [`CanvasSession::tick`]. Every
//! reflow bumps a generation counter and decode replies carry the generation
//! they were requested under, so a decode that lands after a later resize is
//! dropped instead of painting stale pixels onto the wrong surface.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::analytics::{self, AnalyticsEvent};
use crate::export::{self, ShareOutcome, ShareSink};
use crate::geometry::{self, BoundsRect, PointerInput};
use crate::history::SnapshotHistory;
use crate::model::Color;
use crate::settings::DoodleSettings;
use crate::stroke::{StrokeEnd, StrokeRecorder};
use crate::surface::Surface;
use crate::token::{self, ContentToken};
use crate::tray::ActionTray;

/// Question put to the confirmation closure before a clear.
pub const CLEAR_CONFIRM_PROMPT: &str = "Clear your drawing? This cannot be undone!";

/// Notifications for the host, drained after each call into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The surface changed through a committed mutation; `token` is its new
    /// persisted form. Hosts store it and pass it back on the next mount.
    ContentChanged { token: ContentToken },
    /// The user asked to keep the current drawing in the collection.
    SaveRequested { token: ContentToken },
    /// A share attempt failed for a reason other than user cancellation. The
    /// host owes the user one failure notice.
    ShareFailed,
}

struct RestoreReply {
    generation: u64,
    pixels: Result<Vec<u8>>,
}

/// Owns the raster surface and everything that mutates it.
///
/// A session is driven entirely by host calls: pointer events, the action
/// buttons, resize notifications and a periodic [`tick`](Self::tick). Between
/// mount and unmount it keeps the surface, the undo history and the tray
/// consistent with each other; outside that window every operation degrades
/// to a no-op.
pub struct CanvasSession {
    settings: DoodleSettings,
    rect: Option<BoundsRect>,
    surface: Option<Surface>,
    recorder: StrokeRecorder,
    history: SnapshotHistory,
    tray: ActionTray,
    last_persisted: Option<ContentToken>,
    events: Vec<HostEvent>,
    generation: u64,
    pending_restores: usize,
    restore_tx: Sender<RestoreReply>,
    restore_rx: Receiver<RestoreReply>,
}

impl CanvasSession {
    pub fn new(settings: DoodleSettings) -> Self {
        let (restore_tx, restore_rx) = std::sync::mpsc::channel();
        Self {
            tray: ActionTray::new(settings.tray_hide_delay()),
            history: SnapshotHistory::new(settings.history_cap),
            settings,
            rect: None,
            surface: None,
            recorder: StrokeRecorder::new(),
            last_persisted: None,
            events: Vec::new(),
            generation: 0,
            pending_restores: 0,
            restore_tx,
            restore_rx,
        }
    }

    /// Brings the session up at the given display rectangle. With
    /// `initial_content` set, the surface shows the background fill until the
    /// decoded drawing lands on a later [`tick`](Self::tick); without it the
    /// fresh fill is captured immediately as the undo floor.
    pub fn mount(&mut self, rect: BoundsRect, initial_content: Option<ContentToken>) {
        self.last_persisted = initial_content;
        self.reflow(rect);
    }

    /// Rebuilds the surface at a new display rectangle. In-memory history is
    /// discarded; visual content survives by re-decoding the most recently
    /// persisted token.
    pub fn handle_resize(&mut self, rect: BoundsRect) {
        if self.surface.is_none() {
            tracing::debug!("resize before mount ignored");
            return;
        }
        self.reflow(rect);
    }

    /// Tears the session down: stops the tray countdown and orphans any
    /// in-flight restore decode. The last persisted token is kept so a later
    /// mount can pick up where this one left off.
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.tray.cancel();
        self.recorder = StrokeRecorder::new();
        self.history.reset();
        self.surface = None;
        self.rect = None;
    }

    /// Starts a stroke at the pointer position with the picker's current
    /// colour and width, hiding the tray so it never sits over fresh ink.
    pub fn begin_stroke(&mut self, input: &PointerInput, color: Color, width: u32) {
        let Some(point) = geometry::surface_point(input, self.rect.as_ref()) else {
            return;
        };
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        self.tray.stroke_began();
        self.recorder.begin(surface, point, color, width);
    }

    /// Extends the active stroke to the pointer position. Stray move events
    /// outside a stroke fall through the recorder as no-ops.
    pub fn continue_stroke(&mut self, input: &PointerInput) {
        let Some(point) = geometry::surface_point(input, self.rect.as_ref()) else {
            return;
        };
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        self.recorder.extend(surface, point);
    }

    /// Finishes the active stroke: captures a snapshot, re-persists the
    /// surface and shows the tray. Pointer-up echoes (a leave event after the
    /// up already fired) commit nothing.
    pub fn finish_stroke(&mut self, now: Instant) {
        if self.recorder.end() == StrokeEnd::Committed {
            self.capture_current();
            self.persist_and_emit();
            self.tray.interact(now);
        }
    }

    /// Repaints the surface with the background fill, but only after the
    /// confirmation closure accepts [`CLEAR_CONFIRM_PROMPT`]. Declining
    /// changes nothing.
    pub fn clear<F>(&mut self, confirm: F)
    where
        F: FnOnce(&str) -> bool,
    {
        if self.surface.is_none() {
            return;
        }
        if !confirm(CLEAR_CONFIRM_PROMPT) {
            tracing::debug!("clear declined by the user");
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.fill(self.settings.background);
        }
        self.capture_current();
        self.persist_and_emit();
        analytics::track(AnalyticsEvent::CanvasCleared);
    }

    /// Steps the history back one snapshot and repaints it. Silent at the
    /// floor.
    pub fn undo(&mut self) {
        let restored = match self.history.undo() {
            Some(snapshot) => snapshot.surface().clone(),
            None => return,
        };
        if let Some(surface) = self.surface.as_mut() {
            surface.copy_from(&restored);
        }
        self.persist_and_emit();
        analytics::track(AnalyticsEvent::Undo);
    }

    /// Steps the history forward one snapshot and repaints it. Silent at the
    /// tip.
    pub fn redo(&mut self) {
        let restored = match self.history.redo() {
            Some(snapshot) => snapshot.surface().clone(),
            None => return,
        };
        if let Some(surface) = self.surface.as_mut() {
            surface.copy_from(&restored);
        }
        self.persist_and_emit();
        analytics::track(AnalyticsEvent::Redo);
    }

    /// Hands the current drawing to the host for the collection.
    pub fn save(&mut self) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        match token::encode_surface(surface) {
            Ok(token) => {
                self.events.push(HostEvent::SaveRequested { token });
                analytics::track(AnalyticsEvent::DrawingSaved);
            }
            Err(err) => {
                tracing::error!(error = ?err, "failed to encode surface for save");
            }
        }
    }

    /// Exports the surface as a date-stamped PNG and routes it through the
    /// share sink, falling back to a download. A cancelled share stays quiet;
    /// any other failure raises one [`HostEvent::ShareFailed`].
    pub fn share(&mut self, sink: &mut dyn ShareSink, when: DateTime<Local>) -> ShareOutcome {
        let Some(surface) = self.surface.as_ref() else {
            return ShareOutcome::Unavailable;
        };
        let payload = match export::export_surface(surface, when) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = ?err, "failed to encode drawing for share");
                self.events.push(HostEvent::ShareFailed);
                return ShareOutcome::Failed;
            }
        };
        let outcome = export::share_payload(sink, &payload, self.settings.download_dir.as_deref());
        if outcome == ShareOutcome::Failed {
            self.events.push(HostEvent::ShareFailed);
        }
        outcome
    }

    /// A qualifying interaction with the control region (pointer enter or
    /// touch-start): shows the tray and restarts its countdown.
    pub fn tray_interaction(&mut self, now: Instant) {
        self.tray.interact(now);
    }

    /// Applies everything whose time has come: pending restore decodes and
    /// the tray hide deadline. Hosts call this from their frame loop.
    pub fn tick(&mut self, now: Instant) {
        loop {
            match self.restore_rx.try_recv() {
                Ok(reply) => {
                    self.pending_restores = self.pending_restores.saturating_sub(1);
                    self.apply_restore_reply(reply);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        self.tray.tick(now);
    }

    /// Takes all events queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn rect(&self) -> Option<BoundsRect> {
        self.rect
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn stroke_active(&self) -> bool {
        self.recorder.is_active()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn tray_visible(&self) -> bool {
        self.tray.is_visible()
    }

    /// Token from the most recent persistence hand-off, if any.
    pub fn last_persisted(&self) -> Option<&ContentToken> {
        self.last_persisted.as_ref()
    }

    /// Whether a restore decode is still in flight. Once this reports false,
    /// the next [`tick`](Self::tick) has nothing left to apply.
    pub fn restore_pending(&self) -> bool {
        self.pending_restores > 0
    }

    pub fn settings(&self) -> &DoodleSettings {
        &self.settings
    }

    /// Re-acquires the surface at `rect` and re-floors the history. The
    /// restore source is the most recently persisted token; with none, the
    /// fresh fill becomes the floor right away.
    fn reflow(&mut self, rect: BoundsRect) {
        self.generation += 1;
        if self.recorder.is_active() {
            tracing::debug!("surface reflow aborted an in-flight stroke");
            self.recorder = StrokeRecorder::new();
        }
        let (width, height) = rect.pixel_size();
        self.rect = Some(rect);
        self.surface = Some(Surface::new(width, height, self.settings.background));
        self.history.reset();
        match self.last_persisted.clone() {
            Some(token) => self.request_restore(token, width, height),
            None => self.capture_current(),
        }
    }

    /// Decodes `token` on a worker thread, scaled to the surface dimensions
    /// the request was made under. The reply is tagged with the current
    /// generation and picked up by [`tick`](Self::tick).
    fn request_restore(&mut self, token: ContentToken, width: u32, height: u32) {
        let generation = self.generation;
        let tx = self.restore_tx.clone();
        self.pending_restores += 1;
        tracing::debug!(generation, width, height, "restore decode requested");
        std::thread::spawn(move || {
            let pixels = token::decode_scaled(&token, width, height);
            let _ = tx.send(RestoreReply { generation, pixels });
        });
    }

    fn apply_restore_reply(&mut self, reply: RestoreReply) {
        if reply.generation != self.generation {
            tracing::debug!(
                reply_generation = reply.generation,
                current_generation = self.generation,
                "dropping stale restore decode"
            );
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        match reply.pixels {
            Ok(pixels) => {
                surface.blend_over(&pixels);
                tracing::debug!("restored persisted drawing onto the surface");
            }
            Err(err) => {
                tracing::warn!(error = ?err, "restore decode failed, keeping the fresh surface");
            }
        }
        // Either way the settled surface becomes the undo floor. The restore
        // itself is not a committed mutation, so no token is emitted.
        self.capture_current();
    }

    fn capture_current(&mut self) {
        if let Some(surface) = self.surface.as_ref() {
            self.history.capture(surface);
        }
    }

    fn persist_and_emit(&mut self) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        match token::encode_surface(surface) {
            Ok(token) => {
                self.last_persisted = Some(token.clone());
                self.events.push(HostEvent::ContentChanged { token });
            }
            Err(err) => {
                tracing::error!(error = ?err, "failed to encode surface for persistence");
            }
        }
    }
}

impl Default for CanvasSession {
    fn default() -> Self {
        Self::new(DoodleSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ShareDisposition, ShareRequest};
    use crate::model::Color;
    use anyhow::anyhow;
    use chrono::TimeZone;
    use serial_test::serial;
    use std::time::Duration;

    const INK: Color = Color::rgb(0xFF, 0x6B, 0x6B);

    fn rect(size: f32) -> BoundsRect {
        BoundsRect::new(0.0, 0.0, size, size)
    }

    fn mouse(x: f32, y: f32) -> PointerInput {
        PointerInput::mouse(x, y)
    }

    fn blank(size: u32) -> Surface {
        Surface::new(size, size, Color::WHITE)
    }

    /// Ticks until every in-flight restore decode has been applied.
    fn settle(session: &mut CanvasSession) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while session.restore_pending() {
            assert!(Instant::now() < deadline, "restore decode never settled");
            session.tick(Instant::now());
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    fn draw_diagonal(session: &mut CanvasSession, now: Instant) {
        session.begin_stroke(&mouse(2.0, 2.0), INK, 2);
        session.continue_stroke(&mouse(12.0, 12.0));
        session.finish_stroke(now);
    }

    struct ScriptedSink {
        can_share: bool,
        disposition: Option<anyhow::Result<ShareDisposition>>,
    }

    impl ShareSink for ScriptedSink {
        fn can_share_files(&self) -> bool {
            self.can_share
        }

        fn share(&mut self, _request: &ShareRequest<'_>) -> anyhow::Result<ShareDisposition> {
            self.disposition.take().unwrap()
        }
    }

    #[test]
    fn mount_without_token_floors_history_immediately() {
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);

        assert!(session.is_mounted());
        assert_eq!(session.surface(), Some(&blank(16)));
        assert_eq!(session.history_len(), 1);
        assert!(!session.can_undo());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn mount_with_token_restores_after_settle() {
        let mut drawn = blank(16);
        drawn.set_pixel(3, 4, INK);
        let token = token::encode_surface(&drawn).unwrap();

        let mut session = CanvasSession::default();
        session.mount(rect(16.0), Some(token));

        // Until the decode lands the surface shows the fresh fill.
        assert_eq!(session.surface(), Some(&blank(16)));
        assert_eq!(session.history_len(), 0);

        settle(&mut session);
        assert_eq!(session.surface(), Some(&drawn));
        assert_eq!(session.history_len(), 1);
        // A settled restore is not a committed mutation.
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn corrupt_token_degrades_to_fresh_surface() {
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), Some(ContentToken::from_raw("not a data url")));

        settle(&mut session);
        assert_eq!(session.surface(), Some(&blank(16)));
        // The fresh fill still becomes the undo floor.
        assert_eq!(session.history_len(), 1);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn finish_stroke_captures_and_emits_the_new_token() {
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);
        draw_diagonal(&mut session, Instant::now());

        assert_eq!(session.history_len(), 2);
        assert!(session.can_undo());

        let events = session.drain_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            HostEvent::ContentChanged { token } => {
                let decoded = token::decode_surface(token).unwrap();
                assert_eq!(&decoded, session.surface().unwrap());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn strokes_then_undos_round_trip_to_the_floor() {
        let mut session = CanvasSession::default();
        session.mount(rect(32.0), None);
        let floor = session.surface().unwrap().clone();

        for i in 0..5 {
            let x = 2.0 + i as f32 * 5.0;
            session.begin_stroke(&mouse(x, 2.0), INK, 2);
            session.continue_stroke(&mouse(x, 28.0));
            session.finish_stroke(Instant::now());
        }
        assert_ne!(session.surface().unwrap(), &floor);

        for _ in 0..5 {
            session.undo();
        }
        assert_eq!(session.surface().unwrap(), &floor);

        // The floor holds: one more undo moves nothing and emits nothing.
        session.drain_events();
        session.undo();
        assert_eq!(session.surface().unwrap(), &floor);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    #[serial]
    fn capture_after_undo_prunes_the_redo_branch() {
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);
        draw_diagonal(&mut session, Instant::now());
        session.undo();

        // A new stroke after undo discards the redo branch.
        session.begin_stroke(&mouse(8.0, 2.0), INK, 2);
        session.finish_stroke(Instant::now());
        assert!(!session.can_redo());

        let after = session.surface().unwrap().clone();
        session.redo();
        assert_eq!(session.surface().unwrap(), &after);
    }

    #[test]
    fn history_stays_bounded_at_the_configured_cap() {
        let mut settings = DoodleSettings::default();
        settings.history_cap = 3;
        let mut session = CanvasSession::new(settings);
        session.mount(rect(32.0), None);

        for i in 0..6 {
            session.begin_stroke(&mouse(2.0 + i as f32 * 4.0, 2.0), INK, 2);
            session.finish_stroke(Instant::now());
        }
        assert_eq!(session.history_len(), 3);
    }

    #[test]
    #[serial]
    fn clear_declined_changes_nothing() {
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);
        draw_diagonal(&mut session, Instant::now());
        session.drain_events();
        let before = session.surface().unwrap().clone();

        let mut seen_prompt = None;
        session.clear(|prompt| {
            seen_prompt = Some(prompt.to_string());
            false
        });

        assert_eq!(seen_prompt.as_deref(), Some(CLEAR_CONFIRM_PROMPT));
        assert_eq!(session.surface().unwrap(), &before);
        assert_eq!(session.history_len(), 2);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    #[serial]
    fn clear_accepted_repaints_captures_and_emits() {
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);
        draw_diagonal(&mut session, Instant::now());
        session.drain_events();

        session.clear(|_| true);

        assert_eq!(session.surface(), Some(&blank(16)));
        assert_eq!(session.history_len(), 3);
        let events = session.drain_events();
        assert!(matches!(events.as_slice(), [HostEvent::ContentChanged { .. }]));

        // The cleared state is undoable.
        session.undo();
        assert_ne!(session.surface(), Some(&blank(16)));
    }

    #[test]
    #[serial]
    fn undo_and_redo_repaint_and_emit() {
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);
        draw_diagonal(&mut session, Instant::now());
        let drawn = session.surface().unwrap().clone();
        session.drain_events();

        session.undo();
        assert_eq!(session.surface(), Some(&blank(16)));
        session.redo();
        assert_eq!(session.surface().unwrap(), &drawn);

        let events = session.drain_events();
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|event| matches!(event, HostEvent::ContentChanged { .. })));
    }

    #[test]
    fn resize_preserves_persisted_content_and_refloors() {
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);
        draw_diagonal(&mut session, Instant::now());
        let drawn = session.surface().unwrap().clone();
        session.drain_events();

        // Same pixel size at a new viewport position: the decode is exact.
        session.handle_resize(BoundsRect::new(40.0, 40.0, 16.0, 16.0));
        assert!(session.restore_pending());
        assert_eq!(session.surface(), Some(&blank(16)));

        settle(&mut session);
        assert_eq!(session.surface().unwrap(), &drawn);
        // History was reset to a single floor; undo depth is gone.
        assert_eq!(session.history_len(), 1);
        assert!(!session.can_undo());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn resize_before_restore_settles_drops_the_stale_decode() {
        let mut drawn = blank(8);
        drawn.set_pixel(1, 1, INK);
        let token = token::encode_surface(&drawn).unwrap();

        let mut session = CanvasSession::default();
        session.mount(rect(8.0), Some(token));
        // Resize while the mount-time decode may still be in flight.
        session.handle_resize(rect(24.0));

        settle(&mut session);
        let surface = session.surface().unwrap();
        assert_eq!((surface.width, surface.height), (24, 24));
        // Only the second decode was applied: exactly one floor capture.
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn unmount_orphans_the_pending_decode() {
        let mut drawn = blank(8);
        drawn.set_pixel(2, 2, INK);
        let token = token::encode_surface(&drawn).unwrap();

        let mut session = CanvasSession::default();
        session.mount(rect(8.0), Some(token));
        session.unmount();
        assert!(!session.is_mounted());

        settle(&mut session);
        assert!(session.surface().is_none());
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn stroke_calls_before_mount_are_no_ops() {
        let mut session = CanvasSession::default();
        session.begin_stroke(&mouse(2.0, 2.0), INK, 2);
        session.continue_stroke(&mouse(4.0, 4.0));
        session.finish_stroke(Instant::now());
        session.undo();
        session.redo();
        session.clear(|_| panic!("confirmation must not be asked before mount"));
        session.save();

        assert!(!session.is_mounted());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn finish_without_begin_commits_nothing() {
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);
        session.drain_events();

        // Pointer-leave after pointer-up: end arrives while idle.
        session.finish_stroke(Instant::now());
        assert_eq!(session.history_len(), 1);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn reflow_aborts_an_in_flight_stroke() {
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);
        session.begin_stroke(&mouse(2.0, 2.0), INK, 2);
        assert!(session.stroke_active());

        session.handle_resize(rect(16.0));
        assert!(!session.stroke_active());

        // The orphaned pointer-up commits nothing.
        session.finish_stroke(Instant::now());
        assert_eq!(session.history_len(), 1);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn tray_follows_the_stroke_lifecycle() {
        let start = Instant::now();
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);
        assert!(session.tray_visible());

        session.begin_stroke(&mouse(2.0, 2.0), INK, 2);
        assert!(!session.tray_visible());

        session.finish_stroke(start);
        assert!(session.tray_visible());

        let delay = session.settings().tray_hide_delay();
        session.tick(start + delay);
        assert!(!session.tray_visible());

        session.tray_interaction(start + delay);
        assert!(session.tray_visible());
    }

    #[test]
    fn unmount_cancels_the_tray_countdown() {
        let start = Instant::now();
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);
        session.tray_interaction(start);
        session.unmount();

        let delay = session.settings().tray_hide_delay();
        session.tick(start + delay * 2);
        assert!(session.tray_visible());
    }

    #[test]
    #[serial]
    fn save_emits_a_save_request_with_the_current_pixels() {
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);
        draw_diagonal(&mut session, Instant::now());
        session.drain_events();

        session.save();
        let events = session.drain_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            HostEvent::SaveRequested { token } => {
                let decoded = token::decode_surface(token).unwrap();
                assert_eq!(&decoded, session.surface().unwrap());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn share_failure_raises_one_share_failed_event() {
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);
        session.drain_events();

        let when = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).single().unwrap();
        let mut sink = ScriptedSink {
            can_share: true,
            disposition: Some(Err(anyhow!("share sheet exploded"))),
        };
        let outcome = session.share(&mut sink, when);
        assert_eq!(outcome, ShareOutcome::Failed);
        assert_eq!(session.drain_events(), vec![HostEvent::ShareFailed]);
    }

    #[test]
    #[serial]
    fn cancelled_share_stays_quiet() {
        let mut session = CanvasSession::default();
        session.mount(rect(16.0), None);
        session.drain_events();

        let when = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).single().unwrap();
        let mut sink = ScriptedSink {
            can_share: true,
            disposition: Some(Ok(ShareDisposition::Cancelled)),
        };
        let outcome = session.share(&mut sink, when);
        assert_eq!(outcome, ShareOutcome::Cancelled);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    #[serial]
    fn share_falls_back_to_the_configured_download_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = DoodleSettings::default();
        settings.download_dir = Some(dir.path().to_path_buf());

        let mut session = CanvasSession::new(settings);
        session.mount(rect(16.0), None);
        session.drain_events();

        let when = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).single().unwrap();
        let mut sink = ScriptedSink { can_share: false, disposition: None };
        let outcome = session.share(&mut sink, when);

        let expected = dir.path().join("tiny-doodle-2026-01-02.png");
        assert_eq!(outcome, ShareOutcome::Downloaded(expected.clone()));
        assert!(expected.exists());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn share_before_mount_is_unavailable() {
        let mut session = CanvasSession::default();
        let when = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).single().unwrap();
        let mut sink = ScriptedSink { can_share: true, disposition: None };
        assert_eq!(session.share(&mut sink, when), ShareOutcome::Unavailable);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn remount_restores_from_the_host_token() {
        let mut first = CanvasSession::default();
        first.mount(rect(16.0), None);
        draw_diagonal(&mut first, Instant::now());
        let token = match first.drain_events().pop() {
            Some(HostEvent::ContentChanged { token }) => token,
            other => panic!("expected a content change, got {other:?}"),
        };
        let drawn = first.surface().unwrap().clone();
        first.unmount();

        let mut second = CanvasSession::default();
        second.mount(rect(16.0), Some(token));
        settle(&mut second);
        assert_eq!(second.surface().unwrap(), &drawn);
    }
}
