//! Turning a surface into a shareable PNG file and handing it to the
//! platform share facility, with a plain file download as the fallback.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::analytics::{self, AnalyticsEvent, ShareMethod};
use crate::surface::Surface;
use crate::token;

pub const EXPORT_FILE_PREFIX: &str = "tiny-doodle";
pub const EXPORT_MIME: &str = "image/png";
pub const SHARE_TITLE: &str = "Tiny Doodle Drawing";
pub const SHARE_TEXT: &str = "Check out this drawing from Tiny Doodle!";

/// A finished export: encoded PNG bytes plus the file name they travel under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// File name for an export made on the given date.
pub fn export_file_name(when: DateTime<Local>) -> String {
    format!("{EXPORT_FILE_PREFIX}-{}.png", when.format("%Y-%m-%d"))
}

/// Encodes the surface into a named PNG payload.
pub fn export_surface(surface: &Surface, when: DateTime<Local>) -> Result<ExportPayload> {
    Ok(ExportPayload {
        file_name: export_file_name(when),
        bytes: token::encode_png(surface)?,
    })
}

/// Everything a share sink needs to present one file.
#[derive(Debug, Clone, Copy)]
pub struct ShareRequest<'a> {
    pub file_name: &'a str,
    pub mime: &'a str,
    pub title: &'a str,
    pub text: &'a str,
    pub bytes: &'a [u8],
}

/// How a native share attempt ended from the sink's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareDisposition {
    Completed,
    /// The user backed out of the share sheet. Not an error.
    Cancelled,
}

/// A platform share facility. Hosts implement this over whatever their
/// platform offers; a sink that cannot share files at all routes every
/// payload to the download fallback.
pub trait ShareSink {
    fn can_share_files(&self) -> bool;
    fn share(&mut self, request: &ShareRequest<'_>) -> Result<ShareDisposition>;
}

/// End result of a share, as visible to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The native sink delivered the file.
    Shared,
    /// The fallback wrote the file to disk at the given path.
    Downloaded(PathBuf),
    /// The user cancelled. Treated as a quiet success.
    Cancelled,
    /// No surface existed to export.
    Unavailable,
    /// The sink errored or the fallback could not write. The caller owes the
    /// user one failure notice.
    Failed,
}

/// Routes a payload through the native sink when possible, falling back to a
/// file download otherwise.
pub fn share_payload(
    sink: &mut dyn ShareSink,
    payload: &ExportPayload,
    download_dir: Option<&Path>,
) -> ShareOutcome {
    if sink.can_share_files() {
        let request = ShareRequest {
            file_name: &payload.file_name,
            mime: EXPORT_MIME,
            title: SHARE_TITLE,
            text: SHARE_TEXT,
            bytes: &payload.bytes,
        };
        match sink.share(&request) {
            Ok(ShareDisposition::Completed) => {
                tracing::debug!(file = %payload.file_name, "drawing shared via native sink");
                analytics::track(AnalyticsEvent::DrawingShared { method: ShareMethod::NativeShare });
                ShareOutcome::Shared
            }
            Ok(ShareDisposition::Cancelled) => {
                tracing::debug!("share cancelled by the user");
                ShareOutcome::Cancelled
            }
            Err(err) => {
                tracing::error!(error = ?err, "native share failed");
                ShareOutcome::Failed
            }
        }
    } else {
        match download_payload(payload, download_dir) {
            Ok(path) => {
                analytics::track(AnalyticsEvent::DrawingShared { method: ShareMethod::Download });
                ShareOutcome::Downloaded(path)
            }
            Err(err) => {
                tracing::error!(error = ?err, "download fallback failed");
                ShareOutcome::Failed
            }
        }
    }
}

fn download_payload(payload: &ExportPayload, download_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match download_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs_next::download_dir().ok_or_else(|| anyhow!("no download directory available"))?,
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create download directory {}", dir.display()))?;
    let path = dir.join(&payload.file_name);
    std::fs::write(&path, &payload.bytes)
        .with_context(|| format!("failed to write drawing to {}", path.display()))?;
    tracing::info!(path = %path.display(), "drawing downloaded");
    if let Err(err) = open::that(&path) {
        tracing::debug!(error = ?err, "could not reveal downloaded drawing");
    }
    Ok(path)
}
