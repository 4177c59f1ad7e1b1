//! Board capture seam.

use crate::board::Board;
use anyhow::Result;
use async_trait::async_trait;

/// Produces a snapshot image of a board for storage with its reading.
///
/// Capture is best-effort: the orchestrator logs failures and continues
/// without an image.
#[async_trait]
pub trait BoardCapture: Send + Sync {
    /// Returns a data URL, or `None` if nothing was captured.
    async fn capture(&self, board: &Board) -> Result<Option<String>>;
}

/// Capture that never produces an image.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCapture;

#[async_trait]
impl BoardCapture for NoopCapture {
    async fn capture(&self, _board: &Board) -> Result<Option<String>> {
        Ok(None)
    }
}
