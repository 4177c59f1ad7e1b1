//! SVG snapshot of the cross-shaped board.

use anyhow::Result;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bugua_core::capture::BoardCapture;
use bugua_core::{Board, PieceColor, Slot};
use std::fmt::Write as _;

const CELL: u32 = 120;
const RADIUS: u32 = 46;
const BACKGROUND: &str = "#f5e6c8";
const RED: &str = "#b91c1c";
const BLACK: &str = "#1c1917";

/// Renders the five slots on a 3×3 grid and returns a base64 SVG data URL.
///
/// ```text
///        TOP
/// LEFT  CENTER  RIGHT
///       BOTTOM
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgBoardCapture;

impl SvgBoardCapture {
    pub fn new() -> Self {
        Self
    }

    fn grid_cell(slot: Slot) -> (u32, u32) {
        match slot {
            Slot::Top => (1, 0),
            Slot::Left => (0, 1),
            Slot::Center => (1, 1),
            Slot::Right => (2, 1),
            Slot::Bottom => (1, 2),
        }
    }

    /// Builds the SVG document.
    pub fn render_svg(&self, board: &Board) -> String {
        let size = CELL * 3;
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
        );
        let _ = write!(svg, r#"<rect width="100%" height="100%" fill="{BACKGROUND}"/>"#);

        for (slot, piece) in board.iter() {
            let (col, row) = Self::grid_cell(slot);
            let cx = col * CELL + CELL / 2;
            let cy = row * CELL + CELL / 2;

            match piece {
                Some(piece) => {
                    let color = match piece.color {
                        PieceColor::Red => RED,
                        PieceColor::Black => BLACK,
                    };
                    let _ = write!(
                        svg,
                        r##"<circle cx="{cx}" cy="{cy}" r="{RADIUS}" fill="#fffbeb" stroke="{color}" stroke-width="4"/><text x="{cx}" y="{cy}" fill="{color}" font-size="48" text-anchor="middle" dominant-baseline="central">{label}</text>"##,
                        label = piece.label
                    );
                }
                None => {
                    let _ = write!(
                        svg,
                        r##"<circle cx="{cx}" cy="{cy}" r="{RADIUS}" fill="none" stroke="#a8a29e" stroke-dasharray="6 6"/><text x="{cx}" y="{cy}" fill="#a8a29e" font-size="28" text-anchor="middle" dominant-baseline="central">{label}</text>"##,
                        label = slot.label()
                    );
                }
            }
        }

        svg.push_str("</svg>");
        svg
    }
}

#[async_trait]
impl BoardCapture for SvgBoardCapture {
    async fn capture(&self, board: &Board) -> Result<Option<String>> {
        let svg = self.render_svg(board);
        let data_url = format!(
            "data:image/svg+xml;base64,{}",
            BASE64_STANDARD.encode(svg.as_bytes())
        );
        tracing::debug!("[Capture] Board image {} bytes", data_url.len());
        Ok(Some(data_url))
    }
}
