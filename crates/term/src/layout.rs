//! Screen layout: where the defrag box and the two panels go.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! ```text
//!  ┌──────────────────────────────────────────┐   <- TOP_GAP rows above
//!  │              defrag region               │
//!  └──────────────────────────────────────────┘
//!                                                 <- MIDDLE_GAP rows
//!  ┌──── STATUS ────┐        ┌─────────────────┐
//!  │                │        │                 │  <- PANEL_HEIGHT rows
//!  └────────────────┘        └─────────────────┘
//!                                                 <- BOTTOM_GAP rows
//! ```

use arrayvec::ArrayVec;

use crate::core::{RenderPort, WriteError};
use crate::types::{Color, Coord, Region};

pub const TOP_GAP: u16 = 1;
pub const BOTTOM_GAP: u16 = 1;
pub const SIDE_GAP: u16 = 1;
/// Rows between the defrag box and the panels.
pub const MIDDLE_GAP: u16 = 2;
/// Minimum columns between the two panels.
pub const PANEL_SPACING: u16 = 1;
pub const PANEL_HEIGHT: u16 = 11;
pub const MIN_PANEL_WIDTH: u16 = 20;
/// Smallest defrag box (border included) that still has a drawable row.
pub const MIN_DEFRAG_HEIGHT: u16 = 3;

pub const STATUS_TITLE: &str = "STATUS";
pub const TOO_SMALL_MESSAGE: &str = "terminal too small";

/// Color used for borders and panel text.
pub const FRAME_COLOR: Color = Color::White;

/// Smallest terminal that fits the layout, as `(width, height)`.
pub const fn min_size() -> (u16, u16) {
    (
        2 * SIDE_GAP + 2 * MIN_PANEL_WIDTH + PANEL_SPACING,
        TOP_GAP + MIN_DEFRAG_HEIGHT + MIDDLE_GAP + PANEL_HEIGHT + BOTTOM_GAP,
    )
}

/// Whether a `width` x `height` terminal can host the layout.
pub fn fits(width: u16, height: u16) -> bool {
    let (min_w, min_h) = min_size();
    width >= min_w && height >= min_h
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Defrag,
    Status,
    Information,
}

/// A multi-line text block anchored at a screen position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub kind: BlockKind,
    pub origin_x: u16,
    pub origin_y: u16,
    pub text: String,
}

impl TextBlock {
    /// `(width, height)` of the block: longest line by line count.
    pub fn measure(&self) -> (u16, u16) {
        measure_text(&self.text)
    }

    pub fn draw<P: RenderPort + ?Sized>(&self, port: &mut P, color: Color) -> Result<(), WriteError> {
        for (dy, line) in self.text.lines().enumerate() {
            port.write_str(self.origin_x, self.origin_y + dy as u16, line, color)?;
        }
        Ok(())
    }
}

/// Measure a multi-line block, ignoring a trailing newline.
pub fn measure_text(text: &str) -> (u16, u16) {
    let mut w = 0u16;
    let mut h = 0u16;
    for line in text.lines() {
        w = w.max(line.chars().count() as u16);
        h += 1;
    }
    (w, h)
}

/// Draw an outlined box, optionally with a centered title in the top border.
///
/// Returns an empty string when the box is smaller than 2x2.
pub fn build_box(width: u16, height: u16, title: Option<&str>) -> String {
    if width < 2 || height < 2 {
        return String::new();
    }
    let inner = (width - 2) as usize;

    let mut top: String = "─".repeat(inner);
    if let Some(title) = title {
        let label = format!("  {}  ", title);
        let len = label.chars().count();
        if len <= inner {
            let left = (inner - len) / 2;
            top = format!("{}{}{}", "─".repeat(left), label, "─".repeat(inner - len - left));
        }
    }

    let mut out = String::with_capacity((width as usize + 1) * height as usize * 3);
    out.push('┌');
    out.push_str(&top);
    out.push_str("┐\n");
    for _ in 0..height - 2 {
        out.push('│');
        out.extend(std::iter::repeat(' ').take(inner));
        out.push_str("│\n");
    }
    out.push('└');
    out.push_str(&"─".repeat(inner));
    out.push_str("┘\n");
    out
}

/// Computed geometry for one terminal size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub width: u16,
    pub height: u16,
    pub blocks: ArrayVec<TextBlock, 3>,
    /// Inside of the defrag box: the animation region.
    pub region: Region,
    /// Writable text area inside the status panel.
    pub status_area: Region,
    /// Writable text area inside the information panel.
    pub info_area: Region,
}

impl Layout {
    /// Compute the layout, or `None` if the terminal is too small.
    pub fn compute(width: u16, height: u16) -> Option<Self> {
        if !fits(width, height) {
            return None;
        }

        let usable = width - 2 * SIDE_GAP;
        let panel_w = (usable - PANEL_SPACING) / 2;
        let panels_y = height - (PANEL_HEIGHT + BOTTOM_GAP);
        let status_x = SIDE_GAP;
        // Right-align the information panel; odd widths widen the gap.
        let info_x = SIDE_GAP + usable - panel_w;

        let defrag_x = SIDE_GAP;
        let defrag_y = TOP_GAP;
        let defrag_w = usable;
        let defrag_h = height - (TOP_GAP + MIDDLE_GAP + PANEL_HEIGHT + BOTTOM_GAP);

        let mut blocks = ArrayVec::new();
        blocks.push(TextBlock {
            kind: BlockKind::Defrag,
            origin_x: defrag_x,
            origin_y: defrag_y,
            text: build_box(defrag_w, defrag_h, None),
        });
        blocks.push(TextBlock {
            kind: BlockKind::Status,
            origin_x: status_x,
            origin_y: panels_y,
            text: build_box(panel_w, PANEL_HEIGHT, Some(STATUS_TITLE)),
        });
        blocks.push(TextBlock {
            kind: BlockKind::Information,
            origin_x: info_x,
            origin_y: panels_y,
            text: build_box(panel_w, PANEL_HEIGHT, None),
        });

        Some(Self {
            width,
            height,
            blocks,
            region: Region::new(Coord::new(defrag_x + 1, defrag_y + 1), defrag_w - 2, defrag_h - 2),
            status_area: panel_text_area(status_x, panels_y, panel_w),
            info_area: panel_text_area(info_x, panels_y, panel_w),
        })
    }

    pub fn block(&self, kind: BlockKind) -> Option<&TextBlock> {
        self.blocks.iter().find(|b| b.kind == kind)
    }

    /// Draw every decoration block.
    pub fn draw<P: RenderPort + ?Sized>(&self, port: &mut P) -> Result<(), WriteError> {
        for block in &self.blocks {
            block.draw(port, FRAME_COLOR)?;
        }
        Ok(())
    }
}

/// Panel interior minus one column of padding on each side.
fn panel_text_area(x: u16, y: u16, width: u16) -> Region {
    Region::new(Coord::new(x + 2, y + 1), width.saturating_sub(4), PANEL_HEIGHT - 2)
}

/// Top-left position that centers a single line of `text`.
pub fn centered(width: u16, height: u16, text: &str) -> (u16, u16) {
    let len = text.chars().count() as u16;
    (width.saturating_sub(len) / 2, height / 2)
}

/// Show the "terminal too small" notice with the current and needed size.
pub fn draw_too_small<P: RenderPort + ?Sized>(port: &mut P) -> Result<(), WriteError> {
    let (w, h) = port.size();
    let (min_w, min_h) = min_size();
    let detail = format!("{}x{} < {}x{}", w, h, min_w, min_h);

    let (x, y) = centered(w, h, TOO_SMALL_MESSAGE);
    port.write_str(x, y, TOO_SMALL_MESSAGE, Color::Yellow)?;
    if y + 1 < h {
        let (dx, _) = centered(w, h, &detail);
        port.write_str(dx, y + 1, &detail, FRAME_COLOR)?;
    }
    Ok(())
}
