//! Status and information panel text.
//!
//! Panels draw through the same [`RenderPort`] as the grid. Each panel keeps
//! the lines it last showed and only rewrites the characters that changed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::core::{RenderPort, WriteError};
use crate::layout::FRAME_COLOR;
use crate::throttle::RenderThrottle;
use crate::types::{Color, Region, STATUS_REFRESH_MS};

const LABEL_WIDTH: usize = 10;

/// Snapshot of the animation for the status panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusView {
    pub phase: &'static str,
    /// `0.0..=1.0` through the current phase.
    pub progress: f32,
    pub occupancy: usize,
    pub capacity: usize,
    pub cycle: u64,
    pub grid: (u16, u16),
}

impl StatusView {
    pub fn percent(&self) -> u8 {
        (self.progress.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    /// Changes only when the phase or cycle changes.
    pub fn key(&self) -> u64 {
        let mut h = DefaultHasher::new();
        self.phase.hash(&mut h);
        self.cycle.hash(&mut h);
        h.finish()
    }

    /// Changes whenever any displayed number changes.
    pub fn fingerprint(&self) -> u64 {
        let mut h = DefaultHasher::new();
        self.percent().hash(&mut h);
        self.occupancy.hash(&mut h);
        self.capacity.hash(&mut h);
        self.grid.hash(&mut h);
        h.finish()
    }

    /// Panel lines for a text area `width` columns wide.
    pub fn lines(&self, width: usize) -> Vec<String> {
        let bar_room = width.saturating_sub(LABEL_WIDTH + 7);
        vec![
            labeled("Phase", self.phase),
            labeled(
                "Progress",
                &format!("{} {:>3}%", progress_bar(self.progress, bar_room), self.percent()),
            ),
            labeled("Cells", &format!("{} / {}", self.occupancy, self.capacity)),
            labeled("Cycle", &(self.cycle + 1).to_string()),
            labeled("Grid", &format!("{} x {}", self.grid.0, self.grid.1)),
        ]
    }
}

fn labeled(label: &str, value: &str) -> String {
    format!("{:<width$}{}", label, value, width = LABEL_WIDTH)
}

/// `[####----]` with `room` columns between the brackets.
pub fn progress_bar(progress: f32, room: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * room as f32).round() as usize).min(room);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(room - filled))
}

/// Static text of the information panel.
pub fn info_lines() -> Vec<String> {
    vec![
        "tui-defrag".to_string(),
        String::new(),
        "scatter glyphs,".to_string(),
        "sort by color".to_string(),
        "and glyph,".to_string(),
        "then repeat.".to_string(),
        String::new(),
        "q / Esc  quit".to_string(),
    ]
}

/// A rectangular text area that remembers what it shows.
#[derive(Debug, Clone, Default)]
pub struct TextPanel {
    area: Region,
    shown: Vec<String>,
}

impl TextPanel {
    pub fn new(area: Region) -> Self {
        Self {
            area,
            shown: Vec::new(),
        }
    }

    pub fn area(&self) -> Region {
        self.area
    }

    /// Move the panel; the next draw rewrites everything.
    pub fn set_area(&mut self, area: Region) {
        self.area = area;
        self.shown.clear();
    }

    /// Forget what is on screen (e.g. after a clear).
    pub fn invalidate(&mut self) {
        self.shown.clear();
    }

    /// Show `lines`, clipped and padded to the area, writing only changed runs.
    pub fn draw<P: RenderPort + ?Sized>(
        &mut self,
        lines: &[String],
        color: Color,
        port: &mut P,
    ) -> Result<(), WriteError> {
        let w = self.area.width as usize;
        let h = self.area.height as usize;
        let mut next = Vec::with_capacity(h);
        for y in 0..h {
            let src = lines.get(y).map(String::as_str).unwrap_or("");
            let mut line: String = src.chars().take(w).collect();
            let pad = w - line.chars().count();
            line.extend(std::iter::repeat(' ').take(pad));
            next.push(line);
        }

        for (y, line) in next.iter().enumerate() {
            let prev = self.shown.get(y).map(String::as_str);
            let sy = self.area.origin_y + y as u16;
            for_each_changed_run(prev, line, |start, run| {
                port.write_str(self.area.origin_x + start as u16, sy, run, color)
            })?;
        }

        self.shown = next;
        Ok(())
    }
}

/// Call `f(start_column, text)` for every run of `next` that differs from `prev`.
///
/// With no previous line the whole line is one run.
fn for_each_changed_run(
    prev: Option<&str>,
    next: &str,
    mut f: impl FnMut(usize, &str) -> Result<(), WriteError>,
) -> Result<(), WriteError> {
    let Some(prev) = prev else {
        return f(0, next);
    };

    let a: Vec<char> = prev.chars().collect();
    let b: Vec<char> = next.chars().collect();
    let mut x = 0;
    while x < b.len() {
        if a.get(x) == Some(&b[x]) {
            x += 1;
            continue;
        }
        let start = x;
        x += 1;
        while x < b.len() && a.get(x) != Some(&b[x]) {
            x += 1;
        }
        let run: String = b[start..x].iter().collect();
        f(start, &run)?;
    }
    Ok(())
}

/// Status panel: a [`TextPanel`] fed by a throttle.
#[derive(Debug, Clone)]
pub struct StatusPanel {
    panel: TextPanel,
    throttle: RenderThrottle,
}

impl StatusPanel {
    pub fn new(area: Region) -> Self {
        Self {
            panel: TextPanel::new(area),
            throttle: RenderThrottle::new(STATUS_REFRESH_MS),
        }
    }

    pub fn set_area(&mut self, area: Region) {
        self.panel.set_area(area);
        self.throttle.invalidate();
    }

    /// Redraw if the throttle allows it. Returns whether anything was drawn.
    pub fn update<P: RenderPort + ?Sized>(
        &mut self,
        now_ms: u64,
        view: &StatusView,
        port: &mut P,
    ) -> Result<bool, WriteError> {
        if !self.throttle.should_render(now_ms, view.key(), view.fingerprint()) {
            return Ok(false);
        }
        let lines = view.lines(self.panel.area().width as usize);
        self.panel.draw(&lines, FRAME_COLOR, port)?;
        Ok(true)
    }
}
