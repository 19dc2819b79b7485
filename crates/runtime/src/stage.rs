//! The stage: everything the pulse thread and the foreground share.
//!
//! One [`Stage`] bundles the render surface, the animation engine and the
//! screen geometry. It lives behind a single mutex so a tick and a resize
//! can never interleave.

use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};
use rand::Rng;

use crate::core::RenderPort;
use crate::engine::{AnimationEngine, EngineConfig, Phase};
use crate::pulse::Pulse;
use crate::term::layout::FRAME_COLOR;
use crate::term::{draw_too_small, info_lines, Layout, StatusPanel, StatusView, TextPanel};
use crate::types::Region;

pub struct Stage<P, R> {
    port: P,
    engine: AnimationEngine<R>,
    layout: Option<Layout>,
    status: StatusPanel,
    info: TextPanel,
    clock: Instant,
}

impl<P: RenderPort, R: Rng> Stage<P, R> {
    /// Create a stage with no geometry yet; call [`Stage::resize`] before ticking.
    pub fn new(port: P, rng: R, config: EngineConfig) -> Self {
        Self {
            port,
            engine: AnimationEngine::with_config(Region::default(), rng, config),
            layout: None,
            status: StatusPanel::new(Region::default()),
            info: TextPanel::default(),
            clock: Instant::now(),
        }
    }

    /// Adopt new terminal dimensions.
    ///
    /// Resets the animation, clears the surface and redraws the decorations.
    /// Returns `false` when the terminal is too small; the "too small" notice
    /// is then shown and [`Stage::tick`] does nothing until the next resize.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<bool> {
        self.port.set_size(width, height);
        self.port.clear().context("failed to clear surface")?;
        self.layout = Layout::compute(width, height);

        let Some(layout) = &self.layout else {
            warn!("terminal {}x{} is too small", width, height);
            self.engine.resize(Region::default());
            draw_too_small(&mut self.port)?;
            self.port.flush()?;
            return Ok(false);
        };

        self.engine.resize(layout.region);
        layout.draw(&mut self.port).context("failed to draw layout")?;

        self.info.set_area(layout.info_area);
        self.info.draw(&info_lines(), FRAME_COLOR, &mut self.port)?;

        self.status.set_area(layout.status_area);
        let now_ms = elapsed_ms(self.clock, Instant::now());
        self.status
            .update(now_ms, &status_view(&self.engine), &mut self.port)?;

        self.port.flush()?;
        info!(
            "layout {}x{}: region {}x{} ({} cells)",
            width,
            height,
            layout.region.width,
            layout.region.height,
            layout.region.capacity()
        );
        Ok(true)
    }

    /// One engine step plus a throttled status refresh.
    ///
    /// Returns the phase after the step, or `None` when there is no layout.
    pub fn tick(&mut self, now: Instant) -> Result<Option<Phase>> {
        if self.layout.is_none() {
            return Ok(None);
        }
        let phase = self.engine.tick(now, &mut self.port);
        self.status.update(
            elapsed_ms(self.clock, now),
            &status_view(&self.engine),
            &mut self.port,
        )?;
        self.port.flush().context("failed to flush surface")?;
        Ok(Some(phase))
    }

    pub fn is_ready(&self) -> bool {
        self.layout.is_some()
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn engine(&self) -> &AnimationEngine<R> {
        &self.engine
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn status_view(&self) -> StatusView {
        status_view(&self.engine)
    }
}

impl<P, R> Pulse for Stage<P, R>
where
    P: RenderPort + Send,
    R: Rng + Send,
{
    fn pulse(&mut self, now: Instant) -> Result<()> {
        self.tick(now)?;
        Ok(())
    }
}

fn status_view<R: Rng>(engine: &AnimationEngine<R>) -> StatusView {
    let region = engine.region();
    StatusView {
        phase: engine.phase().as_str(),
        progress: engine.progress(),
        occupancy: engine.buffer().occupancy(),
        capacity: engine.capacity(),
        cycle: engine.cycle(),
        grid: (region.width, region.height),
    }
}

fn elapsed_ms(start: Instant, now: Instant) -> u64 {
    now.saturating_duration_since(start).as_millis() as u64
}
