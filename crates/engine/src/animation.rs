//! Animation engine - the draw / sort / wait state machine.
//!
//! One call to [`AnimationEngine::tick`] advances the animation by exactly one
//! step:
//!
//! - **Drawing**: place one random cell on a random free coordinate.
//! - **Sorting**: settle one cursor position of the sort plan.
//!   A relocation whose first write fails is retried on the next tick; one
//!   whose second write fails keeps the intended cell in the buffer and
//!   repaints that coordinate before any further sorting.
//! - **Waiting**: hold the sorted picture, then wipe and start over.
//!
//! The engine never blocks and never touches the surface except through
//! [`CellBuffer`]. Time is passed in by the caller so tests control the clock.
//!
//! # Complexity
//!
//! Locating the next target while sorting scans the unsettled tail of the
//! region: O(n) per miss, O(n²) per full sort. That is fine at terminal sizes.

use std::time::{Duration, Instant};

use log::{debug, error, info};
use rand::Rng;

use crate::core::{CellBuffer, CoordinatePool, RenderOutcome, RenderPort};
use crate::plan::{build_sort_plan, ColorRanks};
use crate::types::{Cell, Color, Coord, Region, GLYPHS, WAIT_MS};

/// Animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Drawing,
    Sorting,
    Waiting,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Drawing => "DRAWING",
            Phase::Sorting => "SORTING",
            Phase::Waiting => "WAITING",
        }
    }
}

/// Engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long the sorted picture stays up.
    pub wait: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wait: Duration::from_millis(WAIT_MS),
        }
    }
}

pub struct AnimationEngine<R> {
    region: Region,
    pool: CoordinatePool,
    buffer: CellBuffer,
    phase: Phase,
    plan: Vec<Cell>,
    ranks: ColorRanks,
    cursor: usize,
    /// Coordinate whose screen content lags the buffer after a failed write.
    repair: Option<Coord>,
    wait_started: Option<Instant>,
    config: EngineConfig,
    cycle: u64,
    faults: u64,
    rng: R,
}

impl<R: Rng> AnimationEngine<R> {
    pub fn new(region: Region, rng: R) -> Self {
        Self::with_config(region, rng, EngineConfig::default())
    }

    pub fn with_config(region: Region, rng: R, config: EngineConfig) -> Self {
        let mut engine = Self {
            region,
            pool: CoordinatePool::new(),
            buffer: CellBuffer::new(region),
            phase: Phase::Drawing,
            plan: Vec::new(),
            ranks: ColorRanks::identity(),
            cursor: 0,
            repair: None,
            wait_started: None,
            config,
            cycle: 0,
            faults: 0,
            rng,
        };
        engine.reset();
        engine
    }

    /// Drop all grid state and start a fresh cycle on the current region.
    ///
    /// This does not touch the surface; callers that keep the screen must
    /// blank it themselves (see [`AnimationEngine::restart`]).
    pub fn reset(&mut self) {
        self.buffer.reset(self.region);
        self.pool.reset(self.region, &mut self.rng);
        self.plan.clear();
        self.cursor = 0;
        self.repair = None;
        self.wait_started = None;
        self.phase = Phase::Drawing;
    }

    /// Adopt a new drawable region (terminal resize) and reset.
    pub fn resize(&mut self, region: Region) {
        debug!(
            "engine region {}x{} -> {}x{}",
            self.region.width, self.region.height, region.width, region.height
        );
        self.region = region;
        self.reset();
    }

    /// Blank the cells drawn so far and start the next cycle.
    pub fn restart<P: RenderPort + ?Sized>(&mut self, port: &mut P) {
        self.buffer.wipe(port);
        self.reset();
        self.cycle += 1;
        info!("cycle {} started", self.cycle);
    }

    /// Advance the animation by one step. Returns the phase after the step.
    pub fn tick<P: RenderPort + ?Sized>(&mut self, now: Instant, port: &mut P) -> Phase {
        match self.phase {
            Phase::Drawing => self.tick_drawing(port),
            Phase::Sorting => self.tick_sorting(now, port),
            Phase::Waiting => self.tick_waiting(now, port),
        }
        self.phase
    }

    fn tick_drawing<P: RenderPort + ?Sized>(&mut self, port: &mut P) {
        if self.buffer.occupancy() >= self.region.capacity() {
            self.begin_sort();
            return;
        }

        let Some(coord) = self.pool.take() else {
            error!(
                "coordinate pool exhausted with {} of {} cells drawn",
                self.buffer.occupancy(),
                self.region.capacity()
            );
            self.begin_sort();
            return;
        };

        let cell = random_cell(&mut self.rng);
        if self.buffer.render(coord, cell, port) == RenderOutcome::Dropped {
            self.pool.restore(coord, &mut self.rng);
        }
    }

    fn begin_sort(&mut self) {
        self.ranks = ColorRanks::shuffled(&mut self.rng);
        self.plan = build_sort_plan(self.buffer.cells(), &self.ranks);
        self.cursor = 0;
        self.phase = Phase::Sorting;
        debug!(
            "sorting {} cells, leading color {}",
            self.plan.len(),
            self.ranks.order()[0].as_str()
        );
    }

    fn tick_sorting<P: RenderPort + ?Sized>(&mut self, now: Instant, port: &mut P) {
        if let Some(coord) = self.repair {
            if self.buffer.repaint(coord, port) {
                self.repair = None;
            }
            return;
        }

        if self.cursor >= self.plan.len() {
            self.phase = Phase::Waiting;
            self.wait_started = Some(now);
            return;
        }

        let dest = self.region.coord_at(self.cursor);
        let target = self.plan[self.cursor];
        let current = self.buffer.get(dest);

        if current != Some(target) {
            match self.find_unsettled(target) {
                Some(source) => {
                    if !self.relocate(source, dest, target, current, port) {
                        return;
                    }
                }
                None => {
                    self.faults += 1;
                    error!(
                        "sort target {:?} for cursor {} not found in unsettled region",
                        target, self.cursor
                    );
                }
            }
        }

        self.cursor += 1;
    }

    /// Swap `target` from `source` onto `dest`, moving whatever sat on `dest`
    /// into the hole. Returns `false` if nothing moved and the step must be
    /// retried.
    fn relocate<P: RenderPort + ?Sized>(
        &mut self,
        source: Coord,
        dest: Coord,
        target: Cell,
        current: Option<Cell>,
        port: &mut P,
    ) -> bool {
        match current {
            Some(displaced) => {
                if self.buffer.render(source, displaced, port) == RenderOutcome::Dropped {
                    self.buffer.put(source, target);
                    self.repair = Some(source);
                    debug!("relocation at cursor {} deferred", self.cursor);
                    return false;
                }
                if self.buffer.render(dest, target, port) == RenderOutcome::Dropped {
                    self.buffer.put(dest, target);
                    self.repair = Some(dest);
                }
            }
            None => {
                if self.buffer.render(dest, target, port) == RenderOutcome::Dropped {
                    debug!("relocation at cursor {} deferred", self.cursor);
                    return false;
                }
                if !self.buffer.erase(source, port) {
                    self.repair = Some(source);
                }
            }
        }
        true
    }

    /// First coordinate after the cursor holding `target`.
    ///
    /// Positions before and at the cursor are settled and never searched.
    fn find_unsettled(&self, target: Cell) -> Option<Coord> {
        ((self.cursor + 1)..self.region.capacity())
            .map(|i| self.region.coord_at(i))
            .find(|c| self.buffer.get(*c) == Some(target))
    }

    fn tick_waiting<P: RenderPort + ?Sized>(&mut self, now: Instant, port: &mut P) {
        let started = *self.wait_started.get_or_insert(now);
        if now.saturating_duration_since(started) > self.config.wait {
            self.restart(port);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn capacity(&self) -> usize {
        self.region.capacity()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn plan(&self) -> &[Cell] {
        &self.plan
    }

    pub fn color_ranks(&self) -> ColorRanks {
        self.ranks
    }

    pub fn buffer(&self) -> &CellBuffer {
        &self.buffer
    }

    pub fn pool(&self) -> &CoordinatePool {
        &self.pool
    }

    /// Completed cycles since start.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Sort targets that could not be found (should stay zero).
    pub fn faults(&self) -> u64 {
        self.faults
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Progress through the current phase in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        let ratio = |n: usize, d: usize| if d == 0 { 1.0 } else { n as f32 / d as f32 };
        match self.phase {
            Phase::Drawing => ratio(self.buffer.occupancy(), self.region.capacity()),
            Phase::Sorting => ratio(self.cursor, self.plan.len()),
            Phase::Waiting => 1.0,
        }
    }
}

fn random_cell<R: Rng + ?Sized>(rng: &mut R) -> Cell {
    let glyph = GLYPHS[rng.gen_range(0..GLYPHS.len())];
    let color = Color::ALL[rng.gen_range(0..Color::COUNT)];
    Cell::new(glyph, color)
}
