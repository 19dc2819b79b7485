use std::collections::HashSet;
use std::io;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use tui_defrag::core::{FailMode, MemoryPort, RenderPort, WriteError};
use tui_defrag::engine::{AnimationEngine, EngineConfig, Phase};
use tui_defrag::types::{glyph_rank, Cell, Color, Coord, Region};

fn setup(w: u16, h: u16, seed: u64) -> (AnimationEngine<StdRng>, MemoryPort) {
    let region = Region::new(Coord::new(0, 0), w, h);
    (
        AnimationEngine::new(region, StdRng::seed_from_u64(seed)),
        MemoryPort::new(w, h),
    )
}

fn sorted(mut cells: Vec<Cell>) -> Vec<Cell> {
    cells.sort_by_key(|c| (c.color.id(), glyph_rank(c.glyph)));
    cells
}

/// Tick until the phase changes away from `phase`, with an upper bound.
fn run_while(engine: &mut AnimationEngine<StdRng>, port: &mut MemoryPort, phase: Phase, now: Instant) {
    let limit = engine.capacity() * 4 + 16;
    for _ in 0..limit {
        if engine.tick(now, port) != phase {
            return;
        }
    }
    panic!("engine stuck in {:?}", phase);
}

#[test]
fn reset_sizes_pool_to_capacity_and_empties_buffer() {
    let (mut engine, _) = setup(7, 3, 1);
    assert_eq!(engine.pool().len(), 21);
    assert_eq!(engine.buffer().occupancy(), 0);

    engine.resize(Region::new(Coord::new(2, 2), 4, 4));
    assert_eq!(engine.pool().len(), 16);
    assert_eq!(engine.buffer().occupancy(), 0);
    assert_eq!(engine.cursor(), 0);
    assert_eq!(engine.phase(), Phase::Drawing);
}

#[test]
fn drawing_keeps_pool_and_buffer_a_partition_of_the_region() {
    let (mut engine, mut port) = setup(6, 4, 2);
    let region = engine.region();
    let now = Instant::now();

    while engine.phase() == Phase::Drawing {
        let in_buffer: HashSet<Coord> = engine.buffer().iter().map(|(c, _)| c).collect();
        assert_eq!(in_buffer.len() + engine.pool().len(), region.capacity());
        for c in region.coords() {
            assert!(in_buffer.contains(&c) != engine.pool().contains(c));
        }
        engine.tick(now, &mut port);
    }
}

#[test]
fn drawing_writes_at_most_once_per_tick() {
    let (mut engine, mut port) = setup(5, 5, 3);
    let now = Instant::now();
    while engine.phase() == Phase::Drawing {
        port.reset_write_count();
        engine.tick(now, &mut port);
        assert!(port.write_count() <= 1);
    }
}

#[test]
fn sort_plan_is_a_permutation_of_the_drawn_cells() {
    let (mut engine, mut port) = setup(8, 4, 4);
    let now = Instant::now();
    run_while(&mut engine, &mut port, Phase::Drawing, now);

    assert_eq!(engine.phase(), Phase::Sorting);
    assert_eq!(engine.plan().len(), engine.capacity());
    assert_eq!(sorted(engine.plan().to_vec()), sorted(engine.buffer().cells()));
}

#[test]
fn sort_plan_orders_by_color_rank_then_glyph() {
    let (mut engine, mut port) = setup(10, 6, 5);
    let now = Instant::now();
    run_while(&mut engine, &mut port, Phase::Drawing, now);

    let ranks = engine.color_ranks();
    let keys: Vec<_> = engine
        .plan()
        .iter()
        .map(|c| (ranks.rank(c.color), glyph_rank(c.glyph)))
        .collect();
    assert!(keys.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn completed_sort_matches_the_plan_in_row_major_order() {
    let (mut engine, mut port) = setup(9, 5, 6);
    let now = Instant::now();
    run_while(&mut engine, &mut port, Phase::Drawing, now);
    let plan = engine.plan().to_vec();
    run_while(&mut engine, &mut port, Phase::Sorting, now);

    assert_eq!(engine.phase(), Phase::Waiting);
    assert_eq!(engine.faults(), 0);
    let region = engine.region();
    for (i, cell) in plan.iter().enumerate() {
        let c = region.coord_at(i);
        assert_eq!(engine.buffer().get(c), Some(*cell));
        assert_eq!(port.shown(c.x, c.y), Some((cell.glyph, cell.color)));
    }
}

#[test]
fn sorting_writes_at_most_twice_per_tick() {
    let (mut engine, mut port) = setup(7, 7, 7);
    let now = Instant::now();
    run_while(&mut engine, &mut port, Phase::Drawing, now);
    while engine.phase() == Phase::Sorting {
        port.reset_write_count();
        engine.tick(now, &mut port);
        assert!(port.write_count() <= 2);
    }
    assert_eq!(engine.buffer().occupancy(), engine.capacity());
}

#[test]
fn settled_destination_advances_without_writes() {
    let (mut engine, mut port) = setup(6, 6, 8);
    let now = Instant::now();
    run_while(&mut engine, &mut port, Phase::Drawing, now);

    let mut skipped = 0;
    while engine.phase() == Phase::Sorting && engine.cursor() < engine.plan().len() {
        let cursor = engine.cursor();
        let dest = engine.region().coord_at(cursor);
        let settled = engine.buffer().get(dest) == Some(engine.plan()[cursor]);
        port.reset_write_count();
        engine.tick(now, &mut port);
        assert_eq!(engine.cursor(), cursor + 1);
        if settled {
            assert_eq!(port.write_count(), 0);
            skipped += 1;
        }
    }
    // The last position is always settled by elimination.
    assert!(skipped >= 1);
}

#[test]
fn waiting_restarts_only_after_the_wait_elapses() {
    let region = Region::new(Coord::new(0, 0), 4, 3);
    let config = EngineConfig {
        wait: Duration::from_millis(500),
    };
    let mut engine = AnimationEngine::with_config(region, StdRng::seed_from_u64(9), config);
    let mut port = MemoryPort::new(4, 3);
    let t0 = Instant::now();

    run_while(&mut engine, &mut port, Phase::Drawing, t0);
    run_while(&mut engine, &mut port, Phase::Sorting, t0);
    assert_eq!(engine.phase(), Phase::Waiting);

    assert_eq!(engine.tick(t0 + Duration::from_millis(500), &mut port), Phase::Waiting);
    assert_eq!(engine.cycle(), 0);

    assert_eq!(engine.tick(t0 + Duration::from_millis(501), &mut port), Phase::Drawing);
    assert_eq!(engine.cycle(), 1);
    assert_eq!(engine.buffer().occupancy(), 0);
    assert_eq!(engine.pool().len(), 12);
    assert!((0..3).all(|y| port.row_text(y).trim().is_empty()));
}

#[test]
fn several_cycles_run_without_consistency_faults() {
    let region = Region::new(Coord::new(1, 1), 5, 4);
    let config = EngineConfig {
        wait: Duration::ZERO,
    };
    let mut engine = AnimationEngine::with_config(region, StdRng::seed_from_u64(10), config);
    let mut port = MemoryPort::new(7, 6);
    let mut now = Instant::now();

    while engine.cycle() < 5 {
        now += Duration::from_millis(8);
        engine.tick(now, &mut port);
    }
    assert_eq!(engine.faults(), 0);
}

#[test]
fn transient_write_failure_is_retried() {
    let (mut engine, mut port) = setup(3, 3, 11);
    port.fail_at(1, 1, FailMode::Io);
    let now = Instant::now();

    for _ in 0..100 {
        engine.tick(now, &mut port);
    }
    assert_eq!(engine.phase(), Phase::Drawing);
    assert!(engine.buffer().get(Coord::new(1, 1)).is_none());
    assert!(engine.pool().contains(Coord::new(1, 1)));

    port.clear_failures();
    run_while(&mut engine, &mut port, Phase::Drawing, now);
    assert_eq!(engine.buffer().occupancy(), 9);
    assert!(port.shown(1, 1).is_some());
}

/// Memory surface that refuses exactly one write once armed.
struct OneShotFailPort {
    inner: MemoryPort,
    fail_in: Option<usize>,
}

impl RenderPort for OneShotFailPort {
    fn write(&mut self, x: u16, y: u16, glyph: char, color: Color) -> Result<(), WriteError> {
        match self.fail_in {
            Some(0) => {
                self.fail_in = None;
                Err(io::Error::new(io::ErrorKind::Other, "device busy").into())
            }
            Some(n) => {
                self.fail_in = Some(n - 1);
                self.inner.write(x, y, glyph, color)
            }
            None => self.inner.write(x, y, glyph, color),
        }
    }

    fn size(&self) -> (u16, u16) {
        self.inner.size()
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.inner.set_size(width, height)
    }

    fn clear(&mut self) -> Result<(), WriteError> {
        self.inner.clear()
    }
}

/// Sort a full grid, failing the `nth` write of the first tick that has to
/// move a cell. Returns the engine, the surface and the cells drawn.
fn sort_with_one_failed_write(nth: usize) -> (AnimationEngine<StdRng>, OneShotFailPort, Vec<Cell>) {
    let (mut engine, inner) = setup(6, 4, 17);
    let mut port = OneShotFailPort { inner, fail_in: None };
    let now = Instant::now();

    while engine.tick(now, &mut port) == Phase::Drawing {}
    let drawn = engine.buffer().cells();

    let mut armed = false;
    for _ in 0..engine.capacity() * 4 {
        if engine.phase() != Phase::Sorting {
            break;
        }
        let cursor = engine.cursor();
        if !armed && cursor < engine.plan().len() {
            let dest = engine.region().coord_at(cursor);
            if engine.buffer().get(dest) != Some(engine.plan()[cursor]) {
                port.fail_in = Some(nth);
                armed = true;
            }
        }
        engine.tick(now, &mut port);
    }
    assert!(armed, "no relocating tick found");
    assert!(port.fail_in.is_none(), "armed failure never fired");
    assert_eq!(engine.phase(), Phase::Waiting);
    (engine, port, drawn)
}

fn assert_sorted_and_shown(engine: &AnimationEngine<StdRng>, port: &OneShotFailPort, drawn: Vec<Cell>) {
    let region = engine.region();
    assert_eq!(engine.faults(), 0);
    assert_eq!(engine.buffer().occupancy(), region.capacity());
    assert_eq!(sorted(engine.buffer().cells()), sorted(drawn));
    for (i, want) in engine.plan().iter().enumerate() {
        let coord = region.coord_at(i);
        assert_eq!(engine.buffer().get(coord), Some(*want), "buffer at {:?}", coord);
        let (x, y) = region.to_screen(coord);
        assert_eq!(port.inner.shown(x, y), Some((want.glyph, want.color)), "screen at {:?}", coord);
    }
}

#[test]
fn failed_displacement_write_during_sorting_loses_no_cell() {
    let (engine, port, drawn) = sort_with_one_failed_write(0);
    assert_sorted_and_shown(&engine, &port, drawn);
}

#[test]
fn failed_settling_write_during_sorting_is_repainted() {
    let (engine, port, drawn) = sort_with_one_failed_write(1);
    assert_sorted_and_shown(&engine, &port, drawn);
}

#[test]
fn failed_displacement_write_holds_the_cursor() {
    let (mut engine, inner) = setup(5, 3, 19);
    let mut port = OneShotFailPort { inner, fail_in: None };
    let now = Instant::now();
    while engine.tick(now, &mut port) == Phase::Drawing {}

    while engine.phase() == Phase::Sorting {
        let cursor = engine.cursor();
        if cursor >= engine.plan().len() {
            break;
        }
        let dest = engine.region().coord_at(cursor);
        if engine.buffer().get(dest) != Some(engine.plan()[cursor]) {
            break;
        }
        engine.tick(now, &mut port);
    }
    assert_eq!(engine.phase(), Phase::Sorting);
    let cursor = engine.cursor();
    assert!(cursor < engine.plan().len(), "grid needed no relocation");
    let before = sorted(engine.buffer().cells());

    port.fail_in = Some(0);
    engine.tick(now, &mut port);
    assert_eq!(engine.cursor(), cursor);
    assert_eq!(sorted(engine.buffer().cells()), before);

    // Repaint, then the retried move.
    engine.tick(now, &mut port);
    engine.tick(now, &mut port);
    assert_eq!(engine.cursor(), cursor + 1);
    assert_eq!(sorted(engine.buffer().cells()), before);
}

#[test]
fn progress_tracks_each_phase() {
    let (mut engine, mut port) = setup(4, 4, 12);
    let now = Instant::now();
    assert_eq!(engine.progress(), 0.0);
    for _ in 0..8 {
        engine.tick(now, &mut port);
    }
    assert!((engine.progress() - 0.5).abs() < f32::EPSILON);
    run_while(&mut engine, &mut port, Phase::Drawing, now);
    assert_eq!(engine.progress(), 0.0);
    run_while(&mut engine, &mut port, Phase::Sorting, now);
    assert_eq!(engine.progress(), 1.0);
}
