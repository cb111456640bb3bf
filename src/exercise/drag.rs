//! Drag and place: pinch a shape, carry it into the target zone.
//!
//! A placement counts while the shape is still held, as soon as its anchor
//! enters the target zone.  The placed shape is removed and a fresh random
//! one is appended to the pool.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::Rng;

use super::progress::{Outcome, Phase, Progress};
use super::seeded_rng;
use crate::config::{DragConfig, TargetZone};
use crate::gesture::{GestureFacts, Point};
use crate::stats::ResultTag;

/// How long the target zone stays highlighted after a placement.
const PLACEMENT_FLASH: Duration = Duration::from_millis(500);

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Cube,
    Rectangle,
    Circle,
    Triangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Cube,
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Triangle,
    ];

    /// Bounding box `(width, height)` in pixels.
    pub fn size(self) -> (f32, f32) {
        match self {
            ShapeKind::Cube => (70.0, 70.0),
            ShapeKind::Rectangle => (100.0, 60.0),
            ShapeKind::Circle => (100.0, 100.0),
            ShapeKind::Triangle => (80.0, 80.0),
        }
    }
}

/// A draggable shape; `(x, y)` is the top-left of its bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub x: f32,
    pub y: f32,
    pub color: [u8; 3],
}

impl Shape {
    pub fn new(kind: ShapeKind, x: f32, y: f32, color: [u8; 3]) -> Self {
        Self { kind, x, y, color }
    }

    /// Strict hit test.  Circles use the disc, everything else the box
    /// (triangles included).
    pub fn contains(&self, p: Point) -> bool {
        let (w, h) = self.kind.size();
        match self.kind {
            ShapeKind::Circle => {
                let r = w / 2.0;
                let (dx, dy) = (p.x - (self.x + r), p.y - (self.y + r));
                dx * dx + dy * dy < r * r
            }
            _ => p.x > self.x && p.x < self.x + w && p.y > self.y && p.y < self.y + h,
        }
    }

    /// Point tested against the target zone: the centre for circles, the
    /// top-left corner otherwise.
    pub fn anchor(&self) -> Point {
        match self.kind {
            ShapeKind::Circle => {
                let r = self.kind.size().0 / 2.0;
                Point::new(self.x + r, self.y + r)
            }
            _ => Point::new(self.x, self.y),
        }
    }

    pub fn center_on(&mut self, p: Point) {
        let (w, h) = self.kind.size();
        self.x = p.x - w / 2.0;
        self.y = p.y - h / 2.0;
    }
}

fn zone_contains(zone: &TargetZone, p: Point) -> bool {
    p.x > zone.x && p.x < zone.x + zone.w && p.y > zone.y && p.y < zone.y + zone.h
}

fn initial_shapes() -> Vec<Shape> {
    vec![
        Shape::new(ShapeKind::Cube, 500.0, 100.0, [0, 255, 255]),
        Shape::new(ShapeKind::Rectangle, 500.0, 200.0, [255, 255, 0]),
        Shape::new(ShapeKind::Circle, 500.0, 300.0, [0, 0, 0]),
        Shape::new(ShapeKind::Triangle, 500.0, 400.0, [128, 128, 128]),
    ]
}

// ---------------------------------------------------------------------------
// DragPlace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DragPlace {
    config: DragConfig,
    shapes: Vec<Shape>,
    held: Option<usize>,
    prev_pinch: bool,
    last_placed_at: Option<Instant>,
    progress: Progress,
    rng: StdRng,
}

impl DragPlace {
    pub fn new(config: &DragConfig, seed: Option<u64>) -> Self {
        Self {
            config: config.clone(),
            shapes: initial_shapes(),
            held: None,
            prev_pinch: false,
            last_placed_at: None,
            progress: Progress::new(),
            rng: seeded_rng(seed),
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.progress.begin(now);
        self.shapes = initial_shapes();
        self.held = None;
        self.prev_pinch = false;
        self.last_placed_at = None;
    }

    pub fn update(&mut self, facts: Option<&GestureFacts>, now: Instant) -> Option<Outcome> {
        if self.progress.phase() != Phase::Playing {
            return None;
        }

        match facts {
            None => {
                self.held = None;
                self.prev_pinch = false;
            }
            Some(facts) => self.interact(facts, now),
        }

        let time_seconds = self
            .progress
            .elapsed_secs_rounded(now)
            .min(self.config.level_time_secs);

        let Some(goal) = self.level_goal() else {
            return self.progress.finish(Phase::Win, ResultTag::Win, time_seconds);
        };

        if self.progress.level_score() >= goal {
            if self.progress.level() + 1 < self.config.levels.len() {
                self.progress.advance_level();
                self.progress.restart_clock(now);
                log::info!("drag: level {} reached", self.progress.level() + 1);
                None
            } else {
                self.progress.finish(Phase::Win, ResultTag::Win, time_seconds)
            }
        } else if self.progress.elapsed(now) >= self.level_time() {
            self.progress.finish(Phase::Lose, ResultTag::Lose, time_seconds)
        } else {
            None
        }
    }

    /// Return to `Ready`, dropping anything held.  Never reports.
    pub fn stop(&mut self, _now: Instant) -> Option<Outcome> {
        self.held = None;
        self.prev_pinch = false;
        self.progress.halt();
        None
    }

    fn interact(&mut self, facts: &GestureFacts, now: Instant) {
        let pinch_edge = facts.pinch && !self.prev_pinch;
        self.prev_pinch = facts.pinch;

        if !facts.pinch {
            self.held = None;
            return;
        }
        if pinch_edge {
            self.grab_at(facts.pointer);
        }

        let Some(i) = self.held else { return };
        self.shapes[i].center_on(facts.pointer);

        if zone_contains(&self.config.target, self.shapes[i].anchor()) {
            self.shapes.remove(i);
            let fresh = self.random_shape();
            self.shapes.push(fresh);
            self.held = None;
            self.last_placed_at = Some(now);
            self.progress.award(1);
            log::debug!(
                "drag: placed, level score {}/{}",
                self.progress.level_score(),
                self.level_goal().unwrap_or_default()
            );
        }
    }

    /// Pick up the first shape under `pointer`.  No-op while holding.
    fn grab_at(&mut self, pointer: Point) {
        if self.held.is_some() {
            return;
        }
        self.held = self.shapes.iter().position(|s| s.contains(pointer));
    }

    fn random_shape(&mut self) -> Shape {
        let kind = ShapeKind::ALL[self.rng.gen_range(0..ShapeKind::ALL.len())];
        let x = self.rng.gen_range(100..=500) as f32;
        let y = self.rng.gen_range(100..=400) as f32;
        let color = [self.rng.gen(), self.rng.gen(), self.rng.gen()];
        Shape::new(kind, x, y, color)
    }

    fn level_time(&self) -> Duration {
        Duration::from_secs(self.config.level_time_secs)
    }

    /// Placements required in the current level.
    pub fn level_goal(&self) -> Option<u32> {
        self.config.levels.get(self.progress.level()).copied()
    }

    pub fn time_left(&self, now: Instant) -> Duration {
        match self.progress.phase() {
            Phase::Ready => self.level_time(),
            _ => self.level_time().saturating_sub(self.progress.elapsed(now)),
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn held(&self) -> Option<&Shape> {
        self.held.and_then(|i| self.shapes.get(i))
    }

    pub fn target(&self) -> TargetZone {
        self.config.target
    }

    /// `true` shortly after a successful placement (target highlight).
    pub fn placement_flash(&self, now: Instant) -> bool {
        self.last_placed_at
            .is_some_and(|t| now.saturating_duration_since(t) < PLACEMENT_FLASH)
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }
}
