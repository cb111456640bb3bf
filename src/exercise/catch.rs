//! Catch the stars: touch a star with an open, palm-down hand.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::Rng;

use super::progress::{Outcome, Phase, Progress};
use super::seeded_rng;
use crate::config::{CanvasConfig, CatchConfig};
use crate::gesture::{GestureFacts, Point};
use crate::stats::ResultTag;

/// A star's square hit box, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl Star {
    /// Strictly inside: touching the edge is a miss.
    pub fn contains(&self, p: Point) -> bool {
        p.x > self.x && p.x < self.x + self.size && p.y > self.y && p.y < self.y + self.size
    }
}

#[derive(Debug, Clone)]
pub struct CatchStars {
    config: CatchConfig,
    width: f32,
    height: f32,
    stars: Vec<Star>,
    progress: Progress,
    rng: StdRng,
}

impl CatchStars {
    pub fn new(config: &CatchConfig, canvas: &CanvasConfig, seed: Option<u64>) -> Self {
        let mut engine = Self {
            config: config.clone(),
            width: canvas.width,
            height: canvas.height,
            stars: Vec::new(),
            progress: Progress::new(),
            rng: seeded_rng(seed),
        };
        engine.scatter();
        engine
    }

    pub fn start(&mut self, now: Instant) {
        self.progress.begin(now);
        self.scatter();
    }

    /// Hit test is frame-level: a star relocates immediately when touched,
    /// so a steady hand cannot score the same star twice.
    pub fn update(&mut self, facts: Option<&GestureFacts>, now: Instant) -> Option<Outcome> {
        if self.progress.phase() != Phase::Playing {
            return None;
        }

        if let Some(facts) = facts.filter(|f| f.palm_down) {
            if let Some(i) = self.stars.iter().position(|s| s.contains(facts.pointer)) {
                self.stars[i] = self.random_star();
                self.progress.award(1);
                log::debug!("catch: star {i} caught, score {}", self.progress.total());
            }
        }

        if self.progress.total() >= self.config.target_score {
            let secs = self.progress.elapsed_secs(now).min(self.config.time_limit_secs);
            return self.progress.finish(Phase::Win, ResultTag::Win, secs);
        }
        if self.progress.elapsed(now) >= self.time_limit() {
            return self
                .progress
                .finish(Phase::Lose, ResultTag::Lose, self.config.time_limit_secs);
        }
        None
    }

    /// Return to `Ready`.  Catch never reports on stop.
    pub fn stop(&mut self, _now: Instant) -> Option<Outcome> {
        self.progress.halt();
        None
    }

    pub fn time_left(&self, now: Instant) -> Duration {
        match self.progress.phase() {
            Phase::Ready => self.time_limit(),
            _ => self.time_limit().saturating_sub(self.progress.elapsed(now)),
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn target_score(&self) -> u32 {
        self.config.target_score
    }

    fn time_limit(&self) -> Duration {
        Duration::from_secs(self.config.time_limit_secs)
    }

    fn scatter(&mut self) {
        let stars = (0..self.config.star_count)
            .map(|_| self.random_star())
            .collect();
        self.stars = stars;
    }

    fn random_star(&mut self) -> Star {
        let size = self.config.star_size;
        let max_x = (self.width - size).max(0.0);
        let max_y = (self.height - size).max(0.0);
        Star {
            x: self.rng.gen_range(0.0..=max_x),
            y: self.rng.gen_range(0.0..=max_y),
            size,
        }
    }

    #[cfg(test)]
    pub(crate) fn place_star(&mut self, index: usize, x: f32, y: f32) {
        self.stars[index].x = x;
        self.stars[index].y = y;
    }
}
