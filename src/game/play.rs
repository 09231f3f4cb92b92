//! Round tracking: in-play ball accounting and round-level event cadence

use std::cell::Cell;

use crate::consts::{EFFECT_SPAWN_PERIOD, SWAP_PORTALS_PERIOD};

use super::event::Event;

/// Tracks the in-round ball population and emits round-level events.
///
/// Only gameplay losses feed the accounting; administrative teardown at
/// round end bypasses it, so the all-destroyed event cannot re-enter the
/// results path.
pub struct PlayController {
    round_active: Cell<bool>,
    balls_in_play: Cell<u32>,
    swap_accum: Cell<f32>,
    effect_accum: Cell<f32>,

    /// Fired once when the last in-round ball is lost.
    pub all_balls_destroyed: Event<()>,
    pub swap_portals: Event<()>,
    pub spawn_effect: Event<()>,
}

impl Default for PlayController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayController {
    pub fn new() -> Self {
        Self {
            round_active: Cell::new(false),
            balls_in_play: Cell::new(0),
            swap_accum: Cell::new(0.0),
            effect_accum: Cell::new(0.0),
            all_balls_destroyed: Event::new(),
            swap_portals: Event::new(),
            spawn_effect: Event::new(),
        }
    }

    pub fn start_round(&self) {
        self.round_active.set(true);
        self.swap_accum.set(0.0);
        self.effect_accum.set(0.0);
        log::debug!("round started ({} balls in play)", self.balls_in_play.get());
    }

    pub fn stop_round(&self) {
        self.round_active.set(false);
        self.balls_in_play.set(0);
        log::debug!("round stopped");
    }

    pub fn round_active(&self) -> bool {
        self.round_active.get()
    }

    pub fn balls_in_play(&self) -> u32 {
        self.balls_in_play.get()
    }

    pub fn note_ball_spawned(&self) {
        self.balls_in_play.set(self.balls_in_play.get() + 1);
    }

    /// Record one gameplay loss; fires the all-destroyed event when the
    /// last ball goes while a round is active.
    pub fn note_ball_lost(&self) {
        let before = self.balls_in_play.get();
        if before == 0 {
            return;
        }
        let remaining = before - 1;
        self.balls_in_play.set(remaining);
        if remaining == 0 && self.round_active.get() {
            self.all_balls_destroyed.emit(&());
        }
    }

    /// Advance the cadence clocks; swap/spawn events fire on their periods
    /// only while a round is active.
    pub fn tick(&self, dt: f32) {
        if !self.round_active.get() {
            return;
        }

        let mut swap = self.swap_accum.get() + dt;
        while swap >= SWAP_PORTALS_PERIOD && self.round_active.get() {
            swap -= SWAP_PORTALS_PERIOD;
            self.swap_portals.emit(&());
        }
        self.swap_accum.set(swap);

        let mut effect = self.effect_accum.get() + dt;
        while effect >= EFFECT_SPAWN_PERIOD && self.round_active.get() {
            effect -= EFFECT_SPAWN_PERIOD;
            self.spawn_effect.emit(&());
        }
        self.effect_accum.set(effect);
    }
}
