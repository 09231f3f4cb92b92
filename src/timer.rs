//! Time sources: whole-second notifications and the fixed-update stream
//!
//! Both are fed real frame time by the driving loop and fan out through the
//! core's event primitive, so handlers run on the same logical thread as
//! everything else.

use std::cell::Cell;

use crate::consts::FIXED_DT;
use crate::game::event::Event;

/// Emits one notification per elapsed whole second while running.
pub struct SecondTimer {
    running: Cell<bool>,
    accum: Cell<f32>,
    pub second_passed: Event<()>,
}

impl Default for SecondTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SecondTimer {
    pub fn new() -> Self {
        Self {
            running: Cell::new(false),
            accum: Cell::new(0.0),
            second_passed: Event::new(),
        }
    }

    /// Start counting from zero fractional time.
    pub fn start(&self) {
        self.running.set(true);
        self.accum.set(0.0);
    }

    pub fn stop(&self) {
        self.running.set(false);
        self.accum.set(0.0);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Feed elapsed real time; fires once per accumulated second. A stop
    /// from inside a handler halts the drain immediately.
    pub fn tick(&self, dt: f32) {
        if !self.running.get() {
            return;
        }
        let mut accum = self.accum.get() + dt;
        while accum >= 1.0 && self.running.get() {
            accum -= 1.0;
            self.second_passed.emit(&());
        }
        self.accum.set(if self.running.get() { accum } else { 0.0 });
    }
}

/// Fixed-update notification source for frame-gated input polling.
pub struct FrameClock {
    accum: Cell<f32>,
    pub fixed_update: Event<f32>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            accum: Cell::new(0.0),
            fixed_update: Event::new(),
        }
    }

    /// Feed frame time; emits one fixed update per elapsed step.
    pub fn advance(&self, dt: f32) {
        let mut accum = self.accum.get() + dt;
        while accum >= FIXED_DT {
            accum -= FIXED_DT;
            self.fixed_update.emit(&FIXED_DT);
        }
        self.accum.set(accum);
    }
}
