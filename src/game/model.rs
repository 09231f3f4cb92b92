//! Game/session state and its named mutation operations
//!
//! The model is created once, injected everywhere, and mutated only through
//! the operations below. Each observable quantity has a change event that
//! fires synchronously inside the mutating call. Fields use interior
//! mutability so change handlers can read the model back mid-dispatch.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::event::Event;

/// One mutually-exclusive UI mode. Transitions are always explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Screen {
    #[default]
    MainMenu,
    PlayMenu,
    SettingsMenu,
    StoreMenu,
    ResultsMenu,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::MainMenu => "main",
            Screen::PlayMenu => "play",
            Screen::SettingsMenu => "settings",
            Screen::StoreMenu => "store",
            Screen::ResultsMenu => "results",
        }
    }
}

/// Ball variants sold in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BallKind {
    #[default]
    Comet,
    Pulsar,
    Nova,
}

impl BallKind {
    pub const ALL: [BallKind; 3] = [BallKind::Comet, BallKind::Pulsar, BallKind::Nova];

    pub fn as_str(&self) -> &'static str {
        match self {
            BallKind::Comet => "comet",
            BallKind::Pulsar => "pulsar",
            BallKind::Nova => "nova",
        }
    }
}

/// Initial values injected at construction, from persisted settings/records.
#[derive(Debug, Clone)]
pub struct ModelInit {
    pub record_secs: u32,
    pub total_stars: u64,
    pub music_volume: f32,
    pub sfx_volume: f32,
    pub selected_ball: BallKind,
    pub owned_balls: Vec<BallKind>,
}

impl Default for ModelInit {
    fn default() -> Self {
        Self {
            record_secs: 0,
            total_stars: 0,
            music_volume: 0.7,
            sfx_volume: 1.0,
            selected_ball: BallKind::Comet,
            owned_balls: vec![BallKind::Comet],
        }
    }
}

/// Mutable session state shared by the whole application.
pub struct Model {
    current_screen: Cell<Screen>,
    previous_screen: Cell<Screen>,
    elapsed_secs: Cell<u32>,
    record_secs: Cell<u32>,
    round_stars: Cell<u32>,
    total_stars: Cell<u64>,
    music_volume: Cell<f32>,
    sfx_volume: Cell<f32>,
    selected_ball: Cell<BallKind>,
    owned_balls: RefCell<HashSet<BallKind>>,
    paused: Cell<bool>,

    /// Fired with the new screen after every transition.
    pub screen_changed: Event<Screen>,
    pub elapsed_changed: Event<u32>,
    pub record_changed: Event<u32>,
    pub round_stars_changed: Event<u32>,
    pub total_stars_changed: Event<u64>,
    pub music_changed: Event<f32>,
    pub sfx_changed: Event<f32>,
    pub selection_changed: Event<BallKind>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(ModelInit::default())
    }
}

impl Model {
    pub fn new(init: ModelInit) -> Self {
        let mut owned: HashSet<BallKind> = init.owned_balls.into_iter().collect();
        owned.insert(init.selected_ball);
        Self {
            current_screen: Cell::new(Screen::MainMenu),
            previous_screen: Cell::new(Screen::MainMenu),
            elapsed_secs: Cell::new(0),
            record_secs: Cell::new(init.record_secs),
            round_stars: Cell::new(0),
            total_stars: Cell::new(init.total_stars),
            music_volume: Cell::new(init.music_volume.clamp(0.0, 1.0)),
            sfx_volume: Cell::new(init.sfx_volume.clamp(0.0, 1.0)),
            selected_ball: Cell::new(init.selected_ball),
            owned_balls: RefCell::new(owned),
            paused: Cell::new(false),
            screen_changed: Event::new(),
            elapsed_changed: Event::new(),
            record_changed: Event::new(),
            round_stars_changed: Event::new(),
            total_stars_changed: Event::new(),
            music_changed: Event::new(),
            sfx_changed: Event::new(),
            selection_changed: Event::new(),
        }
    }

    // === Screens ===

    pub fn current_screen(&self) -> Screen {
        self.current_screen.get()
    }

    /// Screen active before the last transition (plain value, not observed).
    pub fn previous_screen(&self) -> Screen {
        self.previous_screen.get()
    }

    /// Transition to `to`, remembering the screen we left.
    pub fn change_screen(&self, to: Screen) {
        let from = self.current_screen.get();
        if from == to {
            return;
        }
        self.previous_screen.set(from);
        self.current_screen.set(to);
        log::debug!("screen {} -> {}", from.as_str(), to.as_str());
        self.screen_changed.emit(&to);
    }

    // === Time ===

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs.get()
    }

    pub fn record_secs(&self) -> u32 {
        self.record_secs.get()
    }

    pub fn reset_elapsed(&self) {
        self.elapsed_secs.set(0);
        self.elapsed_changed.emit(&0);
    }

    /// Advance the play clock by one second. Time only moves on the play
    /// screen while not paused; ticks elsewhere are dropped.
    pub fn advance_second(&self) {
        if self.current_screen.get() != Screen::PlayMenu || self.paused.get() {
            return;
        }
        let secs = self.elapsed_secs.get() + 1;
        self.elapsed_secs.set(secs);
        self.elapsed_changed.emit(&secs);
    }

    /// Promote the current elapsed time to the record if it beats it.
    /// Returns true when the record improved.
    pub fn check_update_record(&self) -> bool {
        let secs = self.elapsed_secs.get();
        if secs <= self.record_secs.get() {
            return false;
        }
        self.record_secs.set(secs);
        log::info!("new record: {secs}s");
        self.record_changed.emit(&secs);
        true
    }

    // === Pause (idempotent; replaces global clock-rate toggling) ===

    pub fn pause(&self) {
        self.paused.set(true);
    }

    pub fn resume(&self) {
        self.paused.set(false);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    // === Stars ===

    pub fn round_stars(&self) -> u32 {
        self.round_stars.get()
    }

    pub fn total_stars(&self) -> u64 {
        self.total_stars.get()
    }

    /// Credit one collected star to the round and the lifetime balance.
    pub fn add_star(&self) {
        let round = self.round_stars.get() + 1;
        self.round_stars.set(round);
        self.round_stars_changed.emit(&round);

        let total = self.total_stars.get() + 1;
        self.total_stars.set(total);
        self.total_stars_changed.emit(&total);
    }

    pub fn reset_round_stars(&self) {
        self.round_stars.set(0);
        self.round_stars_changed.emit(&0);
    }

    /// Deduct from the lifetime balance; false if it would go negative.
    pub fn spend_stars(&self, cost: u64) -> bool {
        let total = self.total_stars.get();
        let Some(rest) = total.checked_sub(cost) else {
            return false;
        };
        self.total_stars.set(rest);
        self.total_stars_changed.emit(&rest);
        true
    }

    // === Audio ===

    pub fn music_volume(&self) -> f32 {
        self.music_volume.get()
    }

    pub fn sfx_volume(&self) -> f32 {
        self.sfx_volume.get()
    }

    pub fn set_music_volume(&self, value: f32) {
        let value = value.clamp(0.0, 1.0);
        self.music_volume.set(value);
        self.music_changed.emit(&value);
    }

    pub fn set_sfx_volume(&self, value: f32) {
        let value = value.clamp(0.0, 1.0);
        self.sfx_volume.set(value);
        self.sfx_changed.emit(&value);
    }

    // === Ball selection (store-only; never mutated during a round) ===

    pub fn selected_ball(&self) -> BallKind {
        self.selected_ball.get()
    }

    pub fn select_ball(&self, kind: BallKind) {
        self.selected_ball.set(kind);
        self.selection_changed.emit(&kind);
    }

    pub fn owns_ball(&self, kind: BallKind) -> bool {
        self.owned_balls.borrow().contains(&kind)
    }

    pub fn grant_ball(&self, kind: BallKind) {
        self.owned_balls.borrow_mut().insert(kind);
    }

    pub fn owned_balls(&self) -> Vec<BallKind> {
        let owned = self.owned_balls.borrow();
        BallKind::ALL
            .into_iter()
            .filter(|kind| owned.contains(kind))
            .collect()
    }
}
