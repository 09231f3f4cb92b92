//! Collectible effects: closed variant union and spawned instances

use std::cell::{Cell, RefCell};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioMixer, Sfx};
use crate::spawn::{BallDynamics, BallSpawner};

use super::event::{Event, Subscription, SubscriptionSet};
use super::model::Model;

/// Collectible variants. Each declares its own on-contact behavior, so a
/// new variant never touches the mediator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Grants a star
    Star,
    /// Spawns an additional ball at the contact position
    SpawnBall,
    /// Zeroes ball velocities and inverts gravity
    SwapGravity,
}

impl EffectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Star => "star",
            EffectKind::SpawnBall => "spawn-ball",
            EffectKind::SwapGravity => "swap-gravity",
        }
    }
}

/// Collaborators an effect may reach when consumed.
pub struct EffectContext<'a> {
    pub model: &'a Model,
    pub balls: &'a dyn BallSpawner,
    pub dynamics: &'a dyn BallDynamics,
    pub audio: &'a dyn AudioMixer,
}

impl EffectKind {
    /// One-shot behavior when a ball touches the instance.
    pub fn apply_on_contact(&self, ctx: &EffectContext<'_>, at: Vec2) {
        match self {
            EffectKind::Star => {
                ctx.model.add_star();
                ctx.audio.play(Sfx::StarCollected);
            }
            EffectKind::SpawnBall => {
                ctx.balls.spawn_at(ctx.model.selected_ball(), at);
                ctx.audio.play(Sfx::ExtraBall);
            }
            EffectKind::SwapGravity => {
                ctx.dynamics.flip_gravity();
                ctx.audio.play(Sfx::GravityFlip);
            }
        }
    }
}

/// A spawned collectible. Consumed by its first contact, and owns the
/// handler subscriptions attached to it so they die with the instance.
pub struct EffectInstance {
    pub id: u32,
    pub kind: EffectKind,
    pub pos: Vec2,
    consumed: Cell<bool>,
    /// Fired at most once, with the contact position.
    pub contact: Event<Vec2>,
    holds: RefCell<SubscriptionSet>,
}

impl EffectInstance {
    pub fn new(id: u32, kind: EffectKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            consumed: Cell::new(false),
            contact: Event::new(),
            holds: RefCell::new(SubscriptionSet::new()),
        }
    }

    /// Tie a subscription to this instance's lifetime.
    pub fn retain(&self, sub: Subscription) {
        self.holds.borrow_mut().insert(sub);
    }

    pub fn consumed(&self) -> bool {
        self.consumed.get()
    }

    /// Consume the instance. Returns false if it was already consumed;
    /// the contact event fires at most once.
    pub fn trigger_contact(&self, at: Vec2) -> bool {
        if self.consumed.get() {
            return false;
        }
        self.consumed.set(true);
        self.contact.emit(&at);
        true
    }
}

/// Variant-pick hook; the concrete game mode decides the distribution.
pub trait EffectDirector {
    fn next_effect(&self) -> EffectKind;
}

/// Uniform random pick, the default mode's distribution.
pub struct RandomDirector {
    rng: RefCell<Pcg32>,
}

impl RandomDirector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(Pcg32::seed_from_u64(seed)),
        }
    }
}

impl EffectDirector for RandomDirector {
    fn next_effect(&self) -> EffectKind {
        match self.rng.borrow_mut().random_range(0u8..3) {
            0 => EffectKind::Star,
            1 => EffectKind::SpawnBall,
            _ => EffectKind::SwapGravity,
        }
    }
}
