//! Headless world: spawner/controller seams and in-memory implementations
//!
//! The presenter only sees the traits; the implementations here carry just
//! enough state to exercise the full flow without an engine. Placement is
//! driven by a seeded RNG, so a whole session replays under a fixed seed.

use std::cell::{Cell, RefCell};
use std::f32::consts::PI;
use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::game::effects::{EffectInstance, EffectKind};
use crate::game::model::BallKind;
use crate::game::play::PlayController;
use crate::polar_to_cartesian;

/// Creates and destroys ball entities.
pub trait BallSpawner {
    fn spawn_center(&self, kind: BallKind);
    fn spawn_at(&self, kind: BallKind, pos: Vec2);
    /// Administrative teardown; does not feed round accounting.
    fn destroy_all(&self);
    fn ball_count(&self) -> usize;
}

/// Applies forces and field changes to the live balls.
pub trait BallDynamics {
    fn push_left(&self);
    fn push_right(&self);
    /// Zero every velocity and invert the gravity scale.
    fn flip_gravity(&self);
}

/// Repositions the portal pair.
pub trait PortalController {
    fn shuffle(&self);
    fn reset_default(&self);
}

/// Creates and destroys collectible-effect instances.
pub trait EffectSpawner {
    fn spawn_random(&self, kind: EffectKind) -> Rc<EffectInstance>;
    fn destroy_all(&self);
    fn effect_count(&self) -> usize;
}

fn random_arena_point(rng: &mut Pcg32, max_radius: f32) -> Vec2 {
    let r = rng.random_range(0.0..max_radius);
    let theta = rng.random_range(-PI..PI);
    polar_to_cartesian(r, theta)
}

/// A live ball body.
#[derive(Debug, Clone, PartialEq)]
pub struct BallBody {
    pub id: u32,
    pub kind: BallKind,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// In-memory ball population with token gravity integration.
///
/// Gameplay losses go through `ball_lost` and notify the play controller;
/// `destroy_all` clears silently for round teardown.
pub struct ArenaBalls {
    balls: RefCell<Vec<BallBody>>,
    next_id: Cell<u32>,
    gravity_scale: Cell<f32>,
    play: Rc<PlayController>,
}

impl ArenaBalls {
    pub fn new(play: Rc<PlayController>) -> Self {
        Self {
            balls: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            gravity_scale: Cell::new(1.0),
            play,
        }
    }

    fn spawn(&self, kind: BallKind, pos: Vec2) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.balls.borrow_mut().push(BallBody {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
        });
        log::debug!("spawned {} ball {id} at {pos}", kind.as_str());
        self.play.note_ball_spawned();
    }

    /// Remove one ball through the gameplay path.
    pub fn ball_lost(&self, id: u32) {
        let removed = {
            let mut balls = self.balls.borrow_mut();
            let before = balls.len();
            balls.retain(|b| b.id != id);
            before != balls.len()
        };
        if removed {
            log::debug!("ball {id} lost");
            self.play.note_ball_lost();
        }
    }

    /// Integrate gravity and cull balls that left the arena.
    pub fn step(&self, dt: f32) {
        let lost: Vec<u32> = {
            let mut balls = self.balls.borrow_mut();
            let gravity = BALL_GRAVITY * self.gravity_scale.get();
            for ball in balls.iter_mut() {
                ball.vel.y -= gravity * dt;
                ball.pos += ball.vel * dt;
            }
            balls
                .iter()
                .filter(|b| b.pos.length() > BALL_LOSS_RADIUS)
                .map(|b| b.id)
                .collect()
        };
        for id in lost {
            self.ball_lost(id);
        }
    }

    pub fn bodies(&self) -> Vec<BallBody> {
        self.balls.borrow().clone()
    }

    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale.get()
    }
}

impl BallSpawner for ArenaBalls {
    fn spawn_center(&self, kind: BallKind) {
        self.spawn(kind, Vec2::ZERO);
    }

    fn spawn_at(&self, kind: BallKind, pos: Vec2) {
        self.spawn(kind, pos);
    }

    fn destroy_all(&self) {
        self.balls.borrow_mut().clear();
    }

    fn ball_count(&self) -> usize {
        self.balls.borrow().len()
    }
}

impl BallDynamics for ArenaBalls {
    fn push_left(&self) {
        for ball in self.balls.borrow_mut().iter_mut() {
            ball.vel.x -= ARROW_IMPULSE;
        }
    }

    fn push_right(&self) {
        for ball in self.balls.borrow_mut().iter_mut() {
            ball.vel.x += ARROW_IMPULSE;
        }
    }

    fn flip_gravity(&self) {
        for ball in self.balls.borrow_mut().iter_mut() {
            ball.vel = Vec2::ZERO;
        }
        self.gravity_scale.set(-self.gravity_scale.get());
        log::debug!("gravity flipped (scale {})", self.gravity_scale.get());
    }
}

/// The two portals, at their home anchors until shuffled.
pub struct PortalPair {
    a: Cell<Vec2>,
    b: Cell<Vec2>,
    rng: RefCell<Pcg32>,
}

impl PortalPair {
    pub fn new(seed: u64) -> Self {
        Self {
            a: Cell::new(Vec2::from(PORTAL_HOME_A)),
            b: Cell::new(Vec2::from(PORTAL_HOME_B)),
            rng: RefCell::new(Pcg32::seed_from_u64(seed)),
        }
    }

    pub fn positions(&self) -> (Vec2, Vec2) {
        (self.a.get(), self.b.get())
    }
}

impl PortalController for PortalPair {
    fn shuffle(&self) {
        let mut rng = self.rng.borrow_mut();
        // Redraw until the pair is far enough apart; fall back to a
        // mirrored placement if the draws keep clustering.
        for _ in 0..32 {
            let a = random_arena_point(&mut rng, ARENA_RADIUS - EFFECT_SPAWN_MARGIN);
            let b = random_arena_point(&mut rng, ARENA_RADIUS - EFFECT_SPAWN_MARGIN);
            if a.distance(b) >= PORTAL_MIN_SEPARATION {
                self.a.set(a);
                self.b.set(b);
                log::debug!("portals moved to {a} / {b}");
                return;
            }
        }
        let a = polar_to_cartesian(
            ARENA_RADIUS / 2.0,
            rng.random_range(-PI..PI),
        );
        self.a.set(a);
        self.b.set(-a);
    }

    fn reset_default(&self) {
        self.a.set(Vec2::from(PORTAL_HOME_A));
        self.b.set(Vec2::from(PORTAL_HOME_B));
    }
}

/// In-memory collectible-effect population.
pub struct EffectField {
    spawned: RefCell<Vec<Rc<EffectInstance>>>,
    next_id: Cell<u32>,
    rng: RefCell<Pcg32>,
}

impl EffectField {
    pub fn new(seed: u64) -> Self {
        Self {
            spawned: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            rng: RefCell::new(Pcg32::seed_from_u64(seed)),
        }
    }

    /// Trigger the instance's one-shot contact and drop it from the field.
    /// Returns false for unknown or already-consumed ids.
    pub fn contact(&self, id: u32, at: Vec2) -> bool {
        let instance = {
            let mut spawned = self.spawned.borrow_mut();
            match spawned.iter().position(|e| e.id == id) {
                Some(index) => spawned.remove(index),
                None => return false,
            }
        };
        instance.trigger_contact(at)
    }

    pub fn instances(&self) -> Vec<Rc<EffectInstance>> {
        self.spawned.borrow().clone()
    }
}

impl EffectSpawner for EffectField {
    fn spawn_random(&self, kind: EffectKind) -> Rc<EffectInstance> {
        let pos = random_arena_point(
            &mut self.rng.borrow_mut(),
            ARENA_RADIUS - EFFECT_SPAWN_MARGIN,
        );
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let instance = Rc::new(EffectInstance::new(id, kind, pos));
        self.spawned.borrow_mut().push(Rc::clone(&instance));
        log::debug!("spawned {} effect {id} at {pos}", kind.as_str());
        instance
    }

    fn destroy_all(&self) {
        // Dropping the instances releases their retained contact handlers.
        self.spawned.borrow_mut().clear();
    }

    fn effect_count(&self) -> usize {
        self.spawned.borrow().len()
    }
}
