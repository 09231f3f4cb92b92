//! The mediator binding view, model, timer and round events together
//!
//! Single authority for screen transitions: every event lands in one
//! declarative dispatch keyed on (event, current screen), mutates the model
//! through its named operations, and instructs the view what to display.
//! Exposes nothing beyond the start/stop lifecycle.

use std::rc::Rc;

use crate::audio::{AudioMixer, Sfx};
use crate::spawn::{BallDynamics, BallSpawner, EffectSpawner, PortalController};
use crate::timer::{FrameClock, SecondTimer};

use super::effects::{EffectContext, EffectDirector};
use super::event::SubscriptionSet;
use super::model::{Model, Screen};
use super::play::PlayController;
use super::store::{PurchaseOutcome, StoreCatalog};
use super::view::{View, ViewEvent};

/// Collaborators the presenter mediates between. Injected once at startup.
pub struct Links {
    pub model: Rc<Model>,
    pub view: Rc<dyn View>,
    pub audio: Rc<dyn AudioMixer>,
    pub timer: Rc<SecondTimer>,
    pub frame: Rc<FrameClock>,
    pub balls: Rc<dyn BallSpawner>,
    pub dynamics: Rc<dyn BallDynamics>,
    pub portals: Rc<dyn PortalController>,
    pub effects: Rc<dyn EffectSpawner>,
    pub play: Rc<PlayController>,
    pub store: Rc<dyn StoreCatalog>,
    pub director: Rc<dyn EffectDirector>,
}

pub struct Presenter {
    links: Rc<Links>,
    subs: SubscriptionSet,
}

impl Presenter {
    pub fn new(links: Links) -> Self {
        Self {
            links: Rc::new(links),
            subs: SubscriptionSet::new(),
        }
    }

    /// Bind every subscription and push the initial readouts.
    pub fn start(&mut self) {
        self.bind_view();
        self.bind_model();
        self.bind_timer();
        self.bind_play();

        // The event primitive does not replay the latest value on
        // subscribe, so the initial readouts are pushed here once.
        let l = &self.links;
        l.audio.set_music_volume(l.model.music_volume());
        l.audio.set_sfx_volume(l.model.sfx_volume());
        l.view.display_record(l.model.record_secs());
        l.view.display_music_slider(l.model.music_volume());
        l.view.display_sfx_slider(l.model.sfx_volume());
        l.view.display_stars(l.model.round_stars());
        let screen = l.model.current_screen();
        l.view
            .set_controls_visible(matches!(screen, Screen::PlayMenu | Screen::StoreMenu));
    }

    /// Release every subscription. Safe mid-round; no handler survives it.
    pub fn stop(&mut self) {
        self.subs.clear();
    }

    fn bind_view(&mut self) {
        let l = Rc::clone(&self.links);
        self.links
            .view
            .events()
            .subscribe(move |ev| dispatch(&l, *ev))
            .retain_in(&mut self.subs);

        // Physics-gated polling: while playing, a held arrow pushes the
        // balls every fixed update.
        let l = Rc::clone(&self.links);
        self.links
            .frame
            .fixed_update
            .subscribe(move |_dt| {
                if l.model.current_screen() != Screen::PlayMenu {
                    return;
                }
                if l.view.left_arrow_held() {
                    l.dynamics.push_left();
                }
                if l.view.right_arrow_held() {
                    l.dynamics.push_right();
                }
            })
            .retain_in(&mut self.subs);
    }

    fn bind_model(&mut self) {
        let l = Rc::clone(&self.links);
        self.links
            .model
            .round_stars_changed
            .subscribe(move |stars| l.view.display_stars(*stars))
            .retain_in(&mut self.subs);

        let l = Rc::clone(&self.links);
        self.links
            .model
            .music_changed
            .subscribe(move |value| {
                l.audio.set_music_volume(*value);
                // Never fight a live drag; the display catches up on release.
                if !l.view.music_slider_held() {
                    l.view.display_music_slider(*value);
                }
            })
            .retain_in(&mut self.subs);

        let l = Rc::clone(&self.links);
        self.links
            .model
            .sfx_changed
            .subscribe(move |value| {
                l.audio.set_sfx_volume(*value);
                if !l.view.sfx_slider_held() {
                    l.view.display_sfx_slider(*value);
                }
            })
            .retain_in(&mut self.subs);

        let l = Rc::clone(&self.links);
        self.links
            .model
            .screen_changed
            .subscribe(move |screen| {
                l.view
                    .set_controls_visible(matches!(screen, Screen::PlayMenu | Screen::StoreMenu));
            })
            .retain_in(&mut self.subs);

        let l = Rc::clone(&self.links);
        self.links
            .model
            .elapsed_changed
            .subscribe(move |secs| {
                let current = l.model.current_screen();
                let watching_play = current == Screen::PlayMenu
                    || (current == Screen::SettingsMenu
                        && l.model.previous_screen() == Screen::PlayMenu);
                if watching_play {
                    l.view.display_elapsed(*secs);
                }
            })
            .retain_in(&mut self.subs);
    }

    fn bind_timer(&mut self) {
        let l = Rc::clone(&self.links);
        self.links
            .timer
            .second_passed
            .subscribe(move |_| l.model.advance_second())
            .retain_in(&mut self.subs);
    }

    fn bind_play(&mut self) {
        let l = Rc::clone(&self.links);
        self.links
            .play
            .all_balls_destroyed
            .subscribe(move |_| {
                if l.model.current_screen() == Screen::PlayMenu {
                    open_results(&l);
                }
            })
            .retain_in(&mut self.subs);

        let l = Rc::clone(&self.links);
        self.links
            .play
            .swap_portals
            .subscribe(move |_| {
                l.portals.shuffle();
                l.audio.play(Sfx::PortalSwap);
            })
            .retain_in(&mut self.subs);

        let l = Rc::clone(&self.links);
        self.links
            .play
            .spawn_effect
            .subscribe(move |_| spawn_effect(&l))
            .retain_in(&mut self.subs);
    }
}

/// Declarative dispatch: one arm per (event, current screen) pair. Inputs
/// on screens the table does not name are inert.
fn dispatch(l: &Rc<Links>, ev: ViewEvent) {
    use Screen::*;
    use ViewEvent::*;

    match (ev, l.model.current_screen()) {
        (PlayClicked, MainMenu) => begin_round(l),
        (StoreClicked, MainMenu) => {
            l.view.set_screen_visible(MainMenu, false);
            l.view.set_screen_visible(StoreMenu, true);
            l.model.change_screen(StoreMenu);
        }
        (SettingsClicked, MainMenu) => {
            l.view.set_screen_visible(MainMenu, false);
            l.view.set_screen_visible(SettingsMenu, true);
            l.model.change_screen(SettingsMenu);
        }
        (SettingsClicked, PlayMenu) => {
            l.view.set_screen_visible(PlayMenu, false);
            l.view.set_screen_visible(SettingsMenu, true);
            l.model.pause();
            l.model.change_screen(SettingsMenu);
        }
        (SettingsBackClicked, SettingsMenu) => {
            let back_to = l.model.previous_screen();
            match back_to {
                MainMenu => l.view.set_screen_visible(MainMenu, true),
                PlayMenu => {
                    l.view.set_screen_visible(PlayMenu, true);
                    l.model.resume();
                }
                _ => {}
            }
            l.view.set_screen_visible(SettingsMenu, false);
            l.model.change_screen(back_to);
        }
        (ExitClicked, PlayMenu) => open_results(l),
        (ResultsBackClicked, ResultsMenu) => {
            l.view.set_screen_visible(ResultsMenu, false);
            l.view.set_screen_visible(MainMenu, true);
            l.model.reset_round_stars();
            l.model.change_screen(MainMenu);
        }
        (StoreSelectClicked, StoreMenu) => select_in_store(l),
        (LeftArrowClicked, StoreMenu) | (RightArrowClicked, StoreMenu) => {
            // TODO: page the catalog offer once the store carousel lands.
            log::debug!("store paging requested (not implemented)");
        }
        (MusicSliderChanged(value), _) => l.model.set_music_volume(value),
        (SfxSliderChanged(value), _) => l.model.set_sfx_volume(value),
        _ => {}
    }
}

fn begin_round(l: &Rc<Links>) {
    l.view.set_screen_visible(Screen::MainMenu, false);
    l.view.set_screen_visible(Screen::PlayMenu, true);

    l.model.reset_round_stars();
    l.model.reset_elapsed();
    l.model.resume();
    l.view.display_elapsed(0);

    l.timer.start();
    l.balls.spawn_center(l.model.selected_ball());
    l.play.start_round();

    l.model.change_screen(Screen::PlayMenu);
}

/// Shared by the exit click and the all-balls-destroyed paths.
fn open_results(l: &Rc<Links>) {
    l.view.set_screen_visible(Screen::PlayMenu, false);
    l.view.set_screen_visible(Screen::ResultsMenu, true);

    l.view.display_final_time(l.model.elapsed_secs());
    l.view.display_final_stars(l.model.round_stars());

    if l.model.check_update_record() {
        l.audio.play(Sfx::RecordBeaten);
    }
    l.model.reset_elapsed();
    l.view.display_record(l.model.record_secs());

    l.timer.stop();
    l.balls.destroy_all();
    l.effects.destroy_all();
    l.portals.reset_default();
    l.play.stop_round();

    l.model.change_screen(Screen::ResultsMenu);
}

fn select_in_store(l: &Rc<Links>) {
    let offer = l.store.current_offer();
    match l.store.try_select(&l.model) {
        PurchaseOutcome::Purchased => {
            log::info!("store: selected {} ball", offer.as_str());
            l.view.set_screen_visible(Screen::StoreMenu, false);
            l.view.set_screen_visible(Screen::MainMenu, true);
            l.model.change_screen(Screen::MainMenu);
        }
        outcome => l.view.show_notice(outcome.notice()),
    }
}

/// Spawn one collectible of the mode-chosen variant at a random position
/// and arm its one-shot contact behavior.
fn spawn_effect(l: &Rc<Links>) {
    let kind = l.director.next_effect();
    let instance = l.effects.spawn_random(kind);

    let link = Rc::clone(l);
    let sub = instance.contact.subscribe(move |at| {
        let ctx = EffectContext {
            model: link.model.as_ref(),
            balls: link.balls.as_ref(),
            dynamics: link.dynamics.as_ref(),
            audio: link.audio.as_ref(),
        };
        kind.apply_on_contact(&ctx, *at);
    });
    instance.retain(sub);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullMixer;
    use crate::consts::FIXED_DT;
    use crate::game::effects::{EffectKind, RandomDirector};
    use crate::game::event::Event;
    use crate::game::model::{BallKind, ModelInit};
    use crate::game::store::StarCatalog;
    use crate::spawn::{ArenaBalls, EffectField, PortalPair};
    use proptest::prelude::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;

    struct TestView {
        events: Event<ViewEvent>,
        visible: RefCell<HashSet<Screen>>,
        controls_visible: Cell<bool>,
        elapsed: Cell<u32>,
        record: Cell<u32>,
        stars: Cell<u32>,
        final_time: Cell<u32>,
        final_stars: Cell<u32>,
        music: Cell<f32>,
        sfx: Cell<f32>,
        notices: RefCell<Vec<String>>,
        music_held: Cell<bool>,
        sfx_held: Cell<bool>,
        left_held: Cell<bool>,
        right_held: Cell<bool>,
    }

    impl TestView {
        fn new() -> Self {
            Self {
                events: Event::new(),
                visible: RefCell::new(HashSet::from([Screen::MainMenu])),
                controls_visible: Cell::new(false),
                elapsed: Cell::new(u32::MAX),
                record: Cell::new(u32::MAX),
                stars: Cell::new(u32::MAX),
                final_time: Cell::new(u32::MAX),
                final_stars: Cell::new(u32::MAX),
                music: Cell::new(-1.0),
                sfx: Cell::new(-1.0),
                notices: RefCell::new(Vec::new()),
                music_held: Cell::new(false),
                sfx_held: Cell::new(false),
                left_held: Cell::new(false),
                right_held: Cell::new(false),
            }
        }

        fn is_visible(&self, screen: Screen) -> bool {
            self.visible.borrow().contains(&screen)
        }
    }

    impl View for TestView {
        fn events(&self) -> &Event<ViewEvent> {
            &self.events
        }
        fn set_screen_visible(&self, screen: Screen, visible: bool) {
            if visible {
                self.visible.borrow_mut().insert(screen);
            } else {
                self.visible.borrow_mut().remove(&screen);
            }
        }
        fn set_controls_visible(&self, visible: bool) {
            self.controls_visible.set(visible);
        }
        fn display_elapsed(&self, secs: u32) {
            self.elapsed.set(secs);
        }
        fn display_record(&self, secs: u32) {
            self.record.set(secs);
        }
        fn display_stars(&self, stars: u32) {
            self.stars.set(stars);
        }
        fn display_final_time(&self, secs: u32) {
            self.final_time.set(secs);
        }
        fn display_final_stars(&self, stars: u32) {
            self.final_stars.set(stars);
        }
        fn display_music_slider(&self, value: f32) {
            self.music.set(value);
        }
        fn display_sfx_slider(&self, value: f32) {
            self.sfx.set(value);
        }
        fn show_notice(&self, text: &str) {
            self.notices.borrow_mut().push(text.to_string());
        }
        fn music_slider_held(&self) -> bool {
            self.music_held.get()
        }
        fn sfx_slider_held(&self) -> bool {
            self.sfx_held.get()
        }
        fn left_arrow_held(&self) -> bool {
            self.left_held.get()
        }
        fn right_arrow_held(&self) -> bool {
            self.right_held.get()
        }
    }

    struct FixedDirector(EffectKind);
    impl EffectDirector for FixedDirector {
        fn next_effect(&self) -> EffectKind {
            self.0
        }
    }

    struct Harness {
        presenter: Presenter,
        model: Rc<Model>,
        view: Rc<TestView>,
        audio: Rc<NullMixer>,
        timer: Rc<SecondTimer>,
        frame: Rc<FrameClock>,
        balls: Rc<ArenaBalls>,
        portals: Rc<PortalPair>,
        effects: Rc<EffectField>,
        play: Rc<PlayController>,
    }

    impl Harness {
        fn click(&self, ev: ViewEvent) {
            self.view.events.emit(&ev);
        }

        /// Lose every live ball through the gameplay path.
        fn lose_all_balls(&self) {
            for body in self.balls.bodies() {
                self.balls.ball_lost(body.id);
            }
        }
    }

    fn build(init: ModelInit, offer: BallKind, director: Rc<dyn EffectDirector>) -> Harness {
        let play = Rc::new(PlayController::new());
        let model = Rc::new(Model::new(init));
        let view = Rc::new(TestView::new());
        let audio = Rc::new(NullMixer::new());
        let timer = Rc::new(SecondTimer::new());
        let frame = Rc::new(FrameClock::new());
        let balls = Rc::new(ArenaBalls::new(Rc::clone(&play)));
        let portals = Rc::new(PortalPair::new(7));
        let effects = Rc::new(EffectField::new(7));
        let store = Rc::new(StarCatalog::new(offer));

        let mut presenter = Presenter::new(Links {
            model: Rc::clone(&model),
            view: Rc::clone(&view) as Rc<dyn View>,
            audio: Rc::clone(&audio) as Rc<dyn AudioMixer>,
            timer: Rc::clone(&timer),
            frame: Rc::clone(&frame),
            balls: Rc::clone(&balls) as Rc<dyn BallSpawner>,
            dynamics: Rc::clone(&balls) as Rc<dyn BallDynamics>,
            portals: Rc::clone(&portals) as Rc<dyn PortalController>,
            effects: Rc::clone(&effects) as Rc<dyn EffectSpawner>,
            play: Rc::clone(&play),
            store,
            director,
        });
        presenter.start();

        Harness {
            presenter,
            model,
            view,
            audio,
            timer,
            frame,
            balls,
            portals,
            effects,
            play,
        }
    }

    fn harness() -> Harness {
        build(
            ModelInit::default(),
            BallKind::Pulsar,
            Rc::new(RandomDirector::new(7)),
        )
    }

    #[test]
    fn test_start_pushes_initial_readouts() {
        let h = build(
            ModelInit {
                record_secs: 42,
                music_volume: 0.4,
                ..ModelInit::default()
            },
            BallKind::Pulsar,
            Rc::new(RandomDirector::new(7)),
        );
        assert_eq!(h.view.record.get(), 42);
        assert_eq!(h.view.music.get(), 0.4);
        assert_eq!(h.view.sfx.get(), 1.0);
        assert_eq!(h.audio.music_volume(), 0.4);
        assert_eq!(h.view.stars.get(), 0);
        assert!(!h.view.controls_visible.get());
    }

    #[test]
    fn test_full_round_scenario() {
        let h = harness();

        h.click(ViewEvent::PlayClicked);
        assert_eq!(h.model.current_screen(), Screen::PlayMenu);
        assert_eq!(h.model.elapsed_secs(), 0);
        assert_eq!(h.view.elapsed.get(), 0);
        assert_eq!(h.balls.ball_count(), 1);
        assert!(h.timer.is_running());
        assert!(h.play.round_active());
        assert!(h.view.is_visible(Screen::PlayMenu));
        assert!(!h.view.is_visible(Screen::MainMenu));
        assert!(h.view.controls_visible.get());

        for _ in 0..5 {
            h.timer.tick(1.0);
        }
        assert_eq!(h.model.elapsed_secs(), 5);
        assert_eq!(h.view.elapsed.get(), 5);

        // Settings detour freezes the clock.
        h.click(ViewEvent::SettingsClicked);
        assert_eq!(h.model.current_screen(), Screen::SettingsMenu);
        assert!(h.model.is_paused());
        h.timer.tick(1.0);
        assert_eq!(h.model.elapsed_secs(), 5);

        h.click(ViewEvent::SettingsBackClicked);
        assert_eq!(h.model.current_screen(), Screen::PlayMenu);
        assert!(!h.model.is_paused());

        // Last ball gone: results open with the final readouts.
        h.lose_all_balls();
        assert_eq!(h.model.current_screen(), Screen::ResultsMenu);
        assert_eq!(h.view.final_time.get(), 5);
        assert_eq!(h.view.final_stars.get(), 0);
        assert_eq!(h.model.elapsed_secs(), 0);
        assert_eq!(h.model.record_secs(), 5);
        assert_eq!(h.view.record.get(), 5);
        assert!(!h.timer.is_running());
        assert!(!h.play.round_active());
        assert_eq!(h.balls.ball_count(), 0);

        h.click(ViewEvent::ResultsBackClicked);
        assert_eq!(h.model.current_screen(), Screen::MainMenu);
        assert_eq!(h.model.round_stars(), 0);
        assert!(h.view.is_visible(Screen::MainMenu));
    }

    #[test]
    fn test_record_only_improves() {
        let h = build(
            ModelInit {
                record_secs: 10,
                ..ModelInit::default()
            },
            BallKind::Pulsar,
            Rc::new(RandomDirector::new(7)),
        );

        h.click(ViewEvent::PlayClicked);
        for _ in 0..12 {
            h.timer.tick(1.0);
        }
        h.click(ViewEvent::ExitClicked);
        assert_eq!(h.model.record_secs(), 12);

        h.click(ViewEvent::ResultsBackClicked);
        h.click(ViewEvent::PlayClicked);
        for _ in 0..8 {
            h.timer.tick(1.0);
        }
        h.click(ViewEvent::ExitClicked);
        assert_eq!(h.model.record_secs(), 12);
        assert_eq!(h.view.record.get(), 12);
    }

    #[test]
    fn test_settings_roundtrips_never_double_resume() {
        let h = harness();
        h.click(ViewEvent::PlayClicked);
        for _ in 0..2 {
            h.timer.tick(1.0);
        }

        for _ in 0..3 {
            h.click(ViewEvent::SettingsClicked);
            h.click(ViewEvent::SettingsBackClicked);
        }
        assert_eq!(h.model.current_screen(), Screen::PlayMenu);

        for _ in 0..3 {
            h.timer.tick(1.0);
        }
        assert_eq!(h.model.elapsed_secs(), 5);
    }

    #[test]
    fn test_settings_back_returns_to_main() {
        let h = harness();
        h.click(ViewEvent::SettingsClicked);
        assert_eq!(h.model.current_screen(), Screen::SettingsMenu);
        assert!(!h.model.is_paused());

        h.click(ViewEvent::SettingsBackClicked);
        assert_eq!(h.model.current_screen(), Screen::MainMenu);
        assert!(h.view.is_visible(Screen::MainMenu));
        assert!(!h.view.is_visible(Screen::SettingsMenu));
    }

    #[test]
    fn test_slider_display_yields_to_live_drag() {
        let h = harness();

        h.view.music_held.set(true);
        h.click(ViewEvent::MusicSliderChanged(0.35));
        assert_eq!(h.model.music_volume(), 0.35);
        assert_eq!(h.audio.music_volume(), 0.35);
        // Display untouched while the finger is down.
        assert_eq!(h.view.music.get(), 0.7);

        h.view.music_held.set(false);
        h.click(ViewEvent::MusicSliderChanged(0.4));
        assert_eq!(h.view.music.get(), 0.4);
        assert_eq!(h.audio.music_volume(), 0.4);
    }

    #[test]
    fn test_store_purchase_routes_home() {
        let h = build(
            ModelInit {
                total_stars: 100,
                ..ModelInit::default()
            },
            BallKind::Pulsar,
            Rc::new(RandomDirector::new(7)),
        );

        h.click(ViewEvent::StoreClicked);
        assert_eq!(h.model.current_screen(), Screen::StoreMenu);
        assert!(h.view.controls_visible.get());

        h.click(ViewEvent::StoreSelectClicked);
        assert_eq!(h.model.current_screen(), Screen::MainMenu);
        assert_eq!(h.model.selected_ball(), BallKind::Pulsar);
        assert_eq!(h.model.total_stars(), 75);
        assert!(h.view.notices.borrow().is_empty());
    }

    #[test]
    fn test_store_failure_stays_with_notice() {
        let h = harness(); // zero stars
        h.click(ViewEvent::StoreClicked);
        h.click(ViewEvent::StoreSelectClicked);

        assert_eq!(h.model.current_screen(), Screen::StoreMenu);
        assert_eq!(h.view.notices.borrow().as_slice(), ["Not enough stars"]);
        assert_eq!(h.model.selected_ball(), BallKind::Comet);
    }

    #[test]
    fn test_store_paging_is_inert() {
        let h = harness();
        h.click(ViewEvent::StoreClicked);
        h.click(ViewEvent::LeftArrowClicked);
        h.click(ViewEvent::RightArrowClicked);

        assert_eq!(h.model.current_screen(), Screen::StoreMenu);
        assert!(h.view.notices.borrow().is_empty());
    }

    #[test]
    fn test_star_effect_contact_credits_round() {
        let h = build(
            ModelInit::default(),
            BallKind::Pulsar,
            Rc::new(FixedDirector(EffectKind::Star)),
        );
        h.click(ViewEvent::PlayClicked);

        h.play.spawn_effect.emit(&());
        assert_eq!(h.effects.effect_count(), 1);

        let instance = h.effects.instances().remove(0);
        assert!(h.effects.contact(instance.id, instance.pos));
        assert_eq!(h.model.round_stars(), 1);
        assert_eq!(h.view.stars.get(), 1);

        // Consumed instances are gone; a second contact is a no-op.
        assert_eq!(h.effects.effect_count(), 0);
        assert!(!h.effects.contact(instance.id, instance.pos));
        assert_eq!(h.model.round_stars(), 1);
    }

    #[test]
    fn test_spawn_ball_effect_adds_ball_at_contact() {
        let h = build(
            ModelInit::default(),
            BallKind::Pulsar,
            Rc::new(FixedDirector(EffectKind::SpawnBall)),
        );
        h.click(ViewEvent::PlayClicked);
        assert_eq!(h.balls.ball_count(), 1);

        h.play.spawn_effect.emit(&());
        let instance = h.effects.instances().remove(0);
        h.effects.contact(instance.id, instance.pos);

        assert_eq!(h.balls.ball_count(), 2);
        assert_eq!(h.play.balls_in_play(), 2);
    }

    #[test]
    fn test_round_end_cleans_world() {
        let h = build(
            ModelInit::default(),
            BallKind::Pulsar,
            Rc::new(FixedDirector(EffectKind::Star)),
        );
        h.click(ViewEvent::PlayClicked);
        h.play.spawn_effect.emit(&());
        h.play.swap_portals.emit(&());
        let home_a = glam::Vec2::from(crate::consts::PORTAL_HOME_A);
        let home_b = glam::Vec2::from(crate::consts::PORTAL_HOME_B);
        assert_ne!(h.portals.positions().0, home_a);

        h.click(ViewEvent::ExitClicked);
        assert_eq!(h.model.current_screen(), Screen::ResultsMenu);
        assert_eq!(h.balls.ball_count(), 0);
        assert_eq!(h.effects.effect_count(), 0);
        assert_eq!(h.portals.positions(), (home_a, home_b));
    }

    #[test]
    fn test_all_destroyed_is_inert_outside_play_screen() {
        let h = harness();
        h.click(ViewEvent::PlayClicked);
        h.click(ViewEvent::SettingsClicked);

        h.lose_all_balls();
        assert_eq!(h.model.current_screen(), Screen::SettingsMenu);
    }

    #[test]
    fn test_held_arrow_pushes_balls_only_while_playing() {
        let h = harness();
        h.view.left_held.set(true);
        h.frame.advance(FIXED_DT);
        assert_eq!(h.balls.ball_count(), 0);

        h.click(ViewEvent::PlayClicked);
        h.frame.advance(FIXED_DT);
        let vel = h.balls.bodies()[0].vel;
        assert!(vel.x < 0.0);
    }

    #[test]
    fn test_stop_releases_every_subscription() {
        let mut h = harness();
        h.click(ViewEvent::PlayClicked);

        h.presenter.stop();
        assert_eq!(h.view.events.subscriber_count(), 0);
        assert_eq!(h.timer.second_passed.subscriber_count(), 0);
        assert_eq!(h.frame.fixed_update.subscriber_count(), 0);
        assert_eq!(h.play.all_balls_destroyed.subscriber_count(), 0);
        assert_eq!(h.play.swap_portals.subscriber_count(), 0);
        assert_eq!(h.play.spawn_effect.subscriber_count(), 0);
        assert_eq!(h.model.screen_changed.subscriber_count(), 0);
        assert_eq!(h.model.elapsed_changed.subscriber_count(), 0);

        // Events after teardown change nothing.
        let screen = h.model.current_screen();
        h.click(ViewEvent::ExitClicked);
        assert_eq!(h.model.current_screen(), screen);
    }

    /// Reference transition function mirroring the dispatch table, used to
    /// cross-check arbitrary trigger sequences.
    #[derive(Debug, Clone, Copy)]
    enum Trigger {
        Play,
        Store,
        Settings,
        SettingsBack,
        Exit,
        ResultsBack,
        StoreSelect,
        AllDestroyed,
    }

    impl Trigger {
        const ALL: [Trigger; 8] = [
            Trigger::Play,
            Trigger::Store,
            Trigger::Settings,
            Trigger::SettingsBack,
            Trigger::Exit,
            Trigger::ResultsBack,
            Trigger::StoreSelect,
            Trigger::AllDestroyed,
        ];
    }

    struct Reference {
        current: Screen,
        previous: Screen,
        owns_offer: bool,
    }

    impl Reference {
        fn apply(&mut self, trigger: Trigger) {
            use Screen::*;
            let (current, previous) = (self.current, self.previous);
            let goto = |to: Screen, this: &mut Self| {
                this.previous = current;
                this.current = to;
            };
            match (trigger, current) {
                (Trigger::Play, MainMenu) => goto(PlayMenu, self),
                (Trigger::Store, MainMenu) => goto(StoreMenu, self),
                (Trigger::Settings, MainMenu) | (Trigger::Settings, PlayMenu) => {
                    goto(SettingsMenu, self)
                }
                (Trigger::SettingsBack, SettingsMenu) => goto(previous, self),
                (Trigger::Exit, PlayMenu) => goto(ResultsMenu, self),
                (Trigger::ResultsBack, ResultsMenu) => goto(MainMenu, self),
                (Trigger::StoreSelect, StoreMenu) => {
                    if !self.owns_offer {
                        self.owns_offer = true;
                        goto(MainMenu, self);
                    }
                }
                (Trigger::AllDestroyed, PlayMenu) => goto(ResultsMenu, self),
                _ => {}
            }
        }
    }

    proptest! {
        #[test]
        fn prop_screen_always_matches_transition_table(
            indices in prop::collection::vec(0usize..Trigger::ALL.len(), 0..48)
        ) {
            let h = build(
                ModelInit { total_stars: 1_000, ..ModelInit::default() },
                BallKind::Pulsar,
                Rc::new(RandomDirector::new(7)),
            );
            let mut reference = Reference {
                current: Screen::MainMenu,
                previous: Screen::MainMenu,
                owns_offer: false,
            };

            for &index in &indices {
                let trigger = Trigger::ALL[index];
                match trigger {
                    Trigger::Play => h.click(ViewEvent::PlayClicked),
                    Trigger::Store => h.click(ViewEvent::StoreClicked),
                    Trigger::Settings => h.click(ViewEvent::SettingsClicked),
                    Trigger::SettingsBack => h.click(ViewEvent::SettingsBackClicked),
                    Trigger::Exit => h.click(ViewEvent::ExitClicked),
                    Trigger::ResultsBack => h.click(ViewEvent::ResultsBackClicked),
                    Trigger::StoreSelect => h.click(ViewEvent::StoreSelectClicked),
                    Trigger::AllDestroyed => {
                        // Only meaningful as a gameplay event on the play
                        // screen; elsewhere there is nothing to lose.
                        if h.model.current_screen() != Screen::PlayMenu {
                            continue;
                        }
                        h.lose_all_balls();
                    }
                }
                reference.apply(trigger);
                prop_assert_eq!(h.model.current_screen(), reference.current);
            }
        }
    }
}
