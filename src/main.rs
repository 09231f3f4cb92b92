//! SpacePortals entry point
//!
//! Native builds run a scripted headless demo session over the full wiring;
//! wasm builds install console logging and leave the driving to the host
//! page.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `start`, this is just to satisfy the compiler
}

#[cfg(target_arch = "wasm32")]
mod wasm_boot {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("space-portals core loaded");
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::Cell;
    use std::rc::Rc;

    use space_portals::audio::NullMixer;
    use space_portals::game::effects::RandomDirector;
    use space_portals::game::event::Event;
    use space_portals::game::model::{BallKind, Model, ModelInit, Screen};
    use space_portals::game::play::PlayController;
    use space_portals::game::presenter::{Links, Presenter};
    use space_portals::game::store::StarCatalog;
    use space_portals::game::view::{View, ViewEvent};
    use space_portals::records::{Records, now_ms};
    use space_portals::settings::Settings;
    use space_portals::spawn::{ArenaBalls, EffectField, PortalPair};
    use space_portals::timer::{FrameClock, SecondTimer};

    /// Console view: logs every display call, exposes scripted input state.
    struct ConsoleView {
        events: Event<ViewEvent>,
        music_held: Cell<bool>,
        sfx_held: Cell<bool>,
        left_held: Cell<bool>,
        right_held: Cell<bool>,
        last_final_time: Cell<u32>,
        last_final_stars: Cell<u32>,
    }

    impl ConsoleView {
        fn new() -> Self {
            Self {
                events: Event::new(),
                music_held: Cell::new(false),
                sfx_held: Cell::new(false),
                left_held: Cell::new(false),
                right_held: Cell::new(false),
                last_final_time: Cell::new(0),
                last_final_stars: Cell::new(0),
            }
        }
    }

    impl View for ConsoleView {
        fn events(&self) -> &Event<ViewEvent> {
            &self.events
        }
        fn set_screen_visible(&self, screen: Screen, visible: bool) {
            let state = if visible { "shown" } else { "hidden" };
            log::info!("[view] {} menu {state}", screen.as_str());
        }
        fn set_controls_visible(&self, visible: bool) {
            log::debug!("[view] arrow controls visible: {visible}");
        }
        fn display_elapsed(&self, secs: u32) {
            log::info!("[view] time {secs}s");
        }
        fn display_record(&self, secs: u32) {
            log::info!("[view] record {secs}s");
        }
        fn display_stars(&self, stars: u32) {
            log::info!("[view] stars {stars}");
        }
        fn display_final_time(&self, secs: u32) {
            self.last_final_time.set(secs);
            log::info!("[view] final time {secs}s");
        }
        fn display_final_stars(&self, stars: u32) {
            self.last_final_stars.set(stars);
            log::info!("[view] final stars {stars}");
        }
        fn display_music_slider(&self, value: f32) {
            log::debug!("[view] music slider {value:.2}");
        }
        fn display_sfx_slider(&self, value: f32) {
            log::debug!("[view] sfx slider {value:.2}");
        }
        fn show_notice(&self, text: &str) {
            log::info!("[view] notice: {text}");
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

    pub fn run() {
        let seed = std::env::args()
            .nth(1)
            .and_then(|arg| arg.parse().ok())
            .unwrap_or(0xC0FFEE);
        log::info!("demo session starting (seed {seed})");

        let settings = Settings::load().sanitized();
        let mut records = Records::load();

        let play = Rc::new(PlayController::new());
        let model = Rc::new(Model::new(ModelInit {
            record_secs: records.best_secs,
            total_stars: records.lifetime_stars,
            music_volume: settings.music_volume,
            sfx_volume: settings.sfx_volume,
            selected_ball: settings.selected_ball,
            owned_balls: settings.owned_balls.clone(),
        }));
        let view = Rc::new(ConsoleView::new());
        let audio = Rc::new(NullMixer::new());
        let timer = Rc::new(SecondTimer::new());
        let frame = Rc::new(FrameClock::new());
        let balls = Rc::new(ArenaBalls::new(Rc::clone(&play)));
        let portals = Rc::new(PortalPair::new(seed));
        let effects = Rc::new(EffectField::new(seed.wrapping_add(1)));
        let store = Rc::new(StarCatalog::new(BallKind::Pulsar));
        let director = Rc::new(RandomDirector::new(seed.wrapping_add(2)));

        let mut presenter = Presenter::new(Links {
            model: Rc::clone(&model),
            view: view.clone(),
            audio: audio.clone(),
            timer: Rc::clone(&timer),
            frame: Rc::clone(&frame),
            balls: balls.clone(),
            dynamics: balls.clone(),
            portals: portals.clone(),
            effects: effects.clone(),
            play: Rc::clone(&play),
            store: store.clone(),
            director,
        });
        presenter.start();

        let dt = 1.0 / settings.target_fps as f32;
        let step = || {
            frame.advance(dt);
            timer.tick(dt);
            // The world only moves while the play screen is up.
            if model.current_screen() == Screen::PlayMenu {
                play.tick(dt);
                balls.step(dt);
            }
        };

        // Round one: play until the arena empties.
        view.events().emit(&ViewEvent::PlayClicked);

        let mut detoured = false;
        let mut contacted = false;
        let mut frames: u32 = 0;
        while model.current_screen() != Screen::ResultsMenu && frames < 20_000 {
            step();
            frames += 1;

            // Collect the first collectible that appears.
            if !contacted && model.current_screen() == Screen::PlayMenu {
                let instances = effects.instances();
                if let Some(fx) = instances.first() {
                    effects.contact(fx.id, fx.pos);
                    contacted = true;
                }
            }

            // One settings detour mid-round: the clock freezes, the music
            // slider moves, play resumes where it left off.
            if !detoured && model.elapsed_secs() >= 2 {
                detoured = true;
                view.events().emit(&ViewEvent::SettingsClicked);
                view.events().emit(&ViewEvent::MusicSliderChanged(0.5));
                for _ in 0..30 {
                    step();
                }
                view.events().emit(&ViewEvent::SettingsBackClicked);
                // Lean on the left arrow for the rest of the round.
                view.left_held.set(true);
            }
        }
        view.left_held.set(false);

        records.add_round(
            view.last_final_time.get(),
            view.last_final_stars.get(),
            now_ms(),
        );
        view.events().emit(&ViewEvent::ResultsBackClicked);

        // Store visit with whatever the run banked.
        view.events().emit(&ViewEvent::StoreClicked);
        view.events().emit(&ViewEvent::StoreSelectClicked);
        if model.current_screen() == Screen::StoreMenu {
            log::info!("store visit ended without a purchase");
        }

        // Persist the session.
        records.best_secs = model.record_secs();
        records.lifetime_stars = model.total_stars();
        records.save();
        let updated = Settings {
            music_volume: model.music_volume(),
            sfx_volume: model.sfx_volume(),
            selected_ball: model.selected_ball(),
            owned_balls: model.owned_balls(),
            target_fps: settings.target_fps,
        };
        updated.save();

        presenter.stop();
        log::info!(
            "demo finished: record {}s, {} lifetime stars, {} rounds in history",
            model.record_secs(),
            model.total_stars(),
            records.history.len()
        );
    }
}
