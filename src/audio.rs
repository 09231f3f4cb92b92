//! Audio seam
//!
//! The model forwards volume changes here; gameplay cues are one-shot. On
//! wasm the mixer sits on Web Audio with procedurally generated cues - no
//! external files needed. Headless runs keep a silent mixer.

use std::cell::Cell;

/// One-shot gameplay cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sfx {
    /// Star collectible consumed
    StarCollected,
    /// Extra-ball collectible consumed
    ExtraBall,
    /// Gravity-swap collectible consumed
    GravityFlip,
    /// Portals rearranged
    PortalSwap,
    /// Survival record beaten at round end
    RecordBeaten,
}

/// Mixer seam: two independent volume buses plus cue playback.
pub trait AudioMixer {
    fn set_music_volume(&self, value: f32);
    fn set_sfx_volume(&self, value: f32);
    fn play(&self, cue: Sfx);
}

/// Silent mixer for headless runs; remembers volumes for inspection.
pub struct NullMixer {
    music: Cell<f32>,
    sfx: Cell<f32>,
}

impl Default for NullMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl NullMixer {
    pub fn new() -> Self {
        Self {
            music: Cell::new(0.7),
            sfx: Cell::new(1.0),
        }
    }

    pub fn music_volume(&self) -> f32 {
        self.music.get()
    }

    pub fn sfx_volume(&self) -> f32 {
        self.sfx.get()
    }
}

impl AudioMixer for NullMixer {
    fn set_music_volume(&self, value: f32) {
        self.music.set(value.clamp(0.0, 1.0));
    }

    fn set_sfx_volume(&self, value: f32) {
        self.sfx.set(value.clamp(0.0, 1.0));
    }

    fn play(&self, cue: Sfx) {
        log::trace!("sfx: {cue:?}");
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioMixer;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AudioMixer, Sfx};
    use std::cell::Cell;
    use web_sys::{AudioContext, GainNode, OscillatorType};

    /// Web Audio mixer: a persistent music gain bus and per-cue oscillator
    /// envelopes for SFX.
    pub struct WebAudioMixer {
        ctx: Option<AudioContext>,
        music_bus: Option<GainNode>,
        sfx_volume: Cell<f32>,
    }

    impl Default for WebAudioMixer {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioMixer {
        pub fn new() -> Self {
            // May fail outside a secure context.
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("failed to create AudioContext - audio disabled");
            }
            let music_bus = ctx.as_ref().and_then(|ctx| {
                let gain = ctx.create_gain().ok()?;
                gain.gain().set_value(0.7);
                gain.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(gain)
            });
            Self {
                ctx,
                music_bus,
                sfx_volume: Cell::new(1.0),
            }
        }

        /// Resume the context (browsers require a user gesture first).
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// One oscillator with an exponential decay envelope.
        fn blip(&self, freq: f32, duration: f64, osc_type: OscillatorType) {
            let Some(ctx) = &self.ctx else { return };
            let volume = self.sfx_volume.get();
            if volume <= 0.0 {
                return;
            }
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let Ok(osc) = ctx.create_oscillator() else {
                return;
            };
            let Ok(gain) = ctx.create_gain() else { return };
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);

            let now = ctx.current_time();
            gain.gain().set_value(volume * 0.3);
            let _ = gain
                .gain()
                .exponential_ramp_to_value_at_time(0.001, now + duration);

            let _ = osc.connect_with_audio_node(&gain);
            let _ = gain.connect_with_audio_node(&ctx.destination());
            let _ = osc.start();
            let _ = osc.stop_with_when(now + duration);
        }
    }

    impl AudioMixer for WebAudioMixer {
        fn set_music_volume(&self, value: f32) {
            if let Some(bus) = &self.music_bus {
                bus.gain().set_value(value.clamp(0.0, 1.0));
            }
        }

        fn set_sfx_volume(&self, value: f32) {
            self.sfx_volume.set(value.clamp(0.0, 1.0));
        }

        fn play(&self, cue: Sfx) {
            match cue {
                Sfx::StarCollected => self.blip(880.0, 0.12, OscillatorType::Triangle),
                Sfx::ExtraBall => self.blip(440.0, 0.15, OscillatorType::Square),
                Sfx::GravityFlip => self.blip(196.0, 0.35, OscillatorType::Sawtooth),
                Sfx::PortalSwap => self.blip(330.0, 0.2, OscillatorType::Sine),
                Sfx::RecordBeaten => {
                    self.blip(523.25, 0.1, OscillatorType::Triangle);
                    self.blip(783.99, 0.25, OscillatorType::Triangle);
                }
            }
        }
    }
}
