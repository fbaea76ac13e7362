//! Simulated audio output
//!
//! Stands in for a real decoder/device: a clock thread advances the
//! position of the loaded track at the playback rate and reports through
//! the player's event channel, exactly like a real output would.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use muse_core::player::{AudioOutput, EventSender, PlayerEvent};
use muse_core::Track;

/// How often the clock thread reports time updates
const TICK: Duration = Duration::from_millis(250);

#[derive(Debug, Default)]
struct Transport {
    track_id: Option<String>,
    duration: f64,
    position: f64,
    playing: bool,
    rate: f32,
}

pub struct SimOutput {
    transport: Arc<Mutex<Transport>>,
    shutdown: Arc<AtomicBool>,
    clock: Option<JoinHandle<()>>,
    events: Option<EventSender>,
}

impl SimOutput {
    pub fn new() -> Self {
        Self {
            transport: Arc::new(Mutex::new(Transport {
                rate: 1.0,
                ..Default::default()
            })),
            shutdown: Arc::new(AtomicBool::new(false)),
            clock: None,
            events: None,
        }
    }

    fn with_transport(&self, f: impl FnOnce(&mut Transport)) {
        match self.transport.lock() {
            Ok(mut transport) => f(&mut transport),
            Err(_) => log::error!("Output: transport state poisoned"),
        }
    }
}

impl AudioOutput for SimOutput {
    fn attach(&mut self, events: EventSender) {
        let transport = self.transport.clone();
        let shutdown = self.shutdown.clone();
        let sender = events.clone();

        let spawned = std::thread::Builder::new()
            .name("muse-sim-output".to_string())
            .spawn(move || run_clock(transport, shutdown, sender));
        match spawned {
            Ok(handle) => self.clock = Some(handle),
            Err(e) => log::error!("Output: could not start clock thread: {}", e),
        }
        self.events = Some(events);
    }

    fn load(&mut self, track: &Track) {
        log::debug!("Output: loading {}", track.audio_url);
        self.with_transport(|t| {
            t.track_id = Some(track.id.clone());
            t.duration = track.duration;
            t.position = 0.0;
            t.playing = false;
        });
        if let Some(events) = &self.events {
            events.notify(PlayerEvent::DurationChange {
                track_id: track.id.clone(),
                duration: track.duration,
            });
        }
    }

    fn play(&mut self) {
        self.with_transport(|t| t.playing = t.track_id.is_some());
    }

    fn pause(&mut self) {
        self.with_transport(|t| t.playing = false);
    }

    fn seek(&mut self, position: f64) {
        self.with_transport(|t| t.position = position.max(0.0));
    }

    fn set_volume(&mut self, volume: f32) {
        log::debug!("Output: volume {:.2}", volume);
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.with_transport(|t| t.rate = rate);
    }

    fn unload(&mut self) {
        self.with_transport(|t| *t = Transport { rate: t.rate, ..Default::default() });
    }
}

impl Drop for SimOutput {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.clock.take() {
            let _ = handle.join();
        }
    }
}

fn run_clock(transport: Arc<Mutex<Transport>>, shutdown: Arc<AtomicBool>, events: EventSender) {
    let dt = TICK.as_secs_f64();
    while !shutdown.load(Ordering::Relaxed) {
        std::thread::sleep(TICK);

        let Ok(mut t) = transport.lock() else {
            break;
        };
        let Some(track_id) = t.track_id.clone() else {
            continue;
        };
        if !t.playing {
            continue;
        }

        t.position += dt * t.rate as f64;
        if t.duration > 0.0 && t.position >= t.duration {
            t.position = t.duration;
            t.playing = false;
            events.notify(PlayerEvent::TimeUpdate {
                track_id: track_id.clone(),
                position: t.position,
            });
            events.notify(PlayerEvent::Ended { track_id });
        } else {
            events.notify(PlayerEvent::TimeUpdate {
                track_id,
                position: t.position,
            });
        }
    }
    log::debug!("Output: clock stopped");
}
