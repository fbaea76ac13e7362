//! The audio output seam
//!
//! An [`AudioOutput`] is the one playback resource of the application (the
//! `<audio>` element in a browser, a decoder + device stream natively). It is
//! exclusively owned by a [`super::PlayerController`]; nothing else calls it.

use super::event::EventSender;
use crate::types::Track;

/// Commands the controller issues to the playback resource
///
/// Implementations report progress asynchronously through the
/// [`EventSender`] handed over in [`AudioOutput::attach`].
pub trait AudioOutput {
    /// Called once, before any other method
    fn attach(&mut self, events: EventSender);

    /// Detach the previous source and start loading this one at position 0
    fn load(&mut self, track: &Track);

    fn play(&mut self);

    fn pause(&mut self);

    /// Jump to a position in seconds
    fn seek(&mut self, position: f64);

    /// Effective volume in `[0, 1]` (0 while muted)
    fn set_volume(&mut self, volume: f32);

    fn set_playback_rate(&mut self, rate: f32);

    /// Release the loaded source
    fn unload(&mut self);
}

/// Output that plays nothing
///
/// Useful for headless controllers whose position is driven entirely by
/// externally supplied events.
#[derive(Debug, Default)]
pub struct NullOutput {
    events: Option<EventSender>,
}

impl NullOutput {
    /// Sender handed over by the controller, for driving events by hand
    pub fn events(&self) -> Option<&EventSender> {
        self.events.as_ref()
    }
}

impl AudioOutput for NullOutput {
    fn attach(&mut self, events: EventSender) {
        self.events = Some(events);
    }

    fn load(&mut self, _track: &Track) {}

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn seek(&mut self, _position: f64) {}

    fn set_volume(&mut self, _volume: f32) {}

    fn set_playback_rate(&mut self, _rate: f32) {}

    fn unload(&mut self) {}
}
