use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use bevy::prelude::*;

/// The key that shuts the whole show down, wherever focus happens to be.
pub const CANCEL_KEY: rdev::Key = rdev::Key::BackSlash;

/// Cross-thread cancellation signal.
///
/// The listener thread only ever stores into the flag; the simulation polls
/// it on its own thread before each tick. The flag is a one-way latch, so
/// raising it twice is harmless.
#[derive(Resource, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Latch the flag. Returns true only for the call that actually flipped
    /// it; later calls are no-ops.
    pub fn raise(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Start the process-wide keyboard listener on its own thread.
///
/// The overlay window is click-through and never holds keyboard focus, so
/// window events cannot carry the kill switch; the hook sees key presses
/// session-wide instead. `rdev::listen` blocks its thread for good (there is
/// no stop API), so the thread is detached and reclaimed at process exit;
/// everything it shares with the app is the atomic flag.
pub fn spawn_global_key_listener(flag: CancelFlag) {
    let _ = thread::Builder::new()
        .name("global-key-listener".into())
        .spawn(move || {
            let result = rdev::listen(move |event| {
                if let rdev::EventType::KeyPress(key) = event.event_type
                    && key == CANCEL_KEY
                    && flag.raise()
                {
                    bevy::log::info!("cancel key pressed");
                }
            });
            if let Err(err) = result {
                // No hook available (e.g. no display server). The overlay
                // keeps running; closing the window still exits.
                bevy::log::warn!("global key listener unavailable: {err:?}");
            }
        });
}
