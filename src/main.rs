//! A borderless, always-on-top, transparent, click-through overlay window
//! full of bouncing monkeys. The population doubles on a timer (with a sound
//! cue per doubling) until the backslash key, pressed anywhere, ends it.

use bevy::prelude::*;
use bevy::window::{CursorOptions, MonitorSelection, WindowLevel, WindowMode};
use clap::Parser;
use monkey_mayhem::config::{Args, OverlayConfig};
use monkey_mayhem::input::{self, CancelFlag};
use monkey_mayhem::systems::{self, Shutdown};

fn main() {
    let config = OverlayConfig::from(Args::parse());

    let cancel = CancelFlag::default();
    input::spawn_global_key_listener(cancel.clone());

    App::new()
        // Fully transparent clear color; only the sprites are visible.
        .insert_resource(ClearColor(Color::NONE))
        .insert_resource(config)
        .insert_resource(cancel)
        .init_resource::<Shutdown>()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "monkey-mayhem".into(),
                mode: WindowMode::BorderlessFullscreen(MonitorSelection::Primary),
                transparent: true,
                decorations: false,
                resizable: false,
                window_level: WindowLevel::AlwaysOnTop,
                ..default()
            }),
            primary_cursor_options: Some(CursorOptions {
                // Clicks fall through to whatever is underneath.
                hit_test: false,
                ..default()
            }),
            ..default()
        }))
        .add_systems(Startup, systems::setup)
        .add_systems(
            Update,
            (
                systems::handle_window_resize,
                systems::watch_cancel,
                systems::ensure_sprite_assets,
                systems::run_simulation,
                systems::handle_doubling,
                systems::sync_sprite_transforms,
            )
                .chain(),
        )
        .run();
}
