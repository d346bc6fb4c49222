#![allow(clippy::needless_pass_by_value)]

use bevy::asset::LoadState;
use bevy::audio::AudioSinkPlayback;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::config::OverlayConfig;
use crate::input::CancelFlag;
use crate::sim::{ArenaBounds, Body, DoublingTimer, Population};
use crate::sprite::{BodySprite, SpriteImage, placeholder_sprite};
use crate::{CROWD_WARNING_THRESHOLD, SPRITE_SIZE};

/// Handle to the sound played once per doubling.
#[derive(Resource)]
pub struct ChatterSound(pub Handle<AudioSource>);

/// Set once the cancel key has been handled; every simulation system returns
/// early after this flips. Flipping it is the only way the process ends on
/// purpose.
#[derive(Resource, Default)]
pub struct Shutdown(pub bool);

pub fn setup(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<OverlayConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    commands.spawn(Camera2d);

    let bounds = windows.single().map_or(
        ArenaBounds {
            width: 1280.0,
            height: 720.0,
        },
        |window| ArenaBounds {
            width: window.resolution.width(),
            height: window.resolution.height(),
        },
    );

    let sprite_image: Handle<Image> = asset_server.load(config.sprite.clone());
    commands.insert_resource(ChatterSound(asset_server.load(config.chatter.clone())));

    if let Some(ambient) = &config.ambient {
        commands.spawn((
            AudioPlayer::new(asset_server.load(ambient.clone())),
            PlaybackSettings::LOOP,
        ));
    }

    let mut rng = rand::thread_rng();
    let first = Body::random(&mut rng, &bounds);
    spawn_body_sprite(&mut commands, sprite_image.clone(), 0, first.pos, &bounds);
    let population = Population::new(first);
    bevy::log::info!("monkeys on screen: {}", population.len());

    commands.insert_resource(DoublingTimer::new(config.doubling_interval));
    commands.insert_resource(population);
    commands.insert_resource(bounds);
    commands.insert_resource(SpriteImage(sprite_image));
}

/// Keep the arena in sync with the real window size. For the fullscreen
/// overlay this settles once when the borderless-fullscreen size applies.
pub fn handle_window_resize(
    mut resize_events: MessageReader<WindowResized>,
    mut bounds: ResMut<ArenaBounds>,
) {
    for event in resize_events.read() {
        let resized = ArenaBounds {
            width: event.width,
            height: event.height,
        };
        if resized != *bounds {
            bevy::log::info!("arena is now {}x{}", resized.width, resized.height);
            *bounds = resized;
        }
    }
}

/// Poll the cross-thread cancellation flag before the tick systems run.
/// The first observation flips [`Shutdown`], silences all live audio and asks
/// the app to exit; afterwards the system is a no-op.
pub fn watch_cancel(
    cancel: Res<CancelFlag>,
    mut shutdown: ResMut<Shutdown>,
    sinks: Query<&AudioSink>,
    mut exit: MessageWriter<AppExit>,
) {
    if shutdown.0 || !cancel.is_raised() {
        return;
    }
    shutdown.0 = true;
    for sink in &sinks {
        sink.stop();
    }
    bevy::log::info!("goodbye monkeys");
    exit.write(AppExit::Success);
}

/// Watch the sprite image load and swap in the generated placeholder if it
/// fails. Runs until the load settles one way or the other.
pub fn ensure_sprite_assets(
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
    mut sprite_image: ResMut<SpriteImage>,
    mut sprites: Query<&mut Sprite, With<BodySprite>>,
    mut resolved: Local<bool>,
) {
    if *resolved {
        return;
    }
    match asset_server.get_load_state(sprite_image.0.id()) {
        Some(LoadState::Loaded) => {
            *resolved = true;
        }
        Some(LoadState::Failed(_)) => {
            bevy::log::warn!("sprite image failed to load, using the generated placeholder");
            let placeholder = images.add(placeholder_sprite());
            for mut sprite in &mut sprites {
                sprite.image = placeholder.clone();
            }
            sprite_image.0 = placeholder;
            *resolved = true;
        }
        _ => {}
    }
}

/// Advance the whole population by one tick.
pub fn run_simulation(
    mut population: ResMut<Population>,
    bounds: Res<ArenaBounds>,
    config: Res<OverlayConfig>,
    shutdown: Res<Shutdown>,
) {
    if shutdown.0 {
        return;
    }
    population.tick(&bounds, config.collisions);
}

/// Tick the doubling timer; on expiry, double the population, give every new
/// body a sprite and fire one chatter cue.
pub fn handle_doubling(
    mut commands: Commands,
    time: Res<Time>,
    mut timer: ResMut<DoublingTimer>,
    mut population: ResMut<Population>,
    bounds: Res<ArenaBounds>,
    sprite_image: Res<SpriteImage>,
    chatter: Res<ChatterSound>,
    asset_server: Res<AssetServer>,
    shutdown: Res<Shutdown>,
    mut crowd_warned: Local<bool>,
    mut chatter_warned: Local<bool>,
) {
    if shutdown.0 {
        return;
    }
    if !timer.advance(time.delta()) {
        return;
    }

    let before = population.len();
    let mut rng = rand::thread_rng();
    let added = population.double(&mut rng, &bounds);
    debug_assert_eq!(added, before);
    for (offset, body) in population.bodies[before..].iter().enumerate() {
        spawn_body_sprite(
            &mut commands,
            sprite_image.0.clone(),
            before + offset,
            body.pos,
            &bounds,
        );
    }

    play_chatter(&mut commands, &chatter, &asset_server, &mut chatter_warned);
    bevy::log::info!("doubled: {} monkeys on screen", population.len());

    if !*crowd_warned && population.len() >= CROWD_WARNING_THRESHOLD {
        *crowd_warned = true;
        bevy::log::warn!(
            "{} monkeys: the pairwise collision pass is O(n^2) and will start to crawl",
            population.len()
        );
    }
}

/// Move every sprite to its body's current position.
pub fn sync_sprite_transforms(
    population: Res<Population>,
    bounds: Res<ArenaBounds>,
    mut sprites: Query<(&BodySprite, &mut Transform)>,
) {
    for (body_ref, mut transform) in &mut sprites {
        if let Some(body) = population.bodies.get(body_ref.0) {
            transform.translation = world_translation(body.pos, &bounds);
        }
    }
}

/// Map a display-pixel position (origin top-left, y down) to world
/// coordinates (origin center, y up).
#[must_use]
pub fn world_translation(pos: Vec2, bounds: &ArenaBounds) -> Vec3 {
    Vec3::new(pos.x - bounds.width / 2.0, bounds.height / 2.0 - pos.y, 0.0)
}

fn spawn_body_sprite(
    commands: &mut Commands,
    image: Handle<Image>,
    index: usize,
    pos: Vec2,
    bounds: &ArenaBounds,
) {
    commands.spawn((
        Sprite {
            image,
            custom_size: Some(Vec2::splat(SPRITE_SIZE)),
            ..default()
        },
        Transform::from_translation(world_translation(pos, bounds)),
        BodySprite(index),
    ));
}

fn play_chatter(
    commands: &mut Commands,
    chatter: &ChatterSound,
    asset_server: &AssetServer,
    warned: &mut bool,
) {
    if matches!(
        asset_server.get_load_state(chatter.0.id()),
        Some(LoadState::Failed(_))
    ) {
        if !*warned {
            *warned = true;
            bevy::log::warn!("chatter sound failed to load, doublings will be silent");
        }
        return;
    }
    commands.spawn((AudioPlayer::new(chatter.0.clone()), PlaybackSettings::DESPAWN));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_translation_centers_the_arena() {
        let bounds = ArenaBounds {
            width: 200.0,
            height: 200.0,
        };
        assert_eq!(
            world_translation(Vec2::new(100.0, 100.0), &bounds),
            Vec3::ZERO
        );
        // Top-left pixel corner lands in the upper-left world quadrant.
        assert_eq!(
            world_translation(Vec2::new(25.0, 25.0), &bounds),
            Vec3::new(-75.0, 75.0, 0.0)
        );
        assert_eq!(
            world_translation(Vec2::new(175.0, 175.0), &bounds),
            Vec3::new(75.0, -75.0, 0.0)
        );
    }
}
