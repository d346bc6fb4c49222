#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::SPRITE_SIZE;

/// Handle to the image every monkey sprite renders with. Swapped once for the
/// generated placeholder if the configured image fails to load.
#[derive(Resource)]
pub struct SpriteImage(pub Handle<Image>);

/// Ties a sprite entity to its body's index in the population. Bodies are
/// never removed, so the index stays valid for the entity's whole life.
#[derive(Component)]
pub struct BodySprite(pub usize);

/// Fallback sprite: a brown disc on a transparent background, generated
/// in-process so a missing image file never stops the show.
#[must_use]
pub fn placeholder_sprite() -> Image {
    let size = SPRITE_SIZE as u32;
    let radius = SPRITE_SIZE / 2.0;
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 + 0.5) - radius;
            let dy = (y as f32 + 0.5) - radius;
            if dx * dx + dy * dy <= radius * radius {
                // The same brown the original placeholder used.
                data.extend_from_slice(&[165, 42, 42, 255]);
            } else {
                data.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }
    Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}
