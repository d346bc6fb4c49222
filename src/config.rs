use std::time::Duration;

use bevy::prelude::*;
use clap::Parser;

/// Command-line arguments.
///
/// Asset paths are resolved by the engine relative to the `assets/`
/// directory next to the binary.
#[derive(Debug, Parser)]
#[command(
    name = "monkey-mayhem",
    about = "Fill the screen with multiplying, bouncing monkeys. Press backslash to make it stop."
)]
pub struct Args {
    /// Seconds between population doublings.
    #[arg(short, long, default_value_t = 60.0, value_parser = parse_interval)]
    pub interval: f64,

    /// Sprite image for the monkeys.
    #[arg(long, default_value = "monkey.png")]
    pub sprite: String,

    /// Sound played once per doubling.
    #[arg(long, default_value = "monkey.ogg")]
    pub chatter: String,

    /// Optional sound looped in the background for the whole run.
    #[arg(long)]
    pub ambient: Option<String>,

    /// Skip the pairwise collision pass; monkeys only bounce off walls.
    #[arg(long)]
    pub no_collisions: bool,
}

fn parse_interval(raw: &str) -> Result<f64, String> {
    let seconds: f64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err("the doubling interval must be a positive number of seconds".into())
    }
}

/// Runtime configuration derived from the command line, fixed for the life of
/// the process.
#[derive(Resource, Debug, Clone)]
pub struct OverlayConfig {
    pub doubling_interval: Duration,
    pub sprite: String,
    pub chatter: String,
    pub ambient: Option<String>,
    pub collisions: bool,
}

impl From<Args> for OverlayConfig {
    fn from(args: Args) -> Self {
        Self {
            doubling_interval: Duration::from_secs_f64(args.interval),
            sprite: args.sprite,
            chatter: args.chatter,
            ambient: args.ambient,
            collisions: !args.no_collisions,
        }
    }
}
