#![deny(clippy::all)]
#![forbid(unsafe_code)]

use clap::Parser;
use pixels_main_support::{AnimateOptions, HostError, Palette, animate};
use std::time::Duration;
use wireworld::{NeighborRule, Random, StartCell, WireConfig, WireWorld};

/// Random Wireworld circuits, replaced every few hundred generations.
#[derive(Debug, Parser)]
#[command(name = "wire", version, about)]
struct CliArgs {
    /// Milliseconds between generations.
    #[arg(long = "delay-ms", value_name = "MILLISECONDS", default_value_t = 500)]
    delay_ms: u64,
    /// Circuit length in cells; negative picks a random length up to its magnitude.
    #[arg(long, value_name = "CELLS", default_value_t = 1000, allow_negative_numbers = true)]
    count: i32,
    /// Generations before the circuit is replaced.
    #[arg(long, value_name = "GENERATIONS", default_value_t = 150)]
    cycles: u32,
    /// Cell edge in pixels; negative picks a random size up to its magnitude, 0 fits the window.
    #[arg(long, value_name = "PIXELS", default_value_t = -8, allow_negative_numbers = true)]
    size: i32,
    /// Hues on the color wheel; 2 or fewer means monochrome.
    #[arg(long, value_name = "COUNT", default_value_t = 64)]
    ncolors: u32,
    /// Neighbors that can fire a wire: 8 (Moore) or 4 (von Neumann).
    #[arg(long, value_name = "4|8", default_value = "8", value_parser = parse_neighbors)]
    neighbors: NeighborRule,
    /// Draw with stipple patterns instead of colors.
    #[arg(long)]
    mono: bool,
    /// Start each circuit at a random cell instead of the center.
    #[arg(long)]
    random_start: bool,
    /// Run in a window instead of full screen.
    #[arg(long)]
    windowed: bool,
    /// Seed for repeatable circuits.
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_neighbors(arg: &str) -> Result<NeighborRule, String> {
    let count: u32 = arg.parse().map_err(|err| format!("{err}"))?;
    NeighborRule::try_from(count).map_err(|err| err.to_string())
}

fn main() -> Result<(), HostError> {
    env_logger::init();
    let args = CliArgs::parse();

    let config = WireConfig {
        count: args.count,
        cycles: args.cycles,
        size: args.size,
        neighbors: args.neighbors,
        start: if args.random_start {
            StartCell::Random
        } else {
            StartCell::Center
        },
        ..WireConfig::default()
    };
    let (world_rand, palette_rand) = match args.seed {
        Some(seed) => (Random::from_seed(seed), Random::from_seed(seed.wrapping_add(1))),
        None => (Random::new(), Random::new()),
    };
    let options = AnimateOptions {
        delay: Duration::from_millis(args.delay_ms),
        fullscreen: !args.windowed,
        palette: Palette::new(args.ncolors, args.mono, palette_rand),
    };

    animate(options, |window_size| {
        WireWorld::new(config.clone(), window_size, world_rand.clone())
    })
}
