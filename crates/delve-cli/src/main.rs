//! delve: generate one dungeon map and print it
//!
//! Reads an optional JSON config, applies command-line overrides, runs the
//! generator and writes either the debug rendering or a JSON export to
//! stdout.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use delve_core::{GenerationKind, World, WorldConfig};

/// Procedural dungeon generator
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(author, version, about = "Generate a dungeon map", long_about = None)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Generator: bsp, drunk or random
    #[arg(short = 'k', long = "kind")]
    kind: Option<GenerationKind>,

    #[arg(short = 'W', long = "width")]
    width: Option<i32>,

    #[arg(short = 'H', long = "height")]
    height: Option<i32>,

    /// Seed for a reproducible map
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// BSP split count
    #[arg(long = "splits")]
    splits: Option<u32>,

    /// BSP minimum room size
    #[arg(long = "min-room")]
    min_room: Option<i32>,

    /// Drunk walk fill target in (0, 1]
    #[arg(long = "fill")]
    fill: Option<f32>,

    /// Random rooms room count
    #[arg(long = "rooms")]
    rooms: Option<u32>,

    /// Print a JSON export instead of the text map
    #[arg(long = "json")]
    json: bool,

    /// Print the effective config and exit
    #[arg(long = "dump-config")]
    dump_config: bool,
}

impl Args {
    /// Overlay the flags that were given onto `config`
    fn apply(&self, config: &mut WorldConfig) {
        if let Some(kind) = self.kind {
            config.kind = kind;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(splits) = self.splits {
            config.bsp.split_count = splits;
        }
        if let Some(min_room) = self.min_room {
            config.bsp.minimum_room_size = min_room;
        }
        if let Some(fill) = self.fill {
            config.drunk_walk.fill_target = fill;
        }
        if let Some(rooms) = self.rooms {
            config.random_rooms.room_count = rooms;
        }
    }
}

fn load_from_file(path: &Path) -> Result<WorldConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let config = WorldConfig::from_json_str(&contents)
        .with_context(|| format!("loading config {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_from_file(path)?,
        None => WorldConfig::default(),
    };
    args.apply(&mut config);

    if args.dump_config {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    let map = World::generate(&config).context("generating map")?;
    info!("spawn at {:?}, reproduce with --seed {}", map.spawn(), map.seed());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&map.export())?);
    } else {
        print!("{}", map.to_debug_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "delve", "--kind", "drunk", "--width", "30", "--seed", "12", "--fill", "0.4",
        ])
        .unwrap();
        let mut config = WorldConfig::default();
        args.apply(&mut config);

        assert_eq!(config.kind, GenerationKind::DrunkWalk);
        assert_eq!(config.width, 30);
        assert_eq!(config.height, 45);
        assert_eq!(config.seed, Some(12));
        assert_eq!(config.drunk_walk.fill_target, 0.4);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let args = Args::try_parse_from(["delve"]).unwrap();
        let mut config = WorldConfig {
            seed: Some(5),
            kind: GenerationKind::RandomRooms,
            ..WorldConfig::default()
        };
        args.apply(&mut config);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.kind, GenerationKind::RandomRooms);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(Args::try_parse_from(["delve", "--kind", "maze"]).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_from_file(Path::new("/nonexistent/delve.json")).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
