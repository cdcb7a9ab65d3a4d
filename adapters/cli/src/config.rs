//! Settings assembled from `life-sim.toml` and command-line overrides.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use life_sim_core::{GridSize, RunState};
use life_sim_system_clock::{self as clock, TickPolicy};
use life_sim_system_persistence::DEFAULT_SNAPSHOT_PATH;
use life_sim_world as world;
use serde::Deserialize;
use thiserror::Error;

use crate::render::Theme;

/// Configuration file consulted when `--config` is not supplied.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "life-sim.toml";

/// Reasons the settings could not be assembled. All of them are fatal.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("required setting `{0}` is missing")]
    Missing(&'static str),
    #[error("setting `{key}` is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("could not read configuration file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse configuration file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Values taken from the command line. Each one wins over the file.
#[derive(Clone, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) tick_interval_ms: Option<u64>,
    pub(crate) alive_probability: Option<f64>,
    pub(crate) seed: Option<u64>,
    pub(crate) start: Option<RunState>,
    pub(crate) snapshot_path: Option<PathBuf>,
}

/// Fully validated settings, built once at startup.
#[derive(Clone, Debug)]
pub(crate) struct Settings {
    pub(crate) world: world::Config,
    pub(crate) start: RunState,
    pub(crate) snapshot_path: PathBuf,
    pub(crate) theme: Theme,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    grid: RawGrid,
    #[serde(default)]
    simulation: RawSimulation,
    #[serde(default)]
    snapshot: RawSnapshot,
    #[serde(default)]
    theme: RawTheme,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGrid {
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSimulation {
    tick_interval_ms: Option<u64>,
    alive_probability: Option<f64>,
    seed: Option<u64>,
    policy: Option<PolicyName>,
    start: Option<RunState>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSnapshot {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTheme {
    alive: Option<String>,
    dead: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum PolicyName {
    Reset,
    CatchUp,
}

impl From<PolicyName> for TickPolicy {
    fn from(name: PolicyName) -> Self {
        match name {
            PolicyName::Reset => Self::Reset,
            PolicyName::CatchUp => Self::CatchUp,
        }
    }
}

/// Reads the configuration file (the explicit one, or [`DEFAULT_CONFIG_PATH`]
/// when it exists) and merges the command-line overrides into it.
pub(crate) fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Settings, ConfigError> {
    let raw = match path {
        Some(path) => read(path)?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                read(default)?
            } else {
                RawConfig::default()
            }
        }
    };
    resolve(raw, overrides)
}

fn read(path: &Path) -> Result<RawConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve(raw: RawConfig, overrides: &Overrides) -> Result<Settings, ConfigError> {
    let width = overrides
        .width
        .or(raw.grid.width)
        .ok_or(ConfigError::Missing("grid.width"))?;
    let height = overrides
        .height
        .or(raw.grid.height)
        .ok_or(ConfigError::Missing("grid.height"))?;
    let size = GridSize::new(width, height).ok_or_else(|| ConfigError::Invalid {
        key: "grid",
        reason: format!("a {width}x{height} grid has no cells"),
    })?;

    let tick_interval_ms = overrides
        .tick_interval_ms
        .or(raw.simulation.tick_interval_ms)
        .ok_or(ConfigError::Missing("simulation.tick_interval_ms"))?;
    let policy = raw.simulation.policy.map_or(TickPolicy::Reset, TickPolicy::from);
    let clock = clock::Config::new(Duration::from_millis(tick_interval_ms))
        .ok_or_else(|| ConfigError::Invalid {
            key: "simulation.tick_interval_ms",
            reason: "the interval must be positive".to_owned(),
        })?
        .with_policy(policy);

    let probability = overrides
        .alive_probability
        .or(raw.simulation.alive_probability)
        .unwrap_or(world::DEFAULT_ALIVE_PROBABILITY);
    let seed = overrides
        .seed
        .or(raw.simulation.seed)
        .unwrap_or_else(rand::random);
    let world = world::Config::new(size, clock)
        .with_alive_probability(probability)
        .ok_or_else(|| ConfigError::Invalid {
            key: "simulation.alive_probability",
            reason: format!("{probability} is outside 0.0..=1.0"),
        })?
        .with_seed(seed);

    let start = overrides
        .start
        .or(raw.simulation.start)
        .unwrap_or_default();
    let snapshot_path = overrides
        .snapshot_path
        .clone()
        .or(raw.snapshot.path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH));
    let theme = Theme::new(
        glyph("theme.alive", raw.theme.alive, Theme::DEFAULT_ALIVE)?,
        glyph("theme.dead", raw.theme.dead, Theme::DEFAULT_DEAD)?,
    );

    Ok(Settings {
        world,
        start,
        snapshot_path,
        theme,
    })
}

fn glyph(key: &'static str, value: Option<String>, default: char) -> Result<char, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(glyph), None) => Ok(glyph),
        _ => Err(ConfigError::Invalid {
            key,
            reason: format!("expected a single character but found '{value}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETE: &str = r#"
        [grid]
        width = 40
        height = 30

        [simulation]
        tick_interval_ms = 50
        alive_probability = 0.25
        seed = 99
        policy = "catch-up"
        start = "running"

        [snapshot]
        path = "saves/board.txt"

        [theme]
        alive = "O"
        dead = " "
    "#;

    fn parse(text: &str, overrides: &Overrides) -> Result<Settings, ConfigError> {
        let raw: RawConfig = toml::from_str(text).expect("valid toml");
        resolve(raw, overrides)
    }

    #[test]
    fn complete_file_resolves_every_value() {
        let settings = parse(COMPLETE, &Overrides::default()).expect("settings");

        assert_eq!(settings.world.size(), GridSize::new(40, 30).expect("size"));
        assert_eq!(settings.world.clock().interval(), Duration::from_millis(50));
        assert_eq!(settings.world.clock().policy(), TickPolicy::CatchUp);
        assert!((settings.world.alive_probability() - 0.25).abs() < f64::EPSILON);
        assert_eq!(settings.world.seed(), 99);
        assert_eq!(settings.start, RunState::Running);
        assert_eq!(settings.snapshot_path, PathBuf::from("saves/board.txt"));
        assert_eq!(settings.theme, Theme::new('O', ' '));
    }

    #[test]
    fn missing_dimensions_fail_fast() {
        let error = parse("[simulation]\ntick_interval_ms = 50\n", &Overrides::default())
            .expect_err("no grid section");
        assert!(matches!(error, ConfigError::Missing("grid.width")));

        let error = parse("[grid]\nwidth = 4\n[simulation]\ntick_interval_ms = 5\n", &Overrides::default())
            .expect_err("no height");
        assert!(matches!(error, ConfigError::Missing("grid.height")));
    }

    #[test]
    fn missing_tick_interval_fails_fast() {
        let error = parse("[grid]\nwidth = 4\nheight = 4\n", &Overrides::default())
            .expect_err("no interval");
        assert!(matches!(
            error,
            ConfigError::Missing("simulation.tick_interval_ms")
        ));
    }

    #[test]
    fn optional_values_fall_back_to_defaults() {
        let overrides = Overrides {
            seed: Some(5),
            ..Overrides::default()
        };
        let settings = parse(
            "[grid]\nwidth = 8\nheight = 6\n[simulation]\ntick_interval_ms = 20\n",
            &overrides,
        )
        .expect("settings");

        assert!((settings.world.alive_probability() - 0.2).abs() < f64::EPSILON);
        assert_eq!(settings.world.clock().policy(), TickPolicy::Reset);
        assert_eq!(settings.start, RunState::Stopped);
        assert_eq!(settings.snapshot_path, PathBuf::from("game_state.txt"));
        assert_eq!(settings.theme, Theme::default());
    }

    #[test]
    fn overrides_supply_and_replace_file_values() {
        let overrides = Overrides {
            width: Some(12),
            height: Some(9),
            tick_interval_ms: Some(75),
            seed: Some(1),
            start: Some(RunState::Stopped),
            snapshot_path: Some(PathBuf::from("other.txt")),
            ..Overrides::default()
        };
        let settings = parse(COMPLETE, &overrides).expect("settings");

        assert_eq!(settings.world.size(), GridSize::new(12, 9).expect("size"));
        assert_eq!(settings.world.clock().interval(), Duration::from_millis(75));
        assert_eq!(settings.world.seed(), 1);
        assert_eq!(settings.start, RunState::Stopped);
        assert_eq!(settings.snapshot_path, PathBuf::from("other.txt"));

        let settings = parse("", &overrides).expect("flags alone are enough");
        assert_eq!(settings.world.size().width(), 12);
    }

    #[test]
    fn out_of_range_values_are_invalid() {
        let zero_width = Overrides {
            width: Some(0),
            ..Overrides::default()
        };
        assert!(matches!(
            parse(COMPLETE, &zero_width),
            Err(ConfigError::Invalid { key: "grid", .. })
        ));

        let zero_interval = Overrides {
            tick_interval_ms: Some(0),
            ..Overrides::default()
        };
        assert!(matches!(
            parse(COMPLETE, &zero_interval),
            Err(ConfigError::Invalid {
                key: "simulation.tick_interval_ms",
                ..
            })
        ));

        let certain_death = Overrides {
            alive_probability: Some(1.5),
            ..Overrides::default()
        };
        assert!(matches!(
            parse(COMPLETE, &certain_death),
            Err(ConfigError::Invalid {
                key: "simulation.alive_probability",
                ..
            })
        ));
    }

    #[test]
    fn multi_character_glyph_is_invalid() {
        let text = COMPLETE.replace("alive = \"O\"", "alive = \"OO\"");
        assert!(matches!(
            parse(&text, &Overrides::default()),
            Err(ConfigError::Invalid {
                key: "theme.alive",
                ..
            })
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<RawConfig, _> = toml::from_str("[grid]\ncolumns = 3\n");
        assert!(result.is_err());
    }
}
