use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::engine::Boundary;
use crate::engine::ColorMode;

pub const COLOR_VAR: &str = "FRAMELIFE_COLOR";
pub const QUIT_KEY_VAR: &str = "FRAMELIFE_QUIT_KEY";
pub const BOUNDARY_VAR: &str = "FRAMELIFE_BOUNDARY";
pub const JITTER_VAR: &str = "FRAMELIFE_JITTER";
pub const SEED_VAR: &str = "FRAMELIFE_SEED";
pub const TICK_VAR: &str = "FRAMELIFE_TICK_MS";

const DEFAULT_TICK: Duration = Duration::from_millis(50);

/// Whether `Esc` ends the program
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum QuitKey {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub color_mode: ColorMode,
    pub quit_key: QuitKey,
    pub boundary: Boundary,

    /// Tint newborn cells with a random offset in [`ColorMode::BlendAverage`]
    pub birth_jitter: bool,

    /// RNG seed. Taken from the clock when unset.
    pub seed: Option<u64>,

    /// Minimum time between two iterations of the main loop. Zero means no pacing.
    pub tick: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::default(),
            quit_key: QuitKey::default(),
            boundary: Boundary::default(),
            birth_jitter: true,
            seed: None,
            tick: DEFAULT_TICK,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value \"{value}\" for {var}, expected {exp}")]
    Invalid {
        var: &'static str,
        value: String,
        exp: &'static str,
    },
}

/// The value of a variable could not be parsed. Carries what was expected.
#[derive(Debug, PartialEq, Eq)]
pub struct InvalidValue(&'static str);

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration from `lookup`, which maps variable names to their values. Missing
    /// variables keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, COLOR_VAR)? {
            config.color_mode = v;
        }
        if let Some(v) = parse_var(&lookup, QUIT_KEY_VAR)? {
            config.quit_key = v;
        }
        if let Some(v) = parse_var(&lookup, BOUNDARY_VAR)? {
            config.boundary = v;
        }
        if let Some(Switch(v)) = parse_var(&lookup, JITTER_VAR)? {
            config.birth_jitter = v;
        }
        if let Some(Number(v)) = parse_var(&lookup, SEED_VAR)? {
            config.seed = Some(v);
        }
        if let Some(Number(v)) = parse_var(&lookup, TICK_VAR)? {
            config.tick = Duration::from_millis(v);
        }

        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr<Err = InvalidValue>,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };

    let parsed: Result<T, InvalidValue> = value.trim().parse();

    parsed
        .map(Some)
        .map_err(|InvalidValue(exp)| ConfigError::Invalid { var, value, exp })
}

/// A boolean in any of the usual spellings
struct Switch(bool);

impl FromStr for Switch {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "on" | "true" | "yes" | "enabled" => Ok(Switch(true)),
            "0" | "off" | "false" | "no" | "disabled" => Ok(Switch(false)),
            _ => Err(InvalidValue("on or off")),
        }
    }
}

struct Number(u64);

impl FromStr for Number {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .map(Number)
            .map_err(|_| InvalidValue("a non-negative integer"))
    }
}

impl FromStr for QuitKey {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse() {
            Ok(Switch(true)) => Ok(QuitKey::Enabled),
            Ok(Switch(false)) => Ok(QuitKey::Disabled),
            Err(_) => Err(InvalidValue("enabled or disabled")),
        }
    }
}

impl FromStr for ColorMode {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(ColorMode::Fixed),
            "blend" | "blend-average" => Ok(ColorMode::BlendAverage),
            _ => Err(InvalidValue("fixed or blend-average")),
        }
    }
}

impl FromStr for Boundary {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bounded" => Ok(Boundary::Bounded),
            "legacy" => Ok(Boundary::Legacy),
            _ => Err(InvalidValue("bounded or legacy")),
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(lookup(&[]).unwrap(), Config::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = lookup(&[
            (COLOR_VAR, "fixed"),
            (QUIT_KEY_VAR, "off"),
            (BOUNDARY_VAR, "Legacy"),
            (JITTER_VAR, "false"),
            (SEED_VAR, "42"),
            (TICK_VAR, " 0 "),
        ])
        .unwrap();

        assert_eq!(
            config,
            Config {
                color_mode: ColorMode::Fixed,
                quit_key: QuitKey::Disabled,
                boundary: Boundary::Legacy,
                birth_jitter: false,
                seed: Some(42),
                tick: Duration::ZERO,
            }
        );
    }

    #[test]
    fn blend_alias() {
        let config = lookup(&[(COLOR_VAR, "blend")]).unwrap();
        assert_eq!(config.color_mode, ColorMode::BlendAverage);
    }

    #[test]
    fn rejects_bad_values() {
        let err = lookup(&[(COLOR_VAR, "rainbow")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: COLOR_VAR,
                value: "rainbow".to_string(),
                exp: "fixed or blend-average",
            }
        );

        assert!(lookup(&[(SEED_VAR, "-1")]).is_err());
        assert!(lookup(&[(QUIT_KEY_VAR, "maybe")]).is_err());
    }
}
