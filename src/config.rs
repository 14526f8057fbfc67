//! External configuration loader.
//!
//! Reads `gridwalk.toml` from the current directory, or the file given on
//! the command line. Every key is optional and falls back to the built-in
//! default; a missing implicit file means "all defaults".
//!
//! ```toml
//! [timing]
//! tick_ms = 1000
//! portal_timeout_ms = 5000
//!
//! [entities]
//! guard = [2, 2]
//! teleport_target = [1, 1]
//!
//! [log]
//! file = "gridwalk.log"
//! ```

use crate::error::{GameError, Result};
use crate::world::Pos;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gridwalk.toml";

// ── Public Config Structs ──

/// Complete runtime configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Actor and frame pacing.
    pub timing: TimingConfig,
    /// Entity placement and signalling.
    pub entities: EntityConfig,
    /// Log output.
    pub log: LogConfig,
}

/// Actor and frame pacing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    /// Idle cadence of the guard and trap, and the guard's pause length.
    pub tick: Duration,
    /// Portal inactivity timeout.
    pub portal_timeout: Duration,
    /// Redraw interval.
    pub frame: Duration,
    /// How long the input actor waits for a terminal event per poll.
    pub input_poll: Duration,
}

/// Entity placement and signalling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityConfig {
    /// Guard start coordinate.
    pub guard: Pos,
    /// Portal coordinate.
    pub portal: Pos,
    /// Trap coordinate.
    pub trap: Pos,
    /// Where the portal sends the player.
    pub teleport_target: Pos,
    /// Chebyshev distance within which the guard is told to chase.
    pub guard_sight: u32,
    /// Queue length of every actor signal channel.
    pub mailbox_capacity: usize,
}

/// Log output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    /// Log file path.
    pub file: PathBuf,
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    entities: TomlEntities,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlTiming {
    #[serde(default = "default_tick")]
    tick_ms: u64,
    #[serde(default = "default_portal_timeout")]
    portal_timeout_ms: u64,
    #[serde(default = "default_frame")]
    frame_ms: u64,
    #[serde(default = "default_input_poll")]
    input_poll_ms: u64,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlEntities {
    #[serde(default = "default_guard")]
    guard: [i32; 2],
    #[serde(default = "default_portal")]
    portal: [i32; 2],
    #[serde(default = "default_trap")]
    trap: [i32; 2],
    #[serde(default = "default_teleport_target")]
    teleport_target: [i32; 2],
    #[serde(default = "default_guard_sight")]
    guard_sight: u32,
    #[serde(default = "default_mailbox_capacity")]
    mailbox_capacity: usize,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: PathBuf,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

const fn default_tick() -> u64 { 1000 }
const fn default_portal_timeout() -> u64 { 5000 }
const fn default_frame() -> u64 { 100 }
const fn default_input_poll() -> u64 { 50 }

const fn default_guard() -> [i32; 2] { [2, 2] }
const fn default_portal() -> [i32; 2] { [4, 4] }
const fn default_trap() -> [i32; 2] { [6, 6] }
const fn default_teleport_target() -> [i32; 2] { [1, 1] }
const fn default_guard_sight() -> u32 { 3 }
const fn default_mailbox_capacity() -> usize { 4 }

fn default_log_file() -> PathBuf { PathBuf::from("gridwalk.log") }
fn default_log_level() -> String { "info".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        Self {
            tick_ms: default_tick(),
            portal_timeout_ms: default_portal_timeout(),
            frame_ms: default_frame(),
            input_poll_ms: default_input_poll(),
        }
    }
}

impl Default for TomlEntities {
    fn default() -> Self {
        Self {
            guard: default_guard(),
            portal: default_portal(),
            trap: default_trap(),
            teleport_target: default_teleport_target(),
            guard_sight: default_guard_sight(),
            mailbox_capacity: default_mailbox_capacity(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

const fn pos([x, y]: [i32; 2]) -> Pos {
    Pos::new(x, y)
}

impl From<TomlConfig> for GameConfig {
    fn from(toml_cfg: TomlConfig) -> Self {
        Self {
            timing: TimingConfig {
                tick: Duration::from_millis(toml_cfg.timing.tick_ms),
                portal_timeout: Duration::from_millis(toml_cfg.timing.portal_timeout_ms),
                frame: Duration::from_millis(toml_cfg.timing.frame_ms),
                input_poll: Duration::from_millis(toml_cfg.timing.input_poll_ms),
            },
            entities: EntityConfig {
                guard: pos(toml_cfg.entities.guard),
                portal: pos(toml_cfg.entities.portal),
                trap: pos(toml_cfg.entities.trap),
                teleport_target: pos(toml_cfg.entities.teleport_target),
                guard_sight: toml_cfg.entities.guard_sight,
                mailbox_capacity: toml_cfg.entities.mailbox_capacity,
            },
            log: LogConfig {
                file: toml_cfg.log.file,
                level: toml_cfg.log.level,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl GameConfig {
    /// Parse config text.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str::<TomlConfig>(text)
            .map(Self::from)
            .map_err(|source| GameError::ConfigParse {
                path: origin.to_path_buf(),
                source,
            })
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `gridwalk.toml` in the
    /// working directory is used if present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !implicit.is_file() {
                    return Ok(Self::default());
                }
                implicit
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|source| GameError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        Self::from_toml_str(&text, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.timing.tick, Duration::from_secs(1));
        assert_eq!(cfg.timing.portal_timeout, Duration::from_secs(5));
        assert_eq!(cfg.entities.guard, Pos::new(2, 2));
        assert_eq!(cfg.entities.portal, Pos::new(4, 4));
        assert_eq!(cfg.entities.trap, Pos::new(6, 6));
        assert_eq!(cfg.entities.teleport_target, Pos::new(1, 1));
        assert_eq!(cfg.entities.mailbox_capacity, 4);
        assert_eq!(cfg.log.file, PathBuf::from("gridwalk.log"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[timing]\ntick_ms = 250\n[entities]\ntrap = [3, 1]\n",
            Path::new("test.toml"),
        )
        .unwrap();
        assert_eq!(cfg.timing.tick, Duration::from_millis(250));
        assert_eq!(cfg.timing.portal_timeout, Duration::from_secs(5));
        assert_eq!(cfg.entities.trap, Pos::new(3, 1));
        assert_eq!(cfg.entities.guard, Pos::new(2, 2));
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn test_empty_file_is_default() {
        let cfg = GameConfig::from_toml_str("", Path::new("empty.toml")).unwrap();
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let err = GameConfig::from_toml_str("[timing]\ntick_ms = \"fast\"\n", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, GameError::ConfigParse { .. }));

        let err = GameConfig::from_toml_str("[speed]\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, GameError::ConfigParse { .. }));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = GameConfig::load(Some(Path::new("/nonexistent/gridwalk.toml"))).unwrap_err();
        assert!(matches!(err, GameError::ConfigRead { .. }));
    }
}
