/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub game: RulesConfig,
}

/// Logical playfield geometry, in the domain's units.
#[derive(Clone, Debug)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
    pub padding: i32,
}

#[derive(Clone, Debug)]
pub struct RulesConfig {
    /// Starting tick rate in frames per second.
    pub initial_fps: f32,
    /// Boundary hits before the terminal sequence fires.
    pub max_crashes: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        let t = TomlConfig::default();
        GameConfig {
            grid: GridConfig {
                width: t.grid.width,
                height: t.grid.height,
                block_size: t.grid.block_size,
                padding: t.grid.padding,
            },
            game: RulesConfig {
                initial_fps: t.game.initial_fps,
                max_crashes: t.game.max_crashes,
            },
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    game: TomlGame,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_width")]
    width: i32,
    #[serde(default = "default_height")]
    height: i32,
    #[serde(default = "default_block_size")]
    block_size: i32,
    #[serde(default = "default_padding")]
    padding: i32,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_initial_fps")]
    initial_fps: f32,
    #[serde(default = "default_max_crashes")]
    max_crashes: u32,
}

// ── Defaults ──

fn default_width() -> i32 { 600 }
fn default_height() -> i32 { 400 }
fn default_block_size() -> i32 { 20 }
fn default_padding() -> i32 { 15 }
fn default_initial_fps() -> f32 { 8.0 }
fn default_max_crashes() -> u32 { 5 }

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid {
            width: default_width(),
            height: default_height(),
            block_size: default_block_size(),
            padding: default_padding(),
        }
    }
}

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            initial_fps: default_initial_fps(),
            max_crashes: default_max_crashes(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig {
            grid: GridConfig {
                width: toml_cfg.grid.width,
                height: toml_cfg.grid.height,
                block_size: toml_cfg.grid.block_size,
                padding: toml_cfg.grid.padding,
            },
            game: RulesConfig {
                initial_fps: toml_cfg.game.initial_fps,
                max_crashes: toml_cfg.game.max_crashes,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: TomlConfig = toml::from_str("[game]\nmax_crashes = 3\n").unwrap();
        assert_eq!(cfg.game.max_crashes, 3);
        assert_eq!(cfg.game.initial_fps, 8.0);
        assert_eq!(cfg.grid.width, 600);
        assert_eq!(cfg.grid.padding, 15);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.grid.block_size, 20);
        assert_eq!(cfg.game.max_crashes, 5);
    }
}
