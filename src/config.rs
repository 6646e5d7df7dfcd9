/// External configuration loader.
///
/// Reads `dreamfront.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Problems found while loading are kept in `notes` so they can be logged
/// once the subscriber is installed (the terminal is in raw mode by then).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "dreamfront.toml";

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub display: DisplayConfig,
    pub battle: BattleConfig,
    pub gamepad: GamepadConfig,
    pub audio_enabled: bool,
    pub logging: LoggingConfig,
    pub source: Option<PathBuf>,
    pub notes: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub url: String,
    /// Zero disables the state resync.
    pub reply_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub frame: Duration,
}

/// Layout and policy knobs for battle screens. Copied into the render
/// context, so it must stay cheap to clone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BattleConfig {
    pub menu_columns: usize,
    pub menu_rows: usize,
    pub dead_targets_selectable: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        BattleConfig {
            menu_columns: default_menu_columns(),
            menu_rows: default_menu_rows(),
            dead_targets_selectable: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub prev: Vec<String>,
    pub next: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub file: PathBuf,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    server: TomlServer,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    battle: TomlBattle,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    audio: TomlAudio,
    #[serde(default)]
    logging: TomlLogging,
}

#[derive(Deserialize, Debug)]
struct TomlServer {
    #[serde(default = "default_url")]
    url: String,
    #[serde(default = "default_reply_timeout")]
    reply_timeout_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlBattle {
    #[serde(default = "default_menu_columns")]
    menu_columns: usize,
    #[serde(default = "default_menu_rows")]
    menu_rows: usize,
    #[serde(default = "default_true")]
    dead_targets_selectable: bool,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_prev")]
    prev: Vec<String>,
    #[serde(default = "default_next")]
    next: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default = "default_true")]
    enabled: bool,
}

#[derive(Deserialize, Debug)]
struct TomlLogging {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_url() -> String { "ws://127.0.0.1:8000/ws".into() }
fn default_reply_timeout() -> u64 { 15_000 }
fn default_frame_ms() -> u64 { 16 }
fn default_menu_columns() -> usize { 3 }
fn default_menu_rows() -> usize { 2 }
fn default_true() -> bool { true }

fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_prev() -> Vec<String> { vec!["L1".into()] }
fn default_next() -> Vec<String> { vec!["R1".into()] }
fn default_log_file() -> String { "dreamfront.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlServer {
    fn default() -> Self {
        TomlServer {
            url: default_url(),
            reply_timeout_ms: default_reply_timeout(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { frame_ms: default_frame_ms() }
    }
}

impl Default for TomlBattle {
    fn default() -> Self {
        TomlBattle {
            menu_columns: default_menu_columns(),
            menu_rows: default_menu_rows(),
            dead_targets_selectable: true,
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            prev: default_prev(),
            next: default_next(),
        }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio { enabled: true }
    }
}

impl Default for TomlLogging {
    fn default() -> Self {
        TomlLogging {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

// ── Loading ──

impl ClientConfig {
    /// Load config from `dreamfront.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) XDG data home, (4) system data directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let mut notes = Vec::new();
        let (toml_cfg, source) = load_toml(&search_dirs, &mut notes);
        Self::from_toml(toml_cfg, source, notes)
    }

    /// Parse a config document directly. Used by `load` and by tests.
    pub fn parse(text: &str) -> Self {
        let mut notes = Vec::new();
        let cfg = parse_toml(text, Path::new(CONFIG_FILE), &mut notes);
        Self::from_toml(cfg, None, notes)
    }

    fn from_toml(cfg: TomlConfig, source: Option<PathBuf>, mut notes: Vec<String>) -> Self {
        // A zero-sized grid would leave the active character with no buttons.
        let mut battle = BattleConfig {
            menu_columns: cfg.battle.menu_columns,
            menu_rows: cfg.battle.menu_rows,
            dead_targets_selectable: cfg.battle.dead_targets_selectable,
        };
        if battle.menu_columns == 0 || battle.menu_rows == 0 {
            notes.push(format!(
                "battle menu grid {}x{} is empty, using {}x{}",
                battle.menu_columns, battle.menu_rows,
                default_menu_columns(), default_menu_rows(),
            ));
            battle.menu_columns = default_menu_columns();
            battle.menu_rows = default_menu_rows();
        }

        ClientConfig {
            server: ServerConfig {
                url: cfg.server.url,
                reply_timeout: Duration::from_millis(cfg.server.reply_timeout_ms),
            },
            display: DisplayConfig {
                frame: Duration::from_millis(cfg.display.frame_ms.max(1)),
            },
            battle,
            gamepad: GamepadConfig {
                confirm: cfg.gamepad.confirm,
                prev: cfg.gamepad.prev,
                next: cfg.gamepad.next,
            },
            audio_enabled: cfg.audio.enabled,
            logging: LoggingConfig {
                file: PathBuf::from(cfg.logging.file),
                level: cfg.logging.level,
            },
            source,
            notes,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), None, Vec::new())
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/dreamfront)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/dreamfront");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/dreamfront)
    let sys = PathBuf::from("/usr/share/dreamfront");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for the config file in candidate directories.
fn load_toml(search_dirs: &[PathBuf], notes: &mut Vec<String>) -> (TomlConfig, Option<PathBuf>) {
    for dir in search_dirs {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    let cfg = parse_toml(&text, &path, notes);
                    return (cfg, Some(path));
                }
                Err(e) => {
                    notes.push(format!("could not read {}: {e}", path.display()));
                }
            }
        }
    }
    (TomlConfig::default(), None)
}

fn parse_toml(text: &str, path: &Path, notes: &mut Vec<String>) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            notes.push(format!("{} parse error, using default settings: {e}", path.display()));
            TomlConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = ClientConfig::parse("");
        assert_eq!(cfg.server.url, "ws://127.0.0.1:8000/ws");
        assert_eq!(cfg.server.reply_timeout, Duration::from_millis(15_000));
        assert_eq!(cfg.battle, BattleConfig::default());
        assert!(cfg.audio_enabled);
        assert!(cfg.notes.is_empty());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = ClientConfig::parse(
            "[battle]\ndead_targets_selectable = false\n[server]\nurl = \"ws://game:9000/ws\"\n",
        );
        assert!(!cfg.battle.dead_targets_selectable);
        assert_eq!(cfg.battle.menu_columns, 3);
        assert_eq!(cfg.battle.menu_rows, 2);
        assert_eq!(cfg.server.url, "ws://game:9000/ws");
        assert_eq!(cfg.server.reply_timeout, Duration::from_millis(15_000));
    }

    #[test]
    fn parse_error_falls_back_and_leaves_a_note() {
        let cfg = ClientConfig::parse("[server\nurl = 3");
        assert_eq!(cfg.server.url, default_url());
        assert_eq!(cfg.notes.len(), 1);
        assert!(cfg.notes[0].contains("parse error"));
    }

    #[test]
    fn empty_battle_grid_is_replaced() {
        let cfg = ClientConfig::parse("[battle]\nmenu_columns = 0\n");
        assert_eq!(cfg.battle.menu_columns, 3);
        assert_eq!(cfg.notes.len(), 1);
    }

    #[test]
    fn zero_frame_is_clamped() {
        let cfg = ClientConfig::parse("[display]\nframe_ms = 0\n");
        assert_eq!(cfg.display.frame, Duration::from_millis(1));
    }
}
