use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use cross_xdg::BaseDirs;
use nu_ansi_term::Color;

use crate::error::ConfigError;
use crate::theme::catppuccin::Mocha as P;

pub const DEFAULT_MEMORY_SIZE: usize = 30_000;
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000_000;
pub const DEFAULT_ANIMATION_MS: u64 = 100;
pub const DEFAULT_VISIBLE_CELLS: usize = 20;

const CONFIG_FILE: &str = "bf-learn.toml";

/// Everything an [`Interpreter`](crate::Interpreter) can be configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub memory_size: usize,
    pub max_iterations: usize,
    /// Capture the per-step history and a final memory snapshot in `execute`.
    pub debug_capture: bool,
    /// Bytes consumed by `,`; once exhausted `,` stores 0.
    pub input: Vec<u8>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            debug_capture: false,
            input: Vec::new(),
        }
    }
}

impl InterpreterConfig {
    pub fn with_memory_size(mut self, memory_size: usize) -> Self {
        self.memory_size = memory_size;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_debug_capture(mut self, debug_capture: bool) -> Self {
        self.debug_capture = debug_capture;
        self
    }

    pub fn with_input(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.input = input.into();
        self
    }

    /// Input given as text, encoded with [`encode_text_input`].
    pub fn with_text_input(self, text: &str) -> Self {
        self.with_input(encode_text_input(text))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_size == 0 {
            return Err(ConfigError::ZeroMemory);
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }
}

/// Encode text for `,` the way `.` decodes cells: characters up to U+00FF
/// become a single byte each. Wider characters fall back to their UTF-8 bytes.
pub fn encode_text_input(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match u8::try_from(ch) {
            Ok(b) => bytes.push(b),
            Err(_) => bytes.extend_from_slice(ch.encode_utf8(&mut [0; 4]).as_bytes()),
        }
    }
    bytes
}

/// Colors used by the memory visualizer and CLI status lines.
#[derive(Debug, Clone)]
pub struct Colors {
    pub cell_zero: Color,
    pub cell_nonzero: Color,
    pub ascii: Color,
    pub index: Color,
    pub pointer: Color,
    pub border: Color,
    pub success: Color,
    pub error: Color,
    pub info: Color,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            cell_zero: P::SURFACE2,
            cell_nonzero: P::TEXT,
            ascii: P::YELLOW,
            index: P::SURFACE2,
            pointer: P::GREEN,
            border: P::SURFACE2,
            success: P::GREEN,
            error: P::RED,
            info: P::SKY,
        }
    }
}

/// User settings: built-in defaults, then `$XDG_CONFIG_HOME/bf-learn.toml`,
/// then `BF_*` environment variables. CLI flags are applied by the caller.
#[derive(Debug, Clone)]
pub struct Settings {
    pub memory_size: usize,
    pub max_iterations: usize,
    pub animation_ms: u64,
    pub visible_cells: usize,
    pub colors: Colors,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            animation_ms: DEFAULT_ANIMATION_MS,
            visible_cells: DEFAULT_VISIBLE_CELLS,
            colors: Colors::default(),
        }
    }
}

impl Settings {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = match config_path() {
            Some(path) => match fs::read_to_string(&path) {
                Ok(content) => {
                    log::debug!("loading settings from {}", path.display());
                    Self::from_toml_str(&content)?
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
                Err(e) => {
                    return Err(ConfigError::Io {
                        path: path.display().to_string(),
                        source: e,
                    });
                }
            },
            None => Self::default(),
        };
        settings.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Parse the small TOML subset we accept: `[section]` headers and
    /// `key = value` pairs, values optionally quoted.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut section = String::new();
        let mut map: HashMap<String, String> = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                section = line[1..line.len() - 1].trim().to_string();
                continue;
            }
            if let Some((key, val_raw)) = line.split_once('=') {
                let val_raw = val_raw.trim();
                let val = if val_raw.len() >= 2 && val_raw.starts_with('"') && val_raw.ends_with('"') {
                    &val_raw[1..val_raw.len() - 1]
                } else {
                    val_raw
                };
                map.insert(format!("{section}.{}", key.trim()), val.to_string());
            }
        }

        let mut cfg = Self::default();

        macro_rules! set_num {
            ($field:ident, $key:literal) => {
                if let Some(v) = map.get($key) {
                    cfg.$field = parse_value($key, v)?;
                }
            };
        }
        macro_rules! set_color {
            ($field:ident, $key:literal) => {
                if let Some(v) = map.get($key) {
                    cfg.colors.$field = parse_color(v).ok_or_else(|| ConfigError::InvalidValue {
                        key: $key.to_string(),
                        value: v.clone(),
                    })?;
                }
            };
        }

        set_num!(memory_size, "interpreter.memory_size");
        set_num!(max_iterations, "interpreter.max_iterations");
        set_num!(animation_ms, "visualizer.animation_ms");
        set_num!(visible_cells, "visualizer.visible_cells");

        set_color!(cell_zero, "colors.cell_zero");
        set_color!(cell_nonzero, "colors.cell_nonzero");
        set_color!(ascii, "colors.ascii");
        set_color!(index, "colors.index");
        set_color!(pointer, "colors.pointer");
        set_color!(border, "colors.border");
        set_color!(success, "colors.success");
        set_color!(error, "colors.error");
        set_color!(info, "colors.info");

        Ok(cfg)
    }

    /// Apply `BF_MEMORY_SIZE`, `BF_MAX_ITERATIONS` and `BF_ANIMATION_MS`.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BF_MEMORY_SIZE") {
            self.memory_size = parse_value("BF_MEMORY_SIZE", &v)?;
        }
        if let Some(v) = lookup("BF_MAX_ITERATIONS") {
            self.max_iterations = parse_value("BF_MAX_ITERATIONS", &v)?;
        }
        if let Some(v) = lookup("BF_ANIMATION_MS") {
            self.animation_ms = parse_value("BF_ANIMATION_MS", &v)?;
        }
        Ok(())
    }

    /// Interpreter configuration seeded from these settings.
    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig::default()
            .with_memory_size(self.memory_size)
            .with_max_iterations(self.max_iterations)
    }
}

fn config_path() -> Option<PathBuf> {
    // On Linux: resolves to /home/<user>/.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push(CONFIG_FILE);
    Some(path)
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().replace('_', "").parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        return None;
    }

    let name = s.to_ascii_lowercase();
    Some(match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "purple" => Color::Purple,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::LightGray,
        "darkgray" | "dark_grey" | "darkgrey" | "dark_gray" => Color::DarkGray,
        "lightred" | "light_red" => Color::LightRed,
        "lightgreen" | "light_green" => Color::LightGreen,
        "lightblue" | "light_blue" => Color::LightBlue,
        "lightmagenta" | "light_magenta" => Color::LightPurple,
        "lightcyan" | "light_cyan" => Color::LightCyan,
        "white" => Color::White,
        _ => return None,
    })
}
