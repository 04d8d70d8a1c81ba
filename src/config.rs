use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ratatui::style::Color;
use ratatui::symbols::border;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Grid;

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default playfield width in pixels.
pub const DEFAULT_SCREEN_WIDTH: u32 = 640;

/// Default playfield height in pixels.
pub const DEFAULT_SCREEN_HEIGHT: u32 = 480;

/// Default edge length of one cell in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 20;

/// Default number of stones on the board.
pub const DEFAULT_STONE_COUNT: usize = 3;

/// Default simulation speed.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 10;

/// Cells always taken before stones are placed: snake, apple, poison apple.
const FIXED_OCCUPANTS: usize = 3;

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunable game settings.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub cell_size: u32,
    pub stone_count: usize,
    pub ticks_per_second: u32,
    /// Fixed seed for reproducible item placement; random when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            stone_count: DEFAULT_STONE_COUNT,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Checks that the settings describe a playable board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::Invalid("cell_size must be positive".to_owned()));
        }
        if self.ticks_per_second == 0 {
            return Err(ConfigError::Invalid(
                "ticks_per_second must be positive".to_owned(),
            ));
        }

        let columns = self.screen_width / self.cell_size;
        let rows = self.screen_height / self.cell_size;
        if columns < 2 || rows < 2 {
            return Err(ConfigError::Invalid(format!(
                "a {}x{} screen with {}px cells gives a {columns}x{rows} grid, need at least 2x2",
                self.screen_width, self.screen_height, self.cell_size
            )));
        }
        if i32::try_from(columns).is_err() || i32::try_from(rows).is_err() {
            return Err(ConfigError::Invalid("grid is too large".to_owned()));
        }

        let total_cells = columns as usize * rows as usize;
        if self.stone_count.saturating_add(FIXED_OCCUPANTS) >= total_cells {
            return Err(ConfigError::Invalid(format!(
                "{} stones leave no free cell on a {total_cells}-cell grid",
                self.stone_count
            )));
        }

        Ok(())
    }

    /// Returns the cell grid derived from screen and cell size.
    #[must_use]
    pub fn grid(&self) -> Grid {
        Grid::from_screen(self.screen_width, self.screen_height, self.cell_size)
    }

    /// Loads and validates a config file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw).map_err(|error| match error {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Loads the per-user config file, falling back to defaults when it
    /// does not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    /// Parses and validates a JSON config document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Returns the platform-correct per-user config file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

/// Colors used to draw the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Palette {
    pub board_bg: Color,
    pub border: Color,
    pub apple: Color,
    pub poison_apple: Color,
    pub stone: Color,
    pub snake: Color,
    pub status: Color,
}

/// Black board with cyan border, red apple, blue poison and white stones.
pub const PALETTE_CLASSIC: Palette = Palette {
    board_bg: Color::Rgb(0, 0, 0),
    border: Color::Rgb(93, 216, 228),
    apple: Color::Rgb(255, 0, 0),
    poison_apple: Color::Rgb(0, 0, 255),
    stone: Color::Rgb(255, 255, 255),
    snake: Color::Rgb(0, 255, 0),
    status: Color::DarkGray,
};

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

/// Glyph for one grid cell; two columns keep cells roughly square.
pub const GLYPH_CELL: &str = "██";

/// Terminal columns used per grid cell.
pub const CELL_COLUMNS: u16 = 2;
