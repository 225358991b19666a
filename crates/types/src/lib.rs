//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the simulation.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, the game clock, the async session host).
//!
//! # Board Dimensions
//!
//! Default playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - Rows with negative `y` lie above the visible board. Pieces spawn there.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_FALL_DELAY_MS` | 1000 | Gravity interval at session start |
//! | `MIN_FALL_DELAY_MS` | 50 | Fastest gravity interval |
//! | `MAX_FALL_DELAY_MS` | 1000 | Slowest gravity interval |
//! | `SPEED_STEP_MS` | 50 | Speed adjustment step |
//! | `ELAPSED_TICK_MS` | 1000 | Elapsed-time driver period |
//!
//! # Examples
//!
//! ```
//! use tetris_sim_types::{Command, Orientation, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::T;
//! assert_eq!(PieceKind::from_str("t"), Some(piece));
//!
//! assert_eq!(Orientation::North.rotate_cw(), Orientation::East);
//! assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use std::fmt;

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Largest supported board width (row occupancy is tracked in a `u64` bitmask)
pub const MAX_BOARD_WIDTH: u8 = 64;

/// Largest supported board height
pub const MAX_BOARD_HEIGHT: u8 = 100;

/// Gravity interval at session start (1000ms = 1 second per row)
pub const DEFAULT_FALL_DELAY_MS: u32 = 1000;

/// Fastest configurable gravity interval
pub const MIN_FALL_DELAY_MS: u32 = 50;

/// Slowest configurable gravity interval
pub const MAX_FALL_DELAY_MS: u32 = 1000;

/// Step applied by speed up / slow down
pub const SPEED_STEP_MS: u32 = 50;

/// Period of the elapsed-time driver
pub const ELAPSED_TICK_MS: u32 = 1000;

/// Points per cleared row
pub const LINE_CLEAR_POINTS: u32 = 100;

/// Flat bonus for every merged piece
pub const MERGE_BONUS: u32 = 10;

/// The seven tetromino piece kinds
///
/// Each piece has a fixed color:
/// - **I**: Cyan, vertical bar at spawn
/// - **O**: Yellow, 2x2 square (never rotates)
/// - **T**: Purple
/// - **S**: Green
/// - **Z**: Red (mirror of S)
/// - **J**: Blue
/// - **L**: Orange (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_sim_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Fixed display color of this kind
    pub fn color(&self) -> Color {
        match self {
            PieceKind::I => Color::Cyan,
            PieceKind::O => Color::Yellow,
            PieceKind::T => Color::Purple,
            PieceKind::S => Color::Green,
            PieceKind::Z => Color::Red,
            PieceKind::J => Color::Blue,
            PieceKind::L => Color::Orange,
        }
    }

    /// Whether this kind ever rotates (everything except O)
    pub fn rotates(&self) -> bool {
        !matches!(self, PieceKind::O)
    }
}

/// Piece colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Cyan,
    Yellow,
    Purple,
    Green,
    Red,
    Blue,
    Orange,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Cyan => "cyan",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Green => "green",
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Orange => "orange",
        }
    }
}

/// Orientation of the active piece
///
/// The rotation cycle goes: North → East → South → West → North.
/// Every kind spawns facing North.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_sim_types::Orientation;
    ///
    /// assert_eq!(Orientation::North.rotate_cw(), Orientation::East);
    /// assert_eq!(Orientation::East.rotate_cw(), Orientation::South);
    /// assert_eq!(Orientation::South.rotate_cw(), Orientation::West);
    /// assert_eq!(Orientation::West.rotate_cw(), Orientation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Orientation::North => Orientation::East,
            Orientation::East => Orientation::South,
            Orientation::South => Orientation::West,
            Orientation::West => Orientation::North,
        }
    }

    /// Parse orientation from string
    ///
    /// Accepts full names or single letters (case-insensitive):
    /// "north" | "n", "east" | "e", "south" | "s", "west" | "w"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Some(Orientation::North),
            "east" | "e" => Some(Orientation::East),
            "south" | "s" => Some(Orientation::South),
            "west" | "w" => Some(Orientation::West),
            _ => None,
        }
    }

    /// Single-letter form (N, E, S, W)
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::North => "N",
            Orientation::East => "E",
            Orientation::South => "S",
            Orientation::West => "W",
        }
    }
}

/// Board coordinate. `y` grows downward and may be negative above the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Translate by (dx, dy)
    pub const fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A landed cell as handed to the render collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettledCell {
    pub pos: Position,
    pub color: Color,
}

/// Logical player commands delivered by the input collaborator
///
/// There is intentionally no hard drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Advance piece one row (same rules as a gravity tick)
    MoveDown,
    /// Rotate piece 90° clockwise about its pivot
    Rotate,
}

impl Command {
    /// Parse command from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_sim_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("left"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("rotate"), Some(Command::Rotate));
    /// assert_eq!(Command::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" | "left" => Some(Command::MoveLeft),
            "moveright" | "right" => Some(Command::MoveRight),
            "movedown" | "down" => Some(Command::MoveDown),
            "rotate" | "up" => Some(Command::Rotate),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::MoveDown => "moveDown",
            Command::Rotate => "rotate",
        }
    }
}

/// Session lifecycle phase
///
/// `Idle --start--> Running --pause--> Paused --start--> Running`,
/// `Running --(settled cell above the board)--> GameOver`.
/// `GameOver` is terminal until an explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::GameOver => "gameOver",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Phase::Running)
    }

    /// Started and not yet over
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Phase::Running | Phase::Paused)
    }
}

/// Session configuration, supplied at session start
///
/// Only `fall_delay_ms` may change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub board_width: u8,
    pub board_height: u8,
    pub fall_delay_ms: u32,
    pub speed_step_ms: u32,
    pub min_fall_delay_ms: u32,
    pub max_fall_delay_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            fall_delay_ms: DEFAULT_FALL_DELAY_MS,
            speed_step_ms: SPEED_STEP_MS,
            min_fall_delay_ms: MIN_FALL_DELAY_MS,
            max_fall_delay_ms: MAX_FALL_DELAY_MS,
        }
    }
}

impl SessionConfig {
    /// Check that the configuration describes a playable board.
    ///
    /// Pieces spawn around columns 4-5, so the board must be at least 6 wide.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width < 6 || self.board_width > MAX_BOARD_WIDTH {
            return Err(ConfigError::BoardWidth(self.board_width));
        }
        if self.board_height < 4 || self.board_height > MAX_BOARD_HEIGHT {
            return Err(ConfigError::BoardHeight(self.board_height));
        }
        if self.min_fall_delay_ms == 0 || self.min_fall_delay_ms > self.max_fall_delay_ms {
            return Err(ConfigError::DelayRange {
                min: self.min_fall_delay_ms,
                max: self.max_fall_delay_ms,
            });
        }
        if self.fall_delay_ms < self.min_fall_delay_ms || self.fall_delay_ms > self.max_fall_delay_ms
        {
            return Err(ConfigError::FallDelay(self.fall_delay_ms));
        }
        if self.speed_step_ms == 0 {
            return Err(ConfigError::SpeedStep);
        }
        Ok(())
    }

    /// Clamp a requested fall delay into the configured range
    pub fn clamp_fall_delay(&self, delay_ms: u32) -> u32 {
        delay_ms.clamp(self.min_fall_delay_ms, self.max_fall_delay_ms)
    }
}

/// Rejected session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    BoardWidth(u8),
    BoardHeight(u8),
    FallDelay(u32),
    DelayRange { min: u32, max: u32 },
    SpeedStep,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BoardWidth(w) => {
                write!(f, "board width {} outside 6..={}", w, MAX_BOARD_WIDTH)
            }
            ConfigError::BoardHeight(h) => {
                write!(f, "board height {} outside 4..={}", h, MAX_BOARD_HEIGHT)
            }
            ConfigError::FallDelay(ms) => write!(f, "fall delay {}ms outside configured range", ms),
            ConfigError::DelayRange { min, max } => {
                write!(f, "invalid fall delay range {}..={}ms", min, max)
            }
            ConfigError::SpeedStep => write!(f, "speed step must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {}
