use crate::pieces::ActivePiece;
use crate::types::{Color, Orientation, PieceKind, Phase, Position, SettledCell};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub color: Color,
    pub orientation: Orientation,
    pub cells: [Position; 4],
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind(),
            color: value.color(),
            orientation: value.orientation(),
            cells: *value.cells(),
        }
    }
}

/// Read-only view pulled by the render collaborator after every mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub board_width: u8,
    pub board_height: u8,
    pub active: Option<ActiveSnapshot>,
    pub settled: Vec<SettledCell>,
    pub next: PieceKind,
    pub phase: Phase,
    pub score: u32,
    pub elapsed_ticks: u32,
    pub fall_delay_ms: u32,
    pub lines_cleared: u32,
}

impl RenderSnapshot {
    pub fn playable(&self) -> bool {
        self.phase.is_running()
    }

    /// Color at a visible cell, active piece first
    pub fn color_at(&self, pos: Position) -> Option<Color> {
        if let Some(active) = &self.active {
            if active.cells.contains(&pos) {
                return Some(active.color);
            }
        }
        self.settled
            .iter()
            .find(|c| c.pos == pos)
            .map(|c| c.color)
    }
}
