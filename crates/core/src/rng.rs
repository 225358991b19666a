//! RNG module - uniform random piece generation
//!
//! Every draw picks one of the seven kinds independently and uniformly.
//! There is no bag: the same kind can come up several times in a row.
//!
//! The generator keeps one kind queued so callers can preview the next piece.
//! A simple LCG keeps sequences deterministic for a given seed.

use crate::pieces::ActivePiece;
use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Uniform piece generator with a one-piece preview
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: SimpleRng,
    next: PieceKind,
}

impl PieceGenerator {
    /// Create a new generator with the given seed
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let next = Self::roll(&mut rng);
        Self { rng, next }
    }

    fn roll(rng: &mut SimpleRng) -> PieceKind {
        PieceKind::ALL[rng.next_range(PieceKind::ALL.len() as u32) as usize]
    }

    /// Peek at the kind the next draw will return
    pub fn peek(&self) -> PieceKind {
        self.next
    }

    /// Draw the queued kind and roll a fresh one behind it
    pub fn draw(&mut self) -> PieceKind {
        let kind = self.next;
        self.next = Self::roll(&mut self.rng);
        kind
    }

    /// Draw a kind and return its canonical spawn piece
    pub fn get_random_piece(&mut self) -> ActivePiece {
        ActivePiece::spawn(self.draw())
    }

    /// Current RNG state (restarting from it replays the same sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}
