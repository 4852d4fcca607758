//! RNG module - seeded randomness and piece/color selection.
//!
//! Shape selection is uniform over the full catalog each spawn. Colors are
//! drawn from an 8-color bank without replacement; once the bank runs dry
//! the used pile is recycled, so long runs of one color cannot happen.
//!
//! The `PieceSource` trait keeps the randomness injectable: tests substitute
//! a scripted source to force deterministic piece and color sequences.

use gridfall_types::{PieceColor, ShapeKind};

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
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Get the current RNG state (for reproducing a run)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

/// Supplier of the shape and color for each spawned piece.
pub trait PieceSource: Send {
    fn next_shape(&mut self) -> ShapeKind;
    fn next_color(&mut self) -> PieceColor;
}

/// Seeded default source: uniform shapes, bank-drawn colors.
#[derive(Debug, Clone)]
pub struct RandomPieceSource {
    rng: SimpleRng,
    bank: Vec<PieceColor>,
    used: Vec<PieceColor>,
}

impl RandomPieceSource {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            bank: PieceColor::BANK.to_vec(),
            used: Vec::with_capacity(PieceColor::BANK.len()),
        }
    }

    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }
}

impl PieceSource for RandomPieceSource {
    fn next_shape(&mut self) -> ShapeKind {
        let idx = self.rng.next_range(ShapeKind::ALL.len() as u32) as usize;
        ShapeKind::ALL[idx]
    }

    fn next_color(&mut self) -> PieceColor {
        if self.bank.is_empty() {
            std::mem::swap(&mut self.bank, &mut self.used);
        }
        let idx = self.rng.next_range(self.bank.len() as u32) as usize;
        let color = self.bank.swap_remove(idx);
        self.used.push(color);
        color
    }
}

impl Default for RandomPieceSource {
    fn default() -> Self {
        Self::new(1)
    }
}
