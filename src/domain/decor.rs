//! Decorative chess-piece coins floating behind the hero.
//!
//! Tints are cosmetic variety, not content: the chooser is seeded so a page
//! renders the same way for the same seed, and callers should only rely on
//! the result being one of [`Tint::ALL`].

use std::fmt;

use rand::{Rng, SeedableRng, rngs::StdRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tint {
    Primary,
    Foreground,
    Purple,
    Gray,
}

impl Tint {
    pub const ALL: [Tint; 4] = [Tint::Primary, Tint::Foreground, Tint::Purple, Tint::Gray];

    pub fn css_class(self) -> &'static str {
        match self {
            Tint::Primary => "tint-primary",
            Tint::Foreground => "tint-foreground",
            Tint::Purple => "tint-purple",
            Tint::Gray => "tint-gray",
        }
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

/// Choose a tint for a seed.
pub fn pick_tint(seed: u64) -> Tint {
    draw_tint(&mut StdRng::seed_from_u64(seed))
}

fn draw_tint<R: Rng>(rng: &mut R) -> Tint {
    Tint::ALL[rng.random_range(0..Tint::ALL.len())]
}

/// Scroll parallax factor for a coin at `depth`; deeper coins drift less.
pub fn parallax_factor(depth: i8) -> f64 {
    match depth {
        d if d <= -2 => 0.02,
        -1 => 0.04,
        _ => 0.06,
    }
}

/// One coin in the hero backdrop.
#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    pub piece: &'static str,
    /// Position as percentages of the hero box.
    pub left: f64,
    pub top: f64,
    pub size: u32,
    pub depth: i8,
    pub tint: Tint,
}

impl Coin {
    pub fn parallax(&self) -> f64 {
        parallax_factor(self.depth)
    }

    /// Vertical drift for a scroll position.
    pub fn drift(&self, scroll_y: f64) -> f64 {
        -(scroll_y * self.parallax())
    }
}

const LAYOUT: [(&str, f64, f64, u32, i8); 6] = [
    ("♔", 8.0, 18.0, 72, -1),
    ("♕", 82.0, 12.0, 64, -2),
    ("♘", 14.0, 70.0, 56, 0),
    ("♗", 76.0, 64.0, 60, -1),
    ("♖", 46.0, 8.0, 44, -2),
    ("♙", 90.0, 84.0, 40, 0),
];

/// The hero's coins, tinted from one generator seeded with `seed`.
pub fn hero_coins(seed: u64) -> Vec<Coin> {
    let mut rng = StdRng::seed_from_u64(seed);
    LAYOUT
        .iter()
        .map(|&(piece, left, top, size, depth)| Coin {
            piece,
            left,
            top,
            size,
            depth,
            tint: draw_tint(&mut rng),
        })
        .collect()
}
