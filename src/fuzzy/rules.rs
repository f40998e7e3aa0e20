//! Stress Rule Base
//!
//! The rule base is the exhaustive cross-product of the four input variables'
//! terms: 3 x 3 x 3 x 3 = 81 conjunctive rules, each concluding one stress
//! term with weight 1. It is encoded as a dense conclusions table indexed by
//! `[screen][temperature][humidity][air_quality]`, so full coverage of the
//! input space holds by construction and alternative parameterizations are a
//! data edit, not a code fork.
//!
//! Assignment intuition: poor air quality always concludes high stress; heavy
//! screen time concludes high stress regardless of the environment; a humid
//! room pushes an otherwise comfortable low-screen reading to medium; low
//! screen time in comfortable, ideal, good-air conditions is low stress.

/// Positional term index for a three-term linguistic variable.
///
/// `Lo`/`Mid`/`Hi` address a variable's term list in ascending universe
/// order: screen low/moderate/heavy, temperature cold/comfortable/hot,
/// humidity dry/ideal/humid, air quality good/moderate/poor and stress
/// low/medium/high.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term3 {
    Lo = 0,
    Mid = 1,
    Hi = 2,
}

use Term3::{Hi as H, Lo as L, Mid as M};

/// Stress conclusion per input-term combination.
///
/// Layout: `CONCLUSIONS[screen][temperature][humidity][air_quality]`, with
/// the innermost axis ordered good/moderate/poor air quality.
pub const CONCLUSIONS: [[[[Term3; 3]; 3]; 3]; 3] = [
    // screen low
    [
        // cold:        dry        ideal      humid
        [[L, M, H], [L, L, H], [M, M, H]],
        // comfortable
        [[L, L, H], [L, L, H], [M, M, H]],
        // hot
        [[M, M, H], [L, M, H], [M, H, H]],
    ],
    // screen moderate
    [
        [[M, H, H], [M, M, H], [H, H, H]],
        [[M, M, H], [M, M, H], [H, H, H]],
        [[H, H, H], [M, H, H], [H, H, H]],
    ],
    // screen heavy
    [
        [[H, H, H], [H, H, H], [H, H, H]],
        [[H, H, H], [H, H, H], [H, H, H]],
        [[H, H, H], [H, H, H], [H, H, H]],
    ],
];

/// Iterate the full rule base as
/// `(screen, temperature, humidity, air_quality, conclusion)` term indices.
pub fn all() -> impl Iterator<Item = (usize, usize, usize, usize, Term3)> {
    (0..3).flat_map(|s| {
        (0..3).flat_map(move |t| {
            (0..3).flat_map(move |h| (0..3).map(move |a| (s, t, h, a, CONCLUSIONS[s][t][h][a])))
        })
    })
}
