//! Fuzzy Logic Primitives
//!
//! The building blocks of the inference engine:
//! - Membership degrees in [0, 1] with min/max combinators
//! - Triangular membership functions
//! - Linguistic variables (a universe plus three named terms)
//!
//! Everything here is plain immutable data; the Mamdani pipeline that drives
//! it lives in [`engine`].

pub mod engine;
pub mod rules;

/// A membership degree in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Degree(f64);

impl Degree {
    pub const ZERO: Degree = Degree(0.0);
    pub const ONE: Degree = Degree(1.0);

    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Fuzzy AND (t-norm): minimum.
    pub fn and(self, other: Degree) -> Degree {
        Degree(self.0.min(other.0))
    }

    /// Fuzzy OR (t-conorm): maximum.
    pub fn or(self, other: Degree) -> Degree {
        Degree(self.0.max(other.0))
    }
}

impl From<Degree> for f64 {
    fn from(d: Degree) -> f64 {
        d.0
    }
}

/// A triangular membership function with parameters `a <= b <= c`.
///
/// Membership is 0 outside `[a, c]`, rises linearly to 1 at `b` and falls
/// linearly back to 0 at `c`. Degenerate `a == b` or `b == c` produce
/// one-sided ramps (shoulders) that hold degree 1 at the universe edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trimf {
    a: f64,
    b: f64,
    c: f64,
}

impl Trimf {
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Membership degree of `x`.
    ///
    /// The branch order keeps the degenerate shoulders exact: at `x == b` the
    /// degree is 1 even when one of the ramps has zero width, and a
    /// non-finite `x` falls through every comparison to degree 0.
    pub fn evaluate(&self, x: f64) -> Degree {
        let Trimf { a, b, c } = *self;
        let value = if x < a || x > c {
            0.0
        } else if x < b {
            (x - a) / (b - a)
        } else if x == b {
            1.0
        } else if x < c {
            (c - x) / (c - b)
        } else {
            0.0
        };
        Degree::new(value)
    }
}

/// A named term of a linguistic variable.
#[derive(Debug, Clone, Copy)]
pub struct Term {
    pub label: &'static str,
    pub shape: Trimf,
}

impl Term {
    pub const fn new(label: &'static str, shape: Trimf) -> Self {
        Self { label, shape }
    }
}

/// A linguistic variable: a closed universe and three overlapping terms.
///
/// Each input and output of the stress engine is one of these. The fixed
/// three-term layout keeps the rule base a dense cross-product (see
/// [`rules`]).
#[derive(Debug, Clone, Copy)]
pub struct Variable {
    name: &'static str,
    universe: (f64, f64),
    terms: [Term; 3],
}

impl Variable {
    pub const fn new(name: &'static str, lo: f64, hi: f64, terms: [Term; 3]) -> Self {
        Self {
            name,
            universe: (lo, hi),
            terms,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn universe(&self) -> (f64, f64) {
        self.universe
    }

    pub fn terms(&self) -> &[Term; 3] {
        &self.terms
    }

    /// Saturate a raw input into the universe. Out-of-range values are never
    /// rejected, only clamped.
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.universe.0, self.universe.1)
    }

    /// Membership degrees of an already-clamped value for all three terms.
    pub fn fuzzify(&self, x: f64) -> [Degree; 3] {
        [
            self.terms[0].shape.evaluate(x),
            self.terms[1].shape.evaluate(x),
            self.terms[2].shape.evaluate(x),
        ]
    }
}
