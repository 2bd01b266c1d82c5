#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Variables and signed literals.

use core::ops::{Neg, Not};
use std::fmt::{self, Display};

/// A positive SAT variable identifier. Zero is never a valid variable.
pub type Variable = u32;

/// A signed DIMACS literal: `+v` asserts variable `v`, `-v` negates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(i32);

impl Literal {
    /// Builds a literal over `var` with the given polarity (`true` = positive).
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn new(var: Variable, polarity: bool) -> Self {
        debug_assert!(var > 0 && var <= i32::MAX as u32);
        let var = var as i32;
        if polarity { Self(var) } else { Self(-var) }
    }

    /// The literal asserting `var`.
    #[must_use]
    pub const fn positive(var: Variable) -> Self {
        Self::new(var, true)
    }

    /// The literal negating `var`.
    #[must_use]
    pub const fn negative(var: Variable) -> Self {
        Self::new(var, false)
    }

    /// Parses a DIMACS literal; `0` is a terminator, not a literal.
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        if value == 0 || value == i32::MIN {
            None
        } else {
            Some(Self(value))
        }
    }

    /// The variable, without its sign.
    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0.unsigned_abs()
    }

    /// `true` for a positive literal.
    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0.is_positive()
    }

    /// The opposite literal over the same variable.
    #[must_use]
    pub const fn negated(self) -> Self {
        Self(-self.0)
    }

    /// The DIMACS integer.
    #[must_use]
    pub const fn to_i32(self) -> i32 {
        self.0
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
