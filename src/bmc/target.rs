#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The state vector the final frame must reach.
//!
//! A target is given either positionally, one bit per state register in the
//! netlist's *declaration order* (`reg s1, s0;` makes `"10"` mean `s1 = 1,
//! s0 = 0`), or by name (`s0=0 s1=1`), which is immune to ordering mistakes.
//! Both forms must cover every register exactly once.

use crate::bmc::allocator::VariableAllocator;
use crate::cnf::Clause;
use crate::error::{BmcError, Result};
use crate::netlist::{Netlist, SignalId, SignalKind};
use rustc_hash::FxHashSet;
use std::fmt::{self, Display};
use std::str::FromStr;

/// A requested final state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// One bit per state register, in declaration order.
    Bits(Vec<bool>),
    /// Explicit `register = value` pairs, in any order.
    Named(Vec<(String, bool)>),
}

impl Target {
    /// Parses a bit string such as `"0110"`. Whitespace and `_` separators
    /// are ignored.
    ///
    /// # Errors
    ///
    /// [`BmcError::InvalidTargetBit`] on any other character.
    pub fn from_bits(bits: &str) -> Result<Self> {
        bits.chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(BmcError::InvalidTargetBit(other)),
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::Bits)
    }

    /// Parses `name=0|1` assignments.
    ///
    /// # Errors
    ///
    /// [`BmcError::InvalidTargetBit`] if a value is not `0`/`1` or an entry
    /// has no `=`.
    pub fn from_assignments<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        entries
            .iter()
            .map(|entry| {
                let entry = entry.as_ref();
                let (name, value) = entry
                    .split_once('=')
                    .ok_or(BmcError::InvalidTargetBit('='))?;
                let value = match value.trim() {
                    "0" | "false" => false,
                    "1" | "true" => true,
                    other => {
                        return Err(BmcError::InvalidTargetBit(
                            other.chars().next().unwrap_or('='),
                        ));
                    }
                };
                Ok((name.trim().to_string(), value))
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::Named)
    }

    /// Matches the target against the netlist's state registers, returning
    /// `(register, value)` pairs in declaration order.
    ///
    /// # Errors
    ///
    /// [`BmcError::TargetArityMismatch`] if not every register is covered
    /// exactly once, [`BmcError::UnknownTargetSignal`] or
    /// [`BmcError::DuplicateTargetSignal`] for bad names.
    pub fn resolve(&self, netlist: &Netlist) -> Result<Vec<(SignalId, bool)>> {
        let registers: Vec<SignalId> = netlist.state_registers().collect();
        match self {
            Self::Bits(bits) => {
                check_arity(bits.len(), registers.len())?;
                Ok(registers.into_iter().zip(bits.iter().copied()).collect())
            }
            Self::Named(pairs) => {
                let mut seen = FxHashSet::default();
                let mut values = vec![None; registers.len()];
                for (name, value) in pairs {
                    let id = netlist
                        .signal_id(name)
                        .filter(|_| netlist.kind_of(name) == Some(SignalKind::StateRegister))
                        .ok_or_else(|| BmcError::UnknownTargetSignal(name.clone()))?;
                    if !seen.insert(id) {
                        return Err(BmcError::DuplicateTargetSignal(name.clone()));
                    }
                    if let Some(slot) = registers.iter().position(|&r| r == id) {
                        values[slot] = Some(*value);
                    }
                }
                check_arity(seen.len(), registers.len())?;
                Ok(registers
                    .into_iter()
                    .zip(values)
                    .filter_map(|(id, value)| value.map(|v| (id, v)))
                    .collect())
            }
        }
    }
}

impl FromStr for Target {
    type Err = BmcError;

    /// Bit strings parse positionally; anything containing `=` parses as
    /// comma- or space-separated named assignments.
    fn from_str(s: &str) -> Result<Self> {
        if s.contains('=') {
            let entries: Vec<&str> = s
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|e| !e.is_empty())
                .collect();
            Self::from_assignments(&entries)
        } else {
            Self::from_bits(s)
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bits(bits) => bits
                .iter()
                .try_for_each(|&b| f.write_str(if b { "1" } else { "0" })),
            Self::Named(pairs) => {
                for (i, (name, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{name}={}", u8::from(*value))?;
                }
                Ok(())
            }
        }
    }
}

fn check_arity(actual: usize, expected: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(BmcError::TargetArityMismatch { expected, actual })
    }
}

/// Emits one unit clause per `(register, bit)` pair fixing the register's
/// value at `final_frame`. `bits` is matched positionally against
/// `registers`, which callers take from [`Netlist::state_registers`].
///
/// # Errors
///
/// [`BmcError::TargetArityMismatch`] if the lengths differ.
pub fn constrain_target(
    bits: &[bool],
    registers: &[SignalId],
    final_frame: usize,
    allocator: &mut VariableAllocator,
) -> Result<Vec<Clause>> {
    check_arity(bits.len(), registers.len())?;
    Ok(registers
        .iter()
        .zip(bits)
        .map(|(&register, &bit)| Clause::unit(allocator.literal(register, final_frame, bit)))
        .collect())
}
