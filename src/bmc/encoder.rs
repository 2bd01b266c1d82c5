#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! One complete encoding run: validate inputs, unroll, constrain the target.

use crate::bmc::allocator::VariableAllocator;
use crate::bmc::target::{Target, constrain_target};
use crate::bmc::trace::Trace;
use crate::bmc::unroll::{SectionCounts, unroll};
use crate::cnf::{Assignment, Cnf};
use crate::error::{BmcError, Result};
use crate::netlist::{Netlist, SignalId};
use itertools::Itertools;
use std::fmt::Write as _;
use tracing::info;

/// The result of encoding "can `target` be reached in `bound` frames from reset".
#[derive(Debug, Clone)]
pub struct Encoding {
    cnf: Cnf,
    allocator: VariableAllocator,
    bound: usize,
    counts: SectionCounts,
}

/// Encodes a bounded reachability query for `netlist`.
///
/// The formula is satisfiable exactly when some input sequence drives the
/// registers from all-zero at frame 0 to `target` at frame `bound - 1`.
/// All inputs are checked before any clause is produced.
///
/// # Errors
///
/// [`BmcError::InvalidBound`] for `bound == 0`, and the target errors of
/// [`Target::resolve`].
pub fn encode(netlist: &Netlist, bound: usize, target: &Target) -> Result<Encoding> {
    if bound < 1 {
        return Err(BmcError::InvalidBound(bound));
    }
    let resolved = target.resolve(netlist)?;
    let (registers, bits): (Vec<SignalId>, Vec<bool>) = resolved.into_iter().unzip();

    let mut unrolling = unroll(netlist, bound)?;
    let final_frame = unrolling.final_frame();
    let target_clauses =
        constrain_target(&bits, &registers, final_frame, unrolling.allocator_mut())?;
    unrolling.push_target(target_clauses);

    let (cnf, allocator, counts) = unrolling.finish();
    info!(
        module = netlist.name(),
        bound,
        target = %target,
        variables = cnf.num_vars(),
        clauses = cnf.len(),
        "encoded bounded reachability query"
    );
    Ok(Encoding {
        cnf,
        allocator,
        bound,
        counts,
    })
}

impl Encoding {
    /// The complete formula: reset, gates, synchronization, target.
    #[must_use]
    pub const fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// The allocator that numbered the formula's variables.
    #[must_use]
    pub const fn allocator(&self) -> &VariableAllocator {
        &self.allocator
    }

    /// Number of frames `T` the netlist was unrolled over.
    #[must_use]
    pub const fn bound(&self) -> usize {
        self.bound
    }

    /// Clause counts per section.
    #[must_use]
    pub const fn counts(&self) -> SectionCounts {
        self.counts
    }

    /// The DIMACS text handed to a solver.
    #[must_use]
    pub fn to_dimacs(&self) -> String {
        self.cnf.to_string()
    }

    /// One `<id> <signal> <frame>` line per variable, in id order, for
    /// reading solver models by hand.
    #[must_use]
    pub fn variable_map(&self, netlist: &Netlist) -> String {
        self.allocator
            .iter()
            .fold(String::new(), |mut out, (id, key)| {
                let _ = writeln!(out, "{id} {} {}", netlist.name_of(key.signal), key.frame);
                out
            })
    }

    /// Decodes a satisfying assignment into a per-frame trace.
    #[must_use]
    pub fn decode(&self, netlist: &Netlist, model: &Assignment) -> Trace {
        Trace::from_model(netlist, &self.allocator, model, self.bound)
    }

    /// The variables of `signal` over all frames, `None` where never allocated.
    #[must_use]
    pub fn variables_of(&self, signal: SignalId) -> Vec<Option<u32>> {
        (0..self.bound)
            .map(|t| self.allocator.get(signal, t))
            .collect_vec()
    }
}
