#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Time-frame expansion of a sequential netlist.
//!
//! For a bound `T` the unrolled formula contains, in this order:
//!
//! 1. the reset constraint `-s@0` for every state register `s`;
//! 2. the gate clauses of frames `0..T`, frame-major, gates in netlist order;
//! 3. for frames `0..T-1` and every binding `s <= n`, the pair
//!    `(-n@t s@t+1) (n@t -s@t+1)` carrying the next-state value into the
//!    following frame.

use crate::bmc::allocator::VariableAllocator;
use crate::bmc::gate;
use crate::cnf::{Clause, Cnf};
use crate::error::{BmcError, Result};
use crate::netlist::Netlist;
use tracing::{debug, trace};

/// Clause counts per section of an encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionCounts {
    /// Unit clauses holding every register low at frame 0.
    pub reset: usize,
    /// Gate clauses over all frames.
    pub gates: usize,
    /// Clauses tying each next-state signal to the register one frame later.
    pub sync: usize,
    /// Unit clauses on the final frame.
    pub target: usize,
}

impl SectionCounts {
    /// Sum of all sections.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.reset + self.gates + self.sync + self.target
    }
}

/// The state of one encoding run after unrolling: the clause accumulator and
/// the allocator that numbered its variables.
#[derive(Debug, Clone)]
pub struct Unrolling {
    pub(crate) cnf: Cnf,
    pub(crate) allocator: VariableAllocator,
    pub(crate) bound: usize,
    pub(crate) counts: SectionCounts,
}

impl Unrolling {
    /// Number of frames `T`.
    #[must_use]
    pub const fn bound(&self) -> usize {
        self.bound
    }

    /// The last frame, `T - 1`.
    #[must_use]
    pub const fn final_frame(&self) -> usize {
        self.bound - 1
    }

    /// Clauses accumulated so far.
    #[must_use]
    pub const fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// The allocator numbering the clauses' variables.
    #[must_use]
    pub const fn allocator(&self) -> &VariableAllocator {
        &self.allocator
    }

    /// Mutable access for adding constraints over further signals.
    pub const fn allocator_mut(&mut self) -> &mut VariableAllocator {
        &mut self.allocator
    }

    /// Clause counts per section so far.
    #[must_use]
    pub const fn counts(&self) -> SectionCounts {
        self.counts
    }

    /// Appends target clauses after the unrolled transition relation.
    pub fn push_target(&mut self, clauses: impl IntoIterator<Item = Clause>) {
        let before = self.cnf.len();
        self.cnf.extend(clauses);
        self.counts.target += self.cnf.len() - before;
    }

    /// Fixes the header's variable count and hands back the formula together
    /// with the allocator needed to decode a model.
    #[must_use]
    pub fn finish(mut self) -> (Cnf, VariableAllocator, SectionCounts) {
        self.cnf.set_num_vars(self.allocator.len());
        (self.cnf, self.allocator, self.counts)
    }
}

/// Unrolls `netlist` over `bound` frames into a fresh formula and allocator.
///
/// # Errors
///
/// [`BmcError::InvalidBound`] if `bound` is zero.
pub fn unroll(netlist: &Netlist, bound: usize) -> Result<Unrolling> {
    if bound < 1 {
        return Err(BmcError::InvalidBound(bound));
    }
    debug!(
        module = netlist.name(),
        bound,
        gates = netlist.gates().len(),
        registers = netlist.registers().len(),
        "unrolling"
    );

    let mut allocator = VariableAllocator::new();
    let mut cnf = Cnf::new();
    let mut counts = SectionCounts::default();

    for state in netlist.state_registers() {
        cnf.push(Clause::unit(allocator.literal(state, 0, false)));
        counts.reset += 1;
    }

    for frame in 0..bound {
        for g in netlist.gates() {
            let clauses = gate::encode(g, frame, &mut allocator);
            counts.gates += clauses.len();
            cnf.extend(clauses);
        }
        trace!(frame, clauses = cnf.len(), "frame encoded");
    }

    for frame in 0..bound - 1 {
        for register in netlist.registers() {
            let next = allocator.literal(register.next, frame, true);
            let state = allocator.literal(register.state, frame + 1, true);
            cnf.add_clause([-next, state]);
            cnf.add_clause([next, -state]);
            counts.sync += 2;
        }
    }

    debug!(
        variables = allocator.len(),
        clauses = cnf.len(),
        "unrolled transition relation"
    );
    Ok(Unrolling {
        cnf,
        allocator,
        bound,
        counts,
    })
}
