#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! DIMACS CNF output.
//!
//! The format is a header `p cnf <variables> <clauses>` followed by one line
//! per clause: space-separated signed literals terminated by `0`. Every line,
//! including the last, ends in `\n`. No comment lines are emitted, so the
//! output for a given formula is byte-for-byte reproducible.

use crate::cnf::clause::Clause;
use crate::cnf::formula::Cnf;
use crate::error::{BmcError, Result};
use std::fmt::Write as _;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Renders a clause list as DIMACS text.
#[must_use]
pub fn serialize(num_vars: u32, clauses: &[Clause]) -> String {
    let mut out = String::with_capacity(16 + clauses.len() * 12);
    // writing into a String cannot fail
    let _ = writeln!(out, "p cnf {num_vars} {}", clauses.len());
    for clause in clauses {
        for literal in clause {
            let _ = write!(out, "{literal} ");
        }
        out.push_str("0\n");
    }
    out
}

/// Streams `cnf` as DIMACS into `writer`.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_dimacs<W: Write>(cnf: &Cnf, writer: W) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    writeln!(writer, "p cnf {} {}", cnf.num_vars(), cnf.len())?;
    for clause in cnf.clauses() {
        for literal in clause {
            write!(writer, "{literal} ")?;
        }
        writer.write_all(b"0\n")?;
    }
    writer.flush()
}

/// Writes `cnf` to a DIMACS file, replacing any existing file.
///
/// # Errors
///
/// [`BmcError::Io`] if the file cannot be created or written.
pub fn write_file(cnf: &Cnf, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| BmcError::io(path, e))?;
    write_dimacs(cnf, file).map_err(|e| BmcError::io(path, e))
}
