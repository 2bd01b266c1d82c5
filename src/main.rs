//! # netlist-bmc
//!
//! Command-line front-end for bounded model checking of gate-level netlists.
//! A structural Verilog netlist is unrolled over a number of time frames into
//! a DIMACS CNF formula that is satisfiable exactly when the requested
//! register state is reachable from the all-zero reset state.
//!
//! ## Usage
//!
//! ```sh
//! # Write the formula to stdout, one target bit per register in declaration order
//! netlist-bmc encode counter.v --bound 4 --target 11
//!
//! # Name the registers instead, and keep a variable map for reading models
//! netlist-bmc encode counter.v -b 4 -a q0=1 -a q1=1 -o counter.cnf --var-map counter.map
//!
//! # Hand the formula to an external solver and print the witness trace
//! netlist-bmc check counter.v -b 4 -t 11 --solver kissat --print-trace
//!
//! # Shell completions
//! netlist-bmc completions zsh
//! ```
//!
//! ## Common Options
//!
//! -   `-d, --debug`: debug logging on stderr (`RUST_LOG` takes precedence).
//! -   `-s, --stats`: problem and encoding statistics, including jemalloc
//!     memory usage, on stderr.
//!
//! `check` exits with 10 when the target is reachable within the bound and
//! 20 when it is not; an unreachable verdict says nothing about longer traces.

use crate::command_line::cli::{Cli, Commands, run_check, run_encode};
use clap::{CommandFactory, Parser};
use netlist_bmc::solver::SolverCommand;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod command_line;

/// Global allocator using `tikv-jemallocator`, which also backs the memory
/// figures in `--stats`.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.command.common().is_some_and(|c| c.debug));

    let result = match cli.command {
        Commands::Encode {
            netlist,
            query,
            output,
            var_map,
            common,
        } => run_encode(
            &netlist,
            &query,
            output.as_deref(),
            var_map.as_deref(),
            &common,
        ),
        Commands::Check {
            netlist,
            query,
            solver,
            solver_args,
            output,
            print_trace,
            common,
        } => run_check(
            &netlist,
            &query,
            SolverCommand::new(solver).with_args(solver_args),
            output.as_deref(),
            print_trace,
            &common,
        ),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "netlist-bmc",
                &mut std::io::stdout(),
            );
            Ok(ExitCode::SUCCESS)
        }
    };

    result.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        ExitCode::FAILURE
    })
}
