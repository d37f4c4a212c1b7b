//! Transformation engine.
//!
//! This module is the runtime side of the crate: it takes a validated
//! [`Script`](crate::Script) plus the per-session mutable state and turns one
//! line of user input into one reply.
//!
//! ## How the parts work together
//!
//! ```text
//! script text ── Script::parse ── ScriptBuilder::build ──┐
//!                                 - check references     │
//!                                 - CompiledPattern      │ (pattern.rs)
//!                                 - redirect cycles      │
//!                                                        v
//! input ── preprocess (scan.rs) ── clauses ── rank_keywords
//!                                                │
//!                                                v
//!                          Transformer::run (transform.rs)
//!                            - decompose (first matching pattern)
//!                            - Cursors::select (select.rs)
//!                            - goto chains, bounded
//!                            - memorable replies -> Memory (memory.rs)
//!                                                │
//!                     memory ── xnone ── fixed fallback
//!                                                │
//!                                                v
//!                                     RunResult (trace.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `pattern.rs`: compiles decomposition patterns into anchored regexes and
//!   extracts captured fragments.
//! - `scan.rs`: input normalisation, clause splitting and keyword ranking.
//! - `select.rs`: round-robin reassembly cursors owned by a session.
//! - `memory.rs`: FIFO of deferred replies owned by a session.
//! - `transform.rs`: the ordered fallback strategy that always yields a reply.
//! - `trace.rs`: optional step-by-step record of a run, for debugging.
//!
//! ## Debugging
//!
//! The engine emits `tracing` events at `debug` level for every clause,
//! keyword and decomposition it tries. Run the CLI with `RUST_LOG=eliza=debug`
//! to see them, or use `Session::transform_verbose` to get the same
//! information as data.

#[path = "engine/memory.rs"]
mod memory;
#[path = "engine/pattern.rs"]
mod pattern;
#[path = "engine/scan.rs"]
mod scan;
#[path = "engine/select.rs"]
mod select;
#[path = "engine/trace.rs"]
mod trace;
#[path = "engine/transform.rs"]
mod transform;

pub(crate) use memory::Memory;
pub(crate) use pattern::CompiledPattern;
pub(crate) use select::Cursors;
pub use trace::{Step, Strategy};
pub(crate) use transform::Transformer;
