//! ClipKeep: clipboard history capture engine.
//!
//! The engine itself lives in the `ck-*` crates; this crate loads
//! configuration, initializes tracing and wires the adapters together.

pub mod bootstrap;
