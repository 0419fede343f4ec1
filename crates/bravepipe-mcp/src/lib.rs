//! `bravepipe` crate (library surface).
//!
//! The primary entrypoint for end users is the `bravepipe` binary (CLI + MCP
//! stdio server). This library module exists to support embedding and to
//! provide a stable way to reuse core types without depending on internal
//! crate layout.

pub use bravepipe_core as core;
