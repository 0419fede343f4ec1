//! The tool surface: registry + validation, orchestration handlers, the
//! dispatch handler, and the rmcp stdio adapter.
//!
//! Layering mirrors the call path: `server` (transport adapter) ->
//! `dispatch` (name routing + error text) -> `tools` (validation) ->
//! `handlers` (business logic) -> `bravepipe_core::SearchApi`.

pub(crate) mod dispatch;
pub(crate) mod handlers;
pub(crate) mod server;
pub(crate) mod tools;

#[cfg(test)]
pub(crate) mod testutil;
