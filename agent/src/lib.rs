//! Labeled-output toolkit for an LLM agent.
//!
//! The model is asked to label its reply (`PENSAMENTO:` / `RESPOSTA:`, or
//! `PLANEJAMENTO:` / `RACIONAL:` / `RESPOSTA FINAL:`). This crate splits
//! that reply and re-emits it for display:
//!
//! - **[`core`]**: Pure, deterministic logic (segmentation, rendering, prefix
//!   cleanup, date line). No I/O, fully testable in isolation.
//! - **[`callbacks`]** / **[`split_agent`]**: the two call sites that feed
//!   model responses through the core.
//! - **[`definitions`]** / **[`tools`]**: agent and tool declarations handed to
//!   the framework, backed by the `skills` crate.

pub mod callbacks;
pub mod config;
pub mod core;
pub mod definitions;
pub mod exit_codes;
pub mod logging;
pub mod response;
pub mod split_agent;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tools;
