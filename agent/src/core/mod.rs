//! Deterministic, pure logic for labeled model output.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! strings and return deterministic outputs suitable for tests.

pub mod date;
pub mod prefix;
pub mod render;
pub mod segmenter;
pub mod types;
