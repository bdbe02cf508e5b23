//! Deterministic, pure logic shared by the regeneration pipelines.
//!
//! Core modules must be free of I/O side effects. They operate on filenames
//! and captured scanner text and return deterministic outputs suitable for tests.

pub mod golden;
pub mod normalize;
pub mod tag;
