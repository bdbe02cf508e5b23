//! Golden-output fixture regeneration for an external vulnerability scanner.
//!
//! Each fixture input named `<digits>-<tag>` is scanned as `<tag>:<path>`;
//! the scanner's stdout, with volatile database stats masked, becomes the
//! sibling `<name>.out.txt` golden file. The architecture keeps:
//!
//! - **[`core`]**: Pure, deterministic logic (tag extraction, normalization,
//!   golden matching). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (directory listing, scanner
//!   processes, fixture files, config).
//!
//! Orchestration modules ([`regenerate`], [`verify`]) coordinate core logic
//! with I/O to implement CLI commands.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod regenerate;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod verify;
