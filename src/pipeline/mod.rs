//! Pipeline stages for turning a résumé PDF into a compliment.
//!
//! Each submodule implements one step and is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ assemble ──┬──▶ name
//! (bytes)   (pdfium)    (one text) └──▶ generate
//! ```
//!
//! 1. [`input`]   : drain the byte source; intake checks for front ends
//! 2. [`engine`]  : locate and bind the pdfium library once per process
//! 3. [`extract`] : per-page text; runs in `spawn_blocking` because pdfium
//!    is not async-safe
//! 4. [`assemble`]: join pages into the document text
//! 5. [`name`]    : first-name heuristics, pure
//! 6. [`generate`]: the compliment backend; the only stage with network I/O

pub mod assemble;
pub mod engine;
pub mod extract;
pub mod generate;
pub mod input;
pub mod name;
