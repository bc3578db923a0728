//! Platform glue
//!
//! Browser hosting: canvas mounting, keyboard and click listeners, the
//! animation-frame loop and the text overlay. Native builds run headless
//! and need none of it.

#[cfg(target_arch = "wasm32")]
pub mod web;
