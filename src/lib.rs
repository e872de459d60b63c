//! choropleth-rs
//! =============
//!
//! Umbrella crate for the workspace. The map core lives in
//! [`choropleth-core`](choropleth_core); the browser bindings live in
//! `choropleth-wasm`. This crate re-exports the core so the demos under
//! `demos/` can be run from the workspace root:
//!
//! ```text
//! cargo run --example headless_walkthrough
//! ```
pub use choropleth_core::*;
