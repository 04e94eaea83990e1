//! Vesty Bridge library target.
//!
//! Exposes the front-end logic for integration tests. The binary entry
//! point is in `main.rs`.

pub mod commands;
pub mod export;
pub mod render;
pub mod settings;
