// IMACX Logistica - core/mod.rs
//
// Core business logic layer: data model, filtering, sorting, debouncing.
// Must NOT depend on: app, platform, or any I/O.

pub mod debounce;
pub mod filter;
pub mod memo;
pub mod model;
pub mod sort;
