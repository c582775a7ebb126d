// IMACX Logistica - lib.rs
//
// Library entry point, exposing all modules for integration testing and
// embedding in other front ends. The CLI lives in `main.rs`.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
