// IMACX Logistica - app/mod.rs
//
// Application layer: dataset loading, filter controller, output rendering.
// Dependencies: core layer.

pub mod dataset;
pub mod filters;
pub mod render;
