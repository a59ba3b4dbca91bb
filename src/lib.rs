//! Benchmark chart viewer for oblivious-transfer-extension protocols.
//!
//! - [`protocol`] - the fixed set of measured protocols and their files
//! - [`data`] - measurement file parsing, tables and derived series
//! - [`chart`] - rendering requests and the plotting-surface trait
//! - [`export`] - CSV / JSON surfaces
//! - [`app`], [`state`], [`ui`], [`color`] - the egui viewer

pub mod app;
pub mod chart;
pub mod color;
pub mod data;
pub mod export;
pub mod protocol;
pub mod state;
pub mod ui;
