//! iriscan - A TUI for AI-assisted eye-scan health screening
//!
//! Six-phase flow: Splash → Auth → Dashboard → Scanning → Analyzing →
//! Results, driven by a single controller that owns all session state.
//! The binary entry point is in main.rs.

pub mod analysis;
pub mod app;
pub mod camera;
pub mod config;
pub mod image;
pub mod input;
pub mod profile;
pub mod report;
pub mod theme;
pub mod ui;
