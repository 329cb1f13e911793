//! Riskpanel - project risks and issues over a REST backend.
//!
//! This crate provides both a CLI application and a library: the [`panel`]
//! state machine that lists, creates and re-statuses records, the [`api`]
//! client it talks through, and the text/JSON [`output`] used by the binary.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod panel;

// Public CLI module (needed by binary)
pub mod cli;

// Rendering
pub mod output;
