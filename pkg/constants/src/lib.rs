//! Centralized constants for the kheat project.
//!
//! Allow-lists, prefixes, display markers, and defaults live here so a
//! policy change touches one file and no aggregation code.

pub mod network;
pub mod paths;
pub mod resources;
