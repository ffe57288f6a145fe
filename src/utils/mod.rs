//! This module aggregates various utility submodules used throughout the application.

/// Environment-driven settings (API keys, endpoints, cache locations).
pub mod config;
/// Key-value settings store backed by SQLite.
pub mod database;
/// Small text helpers shared by the embed renderers.
pub mod formatting;
/// Button-driven paginated embed menus.
pub mod menu;
