//! Integration tests for the hockey and NASA command groups.
//! Everything here goes through the crate's public API, with canned API payloads.

pub mod common;
pub mod integration;
