//! Test helpers module
//!
//! This module provides utilities and helpers for testing the participation
//! engine: service setup over both stores, database setup and test data.

#![allow(dead_code, unused_imports)]

pub mod database_helper;
pub mod test_data;

pub use database_helper::*;
pub use test_data::*;
