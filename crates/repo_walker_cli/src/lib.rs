//! repo-walker CLI library exports.
//!
//! The binary is a thin layer over these modules so they can be tested
//! without spawning a process.

pub mod commands;
pub mod config;
pub mod errors;
