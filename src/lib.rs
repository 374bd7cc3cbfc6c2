// src/lib.rs — Library root for Strategos

pub mod cli;
pub mod engine;
pub mod infra;
pub mod provider;
