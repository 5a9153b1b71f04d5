// src/lib.rs — Library root for burnish

pub mod cli;
pub mod core;
pub mod evaluator;
pub mod infra;
pub mod rewrite;
pub mod strategy;
