// src/core/mod.rs — Engine core

pub mod controller;
pub mod modes;
pub mod tracker;
pub mod types;

pub use controller::Optimizer;
