// src/core/mod.rs

pub mod aggregate;
pub mod dictionary;
pub mod engine;
pub mod profile;
pub mod scorers;
pub mod types;
