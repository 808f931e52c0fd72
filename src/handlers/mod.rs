// src/handlers/mod.rs
pub mod calculator;
pub mod cpi;
pub mod error;
pub mod historical;
pub mod rankings;
