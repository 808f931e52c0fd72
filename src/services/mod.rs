// src/services/mod.rs
pub mod adapter;
pub mod cache;
pub mod calculator;
pub mod cancel;
pub mod fetch;
pub mod rankings;
pub mod store;
pub mod upstream;
