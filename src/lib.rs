// src/lib.rs

//! Dierenasiel Alert Library

pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod services;
pub mod storage;
pub mod utils;
