// src/services/mod.rs

//! Scraping services: record extraction and pagination.

pub mod extract;
pub mod pager;

pub use extract::extract_records;
pub use pager::{HttpFetcher, PageFetcher, Pager};
