// src/models/mod.rs

//! Data models for the shelter monitor.

pub mod animal;
pub mod config;
pub mod query;

pub use animal::{AnimalRecord, AnimalType, Availability, Distance, SortOrder};
pub use config::{Config, ScraperConfig};
pub use query::{DEFAULT_SITE, SearchQuery, SearchTarget};
