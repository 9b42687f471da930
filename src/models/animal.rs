// src/models/animal.rs

//! Core domain types: animal categories, availability and listed records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Search endpoint root on ikzoekbaas.
pub const SEARCH_BASE: &str = "https://ikzoekbaas.dierenbescherming.nl/zoek-asieldieren";

/// Animal categories listed on ikzoekbaas, named by their Dutch URL slugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimalType {
    Katten,
    Honden,
    Vogels,
    KonijnenEnKnagers,
}

impl AnimalType {
    /// All supported categories, in site order.
    pub const ALL: [AnimalType; 4] = [
        AnimalType::Katten,
        AnimalType::Honden,
        AnimalType::Vogels,
        AnimalType::KonijnenEnKnagers,
    ];

    /// URL path slug as used by the site.
    pub fn slug(&self) -> &'static str {
        match self {
            AnimalType::Katten => "katten",
            AnimalType::Honden => "honden",
            AnimalType::Vogels => "vogels",
            AnimalType::KonijnenEnKnagers => "konijnen-en-knagers",
        }
    }

    /// English display label.
    pub fn english(&self) -> &'static str {
        match self {
            AnimalType::Katten => "cats",
            AnimalType::Honden => "dogs",
            AnimalType::Vogels => "birds",
            AnimalType::KonijnenEnKnagers => "rabbits-and-rodents",
        }
    }

    /// Emoji used in notification titles.
    pub fn emoji(&self) -> &'static str {
        match self {
            AnimalType::Katten => "🐱",
            AnimalType::Honden => "🐶",
            AnimalType::Vogels => "🐦",
            AnimalType::KonijnenEnKnagers => "🐰",
        }
    }

    /// Search results base URL for this category.
    pub fn base_url(&self) -> String {
        format!("{}/{}", SEARCH_BASE, self.slug())
    }

    /// Detail page path fragment; profile URLs contain
    /// `/asieldier/{slug}/{id}-{name-slug}`.
    pub fn detail_fragment(&self) -> String {
        format!("/asieldier/{}/", self.slug())
    }
}

impl fmt::Display for AnimalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for AnimalType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimalType::ALL
            .into_iter()
            .find(|t| t.slug() == s)
            .ok_or_else(|| {
                AppError::config(format!(
                    "invalid animal type '{}', expected one of: katten, honden, vogels, konijnen-en-knagers",
                    s
                ))
            })
    }
}

/// Availability filter values accepted by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Reserved,
    Unavailable,
}

impl Availability {
    /// Query parameter value (`animalAvailability`).
    pub fn as_param(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Reserved => "reserved",
            Availability::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for Availability {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Availability::Available),
            "reserved" => Ok(Availability::Reserved),
            "unavailable" => Ok(Availability::Unavailable),
            other => Err(AppError::config(format!(
                "invalid availability '{}', expected available, reserved or unavailable",
                other
            ))),
        }
    }
}

/// Sort order (`volgorde`): descending or ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Aflopend,
    Oplopend,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Aflopend => "aflopend",
            SortOrder::Oplopend => "oplopend",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aflopend" => Ok(SortOrder::Aflopend),
            "oplopend" => Ok(SortOrder::Oplopend),
            other => Err(AppError::config(format!(
                "invalid sort order '{}', expected aflopend or oplopend",
                other
            ))),
        }
    }
}

/// Distance filter for location-based searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
    Km10,
    Km25,
    Km50,
}

impl Distance {
    pub fn as_param(&self) -> &'static str {
        match self {
            Distance::Km10 => "10km",
            Distance::Km25 => "25km",
            Distance::Km50 => "50km",
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for Distance {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "10km" => Ok(Distance::Km10),
            "25km" => Ok(Distance::Km25),
            "50km" => Ok(Distance::Km50),
            other => Err(AppError::config(format!(
                "invalid distance '{}', expected 10km, 25km or 50km",
                other
            ))),
        }
    }
}

/// One listed animal at a point in time.
///
/// `id` is derived from the profile URL path segment and is the sole dedup
/// key: two records with the same id are the same animal even when name or
/// availability drift between scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalRecord {
    pub id: u64,
    pub name: String,
    pub animal_type: AnimalType,
    /// Shelter site code; absent when searching by location across sites.
    pub site: Option<String>,
    /// Place name parsed from the listing card, best-effort.
    pub location: Option<String>,
    pub availability: Availability,
    pub photo_url: Option<String>,
    pub profile_url: String,
}
