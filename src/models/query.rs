// src/models/query.rs

//! Search query construction and validation.
//!
//! A [`SearchQuery`] is the immutable filter set for one scan. Invalid filter
//! combinations are rejected here, before any network call is made.

use url::Url;

use crate::error::{AppError, Result};
use crate::models::animal::{AnimalType, Availability, Distance, SortOrder};

/// Shelter site searched when neither a site nor a location is given.
pub const DEFAULT_SITE: &str = "deKuipershoek";

/// Where to search: a specific shelter site, or a postal area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    /// Shelter site code, e.g. `deKuipershoek`.
    Site(String),
    /// Postal code search, optionally bounded by distance.
    Location {
        postcode: String,
        distance: Option<Distance>,
    },
}

/// Immutable filter set for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub animal_type: AnimalType,
    pub availability: Availability,
    pub order: SortOrder,
    pub target: SearchTarget,
}

impl SearchQuery {
    /// Build a query from user-facing filter options.
    ///
    /// `site` and `location` are mutually exclusive; `distance` is only
    /// meaningful with `location`. Neither given defaults to [`DEFAULT_SITE`].
    pub fn build(
        animal_type: AnimalType,
        site: Option<String>,
        location: Option<String>,
        distance: Option<Distance>,
        availability: Availability,
        order: SortOrder,
    ) -> Result<Self> {
        if site.is_some() && location.is_some() {
            return Err(AppError::config(
                "site and location are mutually exclusive, use one or the other",
            ));
        }
        if distance.is_some() && location.is_none() {
            return Err(AppError::config(
                "distance can only be used with a location search",
            ));
        }

        let target = match (site, location) {
            (_, Some(postcode)) => SearchTarget::Location { postcode, distance },
            (Some(site), None) => SearchTarget::Site(site),
            (None, None) => SearchTarget::Site(DEFAULT_SITE.to_string()),
        };

        Ok(Self {
            animal_type,
            availability,
            order,
            target,
        })
    }

    /// Query with default availability and order for the given site filters.
    pub fn for_site(animal_type: AnimalType, site: impl Into<String>) -> Self {
        Self {
            animal_type,
            availability: Availability::Available,
            order: SortOrder::Aflopend,
            target: SearchTarget::Site(site.into()),
        }
    }

    /// The site code, when this is a site-based search.
    pub fn site(&self) -> Option<&str> {
        match &self.target {
            SearchTarget::Site(site) => Some(site),
            SearchTarget::Location { .. } => None,
        }
    }

    /// Search URL for the given 1-based result page.
    ///
    /// The `page` parameter is omitted for page 1, matching the site's own
    /// pagination links.
    pub fn page_url(&self, page: u32) -> Result<Url> {
        let mut url = Url::parse(&self.animal_type.base_url())?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("animalAvailability", self.availability.as_param());
            pairs.append_pair("volgorde", self.order.as_param());

            match &self.target {
                SearchTarget::Site(site) => {
                    pairs.append_pair("site", site);
                }
                SearchTarget::Location { postcode, distance } => {
                    pairs.append_pair("location", postcode);
                    if let Some(distance) = distance {
                        pairs.append_pair("distance", distance.as_param());
                    }
                }
            }

            if page > 1 {
                pairs.append_pair("page", &page.to_string());
            }
        }

        Ok(url)
    }

    /// Stable key under which this query's seen ids are persisted.
    ///
    /// Format: `animal_type={slug}|site={target}|availability={value}`, where
    /// a location target is encoded as `location:{postcode}[:{distance}]`.
    pub fn store_key(&self) -> String {
        let target = match &self.target {
            SearchTarget::Site(site) => site.clone(),
            SearchTarget::Location { postcode, distance } => match distance {
                Some(d) => format!("location:{}:{}", postcode, d.as_param()),
                None => format!("location:{}", postcode),
            },
        };
        format!(
            "animal_type={}|site={}|availability={}",
            self.animal_type.slug(),
            target,
            self.availability.as_param()
        )
    }

    /// Human-readable filter summary for log messages.
    pub fn describe(&self) -> String {
        let target = match &self.target {
            SearchTarget::Site(site) => format!("site={}", site),
            SearchTarget::Location { postcode, distance } => match distance {
                Some(d) => format!("location={} within {}", postcode, d.as_param()),
                None => format!("location={}", postcode),
            },
        };
        format!(
            "{} at {}, availability={}",
            self.animal_type.english(),
            target,
            self.availability.as_param()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_and_location_are_mutually_exclusive() {
        let err = SearchQuery::build(
            AnimalType::Katten,
            Some("deKuipershoek".into()),
            Some("7323PM".into()),
            None,
            Availability::Available,
            SortOrder::Aflopend,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_distance_requires_location() {
        let err = SearchQuery::build(
            AnimalType::Katten,
            Some("deKuipershoek".into()),
            None,
            Some(Distance::Km10),
            Availability::Available,
            SortOrder::Aflopend,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_defaults_to_site() {
        let query = SearchQuery::build(
            AnimalType::Honden,
            None,
            None,
            None,
            Availability::Available,
            SortOrder::Aflopend,
        )
        .unwrap();
        assert_eq!(query.site(), Some(DEFAULT_SITE));
    }

    #[test]
    fn test_page_url_first_page_has_no_page_param() {
        let query = SearchQuery::for_site(AnimalType::Katten, "deKuipershoek");
        let url = query.page_url(1).unwrap();
        assert_eq!(
            url.as_str(),
            "https://ikzoekbaas.dierenbescherming.nl/zoek-asieldieren/katten\
             ?animalAvailability=available&volgorde=aflopend&site=deKuipershoek"
        );
    }

    #[test]
    fn test_page_url_later_pages_carry_page_param() {
        let query = SearchQuery::for_site(AnimalType::Katten, "deKuipershoek");
        let url = query.page_url(3).unwrap();
        assert!(url.query().unwrap().contains("page=3"));
    }

    #[test]
    fn test_page_url_location_with_distance() {
        let query = SearchQuery::build(
            AnimalType::Vogels,
            None,
            Some("7323PM".into()),
            Some(Distance::Km25),
            Availability::Reserved,
            SortOrder::Oplopend,
        )
        .unwrap();
        let url = query.page_url(1).unwrap();
        let q = url.query().unwrap();
        assert!(q.contains("location=7323PM"));
        assert!(q.contains("distance=25km"));
        assert!(q.contains("animalAvailability=reserved"));
        assert!(q.contains("volgorde=oplopend"));
        assert!(!q.contains("site="));
    }

    #[test]
    fn test_store_key_site() {
        let query = SearchQuery::for_site(AnimalType::Katten, "deKuipershoek");
        assert_eq!(
            query.store_key(),
            "animal_type=katten|site=deKuipershoek|availability=available"
        );
    }

    #[test]
    fn test_store_key_location() {
        let query = SearchQuery::build(
            AnimalType::Katten,
            None,
            Some("7323PM".into()),
            Some(Distance::Km10),
            Availability::Available,
            SortOrder::Aflopend,
        )
        .unwrap();
        assert_eq!(
            query.store_key(),
            "animal_type=katten|site=location:7323PM:10km|availability=available"
        );
    }
}
