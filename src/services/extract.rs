// src/services/extract.rs

//! Record extraction from search result pages.
//!
//! Pure function from raw markup to a possibly-empty record sequence. The
//! site's markup is unversioned and unstable, so every card is parsed
//! best-effort: a malformed card is skipped and extraction continues, and a
//! page yielding zero records is a valid result (it signals pagination
//! exhaustion to the pager).

use std::collections::HashSet;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{AnimalRecord, SearchQuery};
use crate::utils::{name_from_slug, resolve_url};

/// Structural marker for one animal card in the current markup.
const CARD_SELECTOR: &str = "article[data-v-2f76df55]";
const LINK_SELECTOR: &str = "a[href]";
const LOCATION_SELECTOR: &str = "div.flex.items-center";
const PHOTO_SELECTOR: &str = "picture img";

/// Parse one result page into an ordered sequence of records.
///
/// Records keep document order. Duplicate ids within a page are dropped
/// (first occurrence wins). Cards without a usable profile link or numeric
/// id are logged and skipped.
pub fn extract_records(html: &str, query: &SearchQuery) -> Result<Vec<AnimalRecord>> {
    let document = Html::parse_document(html);

    let card_sel = parse_selector(CARD_SELECTOR)?;
    let link_sel = parse_selector(LINK_SELECTOR)?;
    let location_sel = parse_selector(LOCATION_SELECTOR)?;
    let photo_sel = parse_selector(PHOTO_SELECTOR)?;

    let base = Url::parse(&query.animal_type.base_url())?;
    // Profile URLs look like /asieldier/{slug}/{id}-{name-slug}
    let id_re = Regex::new(&format!(
        r"(?i)/asieldier/{}/(\d+)-([a-z0-9\-]+)",
        regex::escape(query.animal_type.slug())
    ))
    .map_err(|e| AppError::scrape("extract", e))?;

    let mut seen_ids = HashSet::new();
    let mut records = Vec::new();

    for card in document.select(&card_sel) {
        let Some(href) = card
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            log::debug!("Skipping card without profile link");
            continue;
        };

        let profile_url = resolve_url(&base, href);
        let Some(caps) = id_re.captures(&profile_url) else {
            log::debug!("Skipping card with unrecognized link: {}", profile_url);
            continue;
        };

        let id: u64 = match caps[1].parse() {
            Ok(id) => id,
            Err(e) => {
                // Cannot dedup a record without a numeric id.
                log::warn!("Skipping card with unparsable id in {}: {}", profile_url, e);
                continue;
            }
        };

        if !seen_ids.insert(id) {
            continue;
        }

        let name = name_from_slug(&caps[2]);
        let location = card
            .select(&location_sel)
            .map(|div| div.text().collect::<String>().trim().to_string())
            .find(|text| {
                !text.is_empty() && !text.contains('•') && !text.chars().any(|c| c.is_ascii_digit())
            });
        let photo_url = card
            .select(&photo_sel)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(|src| resolve_url(&base, src));

        records.push(AnimalRecord {
            id,
            name,
            animal_type: query.animal_type,
            site: query.site().map(str::to_string),
            location,
            availability: query.availability,
            photo_url,
            profile_url,
        });
    }

    Ok(records)
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
