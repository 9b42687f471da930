// src/report.rs

//! HTML report generation.
//!
//! Produces a standalone document with one visual block per record. Photos
//! are downloaded next to the output file; a failed photo download yields a
//! placeholder block and never aborts the report.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::error::Result;
use crate::models::{AnimalRecord, ScraperConfig};

/// Concurrent photo downloads per report.
const PHOTO_CONCURRENCY: usize = 4;

/// Generate an HTML report for the given records.
///
/// Photos land in a `{stem}_files/` directory next to `output` and are
/// referenced relatively, so the report can be moved together with it.
pub async fn generate_report(
    config: &ScraperConfig,
    records: &[AnimalRecord],
    output: &Path,
    title: &str,
) -> Result<()> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let assets_dir = assets_dir_for(output);
    let photos = download_photos(&client, records, &assets_dir).await;

    let html = render(records, title, &photos);
    tokio::fs::write(output, html).await?;

    log::info!(
        "Report with {} records written to {}",
        records.len(),
        output.display()
    );
    Ok(())
}

fn assets_dir_for(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    output.with_file_name(format!("{}_files", stem))
}

/// Download each record's photo, best-effort. Returns record id to the
/// photo's path relative to the report.
async fn download_photos(
    client: &Client,
    records: &[AnimalRecord],
    assets_dir: &Path,
) -> HashMap<u64, String> {
    let jobs: Vec<(u64, String)> = records
        .iter()
        .filter_map(|r| r.photo_url.as_ref().map(|url| (r.id, url.clone())))
        .collect();

    if jobs.is_empty() {
        return HashMap::new();
    }
    if let Err(e) = tokio::fs::create_dir_all(assets_dir).await {
        log::warn!(
            "Could not create {}: {}. Skipping photos.",
            assets_dir.display(),
            e
        );
        return HashMap::new();
    }

    let dir_name = assets_dir
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut downloads = stream::iter(jobs)
        .map(|(id, url)| {
            let file_name = format!("{}.{}", id, photo_extension(&url));
            let target = assets_dir.join(&file_name);
            async move {
                let result = fetch_photo(client, &url, &target).await;
                (id, file_name, url, result)
            }
        })
        .buffered(PHOTO_CONCURRENCY);

    let mut photos = HashMap::new();
    while let Some((id, file_name, url, result)) = downloads.next().await {
        match result {
            Ok(()) => {
                photos.insert(id, format!("{}/{}", dir_name, file_name));
            }
            Err(e) => {
                log::warn!("Failed to download photo from {}: {}", url, e);
            }
        }
    }
    photos
}

async fn fetch_photo(client: &Client, url: &str, target: &Path) -> Result<()> {
    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    tokio::fs::write(target, &bytes).await?;
    Ok(())
}

fn photo_extension(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('.').next() {
        Some("png") => "png",
        Some("webp") => "webp",
        Some("gif") => "gif",
        _ => "jpg",
    }
}

fn render(records: &[AnimalRecord], title: &str, photos: &HashMap<u64, String>) -> String {
    let generated = Local::now().format("%Y-%m-%d %H:%M");
    let mut cards = String::new();

    for animal in records {
        let photo_block = match photos.get(&animal.id) {
            Some(path) => format!(
                r#"<img src="{}" alt="{}">"#,
                escape(path),
                escape(&animal.name)
            ),
            None => r#"<div class="placeholder">Geen foto</div>"#.to_string(),
        };
        let place = animal
            .location
            .as_deref()
            .or(animal.site.as_deref())
            .unwrap_or("-");

        cards.push_str(&format!(
            r#"  <article class="card">
    {photo}
    <h2>{name}</h2>
    <dl>
      <dt>ID</dt><dd>{id}</dd>
      <dt>Soort</dt><dd>{kind}</dd>
      <dt>Locatie</dt><dd>{place}</dd>
      <dt>Status</dt><dd>{status}</dd>
    </dl>
    <p><a href="{url}">Bekijk profiel</a></p>
  </article>
"#,
            photo = photo_block,
            name = escape(&animal.name),
            id = animal.id,
            kind = escape(animal.animal_type.english()),
            place = escape(place),
            status = animal.availability,
            url = escape(&animal.profile_url),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="nl">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  body {{ font-family: sans-serif; max-width: 60rem; margin: 0 auto; padding: 1rem; }}
  .card {{ border: 1px solid #ccc; border-radius: 8px; padding: 1rem; margin: 1rem 0; }}
  .card img, .placeholder {{ width: 16rem; max-height: 12rem; object-fit: cover; }}
  .placeholder {{ background: #eee; height: 12rem; display: flex;
                  align-items: center; justify-content: center; color: #888; }}
  dt {{ font-weight: bold; float: left; clear: left; width: 5rem; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{count} dieren — gegenereerd {generated}</p>
{cards}</body>
</html>
"#,
        title = escape(title),
        count = records.len(),
        generated = generated,
        cards = cards,
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnimalType, Availability};

    fn record(id: u64, name: &str) -> AnimalRecord {
        AnimalRecord {
            id,
            name: name.into(),
            animal_type: AnimalType::Katten,
            site: Some("deKuipershoek".into()),
            location: Some("Apeldoorn".into()),
            availability: Availability::Available,
            photo_url: None,
            profile_url: format!("https://example.com/asieldier/katten/{}-x", id),
        }
    }

    #[tokio::test]
    async fn test_report_without_photos() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.html");
        let records = vec![record(101, "Mia"), record(202, "Kleine Beer")];

        generate_report(&ScraperConfig::default(), &records, &output, "Testrapport")
            .await
            .unwrap();

        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("<title>Testrapport</title>"));
        assert!(html.contains("Mia"));
        assert!(html.contains("Kleine Beer"));
        assert!(html.contains("Geen foto"));
        assert!(html.contains("Apeldoorn"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<b>"x" & y</b>"#), "&lt;b&gt;&quot;x&quot; &amp; y&lt;/b&gt;");
    }

    #[test]
    fn test_photo_extension() {
        assert_eq!(photo_extension("https://x/a.png?size=l"), "png");
        assert_eq!(photo_extension("https://x/a.jpeg"), "jpg");
        assert_eq!(photo_extension("https://x/a"), "jpg");
    }
}
