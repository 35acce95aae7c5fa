//! Immich photo-library client.
//!
//! The frame's second picture source: instead of synthesizing an image, pull
//! one random photo of one randomly chosen person from a self-hosted
//! [Immich](https://immich.app) server. Three requests per fetch:
//!
//! 1. `GET /api/people/{id}/statistics` — how many photos exist of the
//!    person chosen from `PERSON_IDS`.
//! 2. `POST /api/search/metadata` — a page-of-one query at a random index.
//! 3. `GET /api/assets/{id}/original` — the image bytes.
//!
//! Configuration comes from the environment (optionally a `.env` file):
//! `IMMICH_URL`, `API_KEY`, `PERSON_IDS` (comma-separated), and `OUTPUT_DIR`
//! (defaults to `./output`).

use std::path::PathBuf;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Library config error: {0}")]
    Config(String),
    #[error("Library request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("No assets found for person {0}")]
    NoAssets(String),
    #[error("Asset decode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error writing {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Connection settings for one Immich server.
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    pub base_url: String,
    pub api_key: String,
    pub person_ids: Vec<String>,
    pub output_dir: PathBuf,
}

impl LibraryConfig {
    /// Read configuration from the process environment, loading `.env`
    /// first if one exists.
    pub fn from_env() -> Result<Self, LibraryError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key-value source. Split from [`from_env`] so tests
    /// never mutate the process environment.
    ///
    /// [`from_env`]: LibraryConfig::from_env
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LibraryError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| LibraryError::Config(format!("{key} is not set")))
        };
        let base_url = required("IMMICH_URL")?.trim_end_matches('/').to_string();
        let api_key = required("API_KEY")?;
        let person_ids = parse_person_ids(&required("PERSON_IDS")?);
        if person_ids.is_empty() {
            return Err(LibraryError::Config(
                "PERSON_IDS contains no usable ids".into(),
            ));
        }
        let output_dir = lookup("OUTPUT_DIR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "./output".to_string());
        Ok(Self {
            base_url,
            api_key,
            person_ids,
            output_dir: PathBuf::from(output_dir),
        })
    }
}

/// Split a comma-separated id list, trimming entries and dropping blanks.
pub fn parse_person_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn statistics_url(base_url: &str, person_id: &str) -> String {
    format!("{base_url}/api/people/{person_id}/statistics")
}

fn search_url(base_url: &str) -> String {
    format!("{base_url}/api/search/metadata")
}

fn asset_url(base_url: &str, asset_id: &str) -> String {
    format!("{base_url}/api/assets/{asset_id}/original")
}

#[derive(Debug, Deserialize)]
struct PersonStatistics {
    #[serde(default)]
    assets: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    assets: SearchAssets,
}

#[derive(Debug, Default, Deserialize)]
struct SearchAssets {
    #[serde(default)]
    items: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    id: String,
}

/// Download one random photo of one random configured person.
///
/// Returns the path of the saved image, `<asset-id>.jpg` under the output
/// directory. Fail-fast like the rest of the crate: any HTTP or decode
/// failure aborts with no partial file.
pub fn fetch_random(config: &LibraryConfig, rng: &mut impl Rng) -> Result<PathBuf, LibraryError> {
    // Non-empty guaranteed by config validation
    let person_id = config.person_ids.choose(rng).unwrap();
    let client = reqwest::blocking::Client::new();

    let stats: PersonStatistics = client
        .get(statistics_url(&config.base_url, person_id))
        .header("x-api-key", &config.api_key)
        .send()?
        .error_for_status()?
        .json()?;
    if stats.assets == 0 {
        return Err(LibraryError::NoAssets(person_id.clone()));
    }

    // Immich pages start at 1
    let page = rng.gen_range(0..stats.assets) + 1;
    let response: SearchResponse = client
        .post(search_url(&config.base_url))
        .header("x-api-key", &config.api_key)
        .json(&serde_json::json!({
            "type": "IMAGE",
            "page": page,
            "size": 1,
            "personIds": [person_id],
        }))
        .send()?
        .error_for_status()?
        .json()?;
    let asset = response
        .assets
        .items
        .first()
        .ok_or_else(|| LibraryError::NoAssets(person_id.clone()))?;

    let bytes = client
        .get(asset_url(&config.base_url, &asset.id))
        .header("x-api-key", &config.api_key)
        .send()?
        .error_for_status()?
        .bytes()?;

    std::fs::create_dir_all(&config.output_dir).map_err(|source| LibraryError::Io {
        path: config.output_dir.display().to_string(),
        source,
    })?;
    let path = config.output_dir.join(format!("{}.jpg", asset.id));
    let decoded = image::load_from_memory(&bytes)?;
    // JPEG output has no alpha channel
    decoded.to_rgb8().save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn lookup(map: &HashMap<String, String>) -> impl Fn(&str) -> Option<String> + '_ {
        |key| map.get(key).cloned()
    }

    #[test]
    fn person_ids_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_person_ids(" a1, b2 ,,c3, "),
            vec!["a1", "b2", "c3"]
        );
        assert!(parse_person_ids(" , ,").is_empty());
    }

    #[test]
    fn config_loads_from_lookup() {
        let map = vars(&[
            ("IMMICH_URL", "https://photos.example.org/"),
            ("API_KEY", "secret"),
            ("PERSON_IDS", "p1,p2"),
            ("OUTPUT_DIR", "/tmp/frames"),
        ]);
        let config = LibraryConfig::from_lookup(lookup(&map)).unwrap();
        // Trailing slash is normalized away so URL joins stay clean
        assert_eq!(config.base_url, "https://photos.example.org");
        assert_eq!(config.person_ids, vec!["p1", "p2"]);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/frames"));
    }

    #[test]
    fn output_dir_defaults_when_unset() {
        let map = vars(&[
            ("IMMICH_URL", "https://photos.example.org"),
            ("API_KEY", "secret"),
            ("PERSON_IDS", "p1"),
        ]);
        let config = LibraryConfig::from_lookup(lookup(&map)).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("./output"));
    }

    #[test]
    fn missing_required_keys_fail_by_name() {
        let map = vars(&[("IMMICH_URL", "https://photos.example.org")]);
        let err = LibraryConfig::from_lookup(lookup(&map)).unwrap_err();
        match err {
            LibraryError::Config(msg) => assert!(msg.contains("API_KEY")),
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[test]
    fn blank_person_ids_fail() {
        let map = vars(&[
            ("IMMICH_URL", "https://photos.example.org"),
            ("API_KEY", "secret"),
            ("PERSON_IDS", " , "),
        ]);
        assert!(matches!(
            LibraryConfig::from_lookup(lookup(&map)),
            Err(LibraryError::Config(_))
        ));
    }

    #[test]
    fn urls_follow_the_immich_api_shape() {
        let base = "https://photos.example.org";
        assert_eq!(
            statistics_url(base, "p1"),
            "https://photos.example.org/api/people/p1/statistics"
        );
        assert_eq!(
            search_url(base),
            "https://photos.example.org/api/search/metadata"
        );
        assert_eq!(
            asset_url(base, "a9"),
            "https://photos.example.org/api/assets/a9/original"
        );
    }

    #[test]
    fn search_response_tolerates_missing_fields() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.assets.items.is_empty());

        let parsed: SearchResponse =
            serde_json::from_str(r#"{"assets": {"items": [{"id": "a1"}]}}"#).unwrap();
        assert_eq!(parsed.assets.items[0].id, "a1");
    }
}
