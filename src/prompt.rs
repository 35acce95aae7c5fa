//! Prompt and style selection.
//!
//! A prompt comes from one of three places, in priority order:
//!
//! 1. An explicit prompt passed on the command line — used verbatim.
//! 2. A static entry chosen uniformly from the prompt file.
//! 3. A live feed, when the chosen entry is an HTTP(S) URL — one feed entry
//!    title becomes the prompt and the feed URL is recorded as provenance.
//!
//! Styles are simpler: one entry chosen uniformly from the style file, later
//! appended to the prompt with a single separating space.
//!
//! All selection goes through a caller-supplied [`Rng`] so runs are
//! reproducible under a fixed seed.

use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::config::{ConfigError, load_string_list};
use crate::feed::{self, FeedError};

#[derive(Error, Debug)]
pub enum PromptError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// A resolved prompt, immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    /// The text handed to the synthesizer. Never empty.
    pub text: String,
    /// The feed URL this prompt came from, when sourced dynamically.
    pub provenance_url: Option<String>,
}

impl PromptSpec {
    fn verbatim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provenance_url: None,
        }
    }
}

/// Resolve a prompt.
///
/// With a non-empty `explicit_prompt` the prompt file is never touched and
/// no provenance is recorded. Otherwise one candidate is chosen from
/// `prompt_file`; feed-URL candidates are fetched and resolved to an entry
/// title (the only network access in the pipeline).
pub fn resolve(
    prompt_file: &Path,
    explicit_prompt: &str,
    rng: &mut impl Rng,
) -> Result<PromptSpec, PromptError> {
    if !explicit_prompt.is_empty() {
        return Ok(PromptSpec::verbatim(explicit_prompt));
    }

    let candidates = load_string_list(prompt_file)?;
    // Non-empty guaranteed by load_string_list, choose cannot fail
    let candidate = candidates.choose(rng).unwrap();

    if feed::is_feed_url(candidate) {
        let title = feed::fetch_random_title(candidate, rng)?;
        return Ok(PromptSpec {
            text: title,
            provenance_url: Some(candidate.clone()),
        });
    }

    Ok(PromptSpec::verbatim(candidate.clone()))
}

/// Choose one style fragment from the style file.
pub fn choose_style(style_file: &Path, rng: &mut impl Rng) -> Result<String, ConfigError> {
    let styles = load_string_list(style_file)?;
    Ok(styles.choose(rng).unwrap().clone())
}

/// Append a style fragment to a prompt with a single separating space.
pub fn combine(prompt: &str, style: &str) -> String {
    format!("{prompt} {style}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_list_file;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::TempDir;

    #[test]
    fn explicit_prompt_is_used_verbatim_without_provenance() {
        let tmp = TempDir::new().unwrap();
        // File deliberately absent: the explicit branch must not read it
        let missing = tmp.path().join("absent.json");
        let mut rng = StdRng::seed_from_u64(0);
        let spec = resolve(&missing, "a sunset over water", &mut rng).unwrap();
        assert_eq!(spec.text, "a sunset over water");
        assert_eq!(spec.provenance_url, None);
    }

    #[test]
    fn static_candidate_comes_from_the_list() {
        let tmp = TempDir::new().unwrap();
        let path = write_list_file(tmp.path(), "prompts.json", &["rose", "tulip"]);
        let mut rng = StdRng::seed_from_u64(42);
        let spec = resolve(&path, "", &mut rng).unwrap();
        assert!(spec.text == "rose" || spec.text == "tulip");
        assert_eq!(spec.provenance_url, None);
    }

    #[test]
    fn fixed_seed_gives_reproducible_selection() {
        let tmp = TempDir::new().unwrap();
        let path = write_list_file(tmp.path(), "prompts.json", &["rose", "tulip", "poppy"]);
        let a = resolve(&path, "", &mut StdRng::seed_from_u64(7)).unwrap();
        let b = resolve(&path, "", &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_prompt_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let err = resolve(&tmp.path().join("absent.json"), "", &mut rng).unwrap_err();
        assert!(matches!(err, PromptError::Config(_)));
    }

    #[test]
    fn style_selection_comes_from_the_list() {
        let tmp = TempDir::new().unwrap();
        let path = write_list_file(tmp.path(), "styles.json", &["oil painting", "watercolor"]);
        let mut rng = StdRng::seed_from_u64(3);
        let style = choose_style(&path, &mut rng).unwrap();
        assert!(style == "oil painting" || style == "watercolor");
    }

    #[test]
    fn combine_joins_with_one_space() {
        assert_eq!(combine("a rose", "oil painting"), "a rose oil painting");
    }
}
