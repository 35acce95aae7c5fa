//! Deterministic artifact identifiers.
//!
//! Every file belonging to one generation run shares a single stem:
//!
//! ```text
//! A_field_of_tulips_seed_42_steps_5_size_800x480.png
//! A_field_of_tulips_seed_42_steps_5_size_800x480_with_prompt.png
//! A_field_of_tulips_seed_42_steps_5_size_800x480.txt
//! ```
//!
//! The stem is a pure function of (prompt, seed, steps, width, height), so
//! re-running with identical parameters collides on the same filenames and
//! overwrites instead of accumulating near-duplicates.

/// Derive the filename stem for one generation run.
///
/// The prompt is sanitized — every character outside `[A-Za-z0-9_-]` becomes
/// `_` — and truncated to its first 64 sanitized characters, then suffixed
/// with the generation parameters:
///
/// - `derive_identifier("Mountain View!!", 42, 5, 800, 480)` →
///   `"Mountain_View___seed_42_steps_5_size_800x480"`
pub fn derive_identifier(prompt: &str, seed: u64, steps: u32, width: u32, height: u32) -> String {
    let sanitized: String = prompt
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect();
    format!("{sanitized}_seed_{seed}_steps_{steps}_size_{width}x{height}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_and_punctuation_become_underscores() {
        assert_eq!(
            derive_identifier("Mountain View!!", 42, 5, 800, 480),
            "Mountain_View___seed_42_steps_5_size_800x480"
        );
    }

    #[test]
    fn plain_prompt_passes_through() {
        assert_eq!(
            derive_identifier("sunset", 7, 3, 640, 480),
            "sunset_seed_7_steps_3_size_640x480"
        );
    }

    #[test]
    fn dashes_and_underscores_are_preserved() {
        assert_eq!(
            derive_identifier("neo-tokyo_nights", 1, 1, 10, 10),
            "neo-tokyo_nights_seed_1_steps_1_size_10x10"
        );
    }

    #[test]
    fn prompt_is_truncated_to_64_sanitized_chars() {
        let long = "x".repeat(200);
        let id = derive_identifier(&long, 9, 2, 100, 100);
        assert!(id.starts_with(&"x".repeat(64)));
        assert!(!id.starts_with(&"x".repeat(65)));
        assert!(id.ends_with("_seed_9_steps_2_size_100x100"));
    }

    #[test]
    fn unicode_is_flattened_to_underscores() {
        assert_eq!(
            derive_identifier("café ☕", 3, 4, 20, 30),
            "caf____seed_3_steps_4_size_20x30"
        );
    }

    #[test]
    fn empty_prompt_keeps_the_parameter_suffix() {
        assert_eq!(derive_identifier("", 0, 0, 1, 1), "_seed_0_steps_0_size_1x1");
    }

    #[test]
    fn identifier_charset_is_filesystem_safe() {
        let id = derive_identifier("we/ird\\pro:mpt*?", 11, 6, 800, 480);
        assert!(
            id.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        );
    }

    #[test]
    fn same_inputs_same_identifier() {
        let a = derive_identifier("a rose", 42, 5, 800, 480);
        let b = derive_identifier("a rose", 42, 5, 800, 480);
        assert_eq!(a, b);
    }
}
