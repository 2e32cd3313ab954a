//! # Field Validation
//!
//! Pure string normalization and validation helpers shared by every entity's
//! `validate()` hook. Nothing here touches storage: callers normalize first,
//! then hand the record to a repository.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, Result};

/// Accepted phone formats: `+998` + 9 digits (Uzbekistan) or `+7` + 10 digits
/// (Russia). No spaces, dashes, or parentheses.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\+998\d{9}|\+7\d{10})$").expect("phone pattern is valid"));

/// Options for [`normalize`].
///
/// Exactly one case transform is applied, by priority: `unique` (lowercase)
/// beats `title` (title-case each word) beats `capitalize` (uppercase the
/// first character only). Enabling both `title` and `capitalize` is
/// discouraged; when both are set, `title` wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOpts {
    pub title: bool,
    pub capitalize: bool,
    pub required: bool,
    pub unique: bool,
}

impl NormalizeOpts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Title-case each word.
    pub fn title(mut self) -> Self {
        self.title = true;
        self
    }

    /// Uppercase the first character, leave the rest untouched.
    pub fn capitalize(mut self) -> Self {
        self.capitalize = true;
        self
    }

    /// Reject empty / whitespace-only values.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Lowercase, so the storage layer's uniqueness check is case-insensitive.
    /// The unique column constraint itself lives on the entity field.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Trims and case-normalizes a field value before persistence.
///
/// Fails with [`AppError::ValidationError`] when `required` is set and the
/// trimmed value is empty. Idempotent for every flag combination.
pub fn normalize(value: &str, opts: NormalizeOpts) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() && opts.required {
        return Err(AppError::ValidationError(
            "This field is required.".to_string(),
        ));
    }

    let out = if opts.unique {
        trimmed.to_lowercase()
    } else if opts.title {
        title_case(trimmed)
    } else if opts.capitalize {
        capitalize_first(trimmed)
    } else {
        trimmed.to_string()
    };
    Ok(out)
}

/// Succeeds iff `value` is a well-formed Uzbek or Russian phone number.
pub fn validate_phone_number(value: &str) -> Result<()> {
    if PHONE_RE.is_match(value) {
        Ok(())
    } else {
        Err(AppError::ValidationError(
            "The phone number must start with '+998' (Uzbekistan) or '+7' (Russia) \
             and contain the correct number of digits."
                .to_string(),
        ))
    }
}

/// Derives a URL-safe slug: lowercase alphanumerics, runs of anything else
/// collapsed to single hyphens, no leading or trailing hyphen.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    for ch in lowered.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Uppercase the first letter of each word, lowercase the rest of the word.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_alphabetic = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if prev_alphabetic {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alphabetic = true;
        } else {
            out.push(ch);
            prev_alphabetic = false;
        }
    }
    out
}

/// Uppercase the first character only; the rest of the string is untouched.
fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_empty_and_whitespace() {
        for raw in ["", "   ", "\t\n"] {
            let err = normalize(raw, NormalizeOpts::new().required()).unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)), "{raw:?}");
        }
        let ok = normalize("  ok  ", NormalizeOpts::new().required()).unwrap();
        assert_eq!(ok, "ok");
    }

    #[test]
    fn empty_without_required_is_fine() {
        assert_eq!(normalize("   ", NormalizeOpts::new()).unwrap(), "");
    }

    #[test]
    fn unique_is_trim_then_lowercase() {
        let got = normalize("  JDoe@Example.COM ", NormalizeOpts::new().unique()).unwrap();
        assert_eq!(got, "jdoe@example.com");
    }

    #[test]
    fn title_cases_each_word() {
        let got = normalize(" hello WORLD ", NormalizeOpts::new().title()).unwrap();
        assert_eq!(got, "Hello World");
        // Digits start a new word boundary
        let got = normalize("3g phone", NormalizeOpts::new().title()).unwrap();
        assert_eq!(got, "3G Phone");
    }

    #[test]
    fn capitalize_touches_only_the_first_char() {
        let got = normalize("  uSED bicycle ", NormalizeOpts::new().capitalize()).unwrap();
        assert_eq!(got, "USED bicycle");
    }

    #[test]
    fn unique_beats_title_beats_capitalize() {
        let both = NormalizeOpts::new().title().capitalize();
        assert_eq!(normalize("one two", both).unwrap(), "One Two");
        let all = NormalizeOpts::new().unique().title().capitalize();
        assert_eq!(normalize("One Two", all).unwrap(), "one two");
    }

    #[test]
    fn normalization_is_idempotent() {
        let cases = [
            NormalizeOpts::new(),
            NormalizeOpts::new().unique(),
            NormalizeOpts::new().title(),
            NormalizeOpts::new().capitalize(),
        ];
        for opts in cases {
            let once = normalize("  mIXeD Case VALUE 42 ", opts).unwrap();
            let twice = normalize(&once, opts).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn phone_accepts_uz_and_ru_formats() {
        assert!(validate_phone_number("+998912345678").is_ok());
        assert!(validate_phone_number("+79123456789").is_ok());
    }

    #[test]
    fn phone_rejects_malformed_numbers() {
        for bad in [
            "+998912345",    // too short
            "998912345678",  // missing plus
            "+1234567890",   // unsupported country code
            "+998 91 234 56 78",
            "+7912345678900", // too long
        ] {
            assert!(validate_phone_number(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Used Bicycle"), "used-bicycle");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("--already--slugged--"), "already-slugged");
        assert_eq!(slugify("%%%"), "");
    }
}
