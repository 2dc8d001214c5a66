//! Form parsing and validation.
//!
//! [`FormData`] is an immutable snapshot of a urlencoded body, taken once per
//! request. [`Validator`] applies independent rule checks against that
//! snapshot and accumulates a field → message map; an empty map means the
//! form is valid. Validation has no side effects beyond that map.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Failure to take the [`FormData`] snapshot from a request body.
#[derive(Debug, Error)]
pub enum FormParseError {
    /// The body is not valid UTF-8.
    #[error("form body is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The body is not valid urlencoded data.
    #[error("form body is not valid urlencoded data: {0}")]
    Decode(#[from] serde_urlencoded::de::Error),
}

/// Ordered field name → value pairs, as submitted.
///
/// A field may appear more than once; [`FormData::get`] returns the first
/// value (or `""` when the field is absent), matching how HTML forms are
/// conventionally read.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    /// Parse a `application/x-www-form-urlencoded` body.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormParseError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self {
            pairs: serde_urlencoded::from_str(text)?,
        })
    }

    /// First submitted value for `field`, or `""` when absent.
    pub fn get(&self, field: &str) -> &str {
        self.pairs
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// All submitted values for `field`, in order.
    pub fn values<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> {
        self.pairs
            .iter()
            .filter(move |(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Distinct field names, in first-seen order.
    fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (name, _) in &self.pairs {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}

/// Echoed form values and field errors, ready for template rendering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormState {
    /// First submitted value per field.
    pub values: BTreeMap<String, String>,
    /// One human-readable message per failed field.
    pub errors: BTreeMap<String, String>,
}

impl FormState {
    /// A blank form pre-filled with the given values, for first renders.
    pub fn with_values(values: &[(&str, &str)]) -> Self {
        Self {
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            errors: BTreeMap::new(),
        }
    }
}

/// Value-constraint checker over a [`FormData`] snapshot.
///
/// Each rule records at most one message per field; re-running a rule on a
/// field overwrites any earlier message for it (last write wins).
#[derive(Debug)]
pub struct Validator {
    form: FormData,
    errors: BTreeMap<String, String>,
}

impl Validator {
    /// Wrap a parsed form for validation.
    pub fn new(form: FormData) -> Self {
        Self {
            form,
            errors: BTreeMap::new(),
        }
    }

    /// The underlying form snapshot.
    pub fn form(&self) -> &FormData {
        &self.form
    }

    /// True iff no rule has recorded an error.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The field → message error map.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Record `message` for `field`, replacing any earlier message.
    fn record(&mut self, field: &str, message: String) {
        self.errors.insert(field.to_string(), message);
    }

    fn is_blank(&self, field: &str) -> bool {
        self.form.get(field).trim().is_empty()
    }

    /// Each listed field must have a non-blank (trimmed) value.
    pub fn require_non_blank(&mut self, fields: &[&str]) {
        for field in fields {
            if self.is_blank(field) {
                self.record(field, "This field cannot be blank".to_string());
            }
        }
    }

    /// A non-blank value may hold at most `max` characters (not bytes).
    pub fn max_length(&mut self, field: &str, max: usize) {
        if self.is_blank(field) {
            return;
        }
        if self.form.get(field).chars().count() > max {
            self.record(
                field,
                format!("This field is too long (maximum is {max} characters)"),
            );
        }
    }

    /// A non-blank value must hold at least `min` characters.
    pub fn min_length(&mut self, field: &str, min: usize) {
        if self.is_blank(field) {
            return;
        }
        if self.form.get(field).chars().count() < min {
            self.record(
                field,
                format!("This field is too short (minimum is {min} characters)"),
            );
        }
    }

    /// A non-blank value must be one of `permitted`.
    pub fn permitted_values(&mut self, field: &str, permitted: &[&str]) {
        if self.is_blank(field) {
            return;
        }
        if !permitted.contains(&self.form.get(field)) {
            self.record(field, "This field is invalid".to_string());
        }
    }

    /// A non-blank value must match `pattern`.
    pub fn matches_pattern(&mut self, field: &str, pattern: &Regex) {
        if self.is_blank(field) {
            return;
        }
        if !pattern.is_match(self.form.get(field)) {
            self.record(field, "This field is invalid".to_string());
        }
    }

    /// Consume the validator into echoed values + errors for re-rendering.
    pub fn into_state(self) -> FormState {
        let values = self
            .form
            .field_names()
            .into_iter()
            .map(|name| (name.to_string(), self.form.get(name).to_string()))
            .collect();
        FormState {
            values,
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        FormData {
            pairs: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn parses_urlencoded_bytes_in_order() {
        let form = FormData::from_bytes(b"title=O+snail&content=Climb%20Mount%20Fuji").unwrap();
        assert_eq!(form.get("title"), "O snail");
        assert_eq!(form.get("content"), "Climb Mount Fuji");
        assert_eq!(form.get("missing"), "");
    }

    #[test]
    fn rejects_non_utf8_bytes() {
        assert!(matches!(
            FormData::from_bytes(&[0xff, 0xfe, b'=', b'x']),
            Err(FormParseError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn get_returns_first_of_repeated_values() {
        let form = FormData::from_bytes(b"expires=7&expires=365").unwrap();
        assert_eq!(form.get("expires"), "7");
        assert_eq!(form.values("expires").collect::<Vec<_>>(), ["7", "365"]);
    }

    #[test]
    fn fresh_validator_is_valid() {
        let v = Validator::new(form(&[]));
        assert!(v.valid());
        assert!(v.errors().is_empty());
    }

    #[test]
    fn valid_iff_error_map_empty() {
        let mut v = Validator::new(form(&[("title", "")]));
        v.require_non_blank(&["title"]);
        assert!(!v.valid());
        assert_eq!(v.errors().len(), 1);
    }

    #[test]
    fn non_blank_flags_empty_and_whitespace() {
        let mut v = Validator::new(form(&[("a", ""), ("b", "  \t "), ("c", "ok")]));
        v.require_non_blank(&["a", "b", "c", "missing"]);
        assert_eq!(v.errors().len(), 3);
        assert_eq!(v.errors()["a"], "This field cannot be blank");
        assert_eq!(v.errors()["b"], "This field cannot be blank");
        assert_eq!(v.errors()["missing"], "This field cannot be blank");
        assert!(!v.errors().contains_key("c"));
    }

    #[test]
    fn max_length_never_flags_blank() {
        let mut v = Validator::new(form(&[("title", "")]));
        v.max_length("title", 3);
        assert!(v.valid());
    }

    #[test]
    fn max_length_boundary() {
        let mut v = Validator::new(form(&[("title", "abc")]));
        v.max_length("title", 3);
        assert!(v.valid());

        let mut v = Validator::new(form(&[("title", "abcd")]));
        v.max_length("title", 3);
        assert_eq!(
            v.errors()["title"],
            "This field is too long (maximum is 3 characters)"
        );
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        // Four characters, twelve bytes.
        let mut v = Validator::new(form(&[("title", "日本語文")]));
        v.max_length("title", 4);
        assert!(v.valid());
        v.max_length("title", 3);
        assert!(!v.valid());
    }

    #[test]
    fn min_length_boundary() {
        let mut v = Validator::new(form(&[("name", "abc")]));
        v.min_length("name", 3);
        assert!(v.valid());

        let mut v = Validator::new(form(&[("name", "ab")]));
        v.min_length("name", 3);
        assert_eq!(
            v.errors()["name"],
            "This field is too short (minimum is 3 characters)"
        );
    }

    #[test]
    fn min_length_skips_blank() {
        let mut v = Validator::new(form(&[("name", "")]));
        v.min_length("name", 3);
        assert!(v.valid());
    }

    #[test]
    fn permitted_values_membership() {
        let mut v = Validator::new(form(&[("expires", "7")]));
        v.permitted_values("expires", &["1", "7", "365"]);
        assert!(v.valid());

        let mut v = Validator::new(form(&[("expires", "3")]));
        v.permitted_values("expires", &["1", "7", "365"]);
        assert_eq!(v.errors()["expires"], "This field is invalid");
    }

    #[test]
    fn permitted_values_skips_blank() {
        let mut v = Validator::new(form(&[("expires", " ")]));
        v.permitted_values("expires", &["1", "7", "365"]);
        assert!(v.valid());
    }

    #[test]
    fn pattern_match() {
        let digits = Regex::new(r"^\d+$").unwrap();
        let mut v = Validator::new(form(&[("id", "42")]));
        v.matches_pattern("id", &digits);
        assert!(v.valid());

        let mut v = Validator::new(form(&[("id", "4x2")]));
        v.matches_pattern("id", &digits);
        assert_eq!(v.errors()["id"], "This field is invalid");
    }

    #[test]
    fn last_write_wins_per_field() {
        let mut v = Validator::new(form(&[("title", "abcd")]));
        v.max_length("title", 3);
        v.max_length("title", 2);
        assert_eq!(v.errors().len(), 1);
        assert_eq!(
            v.errors()["title"],
            "This field is too long (maximum is 2 characters)"
        );
    }

    #[test]
    fn into_state_echoes_submitted_values_and_errors() {
        let mut v = Validator::new(form(&[("title", "abcd"), ("content", "")]));
        v.require_non_blank(&["title", "content"]);
        v.max_length("title", 3);
        let state = v.into_state();
        assert_eq!(state.values["title"], "abcd");
        assert_eq!(state.values["content"], "");
        assert_eq!(state.errors.len(), 2);
    }

    #[test]
    fn with_values_prefills_without_errors() {
        let state = FormState::with_values(&[("expires", "365")]);
        assert_eq!(state.values["expires"], "365");
        assert!(state.errors.is_empty());
    }
}
