//! Bibliographic records: kinds, fields, names, and citation keys

use crate::bibliography::CollectionView;
use crate::citation::{month_number, MONTH_SYMBOLS};
use crate::error::{Error, Result};
use crate::name::Name;
use crate::value::{Token, Value};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// Fields holding name lists, in lookup priority order
const NAME_FIELDS: [&str; 3] = ["author", "editor", "translator"];

/// Number of key candidates tried before the suffix space counts as
/// exhausted: `a`..`z` then `aa`..`zz`
pub const KEY_CANDIDATE_LIMIT: usize = 26 + 26 * 26;

/// The symbolic type of a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Article from a journal
    Article,
    /// Book with publisher
    Book,
    /// Part of a book
    InBook,
    /// Article in conference proceedings
    InProceedings,
    /// Conference proceedings
    Proceedings,
    /// Master's thesis
    MastersThesis,
    /// `PhD` thesis
    PhdThesis,
    /// Technical report
    TechReport,
    /// Unpublished work
    Unpublished,
    /// Miscellaneous
    Misc,
    /// Nonstandard record type
    Other(String),
    /// No type was given
    #[default]
    Unspecified,
}

impl Kind {
    /// Parse from a string, case-insensitively
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "inbook" => Self::InBook,
            "inproceedings" | "conference" => Self::InProceedings,
            "proceedings" => Self::Proceedings,
            "mastersthesis" => Self::MastersThesis,
            "phdthesis" => Self::PhdThesis,
            "techreport" => Self::TechReport,
            "unpublished" => Self::Unpublished,
            "misc" => Self::Misc,
            "" => Self::Unspecified,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Article => write!(f, "article"),
            Self::Book => write!(f, "book"),
            Self::InBook => write!(f, "inbook"),
            Self::InProceedings => write!(f, "inproceedings"),
            Self::Proceedings => write!(f, "proceedings"),
            Self::MastersThesis => write!(f, "mastersthesis"),
            Self::PhdThesis => write!(f, "phdthesis"),
            Self::TechReport => write!(f, "techreport"),
            Self::Unpublished => write!(f, "unpublished"),
            Self::Misc => write!(f, "misc"),
            Self::Other(s) => write!(f, "{s}"),
            Self::Unspecified => write!(f, "unspecified"),
        }
    }
}

/// A named field holding one value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, normalized to lowercase
    pub name: String,
    /// Field content
    pub value: Value,
}

impl Field {
    /// Create a field, normalizing the name
    #[must_use]
    pub fn new(name: &str, value: impl Into<Value>) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            value: value.into(),
        }
    }
}

/// A per-value transformation applied by [`Record::convert`].
///
/// Implemented for any `Fn(&Value) -> Value` closure.
pub trait Filter {
    /// Transform one field value
    fn apply(&self, value: &Value) -> Value;
}

impl<F> Filter for F
where
    F: Fn(&Value) -> Value,
{
    fn apply(&self, value: &Value) -> Value {
        self(value)
    }
}

/// A bibliographic record: a kind, a citation key, and named field values.
///
/// Field insertion order is preserved; names are matched
/// case-insensitively. Records order by their effective key alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    kind: Kind,
    key: Option<String>,
    fields: Vec<Field>,
    #[serde(skip)]
    parsed_names: AHashMap<String, Vec<Name>>,
}

impl Record {
    /// Create an empty record of unspecified kind
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a record
    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// The record's kind
    #[must_use]
    pub const fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Set the record's kind
    pub fn set_kind(&mut self, kind: Kind) -> &mut Self {
        self.kind = kind;
        self
    }

    /// The citation key: the assigned key, or the generated default when
    /// none has been assigned yet
    #[must_use]
    pub fn key(&self) -> Cow<'_, str> {
        match &self.key {
            Some(key) => Cow::Borrowed(key),
            None => Cow::Owned(self.generate_key()),
        }
    }

    /// Assign the citation key
    pub fn set_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.key = Some(key.into());
        self
    }

    /// All fields, in insertion order
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get a field value by name (case-insensitive)
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        let name = name.to_ascii_lowercase();
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// True if the field is present
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a field, overwriting any existing value in place
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        self.parsed_names.remove(&name);
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(Field { name, value }),
        }
        self
    }

    /// Set the `month` field, normalizing English month names,
    /// abbreviations, and 1-12 numbers to the standard three-letter symbol;
    /// anything else is stored as given
    pub fn set_month(&mut self, input: &str) -> &mut Self {
        match month_number(input) {
            Some(month) => {
                let symbol = MONTH_SYMBOLS[month as usize - 1];
                self.set("month", Value::from(Token::Symbol(symbol.to_string())))
            }
            None => self.set("month", input),
        }
    }

    /// Remove a field, returning its value
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let name = name.to_ascii_lowercase();
        self.parsed_names.remove(&name);
        let index = self.fields.iter().position(|f| f.name == name)?;
        Some(self.fields.remove(index).value)
    }

    /// Rename fields in place; missing sources are skipped, existing
    /// targets are overwritten
    pub fn rename(&mut self, mapping: &[(&str, &str)]) -> &mut Self {
        for (old, new) in mapping {
            if let Some(value) = self.remove(old) {
                self.set(new, value);
            }
        }
        self
    }

    /// Rename fields on a copy, leaving this record untouched
    #[must_use]
    pub fn renamed(&self, mapping: &[(&str, &str)]) -> Self {
        let mut copy = self.clone();
        copy.rename(mapping);
        copy
    }

    /// Parse the author/editor/translator fields into structured names,
    /// caching the result; stored field values are not touched
    pub fn parse_names(&mut self) -> &mut Self {
        for field in NAME_FIELDS {
            if let Some(value) = self.get(field) {
                let parsed = Name::parse_list(&value.to_string());
                self.parsed_names.insert(field.to_string(), parsed);
            }
        }
        self
    }

    /// The record's names: authors if present, else editors, else
    /// translators.
    ///
    /// Without a prior [`parse_names`](Self::parse_names) call each name
    /// field degrades to a single name wrapping the whole field string.
    #[must_use]
    pub fn names(&self) -> Vec<Name> {
        for field in NAME_FIELDS {
            if let Some(parsed) = self.parsed_names.get(field) {
                return parsed.clone();
            }
            if let Some(value) = self.get(field) {
                return vec![Name::from_whole_string(&value.to_string())];
            }
        }
        Vec::new()
    }

    /// The first key candidate (`a` suffix) for the current field state
    #[must_use]
    pub fn generate_key(&self) -> String {
        let (base, year) = self.key_material();
        compose_key(&base, year.as_deref(), 0)
    }

    /// The `index`-th key candidate: suffixes run `a`..`z`, then `aa`..`zz`
    pub fn candidate_key(&self, index: usize) -> Result<String> {
        let (base, year) = self.key_material();
        if index >= KEY_CANDIDATE_LIMIT {
            return Err(Error::KeySpaceExhausted {
                base,
                limit: KEY_CANDIDATE_LIMIT,
            });
        }
        Ok(compose_key(&base, year.as_deref(), index))
    }

    /// Find the first key candidate absent from the view.
    ///
    /// The collection owns uniqueness: it decides when resolution is needed
    /// and assigns the winning candidate.
    pub fn resolve_key(&self, view: &dyn CollectionView) -> Result<String> {
        for index in 0..KEY_CANDIDATE_LIMIT {
            let candidate = self.candidate_key(index)?;
            if !view.contains(&candidate) {
                return Ok(candidate);
            }
        }
        let (base, _) = self.key_material();
        Err(Error::KeySpaceExhausted {
            base,
            limit: KEY_CANDIDATE_LIMIT,
        })
    }

    /// Apply a filter to every field value in place
    pub fn convert<F: Filter + ?Sized>(&mut self, filter: &F) -> &mut Self {
        self.convert_if(filter, |_, _| true)
    }

    /// Apply a filter in place to every field the predicate admits
    pub fn convert_if<F, P>(&mut self, filter: &F, mut predicate: P) -> &mut Self
    where
        F: Filter + ?Sized,
        P: FnMut(&str, &Value) -> bool,
    {
        for field in &mut self.fields {
            if predicate(&field.name, &field.value) {
                field.value = filter.apply(&field.value);
                self.parsed_names.remove(&field.name);
            }
        }
        self
    }

    /// Apply a filter to every field value of a copy
    #[must_use]
    pub fn converted<F: Filter + ?Sized>(&self, filter: &F) -> Self {
        let mut copy = self.clone();
        copy.convert(filter);
        copy
    }

    /// Apply a filter to a copy, restricted by a predicate
    #[must_use]
    pub fn converted_if<F, P>(&self, filter: &F, predicate: P) -> Self
    where
        F: Filter + ?Sized,
        P: FnMut(&str, &Value) -> bool,
    {
        let mut copy = self.clone();
        copy.convert_if(filter, predicate);
        copy
    }

    /// Base and year material for key candidates: the first ASCII-alphabetic
    /// run of the first name's family (sentinel `unknown` without one) and
    /// the first digit run of the `year` field
    fn key_material(&self) -> (String, Option<String>) {
        let base = self
            .names()
            .first()
            .and_then(|name| name.family.clone())
            .and_then(|family| alpha_run(&family))
            .unwrap_or_else(|| "unknown".to_string());
        let year = self
            .get("year")
            .and_then(|value| digit_run(&value.to_string()));
        (base, year)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Record {}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Builder for records
#[derive(Debug, Default)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Set the kind
    #[must_use]
    pub fn kind(mut self, kind: Kind) -> Self {
        self.record.kind = kind;
        self
    }

    /// Assign the citation key
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.record.key = Some(key.into());
        self
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.record.set(name, value);
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}

fn compose_key(base: &str, year: Option<&str>, index: usize) -> String {
    let suffix = key_suffix(index);
    match year {
        Some(year) => format!("{base}{year}{suffix}"),
        None => format!("{base}-{suffix}"),
    }
}

/// Suffix for the `index`-th candidate; callers keep `index` below
/// [`KEY_CANDIDATE_LIMIT`]
fn key_suffix(index: usize) -> String {
    const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    if index < 26 {
        (LETTERS[index] as char).to_string()
    } else {
        let index = index - 26;
        let first = LETTERS[index / 26] as char;
        let second = LETTERS[index % 26] as char;
        format!("{first}{second}")
    }
}

/// First ASCII-alphabetic run, lowercased
fn alpha_run(s: &str) -> Option<String> {
    let start = s.find(|c: char| c.is_ascii_alphabetic())?;
    let rest = &s[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    Some(rest[..end].to_ascii_lowercase())
}

/// First ASCII-digit run
fn digit_run(s: &str) -> Option<String> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(rest[..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Record {
        Record::builder()
            .kind(Kind::Book)
            .key("key")
            .field("title", "Moby Dick")
            .field("author", "Herman Melville")
            .field("publisher", "Penguin")
            .field("address", "New York")
            .field("year", "1993")
            .build()
    }

    #[test]
    fn test_new_record_is_empty() {
        let record = Record::new();
        assert_eq!(record.kind(), &Kind::Unspecified);
        assert!(record.fields().is_empty());
        assert!(record.names().is_empty());
    }

    #[test]
    fn test_field_access_is_case_insensitive() {
        let record = book();
        assert!(record.has_field("Title"));
        assert_eq!(record.get("TITLE").unwrap(), &Value::from("Moby Dick"));
        assert!(!record.has_field("series"));
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut record = book();
        record.set("title", "Typee");
        assert_eq!(record.get("title").unwrap(), &Value::from("Typee"));
        assert_eq!(record.fields()[0].name, "title");
    }

    #[test]
    fn test_remove() {
        let mut record = book();
        assert_eq!(record.remove("publisher"), Some(Value::from("Penguin")));
        assert!(!record.has_field("publisher"));
        assert_eq!(record.remove("publisher"), None);
    }

    #[test]
    fn test_rename_in_place() {
        let mut record = book();
        record.rename(&[("title", "foo")]);
        assert!(!record.has_field("title"));
        assert_eq!(record.get("foo").unwrap(), &Value::from("Moby Dick"));
    }

    #[test]
    fn test_renamed_leaves_receiver_untouched() {
        let record = book();
        let renamed = record.renamed(&[("title", "foo")]);

        assert!(record.has_field("title"));
        assert!(!record.has_field("foo"));
        assert!(renamed.has_field("foo"));
        assert!(!renamed.has_field("title"));
        assert_eq!(renamed.get("foo").unwrap(), &Value::from("Moby Dick"));
    }

    #[test]
    fn test_rename_of_missing_source_is_noop() {
        let mut record = book();
        record.rename(&[("series", "foo")]);
        assert!(!record.has_field("foo"));
    }

    #[test]
    fn test_names_default_to_whole_field_strings() {
        let record = Record::builder().field("author", "A B and C D").build();
        let names = record.names();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].family.as_deref(), Some("A B and C D"));
    }

    #[test]
    fn test_parse_names_splits_and_structures() {
        let mut record = Record::builder().field("author", "A B and C D").build();
        record.parse_names();
        let names = record.names();
        assert_eq!(names.len(), 2);
        assert_eq!(names[0].family.as_deref(), Some("B"));
    }

    #[test]
    fn test_names_priority_author_editor_translator() {
        let record = Record::builder()
            .field("editor", "Hopkins, John")
            .field("translator", "Doe, Jane")
            .build();
        let names = record.names();
        assert_eq!(names[0].family.as_deref(), Some("Hopkins, John"));

        let translated = Record::builder().field("translator", "Doe, Jane").build();
        assert_eq!(
            translated.names()[0].family.as_deref(),
            Some("Doe, Jane")
        );
    }

    #[test]
    fn test_set_invalidates_parsed_names() {
        let mut record = Record::builder().field("author", "A B and C D").build();
        record.parse_names();
        record.set("author", "Poe, Edgar A.");
        let names = record.names();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].family.as_deref(), Some("Poe, Edgar A."));
    }

    #[test]
    fn test_default_key_shapes() {
        let full = Record::builder()
            .field("author", "Poe, Edgar A.")
            .field("title", "The Raven")
            .field("editor", "John Hopkins")
            .field("year", "1996")
            .build();
        assert_eq!(full.generate_key(), "poe1996a");

        let editor_only = Record::builder()
            .field("title", "The Raven")
            .field("editor", "John Hopkins")
            .field("year", "1996")
            .build();
        assert_eq!(editor_only.generate_key(), "john1996a");

        let mut parsed = editor_only.clone();
        parsed.parse_names();
        assert_eq!(parsed.generate_key(), "hopkins1996a");

        let no_year = Record::builder().field("author", "Poe, Edgar A.").build();
        assert_eq!(no_year.generate_key(), "poe-a");

        assert_eq!(Record::new().generate_key(), "unknown-a");
    }

    #[test]
    fn test_key_defaults_lazily_without_persisting() {
        let record = Record::new();
        assert_eq!(record.key(), "unknown-a");
        assert_eq!(record.key(), "unknown-a");

        let mut assigned = Record::new();
        assigned.set_key("raven");
        assert_eq!(assigned.key(), "raven");
    }

    #[test]
    fn test_candidate_keys_advance_suffixes() {
        let record = Record::builder().field("author", "Raven, The").build();
        assert_eq!(record.candidate_key(0).unwrap(), "raven-a");
        assert_eq!(record.candidate_key(1).unwrap(), "raven-b");
        assert_eq!(record.candidate_key(25).unwrap(), "raven-z");
        assert_eq!(record.candidate_key(26).unwrap(), "raven-aa");
        assert_eq!(record.candidate_key(27).unwrap(), "raven-ab");
        assert_eq!(record.candidate_key(KEY_CANDIDATE_LIMIT - 1).unwrap(), "raven-zz");
        assert!(matches!(
            record.candidate_key(KEY_CANDIDATE_LIMIT),
            Err(Error::KeySpaceExhausted { .. })
        ));
    }

    #[test]
    fn test_convert_in_place() {
        let upcase = |value: &Value| Value::from(value.to_uppercase());
        let mut record = book();
        record.convert(&upcase);
        assert_eq!(record.get("title").unwrap(), &Value::from("MOBY DICK"));
    }

    #[test]
    fn test_converted_leaves_receiver_untouched() {
        let upcase = |value: &Value| Value::from(value.to_uppercase());
        let record = book();
        let converted = record.converted(&upcase);
        assert_eq!(record.get("title").unwrap(), &Value::from("Moby Dick"));
        assert_eq!(converted.get("title").unwrap(), &Value::from("MOBY DICK"));
    }

    #[test]
    fn test_convert_with_predicate() {
        let upcase = |value: &Value| Value::from(value.to_uppercase());
        let mut record = book();
        record.convert_if(&upcase, |name, _| name.contains("publisher"));
        assert_eq!(record.get("title").unwrap(), &Value::from("Moby Dick"));
        assert_eq!(record.get("publisher").unwrap(), &Value::from("PENGUIN"));
    }

    #[test]
    fn test_month_normalization() {
        let mut record = Record::new();
        record.set_month("January");
        assert_eq!(record.get("month").unwrap().to_string(), "jan");
        assert!(record.get("month").unwrap().has_symbol());

        record.set_month("sep");
        assert_eq!(record.get("month").unwrap().to_string(), "sep");

        record.set_month("9");
        assert_eq!(record.get("month").unwrap().to_string(), "sep");

        record.set_month("Smarch");
        assert_eq!(record.get("month").unwrap().to_string(), "Smarch");
        assert!(!record.get("month").unwrap().has_symbol());
    }

    #[test]
    fn test_records_sort_by_key_stably() {
        let entry = |key: &str, title: &str| {
            Record::builder()
                .kind(Kind::Book)
                .key(key)
                .field("author", "Poe, Edgar A.")
                .field("title", title)
                .build()
        };
        let mut records = vec![
            entry("raven3", "The Raven"),
            entry("raven2", "The Raven"),
            entry("raven1", "The Raven"),
            entry("raven1", "The Aven"),
        ];
        records.sort();

        let keys: Vec<_> = records.iter().map(|r| r.key().into_owned()).collect();
        assert_eq!(keys, vec!["raven1", "raven1", "raven2", "raven3"]);
        // stable: the two raven1 records keep their insertion order
        assert_eq!(records[0].get("title").unwrap(), &Value::from("The Raven"));
        assert_eq!(records[1].get("title").unwrap(), &Value::from("The Aven"));
    }

    #[test]
    fn test_kind_parse_and_display() {
        assert_eq!(Kind::parse("ARTICLE"), Kind::Article);
        assert_eq!(Kind::parse("conference"), Kind::InProceedings);
        assert_eq!(Kind::parse("dataset"), Kind::Other("dataset".to_string()));
        assert_eq!(Kind::Book.to_string(), "book");
        assert_eq!(Kind::Unspecified.to_string(), "unspecified");
    }
}
