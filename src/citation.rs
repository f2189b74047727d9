//! Citation export: normalized, CSL-shaped structures

use crate::name::Name;
use crate::record::Record;
use crate::value::Value;
use chrono::Month;
use serde_json::{json, Map, Value as Json};
use std::str::FromStr;

/// Three-letter month symbols, January first
pub(crate) const MONTH_SYMBOLS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Which particle key structured names carry in citation output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParticleKey {
    /// `dropping-particle` (the default)
    #[default]
    Dropping,
    /// `non-dropping-particle`
    NonDropping,
}

impl ParticleKey {
    /// The JSON key this option selects
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dropping => "dropping-particle",
            Self::NonDropping => "non-dropping-particle",
        }
    }
}

/// Options for citation export
#[derive(Debug, Clone, Copy, Default)]
pub struct CitationOptions {
    /// Particle key used for structured names
    pub particle_key: ParticleKey,
}

impl CitationOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the particle key
    #[must_use]
    pub const fn particle_key(mut self, key: ParticleKey) -> Self {
        self.particle_key = key;
        self
    }
}

/// Resolve an English month name, three-letter abbreviation, or 1-12 number
/// to its 1-based month number
#[must_use]
pub fn month_number(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    if let Ok(number) = trimmed.parse::<u32>() {
        return (1..=12).contains(&number).then_some(number);
    }
    Month::from_str(trimmed)
        .ok()
        .map(|month| month.number_from_month())
}

impl Record {
    /// Export the record as a normalized citation object.
    ///
    /// Export is best-effort over noisy data: unparseable dates and absent
    /// name parts are omitted rather than reported. Name fields should be
    /// parsed with [`parse_names`](Record::parse_names) first; otherwise
    /// each degrades to a single whole-string family name.
    #[must_use]
    pub fn to_citation(&self, options: &CitationOptions) -> Json {
        let mut citation = Map::new();
        citation.insert("type".to_string(), json!(self.kind().to_string()));

        if let Some(address) = self.get("address") {
            citation.insert("publisher-place".to_string(), json!(address.to_string()));
        }

        if let Some(parts) = self.issued_date_parts() {
            citation.insert("issued".to_string(), json!({ "date-parts": [parts] }));
        }

        let names = self.names();
        if !names.is_empty() {
            let authors = names
                .iter()
                .map(|name| name_object(name, options.particle_key))
                .collect();
            citation.insert("author".to_string(), Json::Array(authors));
        }

        for field in self.fields() {
            if matches!(
                field.name.as_str(),
                "author" | "editor" | "translator" | "year" | "month" | "address"
            ) {
                continue;
            }
            citation.insert(field.name.clone(), json!(field.value.to_string()));
        }

        Json::Object(citation)
    }

    /// `[year, month?]` from the `year`/`month` fields; `None` without a
    /// parseable year, year-only when the month does not resolve
    fn issued_date_parts(&self) -> Option<Vec<i64>> {
        let year = self.get("year").and_then(Value::as_i64)?;
        let mut parts = vec![year];
        if let Some(month) = self
            .get("month")
            .and_then(|value| month_number(&value.to_string()))
        {
            parts.push(i64::from(month));
        }
        Some(parts)
    }
}

fn name_object(name: &Name, particle_key: ParticleKey) -> Json {
    let mut object = Map::new();
    if let Some(family) = &name.family {
        object.insert("family".to_string(), json!(family));
    }
    if let Some(given) = &name.given {
        object.insert("given".to_string(), json!(given));
    }
    if let Some(particle) = &name.particle {
        object.insert(particle_key.as_str().to_string(), json!(particle));
    }
    if let Some(suffix) = &name.suffix {
        object.insert("suffix".to_string(), json!(suffix));
    }
    Json::Object(object)
}
