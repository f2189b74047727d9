//! Structured personal names and BibTeX name-string parsing

use memchr::{memchr, memchr_iter};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use unicode_normalization::UnicodeNormalization;

/// Generational suffix words recognized in space-form names
const SUFFIX_WORDS: [&str; 5] = ["jr", "sr", "ii", "iii", "iv"];

/// A structured personal name.
///
/// Equality and ordering consider only `(family, given)`; particle and
/// suffix do not participate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Name {
    /// Nobiliary particle ("van", "de la")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particle: Option<String>,
    /// Family name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Given names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,
    /// Generational suffix ("Jr.", "III")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl Name {
    /// Parse one free-text name using the BibTeX `Last, First`,
    /// `von Last, Suffix, First`, and `First von Last` conventions.
    ///
    /// Parsing never fails: input that carries no usable material degrades
    /// to an empty name.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let normalized: String = input.nfc().collect();
        let trimmed = normalized.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        if memchr(b',', trimmed.as_bytes()).is_some() {
            parse_comma_form(trimmed)
        } else {
            parse_space_form(trimmed)
        }
    }

    /// Split an `and`-joined name list (case-insensitive, whitespace
    /// tolerant) and parse each component
    #[must_use]
    pub fn parse_list(input: &str) -> Vec<Self> {
        split_name_list(input).into_iter().map(Self::parse).collect()
    }

    /// A degraded name wrapping an unparsed string wholesale as the family
    #[must_use]
    pub fn from_whole_string(input: &str) -> Self {
        Self {
            family: non_empty(input.trim()),
            ..Self::default()
        }
    }

    /// True when every part is absent
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particle.is_none()
            && self.family.is_none()
            && self.given.is_none()
            && self.suffix.is_none()
    }

    /// Render in sort order: `von Last, Suffix, First`
    #[must_use]
    pub fn sort_order(&self) -> String {
        let mut out = String::new();
        if let Some(particle) = &self.particle {
            out.push_str(particle);
        }
        if let Some(family) = &self.family {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(family);
        }
        if let Some(suffix) = &self.suffix {
            out.push_str(", ");
            out.push_str(suffix);
        }
        if let Some(given) = &self.given {
            out.push_str(", ");
            out.push_str(given);
        }
        out
    }

    /// Render in display order: `First von Last, Suffix`
    #[must_use]
    pub fn display_order(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(given) = &self.given {
            parts.push(given);
        }
        if let Some(particle) = &self.particle {
            parts.push(particle);
        }
        if let Some(family) = &self.family {
            parts.push(family);
        }
        let mut out = parts.join(" ");
        if let Some(suffix) = &self.suffix {
            out.push_str(", ");
            out.push_str(suffix);
        }
        out
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sort_order())
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && self.given == other.given
    }
}

impl Eq for Name {}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.family, &self.given).cmp(&(&other.family, &other.given))
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.given.hash(state);
    }
}

/// Parse `von Last, First` / `von Last, Suffix, First`
fn parse_comma_form(input: &str) -> Name {
    let segments = comma_segments(input);
    let (particle, family) = split_von_family(segments[0]);
    let mut name = Name {
        particle,
        family,
        ..Name::default()
    };
    match segments.len() {
        1 => {}
        2 => name.given = non_empty(segments[1]),
        _ => {
            name.suffix = non_empty(segments[1]);
            name.given = non_empty(&segments[2..].join(", "));
        }
    }
    name
}

/// Parse `First von Last`: the contiguous run of lowercase-initial words
/// starting at index >= 1 is the particle, words after it the family, words
/// before it the given names. The first word is never a particle.
fn parse_space_form(input: &str) -> Name {
    let mut words: Vec<&str> = input.split_whitespace().collect();
    let mut name = Name::default();
    if words.is_empty() {
        return name;
    }
    if words.len() > 1 && is_suffix_word(words[words.len() - 1]) {
        name.suffix = non_empty(words[words.len() - 1]);
        words.truncate(words.len() - 1);
    }
    if words.len() == 1 {
        name.family = non_empty(words[0]);
        return name;
    }

    let von_start = words
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, word)| starts_lowercase(word))
        .map(|(i, _)| i);

    match von_start {
        None => {
            name.given = non_empty(&words[..words.len() - 1].join(" "));
            name.family = non_empty(words[words.len() - 1]);
        }
        Some(start) => {
            let mut end = start;
            while end < words.len() && starts_lowercase(words[end]) {
                end += 1;
            }
            if end == words.len() {
                // run reaches the end; the final word is still the family
                end -= 1;
            }
            name.given = non_empty(&words[..start].join(" "));
            name.particle = non_empty(&words[start..end].join(" "));
            name.family = non_empty(&words[end..].join(" "));
        }
    }
    name
}

/// Split a `von Last` segment: the leading run of lowercase-initial words
/// is the particle, the rest the family. A fully-lowercase segment keeps
/// its final word as the family.
fn split_von_family(segment: &str) -> (Option<String>, Option<String>) {
    let words: Vec<&str> = segment.split_whitespace().collect();
    if words.is_empty() {
        return (None, None);
    }
    let mut particle_end = 0;
    while particle_end < words.len() - 1 && starts_lowercase(words[particle_end]) {
        particle_end += 1;
    }
    (
        non_empty(&words[..particle_end].join(" ")),
        non_empty(&words[particle_end..].join(" ")),
    )
}

/// Split at commas; commas are ASCII, so byte offsets are char boundaries
fn comma_segments(input: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for pos in memchr_iter(b',', input.as_bytes()) {
        segments.push(input[start..pos].trim());
        start = pos + 1;
    }
    segments.push(input[start..].trim());
    segments
}

/// Split a name list at every standalone `and` word
fn split_name_list(input: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut segment_start = 0;
    let mut word_start = None;
    for (i, c) in input.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = word_start.take() {
                if input[start..i].eq_ignore_ascii_case("and") {
                    segments.push(&input[segment_start..start]);
                    segment_start = i;
                }
            }
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        if input[start..].eq_ignore_ascii_case("and") {
            segments.push(&input[segment_start..start]);
            segment_start = input.len();
        }
    }
    segments.push(&input[segment_start..]);
    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn starts_lowercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_lowercase)
}

fn is_suffix_word(word: &str) -> bool {
    let stem = word.strip_suffix('.').unwrap_or(word);
    SUFFIX_WORDS.iter().any(|s| stem.eq_ignore_ascii_case(s))
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
