//! # bibrecord
//!
//! A model for bibliographic records: token-sequence field values, BibTeX
//! name parsing, citation-key generation, and normalized citation export.
//!
//! ## Features
//!
//! - Field values as ordered sequences of literal and symbolic tokens, with
//!   concatenation, macro substitution, and quoting
//! - Personal-name parsing for the `Last, First`, `von Last, Suffix, First`,
//!   and `First von Last` conventions
//! - Deterministic citation keys with collision-resolving suffixes
//! - Best-effort export into the CSL-shaped citation structure
//!
//! Reading and writing the `.bib` text format is out of scope: field content
//! arrives as plain strings or pre-built [`Value`]s from whatever grammar
//! sits upstream.
//!
//! ## Example
//!
//! ```
//! use bibrecord::{Bibliography, Kind, Record};
//!
//! let mut record = Record::builder()
//!     .kind(Kind::Book)
//!     .field("author", "Poe, Edgar A.")
//!     .field("title", "The Raven")
//!     .field("year", "1996")
//!     .build();
//! record.parse_names();
//! assert_eq!(record.key(), "poe1996a");
//!
//! let mut bibliography = Bibliography::new();
//! let key = bibliography.insert(record)?;
//! assert!(bibliography.get(&key).is_some());
//! # Ok::<(), bibrecord::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs,
    missing_debug_implementations
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod bibliography;
pub mod citation;
pub mod error;
pub mod name;
pub mod record;
pub mod value;

pub use bibliography::{Bibliography, CollectionView};
pub use citation::{month_number, CitationOptions, ParticleKey};
pub use error::{Error, Result};
pub use name::Name;
pub use record::{Field, Filter, Kind, Record, RecordBuilder, KEY_CANDIDATE_LIMIT};
pub use value::{Token, Value};

/// Re-export of the most common types
pub mod prelude {
    pub use crate::{
        Bibliography, CitationOptions, Kind, Name, ParticleKey, Record, Token, Value,
    };
}
