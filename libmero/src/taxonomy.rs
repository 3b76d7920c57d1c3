//! Objects related to the taxonomic classification of a sample
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

/// The kingdoms that samples can be filtered by
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, Serialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Kingdom {
    Animalia,
    Plantae,
    Fungi,
    Protista,
    Chromista,
    Bacteria,
    Archaea,
}

/// The genera that samples can be filtered by
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, Serialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GenusTag {
    Acropora,
    // commonly misspelled with a single 'l'
    #[strum(to_string = "pocillopora", serialize = "pocilopora")]
    Pocillopora,
    Porites,
    Montipora,
    Goniopora,
    Favites,
}

impl Kingdom {
    /// The capitalized name of the kingdom, e.g. "Animalia"
    pub fn title(&self) -> String {
        capitalize(&self.to_string())
    }
}

impl GenusTag {
    /// The capitalized name of the genus, e.g. "Acropora"
    pub fn title(&self) -> String {
        capitalize(&self.to_string())
    }

    /// Every spelling of the genus that may appear in a record's free-text genus field
    pub fn spellings(&self) -> Vec<String> {
        match self {
            GenusTag::Pocillopora => vec!["pocillopora".to_string(), "pocilopora".to_string()],
            other => vec![other.to_string()],
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The free-text taxonomic classification of a sample. Every rank is optional; an empty string
/// means that the rank is unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Taxonomy {
    pub kingdom: String,
    pub family: String,
    pub genus: String,
    pub species: String,
}

impl Taxonomy {
    pub fn new(kingdom: &str, family: &str, genus: &str, species: &str) -> Self {
        Self {
            kingdom: kingdom.trim().to_string(),
            family: family.trim().to_string(),
            genus: genus.trim().to_string(),
            species: species.trim().to_string(),
        }
    }
}
