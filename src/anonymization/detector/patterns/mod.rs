//! Detector registry for PII classification
//!
//! The registry is an ordered table of `(type, matcher, confidence rule)`
//! entries. The built-in table ships in `patterns/pii_patterns.toml` and is
//! embedded at compile time; callers extend it with [`DetectorRegistry::register`]
//! or replace it with a custom pattern library file.

use crate::anonymization::models::PiiType;
use crate::domain::{Result, WardenError};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Detector definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorDefinition {
    /// PII type label
    #[serde(rename = "type")]
    pub pii_type: String,
    /// Regex patterns (any match)
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Dictionary words (any word match)
    #[serde(default)]
    pub dictionary: Vec<String>,
    /// Column-name tokens gating this entry
    #[serde(default)]
    pub column_name_tokens: Vec<String>,
    /// Multiplier applied to the match ratio
    pub confidence_factor: f64,
    /// Upper bound on the confidence
    pub confidence_cap: f64,
}

/// Detector library container
#[derive(Debug, Deserialize)]
struct DetectorLibrary {
    #[serde(default, rename = "detector")]
    detectors: Vec<DetectorDefinition>,
}

/// How a single value is tested
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Value matches if any regex is found in it
    Patterns(Vec<Regex>),
    /// Value matches if any whitespace-separated word (lower-cased) is listed
    Dictionary(HashSet<String>),
}

impl Matcher {
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Patterns(regexes) => regexes.iter().any(|re| re.is_match(text)),
            Self::Dictionary(words) => text
                .split_whitespace()
                .any(|word| words.contains(&word.to_lowercase())),
        }
    }
}

/// Which columns an entry applies to
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnGate {
    /// Every column
    Any,
    /// Columns whose lower-cased name contains one of the tokens
    NameContains(Vec<String>),
}

impl ColumnGate {
    pub fn admits(&self, column_name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::NameContains(tokens) => {
                let lower = column_name.to_lowercase();
                tokens.iter().any(|t| lower.contains(t.as_str()))
            }
        }
    }
}

/// `confidence = min(match_ratio * factor, cap)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceRule {
    pub factor: f64,
    pub cap: f64,
}

impl ConfidenceRule {
    pub fn new(factor: f64, cap: f64) -> Self {
        Self { factor, cap }
    }

    /// Score `matches` hits out of `sample_size` sampled values
    pub fn score(&self, matches: usize, sample_size: usize) -> f64 {
        if sample_size == 0 {
            return 0.0;
        }
        (matches as f64 / sample_size as f64 * self.factor).min(self.cap)
    }
}

/// One registry entry
#[derive(Debug, Clone)]
pub struct DetectorEntry {
    pub pii_type: PiiType,
    pub gate: ColumnGate,
    pub matcher: Matcher,
    pub confidence: ConfidenceRule,
}

impl DetectorEntry {
    /// Pattern-based entry applying to every column
    pub fn pattern(pii_type: PiiType, patterns: &[&str], confidence: ConfidenceRule) -> Result<Self> {
        let regexes = patterns
            .iter()
            .map(|p| compile(pii_type, p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            pii_type,
            gate: ColumnGate::Any,
            matcher: Matcher::Patterns(regexes),
            confidence,
        })
    }

    /// Dictionary-based entry applying to every column
    pub fn dictionary<I, S>(pii_type: PiiType, words: I, confidence: ConfidenceRule) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            pii_type,
            gate: ColumnGate::Any,
            matcher: Matcher::Dictionary(words.into_iter().map(|w| w.as_ref().to_lowercase()).collect()),
            confidence,
        }
    }

    /// Restrict the entry to columns whose name contains one of `tokens`
    pub fn gated_by<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.gate = ColumnGate::NameContains(tokens.into_iter().map(|t| t.as_ref().to_lowercase()).collect());
        self
    }

    fn from_definition(def: DetectorDefinition) -> Result<Self> {
        let pii_type: PiiType = def
            .pii_type
            .parse()
            .map_err(|e: String| WardenError::Configuration(format!("Invalid detector entry: {e}")))?;

        if !(def.confidence_factor > 0.0) || !(0.0..=1.0).contains(&def.confidence_cap) {
            return Err(WardenError::Configuration(format!(
                "Detector '{pii_type}': confidence_factor must be > 0 and confidence_cap within [0, 1]"
            )));
        }
        let confidence = ConfidenceRule::new(def.confidence_factor, def.confidence_cap);

        let entry = match (def.patterns.is_empty(), def.dictionary.is_empty()) {
            (false, true) => {
                let patterns: Vec<&str> = def.patterns.iter().map(String::as_str).collect();
                Self::pattern(pii_type, &patterns, confidence)?
            }
            (true, false) => Self::dictionary(pii_type, &def.dictionary, confidence),
            _ => {
                return Err(WardenError::Configuration(format!(
                    "Detector '{pii_type}' must define exactly one of `patterns` or `dictionary`"
                )))
            }
        };

        Ok(if def.column_name_tokens.is_empty() {
            entry
        } else {
            entry.gated_by(&def.column_name_tokens)
        })
    }
}

fn compile(pii_type: PiiType, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        WardenError::Configuration(format!("Invalid regex for '{pii_type}': {pattern}: {e}"))
    })
}

/// Ordered detector table
#[derive(Debug, Clone, Default)]
pub struct DetectorRegistry {
    entries: Vec<DetectorEntry>,
}

impl DetectorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a TOML pattern library file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            WardenError::Configuration(format!(
                "Failed to read pattern library {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Create a registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: DetectorLibrary = toml::from_str(content).map_err(|e| {
            WardenError::Configuration(format!("Failed to parse pattern library TOML: {e}"))
        })?;

        let entries = library
            .detectors
            .into_iter()
            .map(DetectorEntry::from_definition)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    /// Registry with the built-in detector table
    pub fn default_detectors() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Append an entry; it is evaluated after existing entries
    pub fn register(&mut self, entry: DetectorEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[DetectorEntry] {
        &self.entries
    }

    /// Entries for one PII type
    pub fn entries_for_type(&self, pii_type: PiiType) -> impl Iterator<Item = &DetectorEntry> {
        self.entries.iter().filter(move |e| e.pii_type == pii_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
