//! Read-only catalog of consultation types and practitioners.
//!
//! The wizard never owns reference data; it borrows it from a [`Catalog`]
//! implementation injected at construction. [`StaticCatalog`] holds an
//! in-memory table, either the built-in defaults or a JSON catalog document.

mod builtin;

pub use builtin::*;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{ConsultationType, Practitioner};

/// Minimum similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.80;

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    ConsultationType,
    Practitioner,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::ConsultationType => f.write_str("consultation type"),
            EntryKind::Practitioner => f.write_str("practitioner"),
        }
    }
}

/// Catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unknown {kind} '{id}'{}", .suggestion.as_ref().map(|s| format!(" (did you mean '{}'?)", s)).unwrap_or_default())]
    NotFound {
        kind: EntryKind,
        id: String,
        suggestion: Option<String>,
    },

    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: EntryKind, id: String },

    #[error("Invalid catalog entry: {0}")]
    Invalid(String),

    #[error("Catalog document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog file error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Source of bookable reference data.
pub trait Catalog: Send + Sync {
    /// All consultation types, in display order.
    fn consultation_types(&self) -> &[ConsultationType];

    /// All practitioners, in display order.
    fn practitioners(&self) -> &[Practitioner];

    /// Look up a consultation type by id.
    fn consultation_type(&self, id: &str) -> CatalogResult<&ConsultationType> {
        let entries = self.consultation_types();
        entries
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CatalogError::NotFound {
                kind: EntryKind::ConsultationType,
                id: id.to_string(),
                suggestion: suggest(id, entries.iter().map(|c| c.id.as_str())),
            })
    }

    /// Look up a practitioner by id.
    fn practitioner(&self, id: &str) -> CatalogResult<&Practitioner> {
        let entries = self.practitioners();
        entries
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::NotFound {
                kind: EntryKind::Practitioner,
                id: id.to_string(),
                suggestion: suggest(id, entries.iter().map(|p| p.id.as_str())),
            })
    }
}

/// Closest known id to `query`, if any is close enough.
pub fn suggest<'a>(query: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    candidates
        .map(|candidate| (candidate, jaro_winkler(&query, &candidate.to_lowercase())))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(candidate, _)| candidate.to_string())
}

/// On-disk catalog document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    pub consultation_types: Vec<ConsultationType>,
    pub practitioners: Vec<Practitioner>,
}

/// In-memory catalog table.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticCatalog {
    consultation_types: Vec<ConsultationType>,
    practitioners: Vec<Practitioner>,
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StaticCatalog {
    /// Create a catalog, rejecting duplicate ids and unbookable practitioners.
    pub fn new(
        consultation_types: Vec<ConsultationType>,
        practitioners: Vec<Practitioner>,
    ) -> CatalogResult<Self> {
        check_ids(
            EntryKind::ConsultationType,
            consultation_types.iter().map(|c| c.id.as_str()),
        )?;
        check_ids(EntryKind::Practitioner, practitioners.iter().map(|p| p.id.as_str()))?;

        for practitioner in &practitioners {
            if practitioner.available_weekdays.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "practitioner '{}' has no available days",
                    practitioner.id
                )));
            }
            if practitioner.time_slots.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "practitioner '{}' has no time slots",
                    practitioner.id
                )));
            }
        }

        debug!(
            "Catalog loaded: {} consultation types, {} practitioners",
            consultation_types.len(),
            practitioners.len()
        );

        Ok(Self {
            consultation_types,
            practitioners,
        })
    }

    /// Parse a catalog document.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::new(document.consultation_types, document.practitioners)
    }

    /// Read a catalog document from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let path = path.as_ref();
        info!("Loading catalog from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Export as a catalog document.
    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            consultation_types: self.consultation_types.clone(),
            practitioners: self.practitioners.clone(),
        }
    }
}

impl Catalog for StaticCatalog {
    fn consultation_types(&self) -> &[ConsultationType] {
        &self.consultation_types
    }

    fn practitioners(&self) -> &[Practitioner] {
        &self.practitioners
    }
}

fn check_ids<'a>(kind: EntryKind, ids: impl Iterator<Item = &'a str>) -> CatalogResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(CatalogError::Invalid(format!("{} with empty id", kind)));
        }
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TimeSlot};
    use chrono::Weekday;

    fn practitioner(id: &str) -> Practitioner {
        let mut p = Practitioner::new(id.into(), id.into());
        p.available_weekdays = vec![Weekday::Mon];
        p.time_slots = vec![TimeSlot::new(9, 0).unwrap()];
        p
    }

    #[test]
    fn test_lookup_found() {
        let catalog = StaticCatalog::builtin();
        let consultation = catalog.consultation_type("comprehensive").unwrap();
        assert_eq!(consultation.standard_price, Money::from_dollars(250));
        assert_eq!(catalog.practitioner("sarah-patel").unwrap().name, "Dr. Sarah Patel");
    }

    #[test]
    fn test_lookup_missing_with_suggestion() {
        let catalog = StaticCatalog::builtin();

        match catalog.practitioner("sarah-patl") {
            Err(CatalogError::NotFound { kind, id, suggestion }) => {
                assert_eq!(kind, EntryKind::Practitioner);
                assert_eq!(id, "sarah-patl");
                assert_eq!(suggestion.as_deref(), Some("sarah-patel"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }

        match catalog.consultation_type("zzz") {
            Err(CatalogError::NotFound { suggestion, .. }) => assert!(suggestion.is_none()),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_message() {
        let err = StaticCatalog::builtin().consultation_type("comprehensiv").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown consultation type 'comprehensiv' (did you mean 'comprehensive'?)"
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = StaticCatalog::new(vec![], vec![practitioner("a"), practitioner("a")]);
        assert!(matches!(result, Err(CatalogError::DuplicateId { .. })));
    }

    #[test]
    fn test_practitioner_without_slots_rejected() {
        let mut p = practitioner("a");
        p.time_slots.clear();
        assert!(matches!(
            StaticCatalog::new(vec![], vec![p]),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn test_document_roundtrip_preserves_builtin() {
        let catalog = StaticCatalog::builtin();
        let json = serde_json::to_string(&catalog.to_document()).unwrap();
        let reloaded = StaticCatalog::from_json(&json).unwrap();
        assert_eq!(reloaded, catalog);
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            StaticCatalog::from_json("{\"consultationTypes\": 5}"),
            Err(CatalogError::Json(_))
        ));
    }
}
