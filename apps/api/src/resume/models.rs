//! The normalized résumé schema shared by the prompt contract and recovery.
//!
//! Wire keys are the French field names the extraction prompt requests, so a
//! well-formed model completion deserializes directly. Every field carries
//! `#[serde(default)]`: a key the model omitted backfills to its type-correct
//! default instead of failing the whole payload.

use serde::{Deserialize, Serialize};

/// One education entry, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(rename = "titre", default)]
    pub title: String,
    #[serde(rename = "etablissement", default)]
    pub institution: String,
    #[serde(rename = "periode", default)]
    pub period: String,
    #[serde(default)]
    pub details: Vec<String>,
}

/// One professional experience entry, in document order
/// (most-recent-first by convention, not enforced).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(rename = "titre", default)]
    pub title: String,
    #[serde(rename = "entreprise", default)]
    pub organization: String,
    #[serde(rename = "lieu", default)]
    pub location: String,
    #[serde(rename = "periode", default)]
    pub period: String,
    #[serde(default)]
    pub details: Vec<String>,
}

/// The canonical structured résumé. All 11 keys are always present after
/// recovery; list fields default to empty lists, string fields to empty
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredResume {
    #[serde(rename = "prenom_nom", default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "telephone", default)]
    pub phone: String,
    /// Bare handle, not a full URL (prompt contract).
    #[serde(default)]
    pub linkedin: String,
    /// Bare handle, not a full URL (prompt contract).
    #[serde(default)]
    pub github: String,
    #[serde(rename = "formation", default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(rename = "competences_techniques", default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    /// Free-form "language: level" strings.
    #[serde(rename = "langues", default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

/// Which recovery path produced the résumé. Out-of-band signal only; both
/// paths return the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// The model's completion contained a parseable JSON payload.
    Json,
    /// The heuristic line parser reconstructed the schema from loose text.
    Fallback,
}

/// Recovery output: a fully-populated résumé plus the confidence flag.
#[derive(Debug, Clone, Serialize)]
pub struct RecoveredResume {
    pub resume: StructuredResume,
    pub confidence: Confidence,
}
