//! Job-listing collaborator shape.
//!
//! Search and scraping live outside this service; we only consume the record
//! shape the collaborator produces when composing comparison and letter
//! prompts. Wire keys match the collaborator's French field names.

use serde::{Deserialize, Serialize};

/// One job/internship posting as delivered by the external search collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(rename = "titre", default)]
    pub title: String,
    #[serde(rename = "entreprise", default)]
    pub company: String,
    #[serde(rename = "lieu", default)]
    pub location: String,
    #[serde(default)]
    pub url: String,
    /// Which search source produced the listing ("France Travail", "Indeed", ...).
    #[serde(default)]
    pub source: String,
    #[serde(rename = "type_contrat", default)]
    pub contract_type: String,
    #[serde(rename = "description_entreprise", default)]
    pub company_description: String,
    #[serde(default)]
    pub missions: String,
    #[serde(rename = "profil_recherche", default)]
    pub profile_sought: String,
}

/// Optional personal notes the candidate supplies for the cover letter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LetterExtras {
    #[serde(default)]
    pub motivation: String,
    #[serde(rename = "lien_entreprise", default)]
    pub company_link: String,
    #[serde(rename = "contraintes", default)]
    pub constraints: String,
}
