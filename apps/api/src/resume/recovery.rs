//! Structured payload recovery — turns a raw model completion into a
//! fully-populated [`StructuredResume`].
//!
//! Two paths, tried in order:
//! 1. JSON path: isolate a single candidate span (fenced block first, then
//!    outermost brace span), parse it, and decode field by field.
//! 2. Heuristic fallback: a line-based section parser over the original raw
//!    text, reached only when no candidate parses as a JSON object.
//!
//! Both paths always yield a résumé with all 11 canonical keys. The only
//! error is an empty completion; callers distinguish the paths via the
//! out-of-band [`Confidence`] flag.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::AppError;
use crate::resume::fallback::parse_unstructured;
use crate::resume::models::{Confidence, RecoveredResume, StructuredResume};

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Recovers a structured résumé from a raw completion.
///
/// Fails only when `completion` is empty or whitespace; any other input
/// produces a résumé, at worst the schema skeleton from the fallback path.
pub fn recover(completion: &str) -> Result<RecoveredResume, AppError> {
    if completion.trim().is_empty() {
        return Err(AppError::Recovery(
            "provider returned an empty completion".to_string(),
        ));
    }

    if let Some(candidate) = isolate_json(completion) {
        if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(candidate) {
            return Ok(RecoveredResume {
                resume: decode_fields(&obj),
                confidence: Confidence::Json,
            });
        }
        debug!("candidate span is not a JSON object, using heuristic fallback");
    }

    // Fallback works on the original text, not the failed candidate.
    Ok(RecoveredResume {
        resume: parse_unstructured(completion),
        confidence: Confidence::Fallback,
    })
}

/// Selects exactly one candidate JSON span from free-form text.
///
/// A ```json fenced block takes priority; otherwise the outermost span from
/// the first `{` to the last `}`. Returns `None` when neither shape exists.
pub fn isolate_json(text: &str) -> Option<&str> {
    fenced_block(text).or_else(|| brace_span(text))
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE_OPEN)? + FENCE_OPEN.len();
    let rest = &text[start..];
    let end = rest.find(FENCE_CLOSE)?;
    Some(rest[..end].trim())
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Decodes every canonical field independently from a parsed JSON object.
///
/// A key that is missing, or present with the wrong shape, yields that
/// field's type-correct default without disturbing the other fields.
fn decode_fields(obj: &Map<String, Value>) -> StructuredResume {
    StructuredResume {
        full_name: field(obj, "prenom_nom"),
        email: field(obj, "email"),
        phone: field(obj, "telephone"),
        linkedin: field(obj, "linkedin"),
        github: field(obj, "github"),
        education: field(obj, "formation"),
        experience: field(obj, "experience"),
        technical_skills: field(obj, "competences_techniques"),
        soft_skills: field(obj, "soft_skills"),
        languages: field(obj, "langues"),
        certifications: field(obj, "certifications"),
    }
}

fn field<T: DeserializeOwned + Default>(obj: &Map<String, Value>, key: &str) -> T {
    obj.get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"{
        "prenom_nom": "Jean Dupont",
        "email": "jean@example.com",
        "telephone": "+33 6 00 00 00 00",
        "linkedin": "jdupont",
        "github": "jdupont",
        "competences_techniques": ["Python", "SQL"],
        "soft_skills": ["Communication"],
        "langues": ["Anglais: C1"],
        "certifications": ["TOEIC"],
        "formation": [{"titre": "Master", "etablissement": "X", "periode": "2020-2022", "details": []}],
        "experience": [{"titre": "Dev", "entreprise": "ACME", "lieu": "Paris", "periode": "2022", "details": ["Rust"]}]
    }"#;

    #[test]
    fn test_pure_json_takes_json_path() {
        let recovered = recover(WELL_FORMED).unwrap();
        assert_eq!(recovered.confidence, Confidence::Json);
        assert_eq!(recovered.resume.full_name, "Jean Dupont");
        assert_eq!(recovered.resume.experience[0].organization, "ACME");
    }

    #[test]
    fn test_recovery_is_idempotent_on_well_formed_json() {
        let first = recover(WELL_FORMED).unwrap();
        let second = recover(WELL_FORMED).unwrap();
        assert_eq!(first.resume, second.resume);
        assert_eq!(first.confidence, second.confidence);
    }

    #[test]
    fn test_all_keys_present_after_recovery() {
        let recovered = recover(r#"{"prenom_nom":"A"}"#).unwrap();
        let json = serde_json::to_value(&recovered.resume).unwrap();
        for key in [
            "prenom_nom",
            "email",
            "telephone",
            "linkedin",
            "github",
            "formation",
            "experience",
            "competences_techniques",
            "soft_skills",
            "langues",
            "certifications",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn test_fenced_block_takes_priority_over_outer_braces() {
        let text = concat!(
            "Here is commentary with a decoy {\"prenom_nom\": \"Wrong\"} before the payload.\n",
            "```json\n{\"prenom_nom\": \"Right\"}\n```\n",
            "And a trailing decoy {\"prenom_nom\": \"Also wrong\"}."
        );
        let recovered = recover(text).unwrap();
        assert_eq!(recovered.confidence, Confidence::Json);
        assert_eq!(recovered.resume.full_name, "Right");
    }

    #[test]
    fn test_prose_wrapped_json_uses_brace_span() {
        let text = "Voici le JSON demandé :\n{\"prenom_nom\": \"Marie Curie\"}\nBonne journée.";
        let recovered = recover(text).unwrap();
        assert_eq!(recovered.confidence, Confidence::Json);
        assert_eq!(recovered.resume.full_name, "Marie Curie");
    }

    #[test]
    fn test_malformed_json_falls_back_instead_of_failing() {
        let recovered = recover("Voici le CV: {not valid json").unwrap();
        assert_eq!(recovered.confidence, Confidence::Fallback);
        assert_eq!(recovered.resume.full_name, "");
        assert!(recovered.resume.technical_skills.is_empty());
    }

    #[test]
    fn test_fallback_parses_labeled_lines_and_bullets() {
        let recovered = recover("Nom: Jean Dupont\nCompetences: Python, SQL\n- Go\n").unwrap();
        assert_eq!(recovered.confidence, Confidence::Fallback);
        assert_eq!(recovered.resume.full_name, "Jean Dupont");
        assert_eq!(recovered.resume.technical_skills, vec!["Python", "SQL", "Go"]);
    }

    #[test]
    fn test_missing_fields_backfilled_with_defaults() {
        let recovered = recover(r#"{"prenom_nom":"A"}"#).unwrap();
        assert_eq!(recovered.resume.email, "");
        assert_eq!(recovered.resume.linkedin, "");
        assert!(recovered.resume.education.is_empty());
        assert!(recovered.resume.soft_skills.is_empty());
    }

    #[test]
    fn test_wrong_shaped_field_defaults_without_disturbing_others() {
        let recovered = recover(
            r#"{"prenom_nom": "A", "competences_techniques": "Python", "email": "a@b.c"}"#,
        )
        .unwrap();
        assert_eq!(recovered.confidence, Confidence::Json);
        assert_eq!(recovered.resume.full_name, "A");
        assert_eq!(recovered.resume.email, "a@b.c");
        assert!(recovered.resume.technical_skills.is_empty());
    }

    #[test]
    fn test_empty_input_is_a_recovery_error() {
        assert!(matches!(recover(""), Err(AppError::Recovery(_))));
        assert!(matches!(recover("   \n  "), Err(AppError::Recovery(_))));
    }

    #[test]
    fn test_json_array_payload_falls_back() {
        let recovered = recover(r#"["not", "an", "object"]"#).unwrap();
        assert_eq!(recovered.confidence, Confidence::Fallback);
    }

    #[test]
    fn test_isolate_json_prefers_fence() {
        let text = "intro {\"a\":1} ```json\n{\"b\":2}\n``` outro";
        assert_eq!(isolate_json(text), Some("{\"b\":2}"));
    }

    #[test]
    fn test_isolate_json_none_without_braces_or_fence() {
        assert_eq!(isolate_json("plain prose only"), None);
    }

    #[test]
    fn test_isolate_json_unterminated_fence_falls_to_brace_span() {
        let text = "```json\n{\"a\": 1}";
        assert_eq!(isolate_json(text), Some("{\"a\": 1}"));
    }
}
