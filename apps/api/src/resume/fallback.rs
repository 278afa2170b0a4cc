//! Heuristic fallback parser — rebuilds the résumé schema from loosely
//! structured "Key: value" / bullet-list text when the model's completion
//! carries no parseable JSON.
//!
//! Modeled as a small state machine: one cursor holding the active section,
//! two input classes (labeled line, bullet line), and a single table mapping
//! recognized labels (French and English synonyms) to fields. Bullets under
//! education/experience are ignored — entries are not reconstructed on this
//! path, a documented limitation. The parser never fails; worst case it
//! returns the schema skeleton with whatever scalar fields matched.

use crate::resume::models::StructuredResume;

/// A labeled line shorter than this (key side) is considered a section or
/// field header; anything longer is prose that happens to contain a colon.
const MAX_LABEL_LEN: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarField {
    FullName,
    Email,
    Phone,
    Linkedin,
    Github,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Education,
    Experience,
    TechnicalSkills,
    SoftSkills,
    Languages,
    Certifications,
}

#[derive(Debug, Clone, Copy)]
enum Label {
    Scalar(ScalarField),
    Section(Section),
}

/// The label table. Keys are matched after trimming and lowercasing.
fn lookup_label(key: &str) -> Option<Label> {
    use ScalarField::*;
    use Section::*;
    let label = match key {
        "nom" | "prenom_nom" | "prénom et nom" | "nom complet" | "name" | "full name" => {
            Label::Scalar(FullName)
        }
        "email" | "courriel" | "e-mail" | "mail" => Label::Scalar(Email),
        "telephone" | "téléphone" | "tel" | "tél" | "phone" => Label::Scalar(Phone),
        "linkedin" | "profil linkedin" => Label::Scalar(Linkedin),
        "github" => Label::Scalar(Github),
        "formation" | "formations" | "education" | "études" | "etudes" => {
            Label::Section(Education)
        }
        "experience" | "expérience" | "experiences" | "expériences" | "work experience"
        | "professional experience" => Label::Section(Experience),
        "competences" | "compétences" | "competences techniques" | "compétences techniques"
        | "skills" | "technical skills" => Label::Section(TechnicalSkills),
        "soft skills" | "compétences comportementales" | "competences comportementales" => {
            Label::Section(SoftSkills)
        }
        "langues" | "langue" | "languages" | "language" => Label::Section(Languages),
        "certifications" | "certification" => Label::Section(Certifications),
        _ => return None,
    };
    Some(label)
}

enum LineClass<'a> {
    Labeled(Label, &'a str),
    Bullet(&'a str),
    Other,
}

fn classify(line: &str) -> LineClass<'_> {
    if let Some((key, value)) = line.split_once(':') {
        let key = key.trim();
        if key.chars().count() < MAX_LABEL_LEN {
            if let Some(label) = lookup_label(&key.to_lowercase()) {
                return LineClass::Labeled(label, value.trim());
            }
        }
    }
    if let Some(rest) = line.strip_prefix('-').or_else(|| line.strip_prefix('•')) {
        return LineClass::Bullet(rest.trim());
    }
    LineClass::Other
}

/// Parses loosely structured text into the canonical schema.
pub fn parse_unstructured(text: &str) -> StructuredResume {
    let mut resume = StructuredResume::default();
    let mut current: Option<Section> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match classify(line) {
            LineClass::Labeled(Label::Scalar(field), value) => {
                let slot = match field {
                    ScalarField::FullName => &mut resume.full_name,
                    ScalarField::Email => &mut resume.email,
                    ScalarField::Phone => &mut resume.phone,
                    ScalarField::Linkedin => &mut resume.linkedin,
                    ScalarField::Github => &mut resume.github,
                };
                *slot = value.to_string();
            }
            LineClass::Labeled(Label::Section(section), value) => {
                current = Some(section);
                if !value.is_empty() {
                    if let Some(list) = section_list_mut(&mut resume, section) {
                        list.extend(
                            value
                                .split(',')
                                .map(|v| v.trim().to_string())
                                .filter(|v| !v.is_empty()),
                        );
                    }
                }
            }
            LineClass::Bullet(value) => {
                if let Some(list) = current.and_then(|s| section_list_mut(&mut resume, s)) {
                    list.push(value.to_string());
                }
            }
            LineClass::Other => {}
        }
    }

    resume
}

/// The flat-list sections a bullet can feed. Education and experience hold
/// structured entries and are not reconstructed here.
fn section_list_mut(resume: &mut StructuredResume, section: Section) -> Option<&mut Vec<String>> {
    match section {
        Section::TechnicalSkills => Some(&mut resume.technical_skills),
        Section::SoftSkills => Some(&mut resume.soft_skills),
        Section::Languages => Some(&mut resume.languages),
        Section::Certifications => Some(&mut resume.certifications),
        Section::Education | Section::Experience => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_fields_written_directly() {
        let resume = parse_unstructured(
            "Nom: Jean Dupont\nEmail: jean@example.com\nTéléphone: 06 12 34 56 78\nGithub: jdupont",
        );
        assert_eq!(resume.full_name, "Jean Dupont");
        assert_eq!(resume.email, "jean@example.com");
        assert_eq!(resume.phone, "06 12 34 56 78");
        assert_eq!(resume.github, "jdupont");
    }

    #[test]
    fn test_inline_value_seeds_section_then_bullets_append() {
        let resume = parse_unstructured("Competences: Python, SQL\n- Go\n• Rust");
        assert_eq!(resume.technical_skills, vec!["Python", "SQL", "Go", "Rust"]);
    }

    #[test]
    fn test_english_labels_recognized() {
        let resume = parse_unstructured("Full name: Ada Lovelace\nSkills: Mathematics Engine");
        assert_eq!(resume.full_name, "Ada Lovelace");
        assert_eq!(resume.technical_skills, vec!["Mathematics Engine"]);
    }

    #[test]
    fn test_bullets_without_active_section_ignored() {
        let resume = parse_unstructured("- orphan bullet\nLangues: Anglais");
        assert!(resume.technical_skills.is_empty());
        assert_eq!(resume.languages, vec!["Anglais"]);
    }

    #[test]
    fn test_bullets_under_education_ignored() {
        let resume = parse_unstructured("Formation:\n- Master Informatique\nLangues: Anglais");
        assert!(resume.education.is_empty());
        assert_eq!(resume.languages, vec!["Anglais"]);
    }

    #[test]
    fn test_section_switch_moves_cursor() {
        let resume = parse_unstructured(
            "Soft skills: Communication\n- Leadership\nCertifications:\n- TOEIC",
        );
        assert_eq!(resume.soft_skills, vec!["Communication", "Leadership"]);
        assert_eq!(resume.certifications, vec!["TOEIC"]);
    }

    #[test]
    fn test_long_colon_line_is_not_a_label() {
        let resume = parse_unstructured(
            "Voici un résumé détaillé du parcours professionnel du candidat: rien à extraire",
        );
        assert_eq!(resume, StructuredResume::default());
    }

    #[test]
    fn test_bullet_with_colon_stays_a_bullet() {
        // "anglais" is not a recognized label, so the line classifies as a bullet.
        let resume = parse_unstructured("Langues:\n- Anglais: C1");
        assert_eq!(resume.languages, vec!["Anglais: C1"]);
    }

    #[test]
    fn test_worst_case_returns_skeleton() {
        let resume = parse_unstructured("free prose with no structure at all");
        assert_eq!(resume, StructuredResume::default());
    }
}
