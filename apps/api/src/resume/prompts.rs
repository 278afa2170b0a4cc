//! Prompt construction for the extraction, comparison, and letter commands.
//!
//! The extraction prompt is a deterministic function of the raw résumé text:
//! the schema block below is embedded verbatim and nothing else varies, so
//! recovery can rely on a stable phrasing of the requested JSON shape. Field
//! names in the schema are the wire keys of `StructuredResume`.

use crate::listings::{JobListing, LetterExtras};
use crate::resume::models::{EducationEntry, ExperienceEntry, StructuredResume};

/// Extraction prompt. Replace `{cv_text}` before sending.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Voici le texte complet d'un CV. Analyse-le et convertis-le directement en JSON avec la structure suivante:

```json
{
  "prenom_nom": "string",
  "email": "string",
  "telephone": "string",
  "linkedin": "string (seulement le nom d'utilisateur, pas l'URL complète, ou vide si non présent)",
  "github": "string (seulement le nom d'utilisateur, pas l'URL complète, ou vide si non présent)",
  "competences_techniques": ["compétence technique 1"],
  "soft_skills": ["soft skill 1"],
  "langues": ["string (langue et niveau)"],
  "certifications": ["string (certification 1)"],
  "formation": [
    {"titre": "string", "etablissement": "string", "periode": "string", "details": ["string"]}
  ],
  "experience": [
    {"titre": "string", "entreprise": "string", "lieu": "string", "periode": "string", "details": ["string"]}
  ]
}
```

Instructions spéciales:
- Inclus TOUJOURS les champs "linkedin" et "github" dans le JSON, même s'ils sont vides ("").
- Pour LinkedIn, si tu trouves une URL comme "linkedin.com/in/nom-utilisateur", n'inclus que "nom-utilisateur".
- Pour GitHub, si tu trouves une URL comme "github.com/nom-utilisateur", n'inclus que "nom-utilisateur".
- IMPORTANT: Pour les compétences techniques, inclus UNIQUEMENT les langages de programmation, logiciels, et outils concrets.
  * Ne pas inclure les domaines de connaissances théoriques comme l'économie, la finance, les mathématiques, etc.
- Identifie et liste toutes les soft skills (compétences personnelles, interpersonnelles et transversales).
- CERTIFICATIONS: permis de conduire, certifications de langue (TOEIC, TOEFL, ...), certifications informatiques (PIX, ...). Liste vide si aucune.
- Tu dois ABSOLUMENT inclure tous les champs du schéma dans le JSON final, même s'ils sont vides (tableaux vides plutôt que champs omis).

Texte du CV:
{cv_text}

Retourne UNIQUEMENT le JSON sans aucun autre commentaire. Assure-toi que le format est valide."#;

/// Builds the extraction prompt for a raw résumé text. Deterministic: same
/// input, same prompt.
pub fn build_extraction_prompt(raw_text: &str) -> String {
    EXTRACTION_PROMPT_TEMPLATE.replace("{cv_text}", raw_text)
}

fn format_education(entries: &[EducationEntry]) -> String {
    if entries.is_empty() {
        return "Aucune formation mentionnée".to_string();
    }
    entries
        .iter()
        .map(|e| {
            let mut block = format!("- {} – {} ({})", e.title, e.institution, e.period);
            for detail in &e.details {
                block.push_str("\n  ");
                block.push_str(detail);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_experience(entries: &[ExperienceEntry]) -> String {
    if entries.is_empty() {
        return "Aucune expérience professionnelle mentionnée".to_string();
    }
    entries
        .iter()
        .map(|e| {
            let mut block = format!(
                "- {} – {}, {} ({})",
                e.title, e.organization, e.location, e.period
            );
            for detail in &e.details {
                block.push_str("\n  ");
                block.push_str(detail);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_list(items: &[String], empty_hint: &str) -> String {
    if items.is_empty() {
        empty_hint.to_string()
    } else {
        items.join(", ")
    }
}

fn format_resume_block(resume: &StructuredResume) -> String {
    format!(
        "Nom : {}\nEmail : {}\nTéléphone : {}\nLinkedIn : {}\nGitHub : {}\n\nFormation :\n{}\n\nExpériences :\n{}\n\nCompétences techniques : {}\nSoft skills : {}\nLangues : {}\nCertifications : {}",
        resume.full_name,
        resume.email,
        resume.phone,
        resume.linkedin,
        resume.github,
        format_education(&resume.education),
        format_experience(&resume.experience),
        format_list(&resume.technical_skills, "Aucune compétence technique mentionnée"),
        format_list(&resume.soft_skills, "Aucun soft skill mentionné"),
        format_list(&resume.languages, "Aucune langue mentionnée"),
        format_list(&resume.certifications, "Aucune certification mentionnée"),
    )
}

fn format_listing_block(listing: &JobListing) -> String {
    format!(
        "Titre : {}\nEntreprise : {}\nLieu : {}\nType de contrat : {}\nSource : {}\n\nDescription de l'entreprise :\n{}\n\nMissions :\n{}\n\nProfil recherché :\n{}",
        listing.title,
        listing.company,
        listing.location,
        listing.contract_type,
        listing.source,
        listing.company_description,
        listing.missions,
        listing.profile_sought,
    )
}

/// Builds the CV/listing compatibility prompt.
pub fn build_compare_prompt(resume: &StructuredResume, listing: &JobListing) -> String {
    format!(
        "Tu es un expert RH.\n\nVoici un CV et une offre d'emploi. Analyse en détail la compatibilité entre le profil et le poste.\n1. Réponds d'abord par \"oui\" si le profil correspond à plus de 70 % à l'offre, sinon réponds \"non\".\n2. Ensuite, liste les principales forces du candidat par rapport au poste (3 à 5 points).\n3. Liste les éventuels points à améliorer ou compétences manquantes (2 à 3 points).\n4. Donne un pourcentage approximatif de correspondance.\n\n--- CV ---\n{}\n\n--- Offre ---\n{}",
        format_resume_block(resume),
        format_listing_block(listing),
    )
}

/// Builds the cover-letter drafting prompt. The letter text comes back from
/// the provider as-is; document rendering is the renderer collaborator's job.
pub fn build_letter_prompt(
    resume: &StructuredResume,
    listing: &JobListing,
    extras: Option<&LetterExtras>,
) -> String {
    let mut extras_block = String::new();
    if let Some(extras) = extras {
        if !extras.motivation.is_empty() {
            extras_block.push_str(&format!("\nMotivation personnelle : {}", extras.motivation));
        }
        if !extras.company_link.is_empty() {
            extras_block.push_str(&format!(
                "\nLien particulier avec l'entreprise ou le secteur : {}",
                extras.company_link
            ));
        }
        if !extras.constraints.is_empty() {
            extras_block.push_str(&format!(
                "\nInformations supplémentaires : {}",
                extras.constraints
            ));
        }
    }
    if extras_block.is_empty() {
        extras_block = "Aucune information supplémentaire fournie.".to_string();
    }

    format!(
        "Tu es un expert RH et spécialiste de la rédaction de lettres de motivation professionnelles. Rédige une lettre complète, prête à être envoyée, en t'appuyant sur le CV du candidat et l'offre d'emploi ci-dessous.\n\nLa lettre doit impérativement :\n- Tenir sur une page (Word A4) avec un style direct et efficace.\n- Suivre ce plan structuré :\n    1. Présentation brève du candidat et de son parcours\n    2. Motivation sincère et cohérente pour le poste\n    3. Mise en lien entre l'entreprise/l'offre et les valeurs du candidat\n    4. Mise en avant ciblée des compétences et expériences correspondant aux missions\n    5. Remerciements, disponibilité pour un entretien, et formule de politesse\n\nStyle :\n- Zéro faute d'orthographe ou de grammaire.\n- Aucune formule générique ni tournure artificielle.\n- Le ton doit être confiant, positif, professionnel et chaleureux.\n- Ne propose aucun espace à compléter : tout doit être finalisé.\n\n--- CV ---\n{}\n\n--- Offre ---\n{}\n\n--- Informations complémentaires du candidat ---\n{}",
        format_resume_block(resume),
        format_listing_block(listing),
        extras_block,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resume() -> StructuredResume {
        StructuredResume {
            full_name: "Jean Dupont".to_string(),
            email: "jean@example.com".to_string(),
            technical_skills: vec!["Python".to_string(), "SQL".to_string()],
            experience: vec![ExperienceEntry {
                title: "Data Analyst".to_string(),
                organization: "ACME".to_string(),
                location: "Paris".to_string(),
                period: "2023-2024".to_string(),
                details: vec!["Tableaux de bord".to_string()],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_extraction_prompt_is_deterministic() {
        let a = build_extraction_prompt("Mon CV");
        let b = build_extraction_prompt("Mon CV");
        assert_eq!(a, b);
    }

    #[test]
    fn test_extraction_prompt_substitutes_raw_text_once() {
        let prompt = build_extraction_prompt("TEXTE_UNIQUE_DU_CV");
        assert!(prompt.contains("TEXTE_UNIQUE_DU_CV"));
        assert!(!prompt.contains("{cv_text}"));
    }

    #[test]
    fn test_extraction_prompt_names_every_schema_key() {
        let prompt = build_extraction_prompt("x");
        for key in [
            "prenom_nom",
            "email",
            "telephone",
            "linkedin",
            "github",
            "competences_techniques",
            "soft_skills",
            "langues",
            "certifications",
            "formation",
            "experience",
        ] {
            assert!(prompt.contains(key), "schema key {key} missing from prompt");
        }
    }

    #[test]
    fn test_compare_prompt_includes_both_sides() {
        let listing = JobListing {
            title: "Data Analyst".to_string(),
            company: "Globex".to_string(),
            ..Default::default()
        };
        let prompt = build_compare_prompt(&sample_resume(), &listing);
        assert!(prompt.contains("Jean Dupont"));
        assert!(prompt.contains("Globex"));
        assert!(prompt.contains("--- CV ---"));
        assert!(prompt.contains("--- Offre ---"));
    }

    #[test]
    fn test_letter_prompt_without_extras_says_so() {
        let prompt = build_letter_prompt(&sample_resume(), &JobListing::default(), None);
        assert!(prompt.contains("Aucune information supplémentaire fournie."));
    }

    #[test]
    fn test_letter_prompt_includes_extras_when_present() {
        let extras = LetterExtras {
            motivation: "Passion data".to_string(),
            ..Default::default()
        };
        let prompt = build_letter_prompt(&sample_resume(), &JobListing::default(), Some(&extras));
        assert!(prompt.contains("Motivation personnelle : Passion data"));
    }

    #[test]
    fn test_empty_sections_render_hints_not_blanks() {
        let prompt = build_compare_prompt(&StructuredResume::default(), &JobListing::default());
        assert!(prompt.contains("Aucune formation mentionnée"));
        assert!(prompt.contains("Aucune expérience professionnelle mentionnée"));
        assert!(prompt.contains("Aucune langue mentionnée"));
    }
}
