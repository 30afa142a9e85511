use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default proficiency assigned to skills found by keyword matching.
pub const DEFAULT_SKILL_LEVEL: &str = "Intermediate";
/// Default category assigned to skills found by keyword matching.
pub const DEFAULT_SKILL_CATEGORY: &str = "Technical";

/// Contact and identity fields. Every field is populated independently;
/// a heuristic that finds nothing leaves its field unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EducationEntry {
    #[must_use]
    pub fn institution(institution: impl Into<String>) -> Self {
        Self {
            institution: Some(institution.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_degree(mut self, degree: impl Into<String>) -> Self {
        self.degree = Some(degree.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<String>,
}

impl ExperienceEntry {
    #[must_use]
    pub fn position(position: impl Into<String>) -> Self {
        Self {
            position: Some(position.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    pub level: String,
    pub category: String,
}

impl SkillEntry {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: DEFAULT_SKILL_LEVEL.to_string(),
            category: DEFAULT_SKILL_CATEGORY.to_string(),
        }
    }
}

/// Metadata recorded after the enhancement stage ran (or failed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementMeta {
    pub enhanced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EnhancementMeta {
    #[must_use]
    pub fn success(timestamp: DateTime<Utc>) -> Self {
        Self {
            enhanced: true,
            timestamp: Some(timestamp),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            enhanced: false,
            timestamp: None,
            error: Some(error.into()),
        }
    }
}

/// The structured record exchanged with the storage and presentation
/// collaborators. Created fresh per upload, mutated through extraction and
/// enhancement, then owned by storage (which assigns `id` and
/// `last_updated`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhancement: Option<EnhancementMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Resume {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_name(&self) -> &str {
        self.personal_info
            .name
            .as_deref()
            .unwrap_or("Unnamed Resume")
    }

    pub fn is_enhanced(&self) -> bool {
        self.enhancement.as_ref().is_some_and(|m| m.enhanced)
    }
}

/// Listing entry returned by the storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub name: String,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_defaults() {
        let skill = SkillEntry::new("Rust");
        assert_eq!(skill.level, "Intermediate");
        assert_eq!(skill.category, "Technical");
    }

    #[test]
    fn test_resume_roundtrip() {
        let mut resume = Resume::new();
        resume.personal_info.name = Some("Jane Doe".into());
        resume.experience.push(
            ExperienceEntry::position("Software Engineer").with_company("ExampleCorp Inc"),
        );
        resume.skills.push(SkillEntry::new("Python"));
        resume.languages.push("English".into());

        let json = serde_json::to_string(&resume).unwrap();
        let back: Resume = serde_json::from_str(&json).unwrap();

        assert_eq!(resume, back);
    }

    #[test]
    fn test_display_name_fallback() {
        let resume = Resume::new();
        assert_eq!(resume.display_name(), "Unnamed Resume");
    }

    #[test]
    fn test_enhancement_meta() {
        let meta = EnhancementMeta::failure("backend iteration failed");
        assert!(!meta.enhanced);
        assert!(meta.error.is_some());

        let meta = EnhancementMeta::success(Utc::now());
        assert!(meta.enhanced);
        assert!(meta.error.is_none());
    }
}
