//! Heuristic field extraction from normalized resume text.
//!
//! Every heuristic is an independent pure function from text to an optional
//! or aggregate value. Absence of a match is a value-level "unset", never an
//! error; extraction is deterministic, so re-running it on identical text
//! yields identical records.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::resume::{
    EducationEntry, ExperienceEntry, PersonalInfo, Resume, SkillEntry,
};

/// Raw-text sample length attached to the record for audit/debug.
const RAW_TEXT_SAMPLE_CHARS: usize = 1000;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email regex")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("phone regex")
});

static LINKEDIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)linkedin\.com/in/[\w\-]+").expect("linkedin regex"));

static GITHUB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)github\.com/[\w\-]+").expect("github regex"));

static HORIZONTAL_WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("whitespace regex"));

/// Keyword-group regexes searched in order; the first one with a match
/// anywhere in the text selects the education window.
static EDUCATION_SECTION_RES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)education|academic|university|college|school|degree|bachelor|master|phd|diploma")
            .expect("education keyword regex"),
        Regex::new(r"(?i)b\.?s\.?|m\.?s\.?|m\.?a\.?|b\.?a\.?|ph\.?d\.?")
            .expect("degree abbreviation regex"),
    ]
});

static CERTIFICATION_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)certified|certification|certificate").expect("cert keyword regex"),
        Regex::new(r"(?i)aws|azure|google cloud|cisco|microsoft").expect("cert vendor regex"),
        Regex::new(r"(?i)pmp|scrum master|agile").expect("cert methodology regex"),
    ]
});

const INSTITUTION_KEYWORDS: [&str; 3] = ["university", "college", "school"];
const DEGREE_KEYWORDS: [&str; 5] = ["bachelor", "master", "degree", "b.s", "m.s"];

const TITLE_KEYWORDS: [&str; 5] = ["developer", "engineer", "manager", "analyst", "specialist"];
const COMPANY_KEYWORDS: [&str; 5] = ["inc", "corp", "ltd", "llc", "company"];

/// Window taken around the first education keyword match.
const EDUCATION_WINDOW_BEFORE: usize = 200;
const EDUCATION_WINDOW_AFTER: usize = 500;

/// Context window taken around each certification keyword match.
const CERTIFICATION_CONTEXT: usize = 30;

const SKILL_VOCABULARY: [&str; 30] = [
    "Python",
    "JavaScript",
    "Java",
    "C++",
    "C#",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "Django",
    "Flask",
    "Spring",
    "SQL",
    "MongoDB",
    "PostgreSQL",
    "AWS",
    "Azure",
    "Docker",
    "Kubernetes",
    "Git",
    "Linux",
    "Windows",
    "HTML",
    "CSS",
    "TypeScript",
    "PHP",
    "Ruby",
    "Go",
    "Rust",
    "Swift",
];

const LANGUAGE_VOCABULARY: [&str; 12] = [
    "English",
    "Spanish",
    "French",
    "German",
    "Italian",
    "Portuguese",
    "Chinese",
    "Japanese",
    "Korean",
    "Arabic",
    "Russian",
    "Hindi",
];

/// Parse normalized plain text into a structured resume record.
///
/// Enhancement metadata is left absent; the raw-text sample (first 1000
/// characters, with an ellipsis marker when truncated) is attached.
#[must_use]
pub fn parse_resume(text: &str) -> Resume {
    let text = normalize_whitespace(text);

    Resume {
        personal_info: extract_personal_info(&text),
        education: extract_education(&text),
        experience: extract_experience(&text),
        skills: extract_skills(&text),
        certifications: extract_certifications(&text),
        languages: extract_languages(&text),
        raw_text: Some(raw_text_sample(&text)),
        ..Resume::default()
    }
}

/// Collapse horizontal whitespace runs to single spaces. Newlines are kept
/// so line-based scans still see the document's line structure.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    HORIZONTAL_WS_RE.replace_all(text.trim(), " ").into_owned()
}

fn raw_text_sample(text: &str) -> String {
    let mut sample: String = text.chars().take(RAW_TEXT_SAMPLE_CHARS).collect();
    if text.chars().count() > RAW_TEXT_SAMPLE_CHARS {
        sample.push_str("...");
    }
    sample
}

#[must_use]
pub fn extract_personal_info(text: &str) -> PersonalInfo {
    PersonalInfo {
        name: extract_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        linkedin: extract_linkedin(text),
        github: extract_github(text),
        ..PersonalInfo::default()
    }
}

#[must_use]
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

#[must_use]
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE.find(text).map(|m| m.as_str().to_string())
}

#[must_use]
pub fn extract_linkedin(text: &str) -> Option<String> {
    LINKEDIN_RE.find(text).map(|m| m.as_str().to_string())
}

#[must_use]
pub fn extract_github(text: &str) -> Option<String> {
    GITHUB_RE.find(text).map(|m| m.as_str().to_string())
}

/// First of the leading five lines that is non-empty, has at most four
/// tokens, and contains no digit.
#[must_use]
pub fn extract_name(text: &str) -> Option<String> {
    text.lines().take(5).find_map(|line| {
        let line = line.trim();
        let qualifies = !line.is_empty()
            && line.split_whitespace().count() <= 4
            && !line.chars().any(char::is_numeric);
        qualifies.then(|| line.to_string())
    })
}

/// Accumulate-then-flush line scanner: a "start" line opens a new entry
/// (flushing any in-progress one), an "update" line mutates the current
/// entry, and the in-progress entry is flushed exactly once at scan end.
struct LineScan<T> {
    current: Option<T>,
    completed: Vec<T>,
}

impl<T> LineScan<T> {
    fn new() -> Self {
        Self {
            current: None,
            completed: Vec::new(),
        }
    }

    fn start(&mut self, entry: T) {
        if let Some(previous) = self.current.replace(entry) {
            self.completed.push(previous);
        }
    }

    fn update(&mut self, apply: impl FnOnce(&mut T)) {
        if let Some(current) = self.current.as_mut() {
            apply(current);
        }
    }

    fn finish(mut self) -> Vec<T> {
        if let Some(current) = self.current.take() {
            self.completed.push(current);
        }
        self.completed
    }
}

fn contains_any(line_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| line_lower.contains(k))
}

/// Locate the education section via the keyword-group regexes, then
/// line-scan a window around the first match.
#[must_use]
pub fn extract_education(text: &str) -> Vec<EducationEntry> {
    let Some(window) = education_window(text) else {
        return Vec::new();
    };

    let mut scan = LineScan::new();
    for line in window.lines() {
        let line = line.trim();
        let lower = line.to_lowercase();
        if contains_any(&lower, &INSTITUTION_KEYWORDS) {
            scan.start(EducationEntry::institution(line));
        } else if contains_any(&lower, &DEGREE_KEYWORDS) {
            scan.update(|entry| entry.degree = Some(line.to_string()));
        }
    }
    scan.finish()
}

fn education_window(text: &str) -> Option<&str> {
    let m = EDUCATION_SECTION_RES.iter().find_map(|re| re.find(text))?;

    let start = window_start(text, m.start(), EDUCATION_WINDOW_BEFORE);
    let end = window_end(text, m.end(), EDUCATION_WINDOW_AFTER);
    Some(&text[start..end])
}

/// Whole-text line scan: title-keyword lines start entries, company-keyword
/// lines set the company on the current entry.
#[must_use]
pub fn extract_experience(text: &str) -> Vec<ExperienceEntry> {
    let mut scan = LineScan::new();
    for line in text.lines() {
        let line = line.trim();
        let lower = line.to_lowercase();
        if contains_any(&lower, &TITLE_KEYWORDS) {
            scan.start(ExperienceEntry::position(line));
        } else if contains_any(&lower, &COMPANY_KEYWORDS) {
            scan.update(|entry| entry.company = Some(line.to_string()));
        }
    }
    scan.finish()
}

/// Fixed-vocabulary substring matching. Output order follows the vocabulary,
/// not the text; substring collisions ("Java" inside "JavaScript") are an
/// accepted limitation.
#[must_use]
pub fn extract_skills(text: &str) -> Vec<SkillEntry> {
    let lower = text.to_lowercase();
    SKILL_VOCABULARY
        .iter()
        .filter(|skill| lower.contains(&skill.to_lowercase()))
        .map(|skill| SkillEntry::new(*skill))
        .collect()
}

/// Every keyword match across the three groups contributes a trimmed
/// context window; the result is deduplicated on exact window equality and
/// emitted in sorted order to keep extraction idempotent.
#[must_use]
pub fn extract_certifications(text: &str) -> Vec<String> {
    let mut contexts = BTreeSet::new();

    for re in CERTIFICATION_RES.iter() {
        for m in re.find_iter(text) {
            let start = window_start(text, m.start(), CERTIFICATION_CONTEXT);
            let end = window_end(text, m.end(), CERTIFICATION_CONTEXT);
            contexts.insert(text[start..end].trim().to_string());
        }
    }

    contexts.into_iter().collect()
}

#[must_use]
pub fn extract_languages(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    LANGUAGE_VOCABULARY
        .iter()
        .filter(|lang| lower.contains(&lang.to_lowercase()))
        .map(ToString::to_string)
        .collect()
}

/// Byte index `count` characters before `index`, clamped to the text start.
/// Windows count characters, not bytes, so non-ASCII text gets the same
/// reach as ASCII.
fn window_start(s: &str, index: usize, count: usize) -> usize {
    s[..index]
        .char_indices()
        .rev()
        .take(count)
        .last()
        .map_or(index, |(i, _)| i)
}

/// Byte index `count` characters after `index`, clamped to the text end.
fn window_end(s: &str, index: usize, count: usize) -> usize {
    s[index..]
        .char_indices()
        .nth(count)
        .map_or(s.len(), |(i, _)| index + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JANE: &str = "Jane Doe\njane.doe@example.com\n555-123-4567\nUniversity of Example\nBachelor of Science\nSoftware Engineer\nExampleCorp Inc";

    #[test]
    fn test_reference_resume() {
        let resume = parse_resume(JANE);

        assert_eq!(resume.personal_info.name.as_deref(), Some("Jane Doe"));
        assert_eq!(
            resume.personal_info.email.as_deref(),
            Some("jane.doe@example.com")
        );
        assert!(resume
            .personal_info
            .phone
            .as_deref()
            .unwrap()
            .contains("555-123-4567"));

        assert_eq!(resume.education.len(), 1);
        assert_eq!(
            resume.education[0].institution.as_deref(),
            Some("University of Example")
        );
        assert_eq!(
            resume.education[0].degree.as_deref(),
            Some("Bachelor of Science")
        );

        assert_eq!(resume.experience.len(), 1);
        assert_eq!(
            resume.experience[0].position.as_deref(),
            Some("Software Engineer")
        );
        assert_eq!(
            resume.experience[0].company.as_deref(),
            Some("ExampleCorp Inc")
        );
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let first = parse_resume(JANE);
        let second = parse_resume(JANE);
        assert_eq!(first, second);
    }

    #[test]
    fn test_name_skips_lines_with_digits() {
        let text = "123 Main Street\nJane Doe\n";
        assert_eq!(extract_name(text).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_name_rejects_long_lines() {
        let text = "A very long headline that is not a name at all\n42\n";
        assert_eq!(extract_name(text), None);
    }

    #[test]
    fn test_no_email_is_unset() {
        assert_eq!(extract_email("no contact details here"), None);
    }

    #[test]
    fn test_phone_with_country_code() {
        let phone = extract_phone("Call +1 (555) 000-0000 today").unwrap();
        assert!(phone.contains("555"));
        assert!(phone.contains("0000"));
    }

    #[test]
    fn test_profile_links() {
        let text = "see LinkedIn.com/in/jane-doe and GitHub.com/janedoe";
        assert_eq!(
            extract_linkedin(text).as_deref(),
            Some("LinkedIn.com/in/jane-doe")
        );
        assert_eq!(extract_github(text).as_deref(), Some("GitHub.com/janedoe"));
    }

    #[test]
    fn test_skills_follow_vocabulary_order() {
        // Text order is Rust-first; output must follow vocabulary order.
        let skills = extract_skills("Rust and Python and Docker");
        let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "Docker", "Rust"]);
        assert!(skills.iter().all(|s| s.level == "Intermediate"));
    }

    #[test]
    fn test_skill_substring_collision_accepted() {
        // "Java" matches inside "JavaScript"; both entries are emitted.
        let skills = extract_skills("Expert in JavaScript");
        let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["JavaScript", "Java"]);
    }

    #[test]
    fn test_certifications_deduplicate() {
        let certs = extract_certifications("AWS Certified. AWS Certified.");
        let unique: BTreeSet<&String> = certs.iter().collect();
        assert_eq!(unique.len(), certs.len());
        assert!(!certs.is_empty());
    }

    #[test]
    fn test_certification_context_counts_characters() {
        // 30 two-byte characters each side plus the 3-char match itself.
        let text = format!("{}AWS{}", "ü".repeat(40), "ü".repeat(40));
        let certs = extract_certifications(&text);
        assert_eq!(certs.len(), 1);
        assert_eq!(certs[0].chars().count(), 63);
    }

    #[test]
    fn test_degree_line_without_institution_is_dropped() {
        // An "update" line before any "start" line has no entry to attach to.
        let entries = extract_education("degree\nBachelor of Arts\n");
        assert!(entries.is_empty());
    }

    #[test]
    fn test_education_empty_without_keywords() {
        assert!(extract_education("nothing relevant here").is_empty());
    }

    #[test]
    fn test_experience_flushes_final_entry() {
        let entries = extract_experience("Senior Developer\nAcme Corp\nStaff Engineer\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].company.as_deref(), Some("Acme Corp"));
        assert_eq!(entries[1].company, None);
    }

    #[test]
    fn test_languages_vocabulary_order() {
        let langs = extract_languages("Fluent in Spanish and English");
        assert_eq!(langs, vec!["English", "Spanish"]);
    }

    #[test]
    fn test_normalize_preserves_newlines() {
        let normalized = normalize_whitespace("Jane\t Doe\nNext   Line");
        assert_eq!(normalized, "Jane Doe\nNext Line");
    }

    #[test]
    fn test_raw_text_sample_truncation() {
        let long = "x".repeat(1500);
        let resume = parse_resume(&long);
        let sample = resume.raw_text.unwrap();
        assert!(sample.ends_with("..."));
        assert_eq!(sample.chars().count(), 1003);

        let short = parse_resume("short");
        assert_eq!(short.raw_text.as_deref(), Some("short"));
    }
}
