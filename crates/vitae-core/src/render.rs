//! PDF presentation of a stored resume record.
//!
//! Rendering mirrors extraction: backends are registered in priority order
//! and tried until one produces a document. A record with missing fields
//! still renders; absent sections are simply omitted.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;

use crate::resume::Resume;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;

const NAME_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 16.0;

/// Widest line that still fits the body font inside the margins.
const WRAP_COLUMNS: usize = 90;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No PDF rendering backend is available")]
    Unavailable,

    #[error("All rendering backends failed (tried: {})", tried.join(", "))]
    AllBackendsFailed { tried: Vec<&'static str> },
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Failure from a single backend attempt; the chain decides whether it is
/// terminal.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct RenderFailure(pub String);

pub trait RenderBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn render(&self, resume: &Resume) -> Result<Vec<u8>, RenderFailure>;
}

/// Prioritized chain of rendering backends.
pub struct PdfRenderer {
    backends: Vec<Box<dyn RenderBackend>>,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::with_default_backends()
    }
}

impl PdfRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_default_backends() -> Self {
        Self::new().with_backend(Box::new(LopdfRenderBackend))
    }

    #[must_use]
    pub fn with_backend(mut self, backend: Box<dyn RenderBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    #[must_use]
    pub fn available(&self) -> bool {
        !self.backends.is_empty()
    }

    pub fn render(&self, resume: &Resume) -> RenderResult<Vec<u8>> {
        if self.backends.is_empty() {
            return Err(RenderError::Unavailable);
        }

        let mut tried = Vec::new();
        for backend in &self.backends {
            tried.push(backend.name());
            match backend.render(resume) {
                Ok(bytes) => {
                    tracing::debug!(backend = backend.name(), bytes = bytes.len(), "rendered pdf");
                    return Ok(bytes);
                }
                Err(e) => {
                    tracing::warn!(backend = backend.name(), error = %e, "render backend failed");
                }
            }
        }

        Err(RenderError::AllBackendsFailed { tried })
    }
}

/// Pure-Rust backend assembling the PDF object tree directly.
pub struct LopdfRenderBackend;

struct Line {
    text: String,
    size: f32,
    gap_before: f32,
}

impl Line {
    fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: BODY_SIZE,
            gap_before: 0.0,
        }
    }

    fn heading(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: HEADING_SIZE,
            gap_before: LINE_HEIGHT / 2.0,
        }
    }
}

impl RenderBackend for LopdfRenderBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn render(&self, resume: &Resume) -> Result<Vec<u8>, RenderFailure> {
        let lines = layout(resume);

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut page_ids: Vec<Object> = Vec::new();
        for page_lines in paginate(&lines) {
            let mut operations = Vec::new();
            let mut cursor = PAGE_HEIGHT - MARGIN;
            for line in page_lines {
                cursor -= line.gap_before + LINE_HEIGHT;
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), line.size.into()]));
                operations.push(Operation::new("Td", vec![MARGIN.into(), cursor.into()]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(line.text.as_str())],
                ));
                operations.push(Operation::new("ET", vec![]));
            }

            let content = Content { operations };
            let encoded = content
                .encode()
                .map_err(|e| RenderFailure(format!("content stream encoding failed: {e}")))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_ids.push(page_id.into());
        }

        let page_count = page_ids.len();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids,
                "Count" => i64::try_from(page_count).unwrap_or(i64::MAX),
                "Resources" => resources_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    PAGE_WIDTH.into(),
                    PAGE_HEIGHT.into(),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| RenderFailure(format!("pdf serialization failed: {e}")))?;

        Ok(bytes)
    }
}

/// Flatten the record into styled lines, skipping absent sections.
fn layout(resume: &Resume) -> Vec<Line> {
    let mut lines = Vec::new();

    let mut name_line = Line::body(resume.display_name());
    name_line.size = NAME_SIZE;
    lines.push(name_line);

    let info = &resume.personal_info;
    let contact: Vec<&str> = [&info.email, &info.phone, &info.address]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .collect();
    if !contact.is_empty() {
        lines.push(Line::body(contact.join(" | ")));
    }
    let links: Vec<&str> = [&info.linkedin, &info.github, &info.website]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .collect();
    if !links.is_empty() {
        lines.push(Line::body(links.join(" | ")));
    }

    if let Some(summary) = info.summary.as_deref() {
        lines.push(Line::heading("Professional Summary"));
        push_wrapped(&mut lines, summary);
    }

    if !resume.experience.is_empty() {
        lines.push(Line::heading("Experience"));
        for entry in &resume.experience {
            let mut title = entry.position.clone().unwrap_or_default();
            if let Some(company) = entry.company.as_deref() {
                if title.is_empty() {
                    title = company.to_string();
                } else {
                    title = format!("{title} - {company}");
                }
            }
            if !title.is_empty() {
                lines.push(Line::body(title));
            }
            if let Some(dates) = date_range(entry.start_date.as_deref(), entry.end_date.as_deref())
            {
                lines.push(Line::body(dates));
            }
            if let Some(description) = entry.description.as_deref() {
                push_wrapped(&mut lines, description);
            }
            for achievement in &entry.achievements {
                push_wrapped(&mut lines, &format!("- {achievement}"));
            }
        }
    }

    if !resume.education.is_empty() {
        lines.push(Line::heading("Education"));
        for entry in &resume.education {
            let mut title = entry.degree.clone().unwrap_or_default();
            if let Some(institution) = entry.institution.as_deref() {
                if title.is_empty() {
                    title = institution.to_string();
                } else {
                    title = format!("{title}, {institution}");
                }
            }
            if !title.is_empty() {
                lines.push(Line::body(title));
            }
            if let Some(description) = entry.description.as_deref() {
                push_wrapped(&mut lines, description);
            }
        }
    }

    if !resume.skills.is_empty() {
        lines.push(Line::heading("Skills"));
        let names: Vec<&str> = resume.skills.iter().map(|s| s.name.as_str()).collect();
        push_wrapped(&mut lines, &names.join(", "));
    }

    if !resume.certifications.is_empty() {
        lines.push(Line::heading("Certifications"));
        for certification in &resume.certifications {
            push_wrapped(&mut lines, certification);
        }
    }

    if !resume.languages.is_empty() {
        lines.push(Line::heading("Languages"));
        lines.push(Line::body(resume.languages.join(", ")));
    }

    lines
}

fn date_range(start: Option<&str>, end: Option<&str>) -> Option<String> {
    match (start, end) {
        (Some(start), Some(end)) => Some(format!("{start} - {end}")),
        (Some(start), None) => Some(format!("{start} - Present")),
        (None, Some(end)) => Some(format!("Until {end}")),
        (None, None) => None,
    }
}

/// Greedy word wrap at the body column width.
fn push_wrapped(lines: &mut Vec<Line>, text: &str) {
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > WRAP_COLUMNS
        {
            lines.push(Line::body(std::mem::take(&mut current)));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(Line::body(current));
    }
}

fn paginate(lines: &[Line]) -> Vec<&[Line]> {
    let usable = PAGE_HEIGHT - 2.0 * MARGIN;
    let mut pages = Vec::new();
    let mut start = 0;
    let mut height = 0.0;

    for (i, line) in lines.iter().enumerate() {
        let line_height = line.gap_before + LINE_HEIGHT;
        if height + line_height > usable && i > start {
            pages.push(&lines[start..i]);
            start = i;
            height = 0.0;
        }
        height += line_height;
    }
    pages.push(&lines[start..]);
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::{EducationEntry, ExperienceEntry, SkillEntry};

    fn sample_resume() -> Resume {
        let mut resume = Resume::new();
        resume.personal_info.name = Some("Jane Doe".into());
        resume.personal_info.email = Some("jane.doe@example.com".into());
        resume.personal_info.summary = Some("Seasoned engineer.".into());
        resume
            .experience
            .push(ExperienceEntry::position("Software Engineer").with_company("ExampleCorp Inc"));
        resume
            .education
            .push(EducationEntry::institution("University of Example").with_degree("B.S."));
        resume.skills.push(SkillEntry::new("Python"));
        resume.certifications.push("AWS Certified Developer".into());
        resume.languages.push("English".into());
        resume
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let renderer = PdfRenderer::with_default_backends();
        let bytes = renderer.render(&sample_resume()).unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_render_empty_record_still_produces_pdf() {
        let renderer = PdfRenderer::with_default_backends();
        let bytes = renderer.render(&Resume::new()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_no_backends_is_unavailable() {
        let renderer = PdfRenderer::new();
        assert!(!renderer.available());
        let err = renderer.render(&Resume::new()).unwrap_err();
        assert!(matches!(err, RenderError::Unavailable));
    }

    #[test]
    fn test_failing_backend_reports_chain() {
        struct Broken;
        impl RenderBackend for Broken {
            fn name(&self) -> &'static str {
                "broken"
            }
            fn render(&self, _resume: &Resume) -> Result<Vec<u8>, RenderFailure> {
                Err(RenderFailure("font table missing".into()))
            }
        }

        let renderer = PdfRenderer::new().with_backend(Box::new(Broken));
        let err = renderer.render(&Resume::new()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::AllBackendsFailed { tried } if tried == ["broken"]
        ));
    }

    #[test]
    fn test_layout_skips_absent_sections() {
        let lines = layout(&Resume::new());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Unnamed Resume");
    }

    #[test]
    fn test_layout_orders_sections() {
        let lines = layout(&sample_resume());
        let headings: Vec<&str> = lines
            .iter()
            .filter(|l| (l.size - HEADING_SIZE).abs() < f32::EPSILON)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(
            headings,
            [
                "Professional Summary",
                "Experience",
                "Education",
                "Skills",
                "Certifications",
                "Languages"
            ]
        );
    }

    #[test]
    fn test_wrap_long_text() {
        let mut lines = Vec::new();
        let text = "word ".repeat(60);
        push_wrapped(&mut lines, &text);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.text.chars().count() <= WRAP_COLUMNS));
    }

    #[test]
    fn test_paginate_splits_long_documents() {
        let lines: Vec<Line> = (0..200).map(|i| Line::body(format!("line {i}"))).collect();
        let pages = paginate(&lines);
        assert!(pages.len() > 1);
        let total: usize = pages.iter().map(|p| p.len()).sum();
        assert_eq!(total, lines.len());
    }
}
