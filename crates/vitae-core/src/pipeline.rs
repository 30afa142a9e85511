//! Upload pipeline: extractor, field parsing, enhancement, summary
//! regeneration, finalization.
//!
//! The central invariant is graceful degradation: only an unsupported
//! declared file type fails the upload. Extraction failures fall back to a
//! canonical mock record, and every enhancement failure degrades inside the
//! enhancement engine itself, so the pipeline always finalizes a record.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::enhance::Enhancer;
use crate::extract::{Capabilities, ExtractError, TextExtractor};
use crate::parse;
use crate::resume::{PersonalInfo, Resume};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unsupported file type: {0} (only pdf and docx are accepted)")]
    Rejected(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Received,
    Extracted,
    MockFallback,
    FieldsParsed,
    Enhanced,
    Finalized,
}

/// Input at the pipeline boundary: raw bytes plus the declared filename.
/// Never mutated.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl RawDocument {
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Provenance attached to every pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingInfo {
    pub used_mock_data: bool,
    pub extractor_available: bool,
    pub backend_configured: bool,
    pub duration_ms: u64,
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub resume: Resume,
    pub info: ProcessingInfo,
}

pub struct UploadPipeline {
    extractor: TextExtractor,
    enhancer: Arc<Enhancer>,
    capabilities: Capabilities,
}

impl UploadPipeline {
    /// Capabilities are computed once from the extractor's registered
    /// backends and never change for the life of the pipeline.
    #[must_use]
    pub fn new(extractor: TextExtractor, enhancer: Arc<Enhancer>) -> Self {
        let capabilities = extractor.capabilities();
        Self {
            extractor,
            enhancer,
            capabilities,
        }
    }

    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Run one upload through the full pipeline.
    ///
    /// Fails only on a rejected declared file type; every other failure
    /// mode degrades and the record still finalizes.
    pub async fn process(&self, document: &RawDocument) -> PipelineResult<PipelineOutput> {
        let start = Instant::now();
        tracing::info!(
            filename = %document.filename,
            size = document.bytes.len(),
            stage = ?PipelineStage::Received,
            "processing upload"
        );

        let kind = TextExtractor::kind_for(&document.filename).map_err(|e| match e {
            ExtractError::UnsupportedFormat(ext) => PipelineError::Rejected(ext),
            ExtractError::AllBackendsFailed { kind, .. } => {
                PipelineError::Rejected(kind.to_string())
            }
        })?;

        let (mut resume, used_mock) = if self.capabilities.supports(kind) {
            match self.extractor.extract(&document.bytes, kind) {
                Ok(text) => {
                    tracing::debug!(stage = ?PipelineStage::Extracted, chars = text.len(), "text extracted");
                    (parse::parse_resume(&text), false)
                }
                Err(e) => {
                    tracing::warn!(error = %e, stage = ?PipelineStage::MockFallback, "extraction failed; using mock resume data");
                    (mock_resume(), true)
                }
            }
        } else {
            tracing::warn!(%kind, stage = ?PipelineStage::MockFallback, "no extraction backend for this type; using mock resume data");
            (mock_resume(), true)
        };
        tracing::debug!(stage = ?PipelineStage::FieldsParsed, "fields parsed");

        resume = self.enhancer.enhance_resume(resume).await;

        let improved_summary = self.enhancer.generate_improved_summary(&resume).await;
        if !improved_summary.is_empty() {
            resume.personal_info.summary = Some(improved_summary);
        }
        tracing::debug!(stage = ?PipelineStage::Enhanced, "content enhanced");

        resume.original_filename = Some(document.filename.clone());
        resume.file_size = Some(document.bytes.len() as u64);
        resume.file_type = Some(kind.as_str().to_string());

        let info = ProcessingInfo {
            used_mock_data: used_mock,
            extractor_available: self.capabilities.supports(kind),
            backend_configured: self.enhancer.backend_configured(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        tracing::info!(
            stage = ?PipelineStage::Finalized,
            used_mock_data = info.used_mock_data,
            duration_ms = info.duration_ms,
            "upload finalized"
        );

        Ok(PipelineOutput { resume, info })
    }
}

/// Canonical mock record used when extraction is unavailable or fails.
/// Fixed fields, so a degraded upload is still deterministic.
#[must_use]
pub fn mock_resume() -> Resume {
    Resume {
        personal_info: PersonalInfo {
            name: Some("Parsed Resume".to_string()),
            email: Some("extracted@example.com".to_string()),
            phone: Some("+1 (555) 000-0000".to_string()),
            summary: Some("Professional extracted from uploaded resume".to_string()),
            ..PersonalInfo::default()
        },
        languages: vec!["English".to_string()],
        ..Resume::default()
    }
}
