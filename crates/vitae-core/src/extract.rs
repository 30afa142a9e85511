use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported format: {0} (only pdf and docx are accepted)")]
    UnsupportedFormat(String),
    #[error("All {kind} backends failed ({tried} tried)")]
    AllBackendsFailed { kind: DocumentKind, tried: usize },
}

pub type ExtractResult<T> = Result<T, ExtractError>;

/// A single backend refusing a document. Never fatal on its own; the
/// extractor moves on to the next backend in the chain.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BackendFailure(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which declared types the configured backend chain can decode. Computed
/// once when the extractor is built and never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub pdf: bool,
    pub docx: bool,
}

impl Capabilities {
    #[must_use]
    pub const fn supports(self, kind: DocumentKind) -> bool {
        match kind {
            DocumentKind::Pdf => self.pdf,
            DocumentKind::Docx => self.docx,
        }
    }

    #[must_use]
    pub const fn any(self) -> bool {
        self.pdf || self.docx
    }
}

pub trait TextBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn kind(&self) -> DocumentKind;

    fn extract(&self, bytes: &[u8]) -> Result<String, BackendFailure>;
}

/// Layout-aware whole-document PDF extraction. Preferred over the paged
/// backend because it handles multi-column text and whitespace better.
pub struct LayoutPdfBackend;

impl TextBackend for LayoutPdfBackend {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, BackendFailure> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| BackendFailure(e.to_string()))
    }
}

/// Basic per-page text pull, concatenated with newline separators.
pub struct PagedPdfBackend;

impl TextBackend for PagedPdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, BackendFailure> {
        let doc = lopdf::Document::load_mem(bytes).map_err(|e| BackendFailure(e.to_string()))?;

        let mut text = String::new();
        for page_number in doc.get_pages().keys() {
            let page_text = doc
                .extract_text(&[*page_number])
                .map_err(|e| BackendFailure(e.to_string()))?;
            text.push_str(&page_text);
            text.push('\n');
        }

        Ok(text)
    }
}

/// DOCX paragraph texts concatenated with newline separators.
pub struct ParagraphDocxBackend;

impl TextBackend for ParagraphDocxBackend {
    fn name(&self) -> &'static str {
        "docx-rs"
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::Docx
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, BackendFailure> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| BackendFailure(e.to_string()))?;

        let mut text = String::new();
        for child in &docx.document.children {
            if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
                text.push_str(&paragraph_text(paragraph));
                text.push('\n');
            }
        }

        Ok(text)
    }
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut content = String::new();
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let docx_rs::RunChild::Text(text) = run_child {
                    content.push_str(&text.text);
                }
            }
        }
    }
    content
}

/// Decodes a raw document byte buffer into plain text by trying the
/// registered backends for the declared type in preference order until one
/// succeeds.
pub struct TextExtractor {
    backends: Vec<Box<dyn TextBackend>>,
}

impl TextExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// The full chain: layout-aware PDF extraction first, paged pull as the
    /// PDF fallback, paragraph concatenation for DOCX.
    #[must_use]
    pub fn with_default_backends() -> Self {
        Self::new()
            .with_backend(Box::new(LayoutPdfBackend))
            .with_backend(Box::new(PagedPdfBackend))
            .with_backend(Box::new(ParagraphDocxBackend))
    }

    #[must_use]
    pub fn with_backend(mut self, backend: Box<dyn TextBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            pdf: self.backends.iter().any(|b| b.kind() == DocumentKind::Pdf),
            docx: self.backends.iter().any(|b| b.kind() == DocumentKind::Docx),
        }
    }

    /// Resolve the declared extension, rejecting anything that is not
    /// pdf/docx before any backend runs.
    pub fn kind_for(filename: &str) -> ExtractResult<DocumentKind> {
        let ext = filename.rsplit('.').next().unwrap_or_default();
        DocumentKind::from_extension(ext)
            .ok_or_else(|| ExtractError::UnsupportedFormat(ext.to_string()))
    }

    pub fn extract(&self, bytes: &[u8], kind: DocumentKind) -> ExtractResult<String> {
        let mut tried = 0;

        for backend in self.backends.iter().filter(|b| b.kind() == kind) {
            tried += 1;
            match backend.extract(bytes) {
                Ok(text) => {
                    tracing::info!(backend = backend.name(), %kind, "extracted document text");
                    return Ok(text);
                }
                Err(e) => {
                    tracing::warn!(backend = backend.name(), %kind, error = %e, "backend failed");
                }
            }
        }

        Err(ExtractError::AllBackendsFailed { kind, tried })
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::with_default_backends()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBackend {
        kind: DocumentKind,
        result: Result<&'static str, &'static str>,
    }

    impl TextBackend for FixedBackend {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn kind(&self) -> DocumentKind {
            self.kind
        }

        fn extract(&self, _bytes: &[u8]) -> Result<String, BackendFailure> {
            self.result
                .map(String::from)
                .map_err(|e| BackendFailure(e.to_string()))
        }
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_extension("PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension("docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_extension("txt"), None);
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let err = TextExtractor::kind_for("resume.txt").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(ext) if ext == "txt"));
    }

    #[test]
    fn test_fallback_to_second_backend() {
        let extractor = TextExtractor::new()
            .with_backend(Box::new(FixedBackend {
                kind: DocumentKind::Pdf,
                result: Err("corrupt xref"),
            }))
            .with_backend(Box::new(FixedBackend {
                kind: DocumentKind::Pdf,
                result: Ok("recovered text"),
            }));

        let text = extractor.extract(b"%PDF-", DocumentKind::Pdf).unwrap();
        assert_eq!(text, "recovered text");
    }

    #[test]
    fn test_all_backends_exhausted() {
        let extractor = TextExtractor::new().with_backend(Box::new(FixedBackend {
            kind: DocumentKind::Pdf,
            result: Err("corrupt"),
        }));

        let err = extractor.extract(b"", DocumentKind::Pdf).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::AllBackendsFailed {
                kind: DocumentKind::Pdf,
                tried: 1
            }
        ));
    }

    #[test]
    fn test_capabilities_follow_registration() {
        let extractor = TextExtractor::new().with_backend(Box::new(FixedBackend {
            kind: DocumentKind::Docx,
            result: Ok(""),
        }));

        let caps = extractor.capabilities();
        assert!(!caps.pdf);
        assert!(caps.docx);
        assert!(!caps.supports(DocumentKind::Pdf));
    }

    #[test]
    fn test_default_chain_covers_both_kinds() {
        let caps = TextExtractor::with_default_backends().capabilities();
        assert!(caps.pdf);
        assert!(caps.docx);
    }
}
