pub mod enhance;
pub mod error;
pub mod extract;
pub mod parse;
pub mod pipeline;
pub mod render;
pub mod resume;
pub mod storage;

pub use enhance::{Enhancer, GeminiClient};
pub use error::{Error, Result};
pub use extract::{Capabilities, DocumentKind, TextExtractor};
pub use pipeline::{PipelineOutput, ProcessingInfo, RawDocument, UploadPipeline};
pub use render::PdfRenderer;
pub use resume::{
    EducationEntry, EnhancementMeta, ExperienceEntry, PersonalInfo, Resume, ResumeSummary,
    SkillEntry,
};
pub use storage::Storage;
