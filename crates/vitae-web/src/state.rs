use std::sync::Arc;

use vitae_core::{Enhancer, PdfRenderer, Storage, TextExtractor, UploadPipeline};

/// Application state shared across all requests.
///
/// The enhancer is shared between the pipeline and the standalone
/// enhancement endpoint, so both report the same backend status.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub pipeline: Arc<UploadPipeline>,
    pub enhancer: Arc<Enhancer>,
    pub renderer: Arc<PdfRenderer>,
}

impl AppState {
    pub async fn new(db_path: &str) -> anyhow::Result<Self> {
        let storage = Arc::new(Storage::open(db_path).await?);
        Ok(Self::with_storage(storage))
    }

    pub async fn new_in_memory() -> anyhow::Result<Self> {
        let storage = Arc::new(Storage::open_memory().await?);
        Ok(Self::with_storage(storage))
    }

    fn with_storage(storage: Arc<Storage>) -> Self {
        let enhancer = Arc::new(Enhancer::from_env());
        let extractor = TextExtractor::with_default_backends();
        let pipeline = Arc::new(UploadPipeline::new(extractor, Arc::clone(&enhancer)));

        Self {
            storage,
            pipeline,
            enhancer,
            renderer: Arc::new(PdfRenderer::with_default_backends()),
        }
    }
}
