use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use vaultfeed_core::{EntryLists, PipelineStage};
use vaultfeed_logging::{feed_debug, feed_info};

use crate::config::PipelineConfig;
use crate::decode::decode_page;
use crate::extract::{CatalogExtractor, ParseError, TableCatalogExtractor};
use crate::fetch::{PageFetcher, ReqwestFetcher};
use crate::novelty::NoveltyFilter;
use crate::render::{FeedRenderer, RenderError};
use crate::store::{EntryStore, JsonFileStore, StoreError};
use crate::FetchError;

/// Source of "now" for discovery and render timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("extraction failed: {0}")]
    Parse(#[from] ParseError),
    #[error("entry store failed: {0}")]
    Store(#[from] StoreError),
    #[error("feed rendering failed: {0}")]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// Stage that was running when the error occurred.
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::Fetch(_) => PipelineStage::Fetching,
            PipelineError::Parse(_) => PipelineStage::Extracting,
            PipelineError::Store(_) => PipelineStage::Filtering,
            PipelineError::Render(_) => PipelineStage::Rendering,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries announced in this run's feed.
    pub novel: EntryLists,
    /// Candidates dropped because their id was already stored or repeated an
    /// earlier row on the same page.
    pub skipped: usize,
    pub feed_path: PathBuf,
}

/// One fetch → extract → filter → render pass over the catalog.
///
/// Each step runs only if the previous one succeeded, so a failed fetch or
/// extraction never reaches the entry store.
pub struct Pipeline {
    config: PipelineConfig,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn CatalogExtractor>,
    store: Arc<dyn EntryStore>,
    renderer: FeedRenderer,
    clock: Clock,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            fetcher: Arc::new(ReqwestFetcher::new(config.fetch.clone())),
            extractor: Arc::new(TableCatalogExtractor),
            store: Arc::new(JsonFileStore::new(config.store_path.clone())),
            renderer: FeedRenderer::new(config.channel.clone()),
            clock: Arc::new(Utc::now),
            config,
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn CatalogExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn EntryStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        let mut stage = PipelineStage::Start;
        let result = self.run_stages(&mut stage).await;
        if let Err(err) = &result {
            stage = PipelineStage::Failed;
            feed_debug!("Pipeline stage: {} (while {})", stage, err.stage());
        }
        result
    }

    async fn run_stages(&self, stage: &mut PipelineStage) -> Result<RunSummary, PipelineError> {
        advance(stage);
        let page = self.fetcher.fetch(&self.config.catalog_url).await?;

        advance(stage);
        let decoded = decode_page(&page.bytes, page.metadata.content_type.as_deref())
            .map_err(ParseError::from)?;
        feed_debug!("Decoded catalog page as {}", decoded.encoding_label);
        let candidates = self.extractor.extract(&decoded.markup, (self.clock)())?;

        advance(stage);
        let outcome = NoveltyFilter::new(self.store.as_ref()).apply(candidates)?;
        let novel = outcome.novel;
        feed_info!(
            "Successfully retrieved {} new show(s) and {} new movie(s) from the catalog. Generating RSS",
            novel.shows.len(),
            novel.movies.len()
        );

        advance(stage);
        let document = self.renderer.render(&novel, (self.clock)())?;
        self.renderer.write(&document, &self.config.feed_path)?;
        feed_info!("Successfully generated RSS feed at {:?}", self.config.feed_path);

        advance(stage);
        Ok(RunSummary {
            novel,
            skipped: outcome.skipped,
            feed_path: self.config.feed_path.clone(),
        })
    }
}

fn advance(stage: &mut PipelineStage) {
    *stage = stage.next();
    feed_debug!("Pipeline stage: {}", stage);
}
