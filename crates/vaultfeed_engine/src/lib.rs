//! Vaultfeed engine: fetch, extraction, persistence and feed rendering.
mod config;
mod decode;
mod extract;
mod fetch;
mod novelty;
mod persist;
mod pipeline;
mod render;
mod store;
mod types;

pub use config::{
    PipelineConfig, DEFAULT_CATALOG_URL, DEFAULT_FEED_PATH, DEFAULT_STORE_PATH, FEED_PATH_ENV,
};
pub use decode::{decode_page, DecodeError, DecodedPage};
pub use extract::{CatalogExtractor, ParseError, TableCatalogExtractor};
pub use fetch::{FetchSettings, PageFetcher, ReqwestFetcher};
pub use novelty::NoveltyFilter;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{Clock, Pipeline, PipelineError, RunSummary};
pub use render::{format_rss_date, FeedChannel, FeedRenderer, RenderError};
pub use store::{EntryStore, JsonFileStore, StoreError};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
