use std::fmt;

/// Steps of a single pipeline run, in execution order.
///
/// `Done` and `Failed` are terminal; any step's error moves the run straight
/// to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    Fetching,
    Extracting,
    Filtering,
    Rendering,
    Done,
    Failed,
}

impl PipelineStage {
    /// Next stage after a successful step. Terminal stages stay put.
    pub fn next(self) -> Self {
        match self {
            PipelineStage::Start => PipelineStage::Fetching,
            PipelineStage::Fetching => PipelineStage::Extracting,
            PipelineStage::Extracting => PipelineStage::Filtering,
            PipelineStage::Filtering => PipelineStage::Rendering,
            PipelineStage::Rendering | PipelineStage::Done => PipelineStage::Done,
            PipelineStage::Failed => PipelineStage::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }

    /// Whether a failure at this stage can have touched the entry store.
    pub fn may_have_written_store(self) -> bool {
        matches!(self, PipelineStage::Filtering | PipelineStage::Rendering)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PipelineStage::Start => "start",
            PipelineStage::Fetching => "fetching",
            PipelineStage::Extracting => "extracting",
            PipelineStage::Filtering => "filtering",
            PipelineStage::Rendering => "rendering",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(label)
    }
}
