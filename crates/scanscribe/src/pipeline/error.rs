use crate::error::ProcessError;

/// Why a document contributed nothing before OCR began.
#[derive(Debug)]
pub enum SkipReason {
    NotFound(ProcessError),
    OpenFailed(ProcessError),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(e) | Self::OpenFailed(e) => write!(f, "{}", e),
        }
    }
}

/// Non-fatal problems on individual pages.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineWarning {
    PageRenderFailed { page_number: u32, error: String },
    PageOcrFailed { page_number: u32, error: String },
}
