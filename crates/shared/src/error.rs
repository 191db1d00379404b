use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageException {
    #[error("unknown template {template}: {message}")]
    MissingTemplate { template: String, message: String },
    #[error("failed to render {template}: {message}")]
    Render { template: String, message: String },
}

impl PageException {
    pub fn template(&self) -> &str {
        match self {
            Self::MissingTemplate { template, .. } | Self::Render { template, .. } => template,
        }
    }
}

/// What the error page shows when another page could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageError {
    pub template: String,
    pub detail: String,
}

impl From<&PageException> for PageError {
    fn from(value: &PageException) -> Self {
        Self {
            template: value.template().to_string(),
            detail: value.to_string(),
        }
    }
}
