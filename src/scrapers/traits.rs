use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Failure to read something off a rendered page
#[derive(Debug, Error)]
pub enum PageError {
    #[error("no element matches {selector:?}")]
    NotFound { selector: String },
    #[error("timed out after {waited:?} waiting for {selector:?}")]
    Timeout { selector: String, waited: Duration },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PageError {
    pub fn kind(&self) -> &'static str {
        match self {
            PageError::NotFound { .. } => "element not found",
            PageError::Timeout { .. } => "wait timeout",
            PageError::Other(_) => "unexpected error",
        }
    }
}

/// CSS selectors locating the pieces of a room-rate page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Selectors {
    pub title: String,
    pub room_name: String,
    pub price: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            title: ".title-wrapper".to_string(),
            room_name: ".roomName".to_string(),
            price: ".cash".to_string(),
        }
    }
}

/// A rendered page rooms can be read from.
/// Implemented by live browser tabs and by saved HTML snapshots.
pub trait RoomPage {
    /// Text of the first element matching `selector`
    fn text_of(&self, selector: &str) -> Result<String, PageError>;

    /// Texts of all elements matching `selector`, in document order.
    /// At least one element must match.
    fn texts_of(&self, selector: &str) -> Result<Vec<String>, PageError>;
}
