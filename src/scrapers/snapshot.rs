use crate::scrapers::traits::{PageError, RoomPage};
use anyhow::{anyhow, Context, Result};
use scraper::{ElementRef, Html, Selector};
use std::path::Path;

/// A saved room-rate page, e.g. one captured into the debug directory
pub struct HtmlSnapshot {
    document: Html,
}

impl HtmlSnapshot {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        Ok(Self::parse(&html))
    }

    fn select<'a>(&'a self, selector: &str) -> Result<Vec<ElementRef<'a>>, PageError> {
        let parsed = Selector::parse(selector)
            .map_err(|e| PageError::Other(anyhow!("invalid selector {selector:?}: {e:?}")))?;
        let found: Vec<_> = self.document.select(&parsed).collect();
        if found.is_empty() {
            return Err(PageError::NotFound {
                selector: selector.to_string(),
            });
        }
        Ok(found)
    }
}

/// Approximates rendered text: one line per non-blank text node
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

impl RoomPage for HtmlSnapshot {
    fn text_of(&self, selector: &str) -> Result<String, PageError> {
        let found = self.select(selector)?;
        Ok(element_text(found[0]))
    }

    fn texts_of(&self, selector: &str) -> Result<Vec<String>, PageError> {
        Ok(self.select(selector)?.into_iter().map(element_text).collect())
    }
}
