pub mod browser;
pub mod ihg;
pub mod snapshot;
pub mod traits;
pub mod types;

pub use ihg::{extract_rooms, IhgScraper};
pub use snapshot::HtmlSnapshot;
pub use types::SearchRequest;
