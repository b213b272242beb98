mod parser;
pub mod scraper;
pub mod types;

pub use scraper::{ScraperError, WebScraper};

pub(crate) const BASE_URL: &str = "https://www.capology.com";
pub(crate) const SEASON_ROOT: &str = "https://capology.com";
