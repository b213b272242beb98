mod parser;
pub mod scraper;
pub mod types;

pub use parser::elo_on_date;
pub use scraper::{ScraperError, WebScraper};

pub(crate) const BASE_URL: &str = "http://api.clubelo.com";
