pub mod capology;
pub mod client;
pub mod clubelo;
pub mod transfermarkt;
pub mod types;
pub mod utils;

pub use client::ScraperConfig;
pub use types::{ParamError, Site, Tabular};
