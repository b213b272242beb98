use super::parser::{ParseError, parse_salary_table, parse_seasons};
use super::types::{COMPETITIONS, Currency, SalaryTable, Season};

use crate::client::{self, ScraperConfig};
use crate::types::{ParamError, Site, lookup_league};

use reqwest::Client;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    #[error(transparent)]
    InvalidParam(#[from] ParamError),
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
    season_root: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_config(ScraperConfig::default())
    }

    pub fn with_config(config: ScraperConfig) -> Result<Self, ScraperError> {
        Ok(Self {
            client: config.build_client(None)?,
            base_url: super::BASE_URL.to_string(),
            season_root: super::SEASON_ROOT.to_string(),
        })
    }

    /// Points league and season pages at `base_url` instead of capology.com.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        self.base_url = base.clone();
        self.season_root = base;
        self
    }

    pub fn league_url(&self, league: &str) -> Result<String, ScraperError> {
        let path = lookup_league(COMPETITIONS, league, Site::Capology)?;
        Ok(format!("{}/{}/salaries/", self.base_url, path))
    }

    pub async fn fetch_seasons(&self, league: &str) -> Result<Vec<Season>, ScraperError> {
        let url = self.league_url(league)?;
        log::info!("Fetching {} seasons from {}", league, url);
        let html = client::get_text(&self.client, &url).await?;
        Ok(parse_seasons(&html)?)
    }

    pub async fn fetch_valid_seasons(&self, league: &str) -> Result<Vec<String>, ScraperError> {
        Ok(self
            .fetch_seasons(league)
            .await?
            .into_iter()
            .map(|s| s.label)
            .collect())
    }

    pub async fn fetch_season_url(&self, year: &str, league: &str) -> Result<String, ScraperError> {
        let seasons = self.fetch_seasons(league).await?;
        let season = seasons.iter().find(|s| s.label == year).ok_or_else(|| {
            ParamError::InvalidYear {
                year: year.to_string(),
                league: league.to_string(),
                valid: seasons.iter().map(|s| s.label.clone()).collect(),
            }
        })?;
        Ok(format!("{}{}", self.season_root, season.url))
    }

    /// Scrapes every player salary of a league season.
    ///
    /// A timed out salary page is logged and yields an empty table.
    pub async fn fetch_salaries(
        &self,
        year: &str,
        league: &str,
        currency: Currency,
    ) -> Result<SalaryTable, ScraperError> {
        let season_url = self.fetch_season_url(year, league).await?;
        let separator = if season_url.contains('?') { '&' } else { '?' };
        let url = format!("{}{}currency={}", season_url, separator, currency.code());
        log::info!("Fetching {} {} salaries in {}...", year, league, currency);

        let html = match client::get_text(&self.client, &url).await {
            Ok(html) => html,
            // Already logged by get_text.
            Err(e) if e.is_timeout() => return Ok(SalaryTable::empty(currency)),
            Err(e) => return Err(e.into()),
        };

        let (layout, rows) = parse_salary_table(&html)?;
        log::info!("Parsed {} salary row(s)", rows.len());

        Ok(SalaryTable {
            layout,
            currency,
            rows,
        })
    }
}
