use super::parser::{ParseError, elo_on_date, parse_elo_csv};
use super::types::EloRecord;

use crate::client::{self, ScraperConfig};
use crate::types::ParamError;

use chrono::NaiveDate;
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
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_config(ScraperConfig::default())
    }

    pub fn with_config(config: ScraperConfig) -> Result<Self, ScraperError> {
        Ok(Self {
            client: config.build_client(None)?,
            base_url: super::BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Full rating history of `team`, named as in the clubelo.com URL (e.g. `ManCity`).
    pub async fn fetch_team_history(&self, team: &str) -> Result<Vec<EloRecord>, ScraperError> {
        let team = team.trim();
        if team.is_empty() || team.contains('/') {
            return Err(ParamError::InvalidTeam(team.to_string()).into());
        }

        let url = format!("{}/{}", self.base_url, team);
        log::info!("Fetching ELO history for {}...", team);
        let text = client::get_text(&self.client, &url).await?;

        let history = parse_elo_csv(&text)?;
        if history.is_empty() {
            return Err(ParamError::InvalidTeam(team.to_string()).into());
        }
        Ok(history)
    }

    /// `None` when the team has no rating on `date`.
    pub async fn fetch_team_on_date(
        &self,
        team: &str,
        date: NaiveDate,
    ) -> Result<Option<f64>, ScraperError> {
        let history = self.fetch_team_history(team).await?;
        let elo = elo_on_date(&history, date);
        if elo.is_none() {
            log::warn!("{} has no ELO rating on {}", team, date);
        }
        Ok(elo)
    }

    /// Every club rated on `date`, in ranking order.
    pub async fn fetch_ranking_on_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<EloRecord>, ScraperError> {
        let url = format!("{}/{}", self.base_url, date.format("%Y-%m-%d"));
        log::info!("Fetching ELO ranking for {}...", date);
        let text = client::get_text(&self.client, &url).await?;
        Ok(parse_elo_csv(&text)?)
    }
}
