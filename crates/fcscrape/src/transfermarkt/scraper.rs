use super::parser::{
    ParseError, parse_club_links, parse_player_links, parse_player_profile, parse_seasons,
};
use super::types::{COMPETITIONS, PlayerProfile, Season};

use crate::client::{self, BROWSER_USER_AGENT, ScraperConfig, absolute_url};
use crate::types::{ParamError, Site, lookup_league};

use futures::{StreamExt, stream};
use reqwest::Client;
use std::collections::BTreeSet;

const MAX_CONCURRENT_REQUESTS: usize = 4;

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

    /// Transfermarkt rejects tool user agents, so a desktop browser agent is the default.
    pub fn with_config(config: ScraperConfig) -> Result<Self, ScraperError> {
        Ok(Self {
            client: config.build_client(Some(BROWSER_USER_AGENT))?,
            base_url: super::BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn competition_url(&self, league: &str) -> Result<String, ScraperError> {
        let path = lookup_league(COMPETITIONS, league, Site::Transfermarkt)?;
        Ok(absolute_url(&self.base_url, path))
    }

    pub async fn fetch_valid_seasons(&self, league: &str) -> Result<Vec<Season>, ScraperError> {
        let url = self.competition_url(league)?;
        log::info!("Fetching {} seasons from {}", league, url);
        let html = client::get_text(&self.client, &url).await?;
        Ok(parse_seasons(&html)?)
    }

    pub async fn fetch_club_links(
        &self,
        year: &str,
        league: &str,
    ) -> Result<Vec<String>, ScraperError> {
        let seasons = self.fetch_valid_seasons(league).await?;
        let season = seasons.iter().find(|s| s.label == year).ok_or_else(|| {
            ParamError::InvalidYear {
                year: year.to_string(),
                league: league.to_string(),
                valid: seasons.iter().map(|s| s.label.clone()).collect(),
            }
        })?;

        let url = format!(
            "{}/plus/?saison_id={}",
            self.competition_url(league)?,
            season.id
        );
        log::info!("Fetching {} {} clubs...", year, league);
        let html = client::get_text(&self.client, &url).await?;

        Ok(parse_club_links(&html)?
            .iter()
            .map(|href| absolute_url(&self.base_url, href))
            .collect())
    }

    /// Deduplicated player profile URLs of every club in a league season.
    /// Club pages that fail are logged and skipped.
    pub async fn fetch_player_links(
        &self,
        year: &str,
        league: &str,
    ) -> Result<Vec<String>, ScraperError> {
        let club_links = self.fetch_club_links(year, league).await?;
        log::info!("Fetching squads of {} club(s)...", club_links.len());

        let results: Vec<_> = stream::iter(club_links.iter())
            .map(|url| async move { (url, self.fetch_squad_links(url).await) })
            .buffered(MAX_CONCURRENT_REQUESTS)
            .collect()
            .await;

        let mut links = BTreeSet::new();
        for (url, result) in results {
            match result {
                Ok(squad) => links.extend(squad),
                Err(e) => log::warn!("Failed to fetch squad {}: {}", url, e),
            }
        }

        Ok(links.into_iter().collect())
    }

    pub async fn fetch_player(&self, url_or_path: &str) -> Result<PlayerProfile, ScraperError> {
        let url = absolute_url(&self.base_url, url_or_path);
        log::debug!("Fetching player profile: {}", url);
        let html = client::get_text(&self.client, &url).await?;
        Ok(parse_player_profile(&html, &url)?)
    }

    /// Every player profile of a league season. Profiles that fail are logged and skipped.
    pub async fn fetch_players(
        &self,
        year: &str,
        league: &str,
    ) -> Result<Vec<PlayerProfile>, ScraperError> {
        let player_links = self.fetch_player_links(year, league).await?;
        let total = player_links.len();
        log::info!("Fetching {} {} player profiles ({})...", year, league, total);

        let results: Vec<_> = stream::iter(player_links.iter())
            .map(|url| async move { (url, self.fetch_player(url).await) })
            .buffered(MAX_CONCURRENT_REQUESTS)
            .collect()
            .await;

        let mut players = Vec::with_capacity(total);
        for (url, result) in results {
            match result {
                Ok(player) => players.push(player),
                Err(e) => log::warn!("Failed to fetch player {}: {}", url, e),
            }
        }

        log::info!(
            "Successfully fetched {} of {} player profiles",
            players.len(),
            total
        );
        Ok(players)
    }

    async fn fetch_squad_links(&self, club_url: &str) -> Result<Vec<String>, ScraperError> {
        let html = client::get_text(&self.client, club_url).await?;
        Ok(parse_player_links(&html)?
            .iter()
            .map(|href| absolute_url(&self.base_url, href))
            .collect())
    }
}
