use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::types::Tabular;

/// One row of the ClubElo API: a club's rating over a date interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EloRecord {
    #[serde(rename(deserialize = "Rank"), deserialize_with = "csv::invalid_option")]
    pub rank: Option<u32>,
    #[serde(rename(deserialize = "Club"))]
    pub club: String,
    #[serde(rename(deserialize = "Country"))]
    pub country: String,
    #[serde(rename(deserialize = "Level"), deserialize_with = "csv::invalid_option")]
    pub level: Option<u8>,
    #[serde(rename(deserialize = "Elo"))]
    pub elo: f64,
    #[serde(rename(deserialize = "From"))]
    pub from: NaiveDate,
    #[serde(rename(deserialize = "To"))]
    pub to: NaiveDate,
}

impl EloRecord {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

impl Display for EloRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rank) = self.rank {
            write!(f, "#{:<4} ", rank)?;
        }
        write!(
            f,
            "{} ({}): {:.2} [{} to {}]",
            self.club, self.country, self.elo, self.from, self.to
        )
    }
}

impl Tabular for EloRecord {
    fn headers() -> Vec<&'static str> {
        vec!["Rank", "Club", "Country", "Level", "Elo", "From", "To"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.rank.map(|r| r.to_string()).unwrap_or_default(),
            self.club.clone(),
            self.country.clone(),
            self.level.map(|l| l.to_string()).unwrap_or_default(),
            self.elo.to_string(),
            self.from.to_string(),
            self.to.to_string(),
        ]
    }
}
