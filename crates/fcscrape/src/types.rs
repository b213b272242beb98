use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    Capology,
    ClubElo,
    Transfermarkt,
}

impl Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Site::Capology => write!(f, "Capology"),
            Site::ClubElo => write!(f, "ClubElo"),
            Site::Transfermarkt => write!(f, "Transfermarkt"),
        }
    }
}

/// Rejected user-supplied parameters. Raised before any page is parsed.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    #[error("Invalid league '{league}' for {site}. Valid leagues: {}", .valid.join(", "))]
    InvalidLeague {
        league: String,
        site: Site,
        valid: Vec<String>,
    },
    #[error("Invalid year '{year}' for {league}. Valid years: {}", .valid.join(", "))]
    InvalidYear {
        year: String,
        league: String,
        valid: Vec<String>,
    },
    #[error("Invalid currency '{0}'. Accepted values: 'eur', 'gbp', 'usd'")]
    InvalidCurrency(String),
    #[error("No ClubElo ratings found for team '{0}'")]
    InvalidTeam(String),
}

/// A record that can be flattened into one CSV/TSV row.
pub trait Tabular {
    fn headers() -> Vec<&'static str>;
    fn record(&self) -> Vec<String>;
}

/// Resolves `league` against a site's competition table.
pub(crate) fn lookup_league<'a>(
    competitions: &'a [(&'static str, &'static str)],
    league: &str,
    site: Site,
) -> Result<&'a str, ParamError> {
    competitions
        .iter()
        .find(|(name, _)| *name == league)
        .map(|(_, target)| *target)
        .ok_or_else(|| ParamError::InvalidLeague {
            league: league.to_string(),
            site,
            valid: competitions
                .iter()
                .map(|(name, _)| name.to_string())
                .collect(),
        })
}
