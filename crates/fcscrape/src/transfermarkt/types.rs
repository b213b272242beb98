use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::types::Tabular;

/// League name and competition page path, relative to the site root.
pub(crate) const COMPETITIONS: &[(&str, &str)] = &[
    ("EPL", "premier-league/startseite/wettbewerb/GB1"),
    ("EFL Championship", "championship/startseite/wettbewerb/GB2"),
    ("EFL1", "league-one/startseite/wettbewerb/GB3"),
    ("EFL2", "league-two/startseite/wettbewerb/GB4"),
    ("Bundesliga", "bundesliga/startseite/wettbewerb/L1"),
    ("2.Bundesliga", "2-bundesliga/startseite/wettbewerb/L2"),
    ("Serie A", "serie-a/startseite/wettbewerb/IT1"),
    ("Serie B", "serie-b/startseite/wettbewerb/IT2"),
    ("La Liga", "laliga/startseite/wettbewerb/ES1"),
    ("La Liga 2", "laliga2/startseite/wettbewerb/ES2"),
    ("Ligue 1", "ligue-1/startseite/wettbewerb/FR1"),
    ("Ligue 2", "ligue-2/startseite/wettbewerb/FR2"),
    ("Eredivisie", "eredivisie/startseite/wettbewerb/NL1"),
    ("Scottish PL", "scottish-premiership/startseite/wettbewerb/SC1"),
    ("Super Lig", "super-lig/startseite/wettbewerb/TR1"),
    ("Jupiler Pro League", "jupiler-pro-league/startseite/wettbewerb/BE1"),
    ("Liga Nos", "liga-nos/startseite/wettbewerb/PO1"),
    ("Russian Premier League", "premier-liga/startseite/wettbewerb/RU1"),
    (
        "Brasileirao",
        "campeonato-brasileiro-serie-a/startseite/wettbewerb/BRA1",
    ),
    ("Argentina Liga Profesional", "superliga/startseite/wettbewerb/AR1N"),
    ("MLS", "major-league-soccer/startseite/wettbewerb/MLS1"),
];

/// League names accepted by the Transfermarkt scraper.
pub fn leagues() -> Vec<&'static str> {
    COMPETITIONS.iter().map(|(name, _)| *name).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub label: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketValuePoint {
    pub date: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub season: String,
    pub date: String,
    pub left: String,
    pub joined: String,
    pub market_value: String,
    pub fee: String,
}

impl Display for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}: {} → {} (MV {}, fee {})",
            self.season, self.date, self.left, self.joined, self.market_value, self.fee
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub url: String,
    pub name: String,
    pub value: Option<String>,
    pub value_last_updated: Option<String>,
    pub date_of_birth: Option<String>,
    pub age: Option<u32>,
    pub height_m: Option<f64>,
    pub nationality: Option<String>,
    pub citizenship: Vec<String>,
    pub position: Option<String>,
    pub other_positions: Vec<String>,
    pub team: Option<String>,
    pub last_club: Option<String>,
    pub since: Option<String>,
    pub joined: Option<String>,
    pub contract_expiration: Option<String>,
    pub market_value_history: Vec<MarketValuePoint>,
    pub transfer_history: Vec<Transfer>,
}

impl Display for PlayerProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name)?;
        if let Some(position) = &self.position {
            write!(f, "  Position: {}", position)?;
            if !self.other_positions.is_empty() {
                write!(f, " (also {})", self.other_positions.join(", "))?;
            }
            writeln!(f)?;
        }
        if let Some(team) = &self.team {
            writeln!(f, "  Team: {}", team)?;
        }
        if let Some(dob) = &self.date_of_birth {
            write!(f, "  Born: {}", dob)?;
            if let Some(age) = self.age {
                write!(f, " (age {})", age)?;
            }
            writeln!(f)?;
        }
        if let Some(height) = self.height_m {
            writeln!(f, "  Height: {:.2} m", height)?;
        }
        if !self.citizenship.is_empty() {
            writeln!(f, "  Citizenship: {}", self.citizenship.join(", "))?;
        }
        if let Some(value) = &self.value {
            write!(f, "  Market value: {}", value)?;
            if let Some(updated) = &self.value_last_updated {
                write!(f, " (updated {})", updated)?;
            }
            writeln!(f)?;
        }
        if let Some(expiry) = &self.contract_expiration {
            writeln!(f, "  Contract expires: {}", expiry)?;
        }
        if !self.market_value_history.is_empty() {
            writeln!(
                f,
                "  Market value points: {}",
                self.market_value_history.len()
            )?;
        }
        for transfer in &self.transfer_history {
            writeln!(f, "    ▸ {}", transfer)?;
        }
        Ok(())
    }
}

impl Tabular for PlayerProfile {
    fn headers() -> Vec<&'static str> {
        vec![
            "Name",
            "Value",
            "Value last updated",
            "DOB",
            "Age",
            "Height (m)",
            "Nationality",
            "Citizenship",
            "Position",
            "Other positions",
            "Team",
            "Last club",
            "Since",
            "Joined",
            "Contract expiration",
            "URL",
        ]
    }

    fn record(&self) -> Vec<String> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            self.name.clone(),
            opt(&self.value),
            opt(&self.value_last_updated),
            opt(&self.date_of_birth),
            self.age.map(|a| a.to_string()).unwrap_or_default(),
            self.height_m.map(|h| format!("{:.2}", h)).unwrap_or_default(),
            opt(&self.nationality),
            self.citizenship.join("; "),
            opt(&self.position),
            self.other_positions.join("; "),
            opt(&self.team),
            opt(&self.last_club),
            opt(&self.since),
            opt(&self.joined),
            opt(&self.contract_expiration),
            self.url.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> PlayerProfile {
        PlayerProfile {
            url: "https://www.transfermarkt.us/lionel-messi/profil/spieler/28003".to_string(),
            name: "Lionel Messi".to_string(),
            value: Some("$38.50m".to_string()),
            value_last_updated: None,
            date_of_birth: Some("Jun 24, 1987".to_string()),
            age: Some(36),
            height_m: Some(1.70),
            nationality: Some("Argentina".to_string()),
            citizenship: vec!["Argentina".to_string(), "Spain".to_string()],
            position: Some("Right Winger".to_string()),
            other_positions: vec![],
            team: Some("Inter Miami CF".to_string()),
            last_club: None,
            since: None,
            joined: Some("Jul 15, 2023".to_string()),
            contract_expiration: None,
            market_value_history: vec![MarketValuePoint {
                date: "Dec 20, 2023".to_string(),
                value: 38_500_000,
            }],
            transfer_history: vec![],
        }
    }

    #[test]
    fn test_leagues_are_unique() {
        let mut names = leagues();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 21);
    }

    #[test]
    fn test_profile_record_matches_headers() {
        let profile = profile();
        let record = profile.record();
        assert_eq!(record.len(), PlayerProfile::headers().len());
        assert_eq!(record[5], "1.70");
        assert_eq!(record[7], "Argentina; Spain");
        assert_eq!(record[12], "");
    }

    #[test]
    fn test_profile_json_keeps_histories() {
        let json = serde_json::to_value(profile()).unwrap();
        assert_eq!(json["name"], "Lionel Messi");
        assert_eq!(json["last_club"], serde_json::Value::Null);
        assert_eq!(json["market_value_history"][0]["value"], 38_500_000);
        assert!(json["transfer_history"].as_array().unwrap().is_empty());
    }
}
