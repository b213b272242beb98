use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::types::{ParamError, Tabular};

pub(crate) const COMPETITIONS: &[(&str, &str)] = &[
    ("Bundesliga", "de/1-bundesliga"),
    ("2.Bundesliga", "de/2-bundesliga"),
    ("EPL", "uk/premier-league"),
    ("EFL Championship", "uk/championship"),
    ("Serie A", "it/serie-a"),
    ("Serie B", "it/serie-b"),
    ("La Liga", "es/la-liga"),
    ("La Liga 2", "es/la-liga-2"),
    ("Ligue 1", "fr/ligue-1"),
    ("Ligue 2", "fr/ligue-2"),
    ("Eredivisie", "ne/eredivisie"),
    ("Primeira Liga", "pt/primeira-liga"),
    ("Scottish PL", "uk/scottish-premiership"),
    ("Super Lig", "tr/super-lig"),
    ("Belgian 1st Division", "be/first-division-a"),
];

/// League names accepted by the Capology scraper.
pub fn leagues() -> Vec<&'static str> {
    COMPETITIONS.iter().map(|(name, _)| *name).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Eur,
    Gbp,
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Usd => "usd",
        }
    }
}

impl FromStr for Currency {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eur" => Ok(Currency::Eur),
            "gbp" => Ok(Currency::Gbp),
            "usd" => Ok(Currency::Usd),
            _ => Err(ParamError::InvalidCurrency(s.to_string())),
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code().to_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub label: String,
    pub url: String,
}

/// Shape of the salary table. Capology serves a different column set per league.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryLayout {
    /// 13 raw columns.
    Standard,
    /// 17 raw columns.
    Extended,
    /// 8 raw columns.
    Compact,
}

impl SalaryLayout {
    pub fn from_column_count(count: usize) -> Option<Self> {
        match count {
            13 => Some(SalaryLayout::Standard),
            17 => Some(SalaryLayout::Extended),
            8 => Some(SalaryLayout::Compact),
            _ => None,
        }
    }

    /// Raw column indices that carry no data.
    pub(crate) fn dropped_columns(&self) -> &'static [usize] {
        match self {
            SalaryLayout::Standard => &[1],
            SalaryLayout::Extended => &[1, 16],
            SalaryLayout::Compact => &[],
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            SalaryLayout::Standard => &[
                "Player",
                "Weekly Gross",
                "Annual Gross",
                "Expiration",
                "Length",
                "Total Gross",
                "Status",
                "Pos. group",
                "Pos.",
                "Age",
                "Country",
                "Club",
            ],
            SalaryLayout::Extended => &[
                "Player",
                "Weekly Gross",
                "Annual Gross",
                "Annual Bonus",
                "Signed",
                "Expiration",
                "Years Remaining",
                "Gross Remaining",
                "Release Clause",
                "Status",
                "Pos. group",
                "Pos.",
                "Age",
                "Country",
                "Club",
            ],
            SalaryLayout::Compact => &[
                "Player",
                "Weekly Gross",
                "Annual Gross",
                "Adj. Gross",
                "Pos. group",
                "Age",
                "Country",
                "Club",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionGroup {
    Keeper,
    Defense,
    Midfield,
    Forward,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryRow {
    pub player: String,
    pub weekly_gross: Option<String>,
    pub annual_gross: Option<String>,
    pub adjusted_gross: Option<String>,
    pub annual_bonus: Option<String>,
    pub signed: Option<String>,
    pub expiration: Option<String>,
    pub length: Option<String>,
    pub years_remaining: Option<String>,
    pub total_gross: Option<String>,
    pub gross_remaining: Option<String>,
    pub release_clause: Option<String>,
    pub status: Option<String>,
    pub pos_group: Option<String>,
    pub position: Option<String>,
    pub age: Option<u32>,
    pub country: Option<String>,
    pub club: Option<String>,
}

impl SalaryRow {
    pub fn position_group(&self) -> Option<PositionGroup> {
        let group = self.pos_group.as_deref()?.trim().to_lowercase();
        match group.chars().next()? {
            'k' | 'g' => Some(PositionGroup::Keeper),
            'd' => Some(PositionGroup::Defense),
            'm' => Some(PositionGroup::Midfield),
            'f' => Some(PositionGroup::Forward),
            _ => None,
        }
    }

    pub(crate) fn set_column(&mut self, column: &str, value: String) {
        let value = Some(value).filter(|v| !v.is_empty());
        match column {
            "Player" => self.player = value.unwrap_or_default(),
            "Weekly Gross" => self.weekly_gross = value,
            "Annual Gross" => self.annual_gross = value,
            "Adj. Gross" => self.adjusted_gross = value,
            "Annual Bonus" => self.annual_bonus = value,
            "Signed" => self.signed = value,
            "Expiration" => self.expiration = value,
            "Length" => self.length = value,
            "Years Remaining" => self.years_remaining = value,
            "Total Gross" => self.total_gross = value,
            "Gross Remaining" => self.gross_remaining = value,
            "Release Clause" => self.release_clause = value,
            "Status" => self.status = value,
            "Pos. group" => self.pos_group = value,
            "Pos." => self.position = value,
            "Age" => self.age = value.and_then(|v| v.parse().ok()),
            "Country" => self.country = value,
            "Club" => self.club = value,
            other => log::debug!("Ignoring unknown salary column '{}'", other),
        }
    }
}

impl Display for SalaryRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.player)?;
        if let Some(club) = &self.club {
            write!(f, " ({})", club)?;
        }
        if let Some(position) = self.position.as_ref().or(self.pos_group.as_ref()) {
            write!(f, " [{}]", position)?;
        }
        if let Some(annual) = &self.annual_gross {
            write!(f, ", {} p/a", annual)?;
        }
        if let Some(weekly) = &self.weekly_gross {
            write!(f, ", {} p/w", weekly)?;
        }
        Ok(())
    }
}

impl Tabular for SalaryRow {
    fn headers() -> Vec<&'static str> {
        vec![
            "Player",
            "Weekly Gross",
            "Annual Gross",
            "Adj. Gross",
            "Annual Bonus",
            "Signed",
            "Expiration",
            "Length",
            "Years Remaining",
            "Total Gross",
            "Gross Remaining",
            "Release Clause",
            "Status",
            "Pos. group",
            "Pos.",
            "Age",
            "Country",
            "Club",
        ]
    }

    fn record(&self) -> Vec<String> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            self.player.clone(),
            opt(&self.weekly_gross),
            opt(&self.annual_gross),
            opt(&self.adjusted_gross),
            opt(&self.annual_bonus),
            opt(&self.signed),
            opt(&self.expiration),
            opt(&self.length),
            opt(&self.years_remaining),
            opt(&self.total_gross),
            opt(&self.gross_remaining),
            opt(&self.release_clause),
            opt(&self.status),
            opt(&self.pos_group),
            opt(&self.position),
            self.age.map(|a| a.to_string()).unwrap_or_default(),
            opt(&self.country),
            opt(&self.club),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryTable {
    /// `None` when no rows were returned.
    pub layout: Option<SalaryLayout>,
    pub currency: Currency,
    pub rows: Vec<SalaryRow>,
}

impl SalaryTable {
    pub fn empty(currency: Currency) -> Self {
        Self {
            layout: None,
            currency,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Display for SalaryTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.layout {
            Some(layout) => writeln!(
                f,
                "Salaries in {} ({:?} layout, {} column(s))",
                self.currency,
                layout,
                layout.columns().len()
            )?,
            None => writeln!(f, "Salaries in {}", self.currency)?,
        }
        for (i, row) in self.rows.iter().enumerate() {
            writeln!(f, "{:>4}. {}", i + 1, row)?;
        }
        Ok(())
    }
}
