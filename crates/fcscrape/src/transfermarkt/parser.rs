use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::types::{MarketValuePoint, PlayerProfile, Season, Transfer};
use crate::utils::{elem_text, normalize_whitespace};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing required element: {0}")]
    MissingElement(String),
    #[error("Missing required field: {0}")]
    MissingField(String),
}

static RE_MARKET_VALUE_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'y':(\d+),[^}]*?'datum_mw':'([^']*)'")
        .expect("invalid regex: market value point")
});

const CHART_MARKER: &str = "var chart = new Highcharts.Chart";

fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|e| normalize_whitespace(&elem_text(e)))
        .filter(|s| !s.is_empty())
}

fn doc_text(document: &Html, selector: &Selector) -> Option<String> {
    first_text(document.root_element(), selector)
}

fn links_in_items_table(html: &str, cell: &str) -> Result<Vec<String>, ParseError> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("table.items").unwrap();
    let cell_sel = Selector::parse(cell).unwrap();
    let a_sel = Selector::parse("a[href]").unwrap();

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ParseError::MissingElement("items table".to_string()))?;

    Ok(table
        .select(&cell_sel)
        .filter_map(|td| td.select(&a_sel).next())
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect())
}

pub fn parse_seasons(html: &str) -> Result<Vec<Season>, ParseError> {
    let document = Html::parse_document(html);
    let select_sel = Selector::parse(r#"select[name="saison_id"]"#).unwrap();
    let option_sel = Selector::parse("option").unwrap();

    let dropdown = document
        .select(&select_sel)
        .next()
        .ok_or_else(|| ParseError::MissingElement("season dropdown".to_string()))?;

    Ok(dropdown
        .select(&option_sel)
        .filter_map(|option| {
            let id = option.value().attr("value")?.to_string();
            let label = normalize_whitespace(&elem_text(option));
            Some(Season { label, id })
        })
        .collect())
}

/// Club page paths of a league season overview.
pub fn parse_club_links(html: &str) -> Result<Vec<String>, ParseError> {
    links_in_items_table(html, "td.hauptlink.no-border-links")
}

/// Player profile paths of a club squad page.
pub fn parse_player_links(html: &str) -> Result<Vec<String>, ParseError> {
    links_in_items_table(html, "td.hauptlink")
}

pub fn parse_player_profile(html: &str, url: &str) -> Result<PlayerProfile, ParseError> {
    let document = Html::parse_document(html);

    let name = parse_name(&document)?;
    let (value, value_last_updated) = parse_market_value(&document);
    let (date_of_birth, age) = parse_birth_date(&document);
    let height_m = parse_height(&document);

    let nationality_sel = Selector::parse(r#"span[itemprop="nationality"]"#).unwrap();
    let nationality = doc_text(&document, &nationality_sel);

    let citizenship = parse_citizenship(&document);
    let (position, other_positions) = parse_positions(&document);

    let club_sel = Selector::parse("span.data-header__club").unwrap();
    let team = doc_text(&document, &club_sel);

    let labels = header_labels(&document);
    let last_club = label_value(&labels, "last club");
    let since = label_value(&labels, "since");
    let joined = label_value(&labels, "joined");
    let contract_expiration = label_value(&labels, "contract expires");

    let market_value_history = parse_market_value_history(&document);
    let transfer_history = parse_transfer_history(&document);

    Ok(PlayerProfile {
        url: url.to_string(),
        name,
        value,
        value_last_updated,
        date_of_birth,
        age,
        height_m,
        nationality,
        citizenship,
        position,
        other_positions,
        team,
        last_club,
        since,
        joined,
        contract_expiration,
        market_value_history,
        transfer_history,
    })
}

fn parse_name(document: &Html) -> Result<String, ParseError> {
    let headline_sel = Selector::parse("h1.data-header__headline-wrapper").unwrap();
    let headline = document
        .select(&headline_sel)
        .next()
        .ok_or_else(|| ParseError::MissingField("player name".to_string()))?;

    // The shirt number sits on its own line before the name.
    elem_text(headline)
        .lines()
        .map(normalize_whitespace)
        .filter(|line| !line.is_empty())
        .next_back()
        .ok_or_else(|| ParseError::MissingField("player name".to_string()))
}

fn parse_market_value(document: &Html) -> (Option<String>, Option<String>) {
    let value_sel = Selector::parse("a.data-header__market-value-wrapper").unwrap();
    let Some(text) = doc_text(document, &value_sel) else {
        return (None, None);
    };

    let value = text.split_whitespace().next().map(str::to_string);
    let last_updated = text
        .split("Last update:")
        .nth(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    (value, last_updated)
}

fn parse_birth_date(document: &Html) -> (Option<String>, Option<u32>) {
    let dob_sel = Selector::parse(r#"span[itemprop="birthDate"]"#).unwrap();
    let Some(text) = doc_text(document, &dob_sel) else {
        return (None, None);
    };

    // Only a trailing "(NN)" token is an age.
    let split = text.rsplit_once(' ').and_then(|(date, last)| {
        let age = last.strip_prefix('(')?.strip_suffix(')')?.parse::<u32>().ok()?;
        Some((date.to_string(), age))
    });

    match split {
        Some((date, age)) => (Some(date).filter(|d| !d.is_empty()), Some(age)),
        None => (Some(text), None),
    }
}

fn parse_height(document: &Html) -> Option<f64> {
    let height_sel = Selector::parse(r#"span[itemprop="height"]"#).unwrap();
    let text = doc_text(document, &height_sel)?;
    if text == "N/A" || text == "- m" {
        return None;
    }
    text.replace(" m", "").replace(',', ".").parse::<f64>().ok()
}

fn parse_citizenship(document: &Html) -> Vec<String> {
    let flag_sel =
        Selector::parse("span.info-table__content.info-table__content--bold img.flaggenrahmen")
            .unwrap();

    let mut citizenship: Vec<String> = Vec::new();
    for title in document
        .select(&flag_sel)
        .filter_map(|img| img.value().attr("title"))
    {
        if !citizenship.iter().any(|c| c == title) {
            citizenship.push(title.to_string());
        }
    }
    citizenship
}

fn parse_positions(document: &Html) -> (Option<String>, Vec<String>) {
    let main_sel = Selector::parse("dd.detail-position__position").unwrap();
    let mut position = doc_text(document, &main_sel);

    if position.is_none() {
        // Older layout keeps the position in the header label list.
        let label_sel = Selector::parse("li.data-header__label").unwrap();
        let span_sel = Selector::parse("span").unwrap();
        position = document
            .select(&label_sel)
            .find(|li| elem_text(*li).to_lowercase().contains("position"))
            .and_then(|li| first_text(li, &span_sel));
    }

    let other_sel = Selector::parse("div.detail-position__position dd").unwrap();
    let other_positions = document
        .select(&other_sel)
        .map(|e| normalize_whitespace(&elem_text(e)))
        .filter(|s| !s.is_empty())
        .collect();

    (position, other_positions)
}

fn header_labels(document: &Html) -> Vec<String> {
    let label_sel = Selector::parse("span.data-header__label").unwrap();
    document
        .select(&label_sel)
        .map(|e| normalize_whitespace(&elem_text(e)))
        .collect()
}

fn label_value(labels: &[String], key: &str) -> Option<String> {
    let matches: Vec<&String> = labels
        .iter()
        .filter(|l| l.to_lowercase().contains(key))
        .collect();

    if matches.len() > 1 {
        log::warn!(
            "Found {} header labels for '{}', keeping the first",
            matches.len(),
            key
        );
    }

    matches
        .first()
        .and_then(|l| l.split(':').next_back())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_market_value_history(document: &Html) -> Vec<MarketValuePoint> {
    let script_sel = Selector::parse(r#"script[type="text/javascript"]"#).unwrap();
    let Some(script) = document
        .select(&script_sel)
        .map(elem_text)
        .find(|s| s.contains(CHART_MARKER))
    else {
        return Vec::new();
    };

    RE_MARKET_VALUE_POINT
        .captures_iter(&script)
        .filter_map(|caps| {
            let value = caps[1].parse::<u64>().ok()?;
            let date = caps[2].replace("\\x20", " ");
            Some(MarketValuePoint { date, value })
        })
        .collect()
}

fn parse_transfer_history(document: &Html) -> Vec<Transfer> {
    let row_sel = Selector::parse("div.grid.tm-player-transfer-history-grid").unwrap();
    let cell = |name: &str| {
        Selector::parse(&format!("div.tm-player-transfer-history-grid__{}", name)).unwrap()
    };
    let season_sel = cell("season");
    let date_sel = cell("date");
    let left_sel = cell("old-club");
    let joined_sel = cell("new-club");
    let mv_sel = cell("market-value");
    let fee_sel = cell("fee");

    document
        .select(&row_sel)
        .filter(|row| {
            !row.value()
                .classes()
                .any(|c| c == "tm-player-transfer-history-grid--heading")
        })
        .filter_map(|row| {
            let text = |sel: &Selector| first_text(row, sel).unwrap_or_default();
            let season = first_text(row, &season_sel)?;
            Some(Transfer {
                season,
                date: text(&date_sel),
                left: text(&left_sel),
                joined: text(&joined_sel),
                market_value: text(&mv_sel),
                fee: text(&fee_sel),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MESSI_URL: &str = "https://www.transfermarkt.us/lionel-messi/profil/spieler/28003";

    fn messi() -> PlayerProfile {
        let html = fs::read_to_string("fixtures/transfermarkt/player_messi.html")
            .expect("Failed to read fixture");
        parse_player_profile(&html, MESSI_URL).expect("Failed to parse player profile")
    }

    #[test]
    fn test_parse_seasons() {
        let html = fs::read_to_string("fixtures/transfermarkt/league_epl.html")
            .expect("Failed to read fixture");

        let seasons = parse_seasons(&html).expect("Failed to parse seasons");

        assert_eq!(seasons.len(), 3);
        assert_eq!(seasons[0].label, "23/24");
        assert_eq!(seasons[0].id, "2023");
        assert_eq!(seasons[2].label, "21/22");
        assert_eq!(seasons[2].id, "2021");
    }

    #[test]
    fn test_parse_club_links() {
        let html = fs::read_to_string("fixtures/transfermarkt/league_epl.html")
            .expect("Failed to read fixture");

        let links = parse_club_links(&html).expect("Failed to parse club links");

        assert_eq!(
            links,
            vec![
                "/manchester-city/startseite/verein/281/saison_id/2023",
                "/fc-arsenal/startseite/verein/11/saison_id/2023",
            ]
        );
    }

    #[test]
    fn test_parse_player_links() {
        let html = fs::read_to_string("fixtures/transfermarkt/club_arsenal.html")
            .expect("Failed to read fixture");

        let links = parse_player_links(&html).expect("Failed to parse player links");

        assert_eq!(
            links,
            vec![
                "/bukayo-saka/profil/spieler/433177",
                "/martin-odegaard/profil/spieler/316264",
            ]
        );
    }

    #[test]
    fn test_parse_links_missing_table() {
        assert!(matches!(
            parse_club_links("<html></html>"),
            Err(ParseError::MissingElement(_))
        ));
    }

    #[test]
    fn test_parse_player_header_fields() {
        let player = messi();

        assert_eq!(player.url, MESSI_URL);
        assert_eq!(player.name, "Lionel Messi");
        assert_eq!(player.value.as_deref(), Some("$38.50m"));
        assert_eq!(player.value_last_updated.as_deref(), Some("Dec 19, 2023"));
        assert_eq!(player.date_of_birth.as_deref(), Some("Jun 24, 1987"));
        assert_eq!(player.age, Some(36));
        assert_eq!(player.height_m, Some(1.70));
        assert_eq!(player.nationality.as_deref(), Some("Argentina"));
        assert_eq!(player.citizenship, vec!["Argentina", "Spain"]);
        assert_eq!(player.team.as_deref(), Some("Inter Miami CF"));
        assert_eq!(player.joined.as_deref(), Some("Jul 15, 2023"));
        assert_eq!(player.contract_expiration.as_deref(), Some("Dec 31, 2025"));
        assert_eq!(player.last_club, None);
        assert_eq!(player.since, None);
    }

    #[test]
    fn test_parse_player_positions() {
        let player = messi();

        assert_eq!(player.position.as_deref(), Some("Right Winger"));
        assert_eq!(player.other_positions, vec!["Centre-Forward", "Second Striker"]);
    }

    #[test]
    fn test_parse_player_market_value_history() {
        let player = messi();

        assert_eq!(player.market_value_history.len(), 3);
        assert_eq!(
            player.market_value_history[0],
            MarketValuePoint {
                date: "Jun 1, 2018".to_string(),
                value: 180_000_000,
            }
        );
        assert_eq!(player.market_value_history[2].date, "Dec 19, 2023");
        assert_eq!(player.market_value_history[2].value, 38_500_000);
    }

    #[test]
    fn test_parse_player_transfer_history() {
        let player = messi();

        assert_eq!(player.transfer_history.len(), 2);
        let last = &player.transfer_history[0];
        assert_eq!(last.season, "23/24");
        assert_eq!(last.date, "Jul 15, 2023");
        assert_eq!(last.left, "Paris SG");
        assert_eq!(last.joined, "Inter Miami");
        assert_eq!(last.market_value, "$38.50m");
        assert_eq!(last.fee, "free transfer");
    }

    #[test]
    fn test_parse_player_fallback_layout() {
        let html = fs::read_to_string("fixtures/transfermarkt/player_retired.html")
            .expect("Failed to read fixture");

        let player = parse_player_profile(&html, "https://www.transfermarkt.us/x/profil/spieler/1")
            .expect("Failed to parse player profile");

        assert_eq!(player.name, "Andrea Pirlo");
        assert_eq!(player.position.as_deref(), Some("Central Midfield"));
        assert!(player.other_positions.is_empty());
        assert_eq!(player.value, None);
        assert_eq!(player.value_last_updated, None);
        assert_eq!(player.height_m, None);
        assert_eq!(player.age, None);
        assert_eq!(player.date_of_birth, None);
        assert_eq!(player.team, None);
        assert_eq!(player.last_club.as_deref(), Some("New York City FC"));
        assert_eq!(player.since.as_deref(), Some("Nov 6, 2017"));
        assert!(player.market_value_history.is_empty());
        assert!(player.transfer_history.is_empty());
    }

    #[test]
    fn test_parse_player_missing_name() {
        let err = parse_player_profile("<html><body></body></html>", MESSI_URL).unwrap_err();
        assert!(matches!(err, ParseError::MissingField(_)));
    }

    fn profile_from_header(header: &str) -> PlayerProfile {
        let html = format!(
            r#"<html><body>
            <h1 class="data-header__headline-wrapper"><span>#8</span>
                Andrés Iniesta</h1>
            <ul>{}</ul>
            </body></html>"#,
            header
        );
        parse_player_profile(&html, MESSI_URL).expect("Failed to parse player profile")
    }

    #[test]
    fn test_parse_birth_date_without_age() {
        let player = profile_from_header(
            r#"<li class="data-header__label">Date of birth: <span itemprop="birthDate">Jun 24, 1987</span></li>"#,
        );

        assert_eq!(player.name, "Andrés Iniesta");
        assert_eq!(player.date_of_birth.as_deref(), Some("Jun 24, 1987"));
        assert_eq!(player.age, None);
    }

    #[test]
    fn test_parse_birth_date_with_age() {
        let player = profile_from_header(
            r#"<li class="data-header__label">Date of birth/Age: <span itemprop="birthDate">May 11, 1984 (39)</span></li>"#,
        );

        assert_eq!(player.date_of_birth.as_deref(), Some("May 11, 1984"));
        assert_eq!(player.age, Some(39));
    }

    #[test]
    fn test_parse_height_dash_is_none() {
        let player = profile_from_header(
            r#"<li class="data-header__label">Height: <span itemprop="height">- m</span></li>"#,
        );
        assert_eq!(player.height_m, None);

        let player = profile_from_header(
            r#"<li class="data-header__label">Height: <span itemprop="height">1,71 m</span></li>"#,
        );
        assert_eq!(player.height_m, Some(1.71));
    }

    #[test]
    fn test_label_value_keeps_first_match() {
        let labels = vec![
            "Joined: Jul 1, 2019".to_string(),
            "Joined: Jan 1, 2020".to_string(),
        ];
        assert_eq!(label_value(&labels, "joined").as_deref(), Some("Jul 1, 2019"));
        assert_eq!(label_value(&labels, "since"), None);
    }
}
