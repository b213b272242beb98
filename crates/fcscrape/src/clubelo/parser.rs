use chrono::NaiveDate;

use super::types::EloRecord;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed ClubElo CSV: {0}")]
    Csv(#[from] csv::Error),
}

pub fn parse_elo_csv(text: &str) -> Result<Vec<EloRecord>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let records = reader
        .deserialize::<EloRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// ELO of the first interval containing `date`.
pub fn elo_on_date(history: &[EloRecord], date: NaiveDate) -> Option<f64> {
    history.iter().find(|r| r.covers(date)).map(|r| r.elo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_team_history() {
        let text = fs::read_to_string("fixtures/clubelo/ManCity.csv")
            .expect("Failed to read fixture");

        let history = parse_elo_csv(&text).expect("Failed to parse CSV");

        assert_eq!(history.len(), 5);
        let first = &history[0];
        assert_eq!(first.rank, None);
        assert_eq!(first.club, "Man City");
        assert_eq!(first.country, "ENG");
        assert_eq!(first.level, Some(2));
        assert_eq!(first.from, date(1946, 7, 7));

        let last = history.last().unwrap();
        assert_eq!(last.rank, Some(1));
        assert_eq!(last.level, Some(1));
        assert!((last.elo - 2059.96).abs() < 1e-6);
    }

    #[test]
    fn test_parse_ranking() {
        let text = fs::read_to_string("fixtures/clubelo/2024-01-15.csv")
            .expect("Failed to read fixture");

        let ranking = parse_elo_csv(&text).expect("Failed to parse CSV");

        assert_eq!(ranking.len(), 4);
        assert_eq!(ranking[0].club, "Man City");
        assert_eq!(ranking[1].club, "Real Madrid");
        assert_eq!(ranking[3].rank, None);
        assert!(ranking.iter().all(|r| r.covers(date(2024, 1, 15))));
    }

    #[test]
    fn test_parse_header_only_is_empty() {
        let history =
            parse_elo_csv("Rank,Club,Country,Level,Elo,From,To\n").expect("Failed to parse CSV");
        assert!(history.is_empty());
        assert!(parse_elo_csv("").expect("Failed to parse CSV").is_empty());
    }

    #[test]
    fn test_parse_malformed_elo() {
        let err = parse_elo_csv("Rank,Club,Country,Level,Elo,From,To\n1,X,ENG,1,abc,2020-01-01,2020-01-02\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_elo_on_date() {
        let text = fs::read_to_string("fixtures/clubelo/ManCity.csv")
            .expect("Failed to read fixture");
        let history = parse_elo_csv(&text).expect("Failed to parse CSV");

        let elo = elo_on_date(&history, date(2023, 6, 10)).expect("Should have a rating");
        assert!((elo - 2089.73).abs() < 1e-6);

        // interval bounds are inclusive
        let elo = elo_on_date(&history, date(2023, 6, 11)).expect("Should have a rating");
        assert!((elo - 2100.34).abs() < 1e-6);

        assert_eq!(elo_on_date(&history, date(1900, 1, 1)), None);
        assert_eq!(elo_on_date(&history, date(1950, 1, 1)), None);
    }
}
