use chrono::NaiveDate;
use fcscrape::ParamError;
use fcscrape::clubelo::{ScraperError, WebScraper};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MAN_CITY: &str = include_str!("../fixtures/clubelo/ManCity.csv");
const RANKING: &str = include_str!("../fixtures/clubelo/2024-01-15.csv");

async fn scraper_with(server: &MockServer, route: &str, body: &str) -> WebScraper {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
    WebScraper::new()
        .expect("Failed to build scraper")
        .with_base_url(&server.uri())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_fetch_team_on_date() {
    let server = MockServer::start().await;
    let scraper = scraper_with(&server, "/ManCity", MAN_CITY).await;

    let elo = scraper
        .fetch_team_on_date("ManCity", date(2023, 7, 1))
        .await
        .expect("Failed to fetch ELO");

    assert_eq!(elo, Some(2100.34));
}

#[tokio::test]
async fn test_fetch_team_on_date_without_rating() {
    let server = MockServer::start().await;
    let scraper = scraper_with(&server, "/ManCity", MAN_CITY).await;

    let elo = scraper
        .fetch_team_on_date("ManCity", date(2030, 1, 1))
        .await
        .expect("Failed to fetch ELO");

    assert_eq!(elo, None);
}

#[tokio::test]
async fn test_unknown_team() {
    let server = MockServer::start().await;
    let scraper = scraper_with(
        &server,
        "/NotAClub",
        "Rank,Club,Country,Level,Elo,From,To\n",
    )
    .await;

    let err = scraper.fetch_team_history("NotAClub").await.unwrap_err();

    match err {
        ScraperError::InvalidParam(ParamError::InvalidTeam(team)) => assert_eq!(team, "NotAClub"),
        other => panic!("Unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_blank_team_is_rejected() {
    let scraper = WebScraper::new().expect("Failed to build scraper");
    assert!(matches!(
        scraper.fetch_team_history("  ").await,
        Err(ScraperError::InvalidParam(ParamError::InvalidTeam(_)))
    ));
}

#[tokio::test]
async fn test_fetch_ranking_on_date() {
    let server = MockServer::start().await;
    let scraper = scraper_with(&server, "/2024-01-15", RANKING).await;

    let ranking = scraper
        .fetch_ranking_on_date(date(2024, 1, 15))
        .await
        .expect("Failed to fetch ranking");

    assert_eq!(ranking.len(), 4);
    assert_eq!(ranking[0].rank, Some(1));
    assert_eq!(ranking[0].club, "Man City");
}
