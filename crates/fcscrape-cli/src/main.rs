use std::io;
use std::process;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use fcscrape::capology::types::Currency;
use fcscrape::utils::{RowFilter, SalaryStats, write_table};
use fcscrape::{ScraperConfig, Tabular, capology, clubelo, transfermarkt};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "fcscrape")]
#[command(about = "Football salary, ELO and player profile scraper", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        long,
        default_value_t = 30,
        global = true,
        help = "HTTP request timeout in seconds",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
    Tsv,
}

#[derive(clap::Args)]
struct RowArgs {
    #[arg(
        long,
        help = "Maximum number of rows to return",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    limit: Option<u16>,

    #[arg(
        long,
        help = "Number of rows to skip from the beginning"
    )]
    offset: Option<u16>,

    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    format: OutputFormat,
}

impl RowArgs {
    fn filter(&self) -> RowFilter {
        RowFilter {
            limit: self.limit.map(usize::from),
            offset: self.offset.map(usize::from),
        }
        .validate()
        .unwrap_or_else(|e| {
            log::error!("Invalid args: {e}");
            process::exit(1);
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Player salaries from capology.com
    Capology {
        #[command(subcommand)]
        command: CapologyCommand,
    },
    /// Club ELO ratings from clubelo.com
    #[command(name = "clubelo")]
    ClubElo {
        #[command(subcommand)]
        command: ClubEloCommand,
    },
    /// Clubs and player profiles from transfermarkt.us
    Transfermarkt {
        #[command(subcommand)]
        command: TransfermarktCommand,
    },
}

#[derive(Subcommand)]
enum CapologyCommand {
    /// List supported leagues
    Leagues,
    /// List the seasons available for a league
    Seasons {
        #[arg(long, help = "League name, e.g. \"EPL\"")]
        league: String,
    },
    /// Scrape every player salary of a league season
    Salaries {
        #[arg(long, help = "League name, e.g. \"EPL\"")]
        league: String,

        #[arg(long, help = "Season as shown in the season dropdown, e.g. \"2023-24\"")]
        year: String,

        #[arg(
            long,
            default_value = "eur",
            value_parser = parse_currency,
            help = "Salary currency: eur, gbp or usd"
        )]
        currency: Currency,

        #[command(flatten)]
        rows: RowArgs,
    },
}

#[derive(Subcommand)]
enum ClubEloCommand {
    /// Rating history of a club, or its rating on a single date
    Team {
        #[arg(help = "Club name as it appears in the clubelo.com URL, e.g. \"ManCity\"")]
        team: String,

        #[arg(
            long,
            value_name = "YYYY-MM-DD",
            help = "Only print the rating on this date",
            value_parser = parse_date,
            conflicts_with_all = ["limit", "offset"],
        )]
        date: Option<NaiveDate>,

        #[command(flatten)]
        rows: RowArgs,
    },
    /// Every club rated on a date
    Ranking {
        #[arg(
            long,
            value_name = "YYYY-MM-DD",
            help = "Ranking date",
            value_parser = parse_date,
        )]
        date: NaiveDate,

        #[command(flatten)]
        rows: RowArgs,
    },
}

#[derive(Subcommand)]
enum TransfermarktCommand {
    /// List supported leagues
    Leagues,
    /// List the seasons available for a league
    Seasons {
        #[arg(long, help = "League name, e.g. \"EPL\"")]
        league: String,
    },
    /// List the club URLs of a league season
    Clubs {
        #[arg(long, help = "League name, e.g. \"EPL\"")]
        league: String,

        #[arg(long, help = "Season as shown in the season dropdown, e.g. \"23/24\"")]
        year: String,
    },
    /// Scrape every player profile of a league season
    Players {
        #[arg(long, help = "League name, e.g. \"EPL\"")]
        league: String,

        #[arg(long, help = "Season as shown in the season dropdown, e.g. \"23/24\"")]
        year: String,

        #[command(flatten)]
        rows: RowArgs,
    },
    /// Scrape a single player profile
    Player {
        #[arg(help = "URL or path of the player profile page")]
        url: String,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn parse_currency(s: &str) -> Result<Currency, String> {
    Currency::from_str(s).map_err(|e| e.to_string())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| e.to_string())
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn print_table<T: Tabular>(rows: &[T], delimiter: u8) {
    if let Err(e) = write_table(io::stdout().lock(), rows, delimiter) {
        log::error!("Error writing table: {}", e);
        process::exit(1);
    }
}

fn print_rows<T>(rows: &[T], format: OutputFormat)
where
    T: Tabular + serde::Serialize + std::fmt::Display,
{
    match format {
        OutputFormat::Json => serialize_json(&rows),
        OutputFormat::Csv => print_table(rows, b','),
        OutputFormat::Tsv => print_table(rows, b'\t'),
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No entries to display.");
            } else {
                for (i, row) in rows.iter().enumerate() {
                    println!("{:>4}. {}", i + 1, row);
                }
            }
        }
    }
}

fn print_list(items: &[impl AsRef<str>]) {
    for item in items {
        println!("{}", item.as_ref());
    }
}

fn exit_on_error<T, E: std::fmt::Display>(result: Result<T, E>, context: &str) -> T {
    result.unwrap_or_else(|e| {
        log::error!("Error {}: {}", context, e);
        process::exit(1);
    })
}

async fn run_capology(config: ScraperConfig, command: CapologyCommand) {
    let scraper = exit_on_error(capology::WebScraper::with_config(config), "creating scraper");

    match command {
        CapologyCommand::Leagues => print_list(&capology::types::leagues()),
        CapologyCommand::Seasons { league } => {
            let seasons = exit_on_error(
                scraper.fetch_valid_seasons(&league).await,
                "fetching seasons",
            );
            print_list(&seasons);
        }
        CapologyCommand::Salaries {
            league,
            year,
            currency,
            rows,
        } => {
            let filter = rows.filter();
            let mut table = exit_on_error(
                scraper.fetch_salaries(&year, &league, currency).await,
                "fetching salaries",
            );
            table.rows = filter.apply(table.rows);

            match rows.format {
                OutputFormat::Json => serialize_json(&table),
                OutputFormat::Text => {
                    if table.is_empty() {
                        println!("No entries to display.");
                    } else {
                        print!("{}", table);
                        print!("{}", SalaryStats::from_salary_rows(&table.rows));
                    }
                }
                format => print_rows(&table.rows, format),
            }
        }
    }
}

async fn run_clubelo(config: ScraperConfig, command: ClubEloCommand) {
    let scraper = exit_on_error(clubelo::WebScraper::with_config(config), "creating scraper");

    match command {
        ClubEloCommand::Team { team, date, rows } => {
            let filter = rows.filter();
            let history = exit_on_error(
                scraper.fetch_team_history(&team).await,
                "fetching ELO history",
            );

            let Some(date) = date else {
                print_rows(&filter.apply(history), rows.format);
                return;
            };

            // csv/tsv print the covering record so the flat formats keep their columns.
            let covering: Vec<_> = history.into_iter().filter(|r| r.covers(date)).take(1).collect();
            match (covering.first(), rows.format) {
                (None, _) => {
                    log::warn!("{} has no ELO rating on {}", team, date);
                    match rows.format {
                        OutputFormat::Json => serialize_json(&None::<f64>),
                        OutputFormat::Text => println!("No rating for {} on {}.", team, date),
                        format => print_rows(&covering, format),
                    }
                }
                (Some(record), OutputFormat::Json) => serialize_json(&record.elo),
                (Some(record), OutputFormat::Text) => println!("{:.2}", record.elo),
                (Some(_), format) => print_rows(&covering, format),
            }
        }
        ClubEloCommand::Ranking { date, rows } => {
            let filter = rows.filter();
            let ranking = exit_on_error(
                scraper.fetch_ranking_on_date(date).await,
                "fetching ELO ranking",
            );
            print_rows(&filter.apply(ranking), rows.format);
        }
    }
}

async fn run_transfermarkt(config: ScraperConfig, command: TransfermarktCommand) {
    let scraper = exit_on_error(
        transfermarkt::WebScraper::with_config(config),
        "creating scraper",
    );

    match command {
        TransfermarktCommand::Leagues => print_list(&transfermarkt::types::leagues()),
        TransfermarktCommand::Seasons { league } => {
            let seasons = exit_on_error(
                scraper.fetch_valid_seasons(&league).await,
                "fetching seasons",
            );
            for season in seasons {
                println!("{}\t{}", season.label, season.id);
            }
        }
        TransfermarktCommand::Clubs { league, year } => {
            let links = exit_on_error(
                scraper.fetch_club_links(&year, &league).await,
                "fetching club links",
            );
            print_list(&links);
        }
        TransfermarktCommand::Players { league, year, rows } => {
            let filter = rows.filter();
            let players = exit_on_error(
                scraper.fetch_players(&year, &league).await,
                "fetching players",
            );
            let players = filter.apply(players);

            match rows.format {
                OutputFormat::Text => {
                    if players.is_empty() {
                        println!("No entries to display.");
                    }
                    for player in &players {
                        println!("{}", player);
                    }
                }
                format => print_rows(&players, format),
            }
        }
        TransfermarktCommand::Player { url, format } => {
            let player = exit_on_error(scraper.fetch_player(&url).await, "fetching player");
            match format {
                OutputFormat::Text => println!("{}", player),
                format => print_rows(std::slice::from_ref(&player), format),
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let config = ScraperConfig::default().with_timeout(Duration::from_secs(cli.timeout));

    match cli.command {
        Commands::Capology { command } => run_capology(config, command).await,
        Commands::ClubElo { command } => run_clubelo(config, command).await,
        Commands::Transfermarkt { command } => run_transfermarkt(config, command).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = Cli::try_parse_from(["fcscrape", "--timeout", "0", "capology", "leagues"])
            .err()
            .expect("Zero timeout should be rejected");
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let cli = Cli::try_parse_from(["fcscrape", "--timeout", "5", "capology", "leagues"])
            .expect("Failed to parse args");
        assert_eq!(cli.timeout, 5);
    }

    #[test]
    fn test_team_date_conflicts_with_row_filter() {
        for flag in ["--limit", "--offset"] {
            let err = Cli::try_parse_from([
                "fcscrape", "clubelo", "team", "ManCity", "--date", "2024-01-15", flag, "2",
            ])
            .err()
            .expect("--date should conflict with row filters");
            assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        }

        assert!(
            Cli::try_parse_from([
                "fcscrape", "clubelo", "team", "ManCity", "--date", "2024-01-15", "-o", "csv",
            ])
            .is_ok()
        );
    }

    #[test]
    fn test_zero_offset_is_accepted() {
        let cli = Cli::try_parse_from([
            "fcscrape", "clubelo", "ranking", "--date", "2024-01-15", "--offset", "0",
        ])
        .expect("Failed to parse args");

        match cli.command {
            Commands::ClubElo {
                command: ClubEloCommand::Ranking { rows, .. },
            } => assert_eq!(rows.offset, Some(0)),
            _ => panic!("Unexpected command"),
        }
    }
}
