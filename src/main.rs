use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use sunclock::config::Config;
use sunclock::location::LocationQuery;
use sunclock::report::{self, render_timeline};
use sunclock::{server, Resolver};
use tracing_subscriber::EnvFilter;

/// sunclock: sunrise, sunset and twilight for any place on Earth.
///
/// Prints the next occurrence of each event after a moment, or one calendar
/// day's events, as JSON. Handles polar day and night by searching ahead.
///
/// Examples:
///   sunclock stockholm
///   sunclock tromso --event sunrise --at 2025-12-01T00:00:00+01:00
///   sunclock --lat 21.4225 --lon 39.8262 --tz Asia/Riyadh
///   sunclock sydney --day --date 2014-11-01
///   sunclock --serve --port 8080
#[derive(Parser)]
#[command(name = "sunclock", version, about, long_about = None)]
struct Cli {
    /// Built-in place name. Example: sunclock stockholm
    #[arg(index = 1)]
    place: Option<String>,

    /// Latitude (-90 to 90, north positive).
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude (-180 to 180, east positive).
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// IANA timezone override (e.g. Europe/Oslo).
    #[arg(long)]
    tz: Option<String>,

    /// Moment to search from: RFC 3339, or local "YYYY-MM-DD HH:MM". Defaults to now.
    #[arg(long, conflicts_with = "date")]
    at: Option<String>,

    /// Calendar date (YYYY-MM-DD) for --day. Defaults to today in the zone.
    #[arg(long, short = 'd')]
    date: Option<String>,

    /// Comma-separated events, e.g. "sunrise,nautical-dusk". Defaults to all four.
    #[arg(long, short = 'e')]
    event: Option<String>,

    /// Print every event on one calendar day instead of the next occurrences.
    #[arg(long)]
    day: bool,

    /// Days to search ahead before giving up.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    search_days: Option<u32>,

    /// Config file (JSON). Defaults to <config dir>/sunclock/config.json.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start the HTTP API instead of printing.
    #[arg(long)]
    serve: bool,

    #[arg(long, requires = "serve")]
    host: Option<String>,

    #[arg(long, requires = "serve")]
    port: Option<u16>,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.serve { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(days) = cli.search_days {
        config.search_days = days;
    }

    // ── Serve ───────────────────────────────────────────────────

    if cli.serve {
        let host = cli.host.unwrap_or_else(|| config.host.clone());
        let port = cli.port.unwrap_or(config.port);
        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
        runtime.block_on(server::start(&host, port, config))?;
        return Ok(());
    }

    // ── Resolve location ────────────────────────────────────────

    let query = LocationQuery {
        place: cli.place,
        lat: cli.lat,
        lon: cli.lon,
        tz: cli.tz,
    };
    let place = query.resolve(&config)?;
    eprintln!("  {} {}", "\u{1F4CD}", place.display_line());

    let resolver = Resolver::new(place.coordinate)
        .with_search_days(config.search_days)
        .with_twilight(config.twilight);

    // ── One calendar day ────────────────────────────────────────

    if cli.day {
        let date = match cli.date.as_deref() {
            Some(d) => report::parse_date(d)?,
            None => Utc::now().with_timezone(&place.tz).date_naive(),
        };
        let output = report::day_report(&place, &resolver, date)?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    // ── Next occurrences ────────────────────────────────────────

    let at = match (cli.at.as_deref(), cli.date.as_deref()) {
        (Some(s), _) => report::parse_moment(s, place.tz)?,
        (None, Some(d)) => report::parse_moment(d, place.tz)?,
        (None, None) => Utc::now(),
    };
    let events = report::parse_event_list(cli.event.as_deref(), config.twilight)?;
    let output = report::next_report(&place, &resolver, at, &events)?;

    eprint!("{}", render_timeline(&output));
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
