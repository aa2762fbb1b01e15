use clap::Parser;
use cf_core::config::{DEFAULT_PORT, DEFAULT_SOURCE_URL};
use cf_core::{join_schedule, ConferenceSource, Config, Resource, Result};
use cf_scrapers::logging::{init_logging, level_for};
use cf_scrapers::ConferenceScraper;
use cf_web::AppState;
use serde_json::Value;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if !current_number.is_empty() {
                let num = current_number
                    .parse::<u64>()
                    .map_err(|_| "Invalid number in duration".to_string())?;
                let unit = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    'd' => 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = num
                    .checked_mul(unit)
                    .and_then(|secs| total_seconds.checked_add(secs))
                    .ok_or_else(|| format!("Duration too large: {}", s))?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A bare trailing number counts as seconds
        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds
                .checked_add(num)
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            has_unit = true;
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrapes the Elm Europe website and serves speakers and schedule as JSON", long_about = None)]
struct Cli {
    /// Conference page to scrape
    #[arg(long, env = "CONFSCRAPE_URL", default_value = DEFAULT_SOURCE_URL, global = true)]
    url: String,
    /// IANA timezone the schedule times are written in
    #[arg(long, env = "CONFSCRAPE_TIMEZONE", default_value = "Europe/Paris", global = true)]
    timezone: String,
    /// How long scraped data is served from memory (e.g. 600, 10m, 1h15m)
    #[arg(long, env = "CONFSCRAPE_TTL", default_value = "10m", global = true)]
    ttl: HumanDuration,
    /// Upper bound on a single upstream fetch
    #[arg(long, env = "CONFSCRAPE_TIMEOUT", default_value = "30s", global = true)]
    timeout: HumanDuration,
    #[arg(long, env = "CONFSCRAPE_BIND", default_value = "0.0.0.0", global = true)]
    bind: IpAddr,
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT, global = true)]
    port: u16,
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug, PartialEq)]
enum Commands {
    /// Serve the JSON API (the default)
    Serve,
    /// Scrape once, bypassing the cache, and print the JSON
    Scrape {
        /// speakers or schedule
        resource: Resource,
        #[arg(long)]
        pretty: bool,
    },
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let config = Config::new()
            .with_url(self.url.clone())
            .with_timezone(&self.timezone)?
            .with_cache_ttl(self.ttl.0)
            .with_fetch_timeout(self.timeout.0)
            .with_bind(self.bind)
            .with_port(self.port);
        config.validate()?;
        Ok(config)
    }
}

/// What the matching endpoint would return, minus the cache
async fn scrape_once(source: &dyn ConferenceSource, resource: Resource) -> Result<Value> {
    match resource {
        Resource::Speakers => Ok(serde_json::to_value(source.speakers().await?)?),
        Resource::Schedule => {
            let (speakers, items) = futures::try_join!(source.speakers(), source.schedule())?;
            Ok(serde_json::to_value(join_schedule(&speakers, &items))?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(level_for(cli.verbose, cli.quiet));
    let config = cli.config()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!(
                "🦗 Scraping {} (cache ttl {}s, times in {})",
                config.source_url,
                config.cache_ttl.as_secs(),
                config.timezone
            );
            let state = AppState::from_config(&config)?;
            cf_web::serve(&config, state).await
        }
        Commands::Scrape { resource, pretty } => {
            info!("🦗 Scraping {} from {}", resource, config.source_url);
            let scraper = ConferenceScraper::from_config(&config)?;
            let value = scrape_once(&scraper, resource).await?;
            let output = if pretty {
                serde_json::to_string_pretty(&value)?
            } else {
                serde_json::to_string(&value)?
            };
            println!("{}", output);
            Ok(())
        }
    }
}
