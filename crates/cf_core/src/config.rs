use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use chrono_tz::Tz;
use url::Url;

use crate::{Error, Result};

pub const DEFAULT_SOURCE_URL: &str = "https://elmeurope.org";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Paris;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PORT: u16 = 80;

/// Runtime settings shared by the scraper, the cache and the HTTP server.
#[derive(Debug, Clone)]
pub struct Config {
    pub source_url: String,
    /// Zone the page's schedule times are written in
    pub timezone: Tz,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub bind: IpAddr,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            timezone: DEFAULT_TIMEZONE,
            cache_ttl: DEFAULT_CACHE_TTL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_timezone(mut self, name: &str) -> Result<Self> {
        self.timezone = parse_timezone(name)?;
        Ok(self)
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_bind(mut self, bind: IpAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// The page to scrape, checked to be an absolute http(s) URL
    pub fn source_url(&self) -> Result<Url> {
        let url = Url::parse(&self.source_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.source_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                self.source_url, other
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.source_url()?;
        if self.fetch_timeout.is_zero() {
            return Err(Error::Config("fetch timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| Error::Config(format!("Unknown timezone {:?}: {}", name, e)))
}
