use std::time::Duration;

use url::Url;

use crate::{error::ConfigError, paginator::LinesPerPage};

pub const DEFAULT_STORE_URL: &str = "http://127.0.0.1:8443";
pub const DEFAULT_LINE_WIDTH: usize = 16;
pub const MAX_LINE_WIDTH: usize = 256;
pub const DEFAULT_PAGE_DISPLAY: Duration = Duration::from_millis(2_000);
pub const DEFAULT_PAGE_GAP: Duration = Duration::from_millis(600);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_DEBOUNCE_GUARD: Duration = Duration::from_millis(300);
pub const DEFAULT_SAMPLE_PERIOD: Duration = Duration::from_millis(50);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for the display loop and its store client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    pub store_url: String,
    /// Output width in characters.
    pub line_width: usize,
    pub lines_per_page: LinesPerPage,
    pub page_display: Duration,
    pub page_gap: Duration,
    pub poll_interval: Duration,
    pub debounce_guard: Duration,
    pub sample_period: Duration,
    pub request_timeout: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            line_width: DEFAULT_LINE_WIDTH,
            lines_per_page: LinesPerPage::default(),
            page_display: DEFAULT_PAGE_DISPLAY,
            page_gap: DEFAULT_PAGE_GAP,
            poll_interval: DEFAULT_POLL_INTERVAL,
            debounce_guard: DEFAULT_DEBOUNCE_GUARD,
            sample_period: DEFAULT_SAMPLE_PERIOD,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ReaderConfig {
    /// Time between automatic page changes.
    pub fn page_period(&self) -> Duration {
        self.page_display + self.page_gap
    }

    pub fn store_url(&self) -> Result<Url, ConfigError> {
        parse_store_url(&self.store_url)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store_url()?;
        if self.line_width == 0 {
            return Err(ConfigError::Zero {
                field: "line_width",
            });
        }
        if self.line_width > MAX_LINE_WIDTH {
            return Err(ConfigError::TooLarge {
                field: "line_width",
                max: MAX_LINE_WIDTH,
                actual: self.line_width,
            });
        }
        let durations = [
            ("page_display", self.page_display),
            ("poll_interval", self.poll_interval),
            ("sample_period", self.sample_period),
            ("request_timeout", self.request_timeout),
        ];
        for (field, value) in durations {
            if value.is_zero() {
                return Err(ConfigError::Zero { field });
            }
        }
        Ok(())
    }
}

pub fn parse_store_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidStoreUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidStoreUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}
