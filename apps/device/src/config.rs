use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::Duration,
};

use client_core::{ConfigError, LinesPerPage, ReaderConfig};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "device.toml";

/// Command-line overrides; these win over the file and the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub store_url: Option<String>,
    pub line_width: Option<usize>,
    pub poll_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LinesSetting {
    Count(usize),
    Keyword(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    store_url: Option<String>,
    line_width: Option<usize>,
    lines_per_page: Option<LinesSetting>,
    page_display_ms: Option<u64>,
    page_gap_ms: Option<u64>,
    poll_interval_secs: Option<u64>,
    debounce_guard_ms: Option<u64>,
    sample_period_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the TOML file, then the environment, then `overrides`.
pub fn load(overrides: &Overrides) -> Result<ReaderConfig, ConfigError> {
    let mut config = ReaderConfig::default();

    let (path, required) = match &overrides.config_path {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };
    if let Some(file) = read_file(&path, required)? {
        apply_file(&mut config, file)?;
    }
    apply_env(&mut config, |key| std::env::var(key).ok())?;

    if let Some(v) = &overrides.store_url {
        config.store_url = v.clone();
    }
    if let Some(v) = overrides.line_width {
        config.line_width = v;
    }
    if let Some(v) = overrides.poll_interval_secs {
        config.poll_interval = Duration::from_secs(v);
    }

    config.validate()?;
    Ok(config)
}

fn read_file(path: &Path, required: bool) -> Result<Option<FileConfig>, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound && !required => {
            return Ok(None)
        }
        Err(error) => {
            return Err(ConfigError::File {
                path: path.display().to_string(),
                reason: error.to_string(),
            })
        }
    };
    parse_file(&raw)
        .map(Some)
        .map_err(|reason| ConfigError::File {
            path: path.display().to_string(),
            reason,
        })
}

fn parse_file(raw: &str) -> Result<FileConfig, String> {
    toml::from_str(raw).map_err(|e| e.to_string())
}

fn apply_file(config: &mut ReaderConfig, file: FileConfig) -> Result<(), ConfigError> {
    if let Some(v) = file.store_url {
        config.store_url = v;
    }
    if let Some(v) = file.line_width {
        config.line_width = v;
    }
    if let Some(v) = file.lines_per_page {
        config.lines_per_page = match v {
            LinesSetting::Count(n) => parse_lines_per_page(&n.to_string())?,
            LinesSetting::Keyword(word) => parse_lines_per_page(&word)?,
        };
    }
    if let Some(v) = file.page_display_ms {
        config.page_display = Duration::from_millis(v);
    }
    if let Some(v) = file.page_gap_ms {
        config.page_gap = Duration::from_millis(v);
    }
    if let Some(v) = file.poll_interval_secs {
        config.poll_interval = Duration::from_secs(v);
    }
    if let Some(v) = file.debounce_guard_ms {
        config.debounce_guard = Duration::from_millis(v);
    }
    if let Some(v) = file.sample_period_ms {
        config.sample_period = Duration::from_millis(v);
    }
    if let Some(v) = file.request_timeout_secs {
        config.request_timeout = Duration::from_secs(v);
    }
    Ok(())
}

fn apply_env(
    config: &mut ReaderConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(v) = lookup("LOVEBOX_STORE_URL") {
        config.store_url = v;
    }
    if let Some(v) = lookup("APP__STORE_URL") {
        config.store_url = v;
    }
    if let Some(v) = lookup("LOVEBOX_LINE_WIDTH") {
        config.line_width = parse_number("LOVEBOX_LINE_WIDTH", &v)? as usize;
    }
    if let Some(v) = lookup("LOVEBOX_LINES_PER_PAGE") {
        config.lines_per_page = parse_lines_per_page(&v)?;
    }
    if let Some(v) = lookup("LOVEBOX_POLL_INTERVAL_SECS") {
        config.poll_interval = Duration::from_secs(parse_number("LOVEBOX_POLL_INTERVAL_SECS", &v)?);
    }
    Ok(())
}

fn parse_number(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_lines_per_page(value: &str) -> Result<LinesPerPage, ConfigError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("unbounded") {
        return Ok(LinesPerPage::Unbounded);
    }
    value
        .parse::<usize>()
        .ok()
        .and_then(NonZeroUsize::new)
        .map(LinesPerPage::Fixed)
        .ok_or_else(|| ConfigError::InvalidValue {
            key: "lines_per_page".to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let file = parse_file(
            r#"
            store_url = "http://lovebox.local:8443"
            line_width = 20
            lines_per_page = 4
            page_display_ms = 3000
            poll_interval_secs = 10
            "#,
        )
        .expect("parse");
        let mut config = ReaderConfig::default();
        apply_file(&mut config, file).expect("apply");

        assert_eq!(config.store_url, "http://lovebox.local:8443");
        assert_eq!(config.line_width, 20);
        assert_eq!(
            config.lines_per_page,
            LinesPerPage::Fixed(NonZeroUsize::new(4).expect("non-zero"))
        );
        assert_eq!(config.page_display, Duration::from_secs(3));
        assert_eq!(config.page_gap, Duration::from_millis(600));
        assert_eq!(config.poll_interval, Duration::from_secs(10));
    }

    #[test]
    fn unbounded_pages_from_file() {
        let file = parse_file("lines_per_page = \"unbounded\"").expect("parse");
        let mut config = ReaderConfig::default();
        apply_file(&mut config, file).expect("apply");
        assert_eq!(config.lines_per_page, LinesPerPage::Unbounded);
    }

    #[test]
    fn zero_lines_per_page_is_rejected() {
        let file = parse_file("lines_per_page = 0").expect("parse");
        let mut config = ReaderConfig::default();
        assert!(matches!(
            apply_file(&mut config, file),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_file("colour = \"red\"").is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("LOVEBOX_STORE_URL", "http://a.local"),
            ("APP__STORE_URL", "http://b.local"),
            ("LOVEBOX_POLL_INTERVAL_SECS", "5"),
        ]);
        let mut config = ReaderConfig::default();
        apply_env(&mut config, |key| vars.get(key).map(|v| v.to_string())).expect("env");
        assert_eq!(config.store_url, "http://b.local");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn malformed_env_number_is_a_config_error() {
        let mut config = ReaderConfig::default();
        let err = apply_env(&mut config, |key| {
            (key == "LOVEBOX_LINE_WIDTH").then(|| "wide".to_string())
        })
        .expect_err("should fail");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn explicit_missing_config_file_is_an_error() {
        let overrides = Overrides {
            config_path: Some(PathBuf::from("/nonexistent/lovebox/device.toml")),
            ..Overrides::default()
        };
        assert!(matches!(load(&overrides), Err(ConfigError::File { .. })));
    }

    #[test]
    fn cli_overrides_win_and_are_validated() {
        let overrides = Overrides {
            config_path: None,
            store_url: Some("gopher://old.school".into()),
            ..Overrides::default()
        };
        assert!(matches!(
            load(&overrides),
            Err(ConfigError::InvalidStoreUrl { .. })
        ));
    }
}
