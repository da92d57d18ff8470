//! Loader for Almanac configuration with YAML + environment overlays.
//!
//! Sources are merged in order: an `almanac.yaml` file (optional or required),
//! inline YAML snippets, then `ALMANAC__SECTION__KEY` environment variables.
//! After merging, every string value has `${VAR}` placeholders expanded.
//! Every section has defaults, so an empty configuration reproduces the
//! reference run against the University of Denver calendar.
use chrono::{Datelike, NaiveDate};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlmanacConfig {
    pub version: Option<String>,
    pub site: SiteConfig,
    pub calendar: CalendarSection,
    pub http: HttpSection,
    pub output: OutputSection,
    pub logging: LoggingSection,
}

/// Target site and the selectors used to read it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Prefixed to relative detail links, e.g. `https://www.du.edu`.
    pub origin: String,
    pub listing_path: String,
    pub selectors: SelectorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.du.edu".into(),
            listing_path: "/calendar".into(),
            selectors: SelectorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub card: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub description: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            card: ".event-card".into(),
            title: "h3".into(),
            date: ".date".into(),
            time: ".time".into(),
            description: "div.description".into(),
        }
    }
}

/// One listing query range, `start` inclusive and `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Contiguous calendar-month windows covering `[from, to)`.
    ///
    /// ```
    /// use almanac_config::DateWindow;
    /// use chrono::NaiveDate;
    ///
    /// let from = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
    /// let to = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    /// let windows = DateWindow::monthly(from, to);
    /// assert_eq!(windows.len(), 2);
    /// assert_eq!(windows[1].start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
    /// assert_eq!(windows[1].end, to);
    /// ```
    pub fn monthly(from: NaiveDate, to: NaiveDate) -> Vec<DateWindow> {
        let mut out = Vec::new();
        let mut start = from;
        while start < to {
            let end = first_of_next_month(start).min(to);
            out.push(DateWindow { start, end });
            start = end;
        }
        out
    }

    /// Render this window as a listing-page URL.
    pub fn listing_url(&self, site: &SiteConfig) -> String {
        format!(
            "{}{}?search=&start_date={}&end_date={}",
            site.origin.trim_end_matches('/'),
            site.listing_path,
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d"),
        )
    }
}

fn first_of_next_month(d: NaiveDate) -> NaiveDate {
    let (y, m) = if d.month() == 12 {
        (d.year() + 1, 1)
    } else {
        (d.year(), d.month() + 1)
    };
    // day 1 always exists
    NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CalendarSection {
    pub windows: Vec<DateWindow>,
    /// When non-empty these are used verbatim and `windows` is ignored.
    pub listing_urls: Vec<String>,
}

impl Default for CalendarSection {
    fn default() -> Self {
        let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN);
        let to = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or(NaiveDate::MIN);
        Self {
            windows: DateWindow::monthly(from, to),
            listing_urls: Vec::new(),
        }
    }
}

impl CalendarSection {
    /// The ordered listing URLs to scrape, one per date window.
    pub fn listing_urls(&self, site: &SiteConfig) -> Vec<String> {
        if !self.listing_urls.is_empty() {
            return self.listing_urls.clone();
        }
        self.windows.iter().map(|w| w.listing_url(site)).collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// Unset means no request timeout, matching the reference scraper.
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub path: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("results/calendar_events.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub format: almanac_common::observability::LogFormat,
    pub emit_stderr: bool,
    pub filter: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            format: Default::default(),
            emit_stderr: true,
            filter: "info".into(),
            dir: None,
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct AlmanacConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for AlmanacConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AlmanacConfigLoader {
    /// Start with `ALMANAC__` env overrides only; add files or snippets after.
    ///
    /// ```
    /// use almanac_config::AlmanacConfigLoader;
    ///
    /// let config = AlmanacConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.site.origin, "https://www.du.edu");
    /// assert_eq!(config.calendar.windows.len(), 12);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`Self::with_file`], but a missing file is not an error.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use almanac_config::AlmanacConfigLoader;
    ///
    /// let cfg = AlmanacConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// calendar:
    ///   windows:
    ///     - start: "2025-03-01"
    ///       end: "2025-04-01"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// let urls = cfg.calendar.listing_urls(&cfg.site);
    /// assert_eq!(
    ///     urls,
    ///     vec!["https://www.du.edu/calendar?search=&start_date=2025-03-01&end_date=2025-04-01"]
    /// );
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// Environment variables are layered last so they override file values.
    ///
    /// ```
    /// use almanac_config::AlmanacConfigLoader;
    ///
    /// unsafe { std::env::set_var("ALMANAC_DOC_OUT", "/tmp/doc-events.json"); }
    ///
    /// let config = AlmanacConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// output:
    ///   path: "${ALMANAC_DOC_OUT}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.output.path.to_str(), Some("/tmp/doc-events.json"));
    ///
    /// unsafe { std::env::remove_var("ALMANAC_DOC_OUT"); }
    /// ```
    pub fn load(self) -> Result<AlmanacConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("ALMANAC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: AlmanacConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
