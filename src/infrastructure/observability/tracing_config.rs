pub const DEFAULT_FILTER: &str = "info,anchorspan=debug,tower_http=debug";

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub default_filter: String,
}

impl TracingConfig {
    /// `level` replaces the crate's own directive, e.g. `trace` gives
    /// `info,anchorspan=trace,tower_http=debug`.
    pub fn new(environment: impl Into<String>, level: Option<&str>, json_format: bool) -> Self {
        let default_filter = match level.map(str::trim).filter(|l| !l.is_empty()) {
            Some(level) => format!("info,anchorspan={level},tower_http=debug"),
            None => DEFAULT_FILTER.to_string(),
        };
        Self {
            environment: environment.into(),
            json_format: json_format || log_format_is_json(),
            default_filter,
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            json_format: log_format_is_json(),
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }
}

fn log_format_is_json() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
