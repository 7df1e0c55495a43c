use figment::{Figment, providers::{Env, Format, Yaml}};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level calllog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallLogConfig {
    #[serde(default)]
    pub entry: EntryConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Settings bound to every HTTP client log entry at construction.
///
/// Empty key names are allowed; lookups against them simply miss.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Context key under which the caller stores the trace id.
    #[serde(default)]
    pub trace_id_key: String,
    /// Context key under which the caller stores the span id.
    #[serde(default)]
    pub span_id_key: String,
    #[serde(default)]
    pub text_layout: TextLayout,
}

/// Separator style of the flat text rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextLayout {
    /// Byte-compatible with existing parsers: the trace id segment is written
    /// as `trace_id<value>`, with no `=`.
    #[default]
    Legacy,
    /// Every segment, trace id included, is written as `key=value`.
    KeyValue,
}

/// Process-wide log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `calllog=debug`.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable single-line output.
    Pretty,
}

// ── Defaults ──────────────────────────────────────────────────

fn default_level() -> String { "info".into() }

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::Json,
        }
    }
}

// ── Impls ─────────────────────────────────────────────────────

impl EntryConfig {
    pub fn with_trace_id_key(mut self, key: impl Into<String>) -> Self {
        self.trace_id_key = key.into();
        self
    }

    pub fn with_span_id_key(mut self, key: impl Into<String>) -> Self {
        self.span_id_key = key.into();
        self
    }

    pub fn with_text_layout(mut self, layout: TextLayout) -> Self {
        self.text_layout = layout;
        self
    }
}

impl CallLogConfig {
    /// Load configuration from YAML file + env overrides.
    ///
    /// Env variables use the `CALLLOG_` prefix and `__` as the nesting
    /// separator, e.g. `CALLLOG_ENTRY__TRACE_ID_KEY=x-trace-id`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config: CallLogConfig = Self::figment(path).extract()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("CALLLOG_").split("__"))
    }
}
