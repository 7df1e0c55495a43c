//! Log entry for a single outbound HTTP client call.
//!
//! Lifecycle: construct → [`start`] → setters → [`end`] → [`json`] / [`text`]
//! / [`emit`]. One entry per call, driven from one call path; every mutating
//! method takes `&mut self`, so an entry is never shared for writing.
//!
//! ```
//! use calllog_core::RequestContext;
//! use calllog_observability::http_client_log::{HttpClientLogEntry, with_trace_id_context_key};
//!
//! let ctx = RequestContext::new().with_value("trace-id", "4bf92f35");
//! let mut entry = HttpClientLogEntry::with_options(&ctx, [with_trace_id_context_key("trace-id")]);
//! entry.start();
//! entry.set_method("GET").set_req_url("https://example.com/a").set_status_code(200);
//! entry.end();
//!
//! assert_eq!(entry.trace_id(), "4bf92f35");
//! assert!(entry.text().contains("method=GET"));
//! ```
//!
//! [`start`]: HttpClientLogEntry::start
//! [`end`]: HttpClientLogEntry::end
//! [`json`]: HttpClientLogEntry::json
//! [`text`]: HttpClientLogEntry::text
//! [`emit`]: HttpClientLogEntry::emit

use calllog_core::{CallLogError, ContextLookup, EntryConfig, RequestContext, TextLayout};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// `tracing` target used by [`HttpClientLogEntry::emit`].
pub const LOG_TARGET: &str = "calllog::http_client";

/// Wall-clock layout of the `started` field: `YYYY-MM-DD HH:MM:SS.mmm`.
pub const STARTED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

// ─────────────────────────────────────────────────────────────
// Record
// ─────────────────────────────────────────────────────────────

/// The serialisable part of an entry.
///
/// Numeric facts are kept as pre-formatted decimal strings so the rendered
/// output is exactly what the caller set. Field order is the JSON key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientLogRecord {
    /// Start time, local, `YYYY-MM-DD HH:MM:SS.mmm`. Filled by `end()`.
    pub started: String,
    /// Whole milliseconds between `start()` and `end()`.
    pub cost_ms: String,
    pub req_url: String,
    pub method: String,
    pub status_code: String,
    pub local_ip: String,
    pub local_app: String,
    pub remote_app: String,
    pub remote_ip: String,
    pub trace_id: String,
    pub span_id: String,
    pub req_size_bytes: String,
    pub resp_size_bytes: String,
}

impl HttpClientLogRecord {
    /// Flat `key=value` rendering in fixed key order.
    ///
    /// Under [`TextLayout::Legacy`] the trace id segment has no `=`
    /// (`trace_id<value>`); existing line parsers expect it that way.
    pub fn render_text(&self, layout: TextLayout) -> String {
        let trace_sep = match layout {
            TextLayout::Legacy => "",
            TextLayout::KeyValue => "=",
        };
        format!(
            "started={},cost_ms={},req_url={},method={},status_code={},req_size_bytes={},resp_size_bytes={},local_ip={},local_app={},remote_ip={},remote_app={},trace_id{}{},span_id={}",
            self.started,
            self.cost_ms,
            self.req_url,
            self.method,
            self.status_code,
            self.req_size_bytes,
            self.resp_size_bytes,
            self.local_ip,
            self.local_app,
            self.remote_ip,
            self.remote_app,
            trace_sep,
            self.trace_id,
            self.span_id,
        )
    }
}

// ─────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────

/// A single named change to an [`EntryConfig`], applied at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOption {
    TraceIdContextKey(String),
    SpanIdContextKey(String),
    TextLayout(TextLayout),
}

impl EntryOption {
    fn apply(self, config: &mut EntryConfig) {
        match self {
            EntryOption::TraceIdContextKey(key) => config.trace_id_key = key,
            EntryOption::SpanIdContextKey(key) => config.span_id_key = key,
            EntryOption::TextLayout(layout) => config.text_layout = layout,
        }
    }
}

pub fn with_trace_id_context_key(key: impl Into<String>) -> EntryOption {
    EntryOption::TraceIdContextKey(key.into())
}

pub fn with_span_id_context_key(key: impl Into<String>) -> EntryOption {
    EntryOption::SpanIdContextKey(key.into())
}

pub fn with_text_layout(layout: TextLayout) -> EntryOption {
    EntryOption::TextLayout(layout)
}

// ─────────────────────────────────────────────────────────────
// Entry
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct StartMark {
    instant: Instant,
    wall: DateTime<Local>,
}

/// Log entry for one outbound HTTP call, bound to the caller's request
/// context.
#[derive(Debug)]
pub struct HttpClientLogEntry<'ctx, C: ContextLookup + ?Sized = RequestContext> {
    ctx: &'ctx C,
    config: EntryConfig,
    start: Option<StartMark>,
    duration: Duration,
    record: HttpClientLogRecord,
}

impl<'ctx, C: ContextLookup + ?Sized> HttpClientLogEntry<'ctx, C> {
    pub fn new(ctx: &'ctx C, config: EntryConfig) -> Self {
        Self {
            ctx,
            config,
            start: None,
            duration: Duration::ZERO,
            record: HttpClientLogRecord::default(),
        }
    }

    /// Build from the default config with `options` applied in order; a later
    /// option overrides an earlier one touching the same setting.
    pub fn with_options<I>(ctx: &'ctx C, options: I) -> Self
    where
        I: IntoIterator<Item = EntryOption>,
    {
        let mut config = EntryConfig::default();
        for option in options {
            option.apply(&mut config);
        }
        Self::new(ctx, config)
    }

    // ── Timing ───────────────────────────────────────────────────

    /// Mark the start of the call. Calling again restarts the timer.
    pub fn start(&mut self) {
        self.start = Some(StartMark {
            instant: Instant::now(),
            wall: Local::now(),
        });
    }

    /// Mark the end of the call.
    ///
    /// Refreshes the trace id and span id from the context (a string under
    /// the configured key wins; a miss or a non-string keeps the current
    /// value), formats `started`, and records the elapsed time.
    ///
    /// `start()` must have been called first. Debug builds panic otherwise;
    /// release builds log a warning and record a zero duration.
    pub fn end(&mut self) {
        if let Some(trace_id) = self.ctx.lookup_str(&self.config.trace_id_key) {
            self.record.trace_id = trace_id.to_owned();
        }
        if let Some(span_id) = self.ctx.lookup_str(&self.config.span_id_key) {
            self.record.span_id = span_id.to_owned();
        }

        match self.start {
            Some(mark) => {
                self.record.started = mark.wall.format(STARTED_FORMAT).to_string();
                self.duration = mark.instant.elapsed();
            }
            None => {
                debug_assert!(false, "HttpClientLogEntry::end called before start");
                warn!(
                    target: LOG_TARGET,
                    req_url = %self.record.req_url,
                    "end() called before start(); recording zero duration"
                );
                self.record.started.clear();
                self.duration = Duration::ZERO;
            }
        }

        let mut buf = itoa::Buffer::new();
        self.record.cost_ms = buf.format(self.duration.as_millis()).to_owned();
    }

    // ── Setters ──────────────────────────────────────────────────

    pub fn set_req_url(&mut self, req_url: impl Into<String>) -> &mut Self {
        self.record.req_url = req_url.into();
        self
    }

    pub fn set_method(&mut self, method: impl Into<String>) -> &mut Self {
        self.record.method = method.into();
        self
    }

    /// Stored in base-10 form; no range check.
    pub fn set_status_code(&mut self, status_code: i64) -> &mut Self {
        let mut buf = itoa::Buffer::new();
        self.record.status_code = buf.format(status_code).to_owned();
        self
    }

    pub fn set_local_ip(&mut self, local_ip: impl Into<String>) -> &mut Self {
        self.record.local_ip = local_ip.into();
        self
    }

    pub fn set_local_app(&mut self, local_app: impl Into<String>) -> &mut Self {
        self.record.local_app = local_app.into();
        self
    }

    pub fn set_remote_ip(&mut self, remote_ip: impl Into<String>) -> &mut Self {
        self.record.remote_ip = remote_ip.into();
        self
    }

    pub fn set_remote_app(&mut self, remote_app: impl Into<String>) -> &mut Self {
        self.record.remote_app = remote_app.into();
        self
    }

    pub fn set_req_size_bytes(&mut self, req_size_bytes: impl Into<String>) -> &mut Self {
        self.record.req_size_bytes = req_size_bytes.into();
        self
    }

    pub fn set_resp_size_bytes(&mut self, resp_size_bytes: impl Into<String>) -> &mut Self {
        self.record.resp_size_bytes = resp_size_bytes.into();
        self
    }

    /// A string found in the context under the trace id key at `end()`
    /// replaces this value.
    pub fn set_trace_id(&mut self, trace_id: impl Into<String>) -> &mut Self {
        self.record.trace_id = trace_id.into();
        self
    }

    pub fn set_http_method(&mut self, method: &http::Method) -> &mut Self {
        self.set_method(method.as_str())
    }

    pub fn set_http_status(&mut self, status: http::StatusCode) -> &mut Self {
        self.set_status_code(i64::from(status.as_u16()))
    }

    pub fn set_req_url_from(&mut self, uri: &http::Uri) -> &mut Self {
        self.set_req_url(uri.to_string())
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn config(&self) -> &EntryConfig {
        &self.config
    }

    pub fn record(&self) -> &HttpClientLogRecord {
        &self.record
    }

    /// Elapsed time recorded by the last `end()`; zero before that.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn started(&self) -> &str {
        &self.record.started
    }

    pub fn cost_ms(&self) -> &str {
        &self.record.cost_ms
    }

    pub fn trace_id(&self) -> &str {
        &self.record.trace_id
    }

    pub fn span_id(&self) -> &str {
        &self.record.span_id
    }

    // ── Rendering ────────────────────────────────────────────────

    /// Serialise the record to compact JSON bytes.
    pub fn json(&self) -> Result<Vec<u8>, CallLogError> {
        Ok(serde_json::to_vec(&self.record)?)
    }

    pub fn json_string(&self) -> Result<String, CallLogError> {
        Ok(serde_json::to_string(&self.record)?)
    }

    /// Write the JSON record followed by `\n`.
    pub fn write_json_line<W: Write>(&self, mut writer: W) -> Result<(), CallLogError> {
        serde_json::to_writer(&mut writer, &self.record)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flat `key=value` line in the configured [`TextLayout`].
    pub fn text(&self) -> String {
        self.record.render_text(self.config.text_layout)
    }

    /// Emit the record as one `INFO` event on [`LOG_TARGET`].
    pub fn emit(&self) {
        let r = &self.record;
        info!(
            target: LOG_TARGET,
            started = %r.started,
            cost_ms = %r.cost_ms,
            req_url = %r.req_url,
            method = %r.method,
            status_code = %r.status_code,
            local_ip = %r.local_ip,
            local_app = %r.local_app,
            remote_app = %r.remote_app,
            remote_ip = %r.remote_ip,
            trace_id = %r.trace_id,
            span_id = %r.span_id,
            req_size_bytes = %r.req_size_bytes,
            resp_size_bytes = %r.resp_size_bytes,
            "http client call"
        );
    }
}

impl<C: ContextLookup + ?Sized> fmt::Display for HttpClientLogEntry<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

// ─────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────
