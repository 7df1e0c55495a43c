// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  calllog: render one outbound HTTP call as a structured log record
//
//  Config:  YAML file + CALLLOG_* env overrides
//  Output:  record on stdout (JSON line or key=value text),
//           diagnostics on stderr
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use calllog_core::{CallLogConfig, EntryConfig, RequestContext};
use calllog_observability::{HttpClientLogEntry, init_logging};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, error, info};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "calllog", version, about = "Render a structured log record for one outbound HTTP call")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "calllog.yaml")]
    config: PathBuf,

    /// Log level (overrides `log.level` from the config file)
    #[arg(long)]
    log_level: Option<String>,

    /// Record rendering
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[arg(long, default_value = "")]
    url: String,

    #[arg(long, default_value = "GET")]
    method: String,

    #[arg(long)]
    status: Option<i64>,

    #[arg(long)]
    req_size_bytes: Option<String>,

    #[arg(long)]
    resp_size_bytes: Option<String>,

    #[arg(long)]
    local_ip: Option<String>,

    #[arg(long)]
    local_app: Option<String>,

    #[arg(long)]
    remote_ip: Option<String>,

    #[arg(long)]
    remote_app: Option<String>,

    /// Trace id placed in the request context under `entry.trace_id_key`
    /// (set on the entry directly when no key is configured)
    #[arg(long)]
    trace_id: Option<String>,

    /// Span id placed in the request context under `entry.span_id_key`
    #[arg(long)]
    span_id: Option<String>,

    /// Also emit the record as a tracing event
    #[arg(long)]
    emit: bool,
}

/// Seeds the request context with `--trace-id`/`--span-id` under the
/// configured keys. An empty key name leaves that id out of the context.
fn request_context(cli: &Cli, entry: &EntryConfig) -> RequestContext {
    let mut ctx = RequestContext::new();
    if let Some(trace_id) = &cli.trace_id {
        if !entry.trace_id_key.is_empty() {
            ctx.insert(entry.trace_id_key.as_str(), trace_id.as_str());
        }
    }
    if let Some(span_id) = &cli.span_id {
        if !entry.span_id_key.is_empty() {
            ctx.insert(entry.span_id_key.as_str(), span_id.as_str());
        }
    }
    ctx
}

/// Starts an entry over `ctx` and applies the record flags. The caller ends it.
fn build_entry<'ctx>(cli: &Cli, ctx: &'ctx RequestContext, config: EntryConfig) -> HttpClientLogEntry<'ctx> {
    let direct_trace_id = config.trace_id_key.is_empty();
    let mut entry = HttpClientLogEntry::new(ctx, config);
    entry.start();
    entry.set_req_url(cli.url.as_str()).set_method(cli.method.as_str());
    if let Some(trace_id) = &cli.trace_id {
        if direct_trace_id {
            entry.set_trace_id(trace_id.as_str());
        }
    }
    if let Some(status) = cli.status {
        entry.set_status_code(status);
    }
    if let Some(v) = &cli.req_size_bytes {
        entry.set_req_size_bytes(v.as_str());
    }
    if let Some(v) = &cli.resp_size_bytes {
        entry.set_resp_size_bytes(v.as_str());
    }
    if let Some(v) = &cli.local_ip {
        entry.set_local_ip(v.as_str());
    }
    if let Some(v) = &cli.local_app {
        entry.set_local_app(v.as_str());
    }
    if let Some(v) = &cli.remote_ip {
        entry.set_remote_ip(v.as_str());
    }
    if let Some(v) = &cli.remote_app {
        entry.set_remote_app(v.as_str());
    }
    entry
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Config ──
    let mut config = if cli.config.exists() {
        CallLogConfig::load(&cli.config)?
    } else {
        CallLogConfig::default()
    };
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }

    // ── Tracing ──
    init_logging(&config.log)?;
    debug!(path = %cli.config.display(), found = cli.config.exists(), "Configuration resolved");

    // ── Request context ──
    let ctx = request_context(&cli, &config.entry);

    // ── Entry ──
    let mut entry = build_entry(&cli, &ctx, config.entry);
    entry.end();

    // ── Render ──
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Json => {
            if let Err(e) = entry.write_json_line(&mut out) {
                error!(kind = e.kind(), error = %e, "Failed to render record");
                return Err(e.into());
            }
        }
        OutputFormat::Text => writeln!(out, "{entry}")?,
    }

    if cli.emit {
        entry.emit();
    }
    info!(cost_ms = entry.cost_ms(), trace_id = entry.trace_id(), "Record rendered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calllog_core::ContextLookup;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("calllog").chain(args.iter().copied()))
    }

    #[test]
    fn trace_id_goes_through_context_when_key_configured() {
        let cli = cli(&["--trace-id", "abc", "--span-id", "s1"]);
        let config = EntryConfig::default().with_trace_id_key("trace").with_span_id_key("span");

        let ctx = request_context(&cli, &config);
        assert_eq!(ctx.lookup_str("trace"), Some("abc"));
        assert_eq!(ctx.lookup_str("span"), Some("s1"));

        let mut entry = build_entry(&cli, &ctx, config);
        assert_eq!(entry.trace_id(), "");
        entry.end();
        assert_eq!(entry.trace_id(), "abc");
        assert_eq!(entry.span_id(), "s1");
    }

    #[test]
    fn trace_id_set_directly_when_no_key_configured() {
        let cli = cli(&["--trace-id", "abc", "--span-id", "s1"]);
        let config = EntryConfig::default().with_trace_id_key("").with_span_id_key("");

        let ctx = request_context(&cli, &config);
        assert!(ctx.is_empty());

        let mut entry = build_entry(&cli, &ctx, config);
        entry.end();
        assert_eq!(entry.trace_id(), "abc");
        assert_eq!(entry.span_id(), "");
    }

    #[test]
    fn record_flags_land_on_the_entry() {
        let cli = cli(&[
            "--url", "https://api.example.com/v1", "--method", "POST", "--status", "201",
            "--req-size-bytes", "12", "--remote-app", "billing",
        ]);
        let config = EntryConfig::default();
        let ctx = request_context(&cli, &config);
        let mut entry = build_entry(&cli, &ctx, config);
        entry.end();

        let record = entry.record();
        assert_eq!(record.req_url, "https://api.example.com/v1");
        assert_eq!(record.method, "POST");
        assert_eq!(record.status_code, "201");
        assert_eq!(record.req_size_bytes, "12");
        assert_eq!(record.remote_app, "billing");
        assert_eq!(record.local_app, "");
    }
}
