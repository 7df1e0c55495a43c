pub mod http_client_log;
pub mod logger;

pub use http_client_log::{
    EntryOption, HttpClientLogEntry, HttpClientLogRecord, with_span_id_context_key,
    with_text_layout, with_trace_id_context_key,
};
pub use logger::{LogInitError, init_logging};
