pub mod config;
pub mod context;
pub mod error;

pub use config::{CallLogConfig, EntryConfig, LogConfig, LogFormat, TextLayout};
pub use context::{ContextLookup, RequestContext};
pub use error::CallLogError;
