//! Ambient request context.
//!
//! The surrounding request-handling code owns the context and fills it with
//! whatever it knows about the current call chain (trace id, span id, tenant,
//! ...). calllog only ever reads from it, by key, and only accepts string
//! values as identifiers.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Read-only, string-keyed lookup into a request-scoped context.
pub trait ContextLookup {
    fn lookup(&self, key: &str) -> Option<&Value>;

    /// Value under `key` if present and a JSON string; `None` on a miss or a
    /// type mismatch.
    fn lookup_str(&self, key: &str) -> Option<&str> {
        self.lookup(key).and_then(Value::as_str)
    }
}

/// Default context container.
///
/// ```
/// use calllog_core::context::{ContextLookup, RequestContext};
///
/// let ctx = RequestContext::new().with_value("trace-id", "abc123");
/// assert_eq!(ctx.lookup_str("trace-id"), Some("abc123"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    values: HashMap<String, Value>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `value`, returning the extended context.
    /// An existing binding for `key` is shadowed.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ContextLookup for RequestContext {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

impl ContextLookup for HashMap<String, Value> {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl ContextLookup for BTreeMap<String, Value> {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl ContextLookup for Map<String, Value> {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_context_misses() {
        let ctx = RequestContext::new();
        assert!(ctx.is_empty());
        assert!(ctx.lookup("trace-id").is_none());
        assert!(ctx.lookup_str("trace-id").is_none());
    }

    #[test]
    fn string_value_is_returned() {
        let ctx = RequestContext::new().with_value("trace-id", "t-1");
        assert_eq!(ctx.lookup_str("trace-id"), Some("t-1"));
    }

    #[test]
    fn non_string_value_is_a_type_mismatch() {
        let ctx = RequestContext::new()
            .with_value("n", 1)
            .with_value("b", true)
            .with_value("o", json!({"id": "x"}));
        assert_eq!(ctx.lookup("n"), Some(&json!(1)));
        assert!(ctx.lookup_str("n").is_none());
        assert!(ctx.lookup_str("b").is_none());
        assert!(ctx.lookup_str("o").is_none());
    }

    #[test]
    fn later_binding_shadows_earlier() {
        let ctx = RequestContext::new()
            .with_value("trace-id", "first")
            .with_value("trace-id", "second");
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.lookup_str("trace-id"), Some("second"));
    }

    #[test]
    fn empty_key_misses_unless_bound() {
        let mut ctx = RequestContext::new().with_value("trace-id", "t");
        assert!(ctx.lookup_str("").is_none());
        ctx.insert("", "bound-to-empty");
        assert_eq!(ctx.lookup_str(""), Some("bound-to-empty"));
    }

    #[test]
    fn std_maps_act_as_contexts() {
        let mut hm: HashMap<String, Value> = HashMap::new();
        hm.insert("k".into(), json!("v"));
        assert_eq!(hm.lookup_str("k"), Some("v"));

        let mut bt: BTreeMap<String, Value> = BTreeMap::new();
        bt.insert("k".into(), json!(7));
        assert!(bt.lookup_str("k").is_none());

        let obj = json!({"k": "from-object"});
        let map = obj.as_object().unwrap();
        assert_eq!(map.lookup_str("k"), Some("from-object"));
    }
}
