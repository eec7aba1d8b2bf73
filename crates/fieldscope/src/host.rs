//! The host side of a widget: a reactive property bag.

use std::collections::HashMap;

use serde_json::Value;

/// Access to the host model that owns the widget's properties.
///
/// `set_property` changes local state only; `touch` flushes it to the host.
pub trait HostModel {
    fn get_property(&self, name: &str) -> Option<Value>;

    fn set_property(&mut self, name: &str, value: Value);

    fn touch(&mut self);
}

/// An in-memory host that records what the viewer writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    properties: HashMap<String, Value>,
    writes: Vec<(String, Value)>,
    touches: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a property without recording a write.
    #[must_use]
    pub fn with_property(mut self, name: &str, value: Value) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    /// Every `set_property` call, in order.
    pub fn writes(&self) -> &[(String, Value)] {
        &self.writes
    }

    /// The most recent value written to `name`.
    pub fn last_write(&self, name: &str) -> Option<&Value> {
        self.writes
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn touch_count(&self) -> usize {
        self.touches
    }
}

impl HostModel for MemoryHost {
    fn get_property(&self, name: &str) -> Option<Value> {
        self.properties.get(name).cloned()
    }

    fn set_property(&mut self, name: &str, value: Value) {
        self.properties.insert(name.to_string(), value.clone());
        self.writes.push((name.to_string(), value));
    }

    fn touch(&mut self) {
        self.touches += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_host_records_writes() {
        let mut host = MemoryHost::new().with_property("title", json!("a"));
        assert_eq!(host.get_property("title"), Some(json!("a")));
        assert!(host.writes().is_empty());

        host.set_property("title", json!("b"));
        host.set_property("title", json!("c"));
        host.touch();
        assert_eq!(host.get_property("title"), Some(json!("c")));
        assert_eq!(host.last_write("title"), Some(&json!("c")));
        assert_eq!(host.writes().len(), 2);
        assert_eq!(host.touch_count(), 1);
    }
}
