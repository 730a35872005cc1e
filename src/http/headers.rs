//! Case-insensitive HTTP header map.

/// An order-preserving header map with case-insensitive name lookup,
/// matching HTTP/1.1 field semantics (RFC 9110 §5.1).
///
/// Backed by a plain `Vec`; the handful of headers on a typical request
/// makes a linear scan cheaper than hashing.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a header map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends a header entry.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the first value for `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if at least one entry with `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain");
        assert_eq!(headers.get("content-type"), Some("text/plain"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
        assert!(headers.contains("Content-type"));
    }

    #[test]
    fn missing_name() {
        let headers = Headers::new();
        assert_eq!(headers.get("host"), None);
        assert!(!headers.contains("host"));
        assert!(headers.is_empty());
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut headers = Headers::new();
        headers.insert("Host", "localhost");
        headers.insert("Accept", "*/*");
        let pairs: Vec<_> = headers.iter().collect();
        assert_eq!(pairs, vec![("Host", "localhost"), ("Accept", "*/*")]);
        assert_eq!(headers.len(), 2);
    }
}
