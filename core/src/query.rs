use url::form_urlencoded;

/// Ordered query parameters with `URLSearchParams` semantics for get, set
/// and delete.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(search: &str) -> Self {
        let raw = search.strip_prefix('?').unwrap_or(search);
        let pairs = form_urlencoded::parse(raw.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Self { pairs }
    }

    pub fn has(&self, key: &str) -> bool {
        self.pairs.iter().any(|(name, _)| name == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Overwrites the first occurrence in place and drops the rest, or
    /// appends when the key is new.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut seen = false;
        self.pairs.retain_mut(|(name, current)| {
            if name != key {
                return true;
            }
            if seen {
                return false;
            }
            seen = true;
            *current = value.to_string();
            true
        });
        if !seen {
            self.pairs.push((key.to_string(), value.to_string()));
        }
    }

    pub fn delete(&mut self, key: &str) {
        self.pairs.retain(|(name, _)| name != key);
    }

    pub fn toggle(&mut self, key: &str, present: bool) {
        if present {
            self.set(key, "");
        } else {
            self.delete(key);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serializes with a leading `?`, writing empty values as bare keys.
    /// Returns an empty string when there are no parameters.
    pub fn to_search(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let mut out = String::from("?");
        for (idx, (key, value)) in self.pairs.iter().enumerate() {
            if idx > 0 {
                out.push('&');
            }
            out.extend(form_urlencoded::byte_serialize(key.as_bytes()));
            if !value.is_empty() {
                out.push('=');
                out.extend(form_urlencoded::byte_serialize(value.as_bytes()));
            }
        }
        out
    }
}
