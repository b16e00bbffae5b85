//! Request-scoped cookie jar.
//!
//! A jar lives for one resolution attempt and is threaded explicitly through
//! every fetch and redirect hop of that attempt. It is never shared between
//! attempts.

/// Ordered name → value cookie map. Setting an existing name overwrites it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    entries: Vec<(String, String)>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Value for the `Cookie` request header (`a=1; b=2`), or `None` when empty.
    pub fn header_value(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let joined = self
            .entries
            .iter()
            .map(|(n, v)| format!("{n}={v}"))
            .collect::<Vec<_>>()
            .join("; ");
        Some(joined)
    }

    /// Merge the cookies carried by one `Set-Cookie` header value. Returns how many were set.
    pub fn absorb_set_cookie(&mut self, header_value: &str) -> usize {
        let pairs = parse_set_cookie(header_value);
        let n = pairs.len();
        for (name, value) in pairs {
            self.set(name, value);
        }
        n
    }
}

/// Parse a `Set-Cookie` value into `(name, value)` pairs.
///
/// The value may hold several cookies separated by `,`. For each, only the
/// `name=value` part before the first `;` is kept; attributes are dropped.
/// Fragments with an empty name or value are skipped, which also discards the
/// tail of an `Expires=Wed, 21 Oct ...` date split on its comma.
pub fn parse_set_cookie(header_value: &str) -> Vec<(String, String)> {
    header_value
        .split(',')
        .filter_map(|cookie| {
            let pair = cookie.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}
