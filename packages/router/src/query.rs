use std::collections::BTreeMap;

/// The query part of a URL, decoded into key/value pairs.
///
/// When a key appears more than once, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: BTreeMap<String, String>,
}

impl Query {
    /// Parse a raw query string, without the leading `?`.
    ///
    /// ```rust
    /// # use nestroute::query::Query;
    /// let query = Query::parse("a=1&b=hello%20world&a=2");
    /// assert_eq!(query.get("a"), Some("2"));
    /// assert_eq!(query.get("b"), Some("hello world"));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let pairs = form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Parse the query of a full URL. A URL without `?` has an empty query.
    ///
    /// ```rust
    /// # use nestroute::query::Query;
    /// assert!(Query::from_url("/").is_empty());
    /// assert_eq!(Query::from_url("/?a=1#frag").get("a"), Some("1"));
    /// ```
    pub fn from_url(url: &str) -> Self {
        split_query(url).map(Self::parse).unwrap_or_default()
    }

    /// The value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(String::as_str)
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no keys.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over all pairs, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The pairs as a map.
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.pairs
    }
}

/// The raw query of `url`: the text after the first `?` and before any `#`.
pub fn split_query(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once('?')?;
    Some(rest.split_once('#').map_or(rest, |(query, _)| query))
}
