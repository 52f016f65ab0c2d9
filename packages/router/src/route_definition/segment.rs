use std::fmt::{Display, Formatter};

use tracing::error;

use crate::matching::Params;

/// One `/`-delimited piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// Matches a URL segment that is exactly equal to the contained text.
    Fixed(String),
    /// Matches any URL segment and captures it under the contained name.
    Parameter(String),
}

/// The segment pattern of a route, e.g. `posts/:id`.
///
/// An empty pattern consumes no URL segments. Index and layout routes use one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentPattern {
    segments: Vec<PatternSegment>,
}

impl SegmentPattern {
    /// Parse a pattern.
    ///
    /// Leading and trailing `/` are ignored, as are empty pieces, so `""` and `"/"` both parse to
    /// the empty pattern. Pieces starting with `:` are parameters.
    ///
    /// ```rust
    /// # use nestroute::route_definition::{PatternSegment, SegmentPattern};
    /// let pattern = SegmentPattern::parse("/posts/:id/");
    /// assert_eq!(pattern.len(), 2);
    /// assert_eq!(pattern.segments()[1], PatternSegment::Parameter("id".to_string()));
    /// ```
    ///
    /// # Panic
    /// - If the same parameter name appears twice, but only in debug builds. Release builds keep
    ///   the last capture.
    pub fn parse(pattern: &str) -> Self {
        let segments: Vec<_> = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => PatternSegment::Parameter(name.to_string()),
                None => PatternSegment::Fixed(s.to_string()),
            })
            .collect();

        for (i, seg) in segments.iter().enumerate() {
            let PatternSegment::Parameter(name) = seg else {
                continue;
            };
            let duplicate = segments[..i]
                .iter()
                .any(|s| matches!(s, PatternSegment::Parameter(other) if other == name));
            if duplicate {
                error!(r#"duplicate parameter "{name}" in pattern "{pattern}", later prevails"#);
                #[cfg(debug_assertions)]
                panic!(r#"duplicate parameter "{name}" in pattern "{pattern}""#);
            }
        }

        Self { segments }
    }

    /// The parsed pieces, in order.
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// How many URL segments this pattern consumes.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this pattern consumes no URL segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The names of all parameters in this pattern.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            PatternSegment::Parameter(name) => Some(name.as_str()),
            PatternSegment::Fixed(_) => None,
        })
    }

    /// Compare this pattern positionally against the start of `url_segments`.
    ///
    /// Returns the captured parameters, or [`None`] if a fixed piece differs. The caller must make
    /// sure there are at least [`len`](Self::len) segments.
    pub(crate) fn capture(&self, url_segments: &[&str], decode: bool) -> Option<Params> {
        debug_assert!(url_segments.len() >= self.segments.len());

        let mut params = Params::new();
        for (pattern, value) in self.segments.iter().zip(url_segments) {
            match pattern {
                PatternSegment::Fixed(fixed) if fixed != value => return None,
                PatternSegment::Fixed(_) => {}
                PatternSegment::Parameter(name) => {
                    params.insert(name.clone(), capture_value(value, decode));
                }
            }
        }

        Some(params)
    }
}

fn capture_value(value: &str, decode: bool) -> String {
    if !decode {
        return value.to_string();
    }

    match urlencoding::decode(value) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            error!(r#"failed to decode parameter value "{value}": {e}"#);
            value.to_string()
        }
    }
}

impl Display for SegmentPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            match seg {
                PatternSegment::Fixed(fixed) => write!(f, "{fixed}")?,
                PatternSegment::Parameter(name) => write!(f, ":{name}")?,
            }
        }
        Ok(())
    }
}

impl From<&str> for SegmentPattern {
    fn from(pattern: &str) -> Self {
        Self::parse(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patterns() {
        assert!(SegmentPattern::parse("").is_empty());
        assert!(SegmentPattern::parse("/").is_empty());
        assert!(SegmentPattern::parse("//").is_empty());
    }

    #[test]
    fn parses_fixed_and_parameters() {
        let pattern = SegmentPattern::parse("users/:user/posts/:post");

        assert_eq!(
            pattern.segments(),
            &[
                PatternSegment::Fixed("users".into()),
                PatternSegment::Parameter("user".into()),
                PatternSegment::Fixed("posts".into()),
                PatternSegment::Parameter("post".into()),
            ]
        );
        assert_eq!(
            pattern.parameter_names().collect::<Vec<_>>(),
            vec!["user", "post"]
        );
        assert_eq!(pattern.to_string(), "users/:user/posts/:post");
    }

    #[test]
    fn capture_fixed_mismatch() {
        let pattern = SegmentPattern::parse("posts/:id");

        assert_eq!(pattern.capture(&["pages", "1"], false), None);
    }

    #[test]
    fn capture_parameters() {
        let pattern = SegmentPattern::parse("posts/:id");
        let params = pattern.capture(&["posts", "42", "extra"], false).unwrap();

        assert_eq!(params.len(), 1);
        assert_eq!(params["id"], "42");
    }

    #[test]
    fn capture_keeps_literal_by_default() {
        let pattern = SegmentPattern::parse(":name");

        assert_eq!(
            pattern.capture(&["hello%20world"], false).unwrap()["name"],
            "hello%20world"
        );
        assert_eq!(
            pattern.capture(&["hello%20world"], true).unwrap()["name"],
            "hello world"
        );
    }

    #[test]
    fn capture_keeps_literal_on_invalid_encoding() {
        let pattern = SegmentPattern::parse(":name");

        assert_eq!(pattern.capture(&["%FF"], true).unwrap()["name"], "%FF");
    }

    #[test]
    #[should_panic = r#"duplicate parameter "id" in pattern "a/:id/:id""#]
    #[cfg(debug_assertions)]
    fn duplicate_parameter_debug() {
        SegmentPattern::parse("a/:id/:id");
    }
}
