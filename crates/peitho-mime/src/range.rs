//! Media-range parsing.

/// A parsed media range from an `Accept` or `Content-Type` header entry,
/// e.g. `application/xml;q=0.9` or `text/*;charset=utf-8`.
///
/// Parsing is deliberately lenient, as header matching must tolerate what
/// real clients send: a malformed or out-of-range `q` falls back to 1.0,
/// unknown parameters are kept verbatim, and only a structurally empty
/// type or subtype rejects the entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    kind: String,
    subtype: String,
    params: Vec<(String, String)>,
    quality: f32,
}

impl MediaRange {
    /// Parses a single media range. Returns `None` for entries without a
    /// usable `type/subtype` shape. A bare `*` is read as `*/*`.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(';');
        let full_type = parts.next()?.trim();

        // "*" is a degenerate but common spelling of "*/*".
        let full_type = if full_type == "*" { "*/*" } else { full_type };

        let (kind, subtype) = full_type.split_once('/')?;
        let kind = kind.trim();
        let subtype = subtype.trim();
        if kind.is_empty() || subtype.is_empty() {
            return None;
        }

        let mut quality = 1.0_f32;
        let mut params = Vec::new();
        for param in parts {
            let Some((name, value)) = param.split_once('=') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim().trim_matches('"').to_string();
            if name == "q" {
                quality = match value.parse::<f32>() {
                    Ok(q) if (0.0..=1.0).contains(&q) => q,
                    _ => 1.0,
                };
            } else {
                params.push((name, value));
            }
        }

        Some(Self {
            kind: kind.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            params,
            quality,
        })
    }

    /// Parses every usable entry of a comma-separated header value.
    pub fn parse_header(header: &str) -> Vec<Self> {
        header.split(',').filter_map(Self::parse).collect()
    }

    /// The primary type, lowercased (`application` in `application/json`).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The subtype, lowercased (`json` in `application/json`).
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// The media parameters, excluding `q`.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// The quality value, defaulting to 1.0.
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Returns true when this range's type component matches the other's,
    /// treating `*` as a wildcard on either side.
    fn component_matches(a: &str, b: &str) -> bool {
        a == b || a == "*" || b == "*"
    }

    /// Computes the fitness of a concrete media type against this range:
    /// `None` when they do not match at all, otherwise a specificity score
    /// (+100 exact type, +10 exact subtype, +1 per matching parameter).
    pub fn fitness(&self, other: &Self) -> Option<u32> {
        if !Self::component_matches(&self.kind, &other.kind)
            || !Self::component_matches(&self.subtype, &other.subtype)
        {
            return None;
        }

        let mut fitness = 0;
        if self.kind == other.kind {
            fitness += 100;
        }
        if self.subtype == other.subtype {
            fitness += 10;
        }
        fitness += other
            .params
            .iter()
            .filter(|(name, value)| {
                self.params
                    .iter()
                    .any(|(n, v)| n == name && v == value)
            })
            .count() as u32;
        Some(fitness)
    }
}

impl std::fmt::Display for MediaRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.subtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_type() {
        let range = MediaRange::parse("application/json").unwrap();
        assert_eq!(range.kind(), "application");
        assert_eq!(range.subtype(), "json");
        assert_eq!(range.quality(), 1.0);
    }

    #[test]
    fn parses_quality_and_params() {
        let range = MediaRange::parse("text/html; q=0.5; level=1").unwrap();
        assert_eq!(range.quality(), 0.5);
        assert_eq!(range.params(), &[("level".to_string(), "1".to_string())]);
    }

    #[test]
    fn malformed_quality_defaults_to_one() {
        assert_eq!(MediaRange::parse("text/html;q=bogus").unwrap().quality(), 1.0);
        assert_eq!(MediaRange::parse("text/html;q=7").unwrap().quality(), 1.0);
    }

    #[test]
    fn bare_star_reads_as_full_wildcard() {
        let range = MediaRange::parse("*").unwrap();
        assert_eq!(range.kind(), "*");
        assert_eq!(range.subtype(), "*");
    }

    #[test]
    fn rejects_empty_components() {
        assert!(MediaRange::parse("").is_none());
        assert!(MediaRange::parse("/json").is_none());
        assert!(MediaRange::parse("application/").is_none());
        assert!(MediaRange::parse("application").is_none());
    }

    #[test]
    fn types_are_lowercased() {
        let range = MediaRange::parse("Application/JSON").unwrap();
        assert_eq!(range.to_string(), "application/json");
    }

    #[test]
    fn header_splitting_skips_malformed_entries() {
        let ranges = MediaRange::parse_header("application/json, garbage, text/*;q=0.3");
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1].subtype(), "*");
    }

    #[test]
    fn fitness_prefers_exactness() {
        let concrete = MediaRange::parse("text/html;level=1").unwrap();
        let exact = MediaRange::parse("text/html;level=1").unwrap();
        let partial = MediaRange::parse("text/*").unwrap();
        let wildcard = MediaRange::parse("*/*").unwrap();
        let other = MediaRange::parse("image/png").unwrap();

        assert_eq!(exact.fitness(&concrete), Some(111));
        assert_eq!(partial.fitness(&concrete), Some(100));
        assert_eq!(wildcard.fitness(&concrete), Some(0));
        assert_eq!(other.fitness(&concrete), None);
    }
}
