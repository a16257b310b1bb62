//! Version tokens and comparison
//!
//! Versions are written `v<major>-<minor>-<patch>`. Candidate versions supplied
//! by an operator are parsed strictly; tags read back from deployed stages are
//! parsed leniently because historical tags may predate the current syntax.
//!
//! Comparison is component-wise on integers, never on strings, and a shorter
//! token is right-padded with zeros: `v1-2 == v1-2-0` and `v2-10-0 > v2-9-9`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Version parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// A candidate version does not match the required shape.
    #[error("Invalid version format: '{raw}' (expected {expected})")]
    InvalidFormat { raw: String, expected: String },

    /// A historical tag could not be read, even leniently.
    #[error("Unparseable version tag: '{raw}'")]
    UnparseableTag { raw: String },
}

/// Textual shape of a version: a leading marker and a separator set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionSyntax {
    /// Required prefix on candidate versions (`"v"`).
    pub marker: String,

    /// Characters separating integer components (`['-']`).
    pub separators: Vec<char>,
}

impl Default for VersionSyntax {
    fn default() -> Self {
        Self {
            marker: "v".to_string(),
            separators: vec!['-'],
        }
    }
}

impl VersionSyntax {
    /// Human-readable pattern, used in error messages.
    pub fn describe(&self) -> String {
        let sep = match self.separators.as_slice() {
            [single] => single.to_string(),
            many => format!("[{}]", many.iter().collect::<String>()),
        };
        format!("{}<int>({}<int>)*", self.marker, sep)
    }

    /// Render a token with this marker, joined by the first separator.
    pub fn render(&self, token: &VersionToken) -> String {
        let sep = self.separators.first().copied().unwrap_or('-').to_string();
        let body: Vec<String> = token.0.iter().map(u64::to_string).collect();
        format!("{}{}", self.marker, body.join(&sep))
    }

    fn components(&self, body: &str) -> Option<Vec<u64>> {
        if body.is_empty() {
            return None;
        }
        body.split(|c: char| self.separators.contains(&c))
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    None
                } else {
                    part.parse::<u64>().ok()
                }
            })
            .collect()
    }
}

/// Parsed version: an ordered tuple of non-negative integers.
///
/// Equality, ordering and hashing all treat missing trailing components as
/// zero, so `v1-0` and `v1-0-0` are the same version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(Vec<u64>);

impl VersionToken {
    pub fn new(components: Vec<u64>) -> Self {
        Self(components)
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }

    /// Strict parse with the default syntax.
    pub fn parse_candidate(raw: &str) -> Result<Self, VersionError> {
        VersionComparator::default().parse_candidate(raw)
    }

    /// Lenient parse with the default syntax.
    pub fn parse_tag(raw: &str) -> Result<Self, VersionError> {
        VersionComparator::default().parse_tag(raw)
    }

    fn significant(&self) -> &[u64] {
        let len = self
            .0
            .iter()
            .rposition(|c| *c != 0)
            .map(|i| i + 1)
            .unwrap_or(0);
        &self.0[..len]
    }
}

impl Ord for VersionToken {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| {
                let a = self.0.get(i).copied().unwrap_or(0);
                let b = other.0.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for VersionToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionToken {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionToken {}

impl Hash for VersionToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

/// Renders in the default `v<int>-<int>` syntax; see [`VersionSyntax::render`].
impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&VersionSyntax::default().render(self))
    }
}

impl FromStr for VersionToken {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_candidate(s)
    }
}

/// Parses and compares versions under a given [`VersionSyntax`].
#[derive(Debug, Clone, Default)]
pub struct VersionComparator {
    syntax: VersionSyntax,
}

impl VersionComparator {
    pub fn new(syntax: VersionSyntax) -> Self {
        Self { syntax }
    }

    pub fn syntax(&self) -> &VersionSyntax {
        &self.syntax
    }

    /// Parse an operator-supplied version. The marker is mandatory.
    pub fn parse_candidate(&self, raw: &str) -> Result<VersionToken, VersionError> {
        let body = if self.syntax.marker.is_empty() {
            Some(raw)
        } else {
            raw.strip_prefix(self.syntax.marker.as_str())
        };

        body.and_then(|b| self.syntax.components(b))
            .map(VersionToken)
            .ok_or_else(|| VersionError::InvalidFormat {
                raw: raw.to_string(),
                expected: self.syntax.describe(),
            })
    }

    /// Parse a tag read back from a deployed stage.
    ///
    /// Whitespace is trimmed and the marker is optional.
    pub fn parse_tag(&self, raw: &str) -> Result<VersionToken, VersionError> {
        let trimmed = raw.trim();
        let body = if self.syntax.marker.is_empty() {
            trimmed
        } else {
            trimmed
                .strip_prefix(self.syntax.marker.as_str())
                .unwrap_or(trimmed)
        };

        self.syntax
            .components(body)
            .map(VersionToken)
            .ok_or_else(|| VersionError::UnparseableTag {
                raw: raw.to_string(),
            })
    }

    pub fn compare(&self, a: &VersionToken, b: &VersionToken) -> Ordering {
        a.cmp(b)
    }

    pub fn is_greater(&self, a: &VersionToken, b: &VersionToken) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn v(raw: &str) -> VersionToken {
        VersionToken::parse_candidate(raw).unwrap()
    }

    #[test]
    fn test_parse_candidate() {
        assert_eq!(v("v1-0-0").components(), &[1, 0, 0]);
        assert_eq!(v("v12-3").components(), &[12, 3]);
        assert_eq!(v("v7").components(), &[7]);
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        assert_eq!(v("v2-10-0").cmp(&v("v2-9-9")), Ordering::Greater);
        assert!(v("v10-0-0") > v("v9-99-99"));
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(v("v1-0"), v("v1-0-0"));
        assert!(v("v1-0-1") > v("v1-0"));
        assert!(v("v1") < v("v1-0-0-1"));

        let mut set = HashSet::new();
        set.insert(v("v3-1"));
        assert!(set.contains(&v("v3-1-0")));
    }

    #[test]
    fn test_candidate_requires_marker() {
        let err = VersionToken::parse_candidate("1-2-0").unwrap_err();
        assert!(matches!(err, VersionError::InvalidFormat { .. }));
        assert!(err.to_string().contains("v<int>(-<int>)*"));
    }

    #[test]
    fn test_candidate_rejects_malformed() {
        for raw in ["v", "v1--2", "v1-a-0", "V1-0-0", "v1-2-0 ", "v-1-2", "", "v1.2.3"] {
            assert!(
                matches!(
                    VersionToken::parse_candidate(raw),
                    Err(VersionError::InvalidFormat { .. })
                ),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_candidate_rejects_overflow() {
        assert!(VersionToken::parse_candidate("v99999999999999999999999").is_err());
    }

    #[test]
    fn test_tag_is_lenient() {
        assert_eq!(VersionToken::parse_tag("1-2-0").unwrap(), v("v1-2-0"));
        assert_eq!(VersionToken::parse_tag(" v3-0-1 ").unwrap(), v("v3-0-1"));
    }

    #[test]
    fn test_tag_rejects_garbage() {
        for raw in ["latest", "", "v", "1-x"] {
            assert!(matches!(
                VersionToken::parse_tag(raw),
                Err(VersionError::UnparseableTag { .. })
            ));
        }
    }

    #[test]
    fn test_custom_syntax() {
        let cmp = VersionComparator::new(VersionSyntax {
            marker: "rel".into(),
            separators: vec!['.', '-'],
        });
        let a = cmp.parse_candidate("rel1.4-2").unwrap();
        let b = cmp.parse_candidate("rel1.4.1").unwrap();
        assert!(cmp.is_greater(&a, &b));
        assert!(cmp.parse_candidate("v1.4.2").is_err());
        assert_eq!(cmp.syntax().describe(), "rel<int>([.-]<int>)*");
        assert_eq!(cmp.syntax().render(&a), "rel1.4.2");
        assert_eq!(a.to_string(), "v1-4-2");
    }

    #[test]
    fn test_is_greater_is_strict() {
        let cmp = VersionComparator::default();
        assert!(!cmp.is_greater(&v("v1-1-9"), &v("v1-1-9")));
        assert!(cmp.is_greater(&v("v1-2-0"), &v("v1-1-9")));
    }

    #[test]
    fn test_display_and_serde() {
        let token = v("v4-0-12");
        assert_eq!(token.to_string(), "v4-0-12");
        assert_eq!(serde_json::to_string(&token).unwrap(), "[4,0,12]");
        let back: VersionToken = serde_json::from_str("[4,0,12]").unwrap();
        assert_eq!(back, token);
    }
}
