//! Numeric version comparison.

use std::cmp::Ordering;

/// Result of comparing two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionComparison {
    /// Current is older than target
    Older,
    /// Current equals target
    Same,
    /// Current is newer than target
    Newer,
}

impl VersionComparison {
    /// The comparison seen from the other side.
    pub fn reverse(self) -> Self {
        match self {
            Self::Older => Self::Newer,
            Self::Same => Self::Same,
            Self::Newer => Self::Older,
        }
    }
}

impl From<Ordering> for VersionComparison {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Self::Older,
            Ordering::Equal => Self::Same,
            Ordering::Greater => Self::Newer,
        }
    }
}

/// Compare two dotted version strings segment by segment.
///
/// Segments are compared as integers, so `1.10.0` is newer than `1.9.0`, and
/// the shorter version is padded with zeros, so `1.8.5` equals `1.8.5.0`.
pub fn compare_versions(current: &str, target: &str) -> VersionComparison {
    let current = parse_version(current);
    let target = parse_version(target);
    let len = current.len().max(target.len());

    (0..len)
        .map(|i| {
            let a = current.get(i).copied().unwrap_or(0);
            let b = target.get(i).copied().unwrap_or(0);
            a.cmp(&b)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
        .into()
}

/// Parse a version string into numeric segments.
fn parse_version(version: &str) -> Vec<u64> {
    let version = version.trim();
    // Remove 'v' prefix if present
    let version = version.strip_prefix('v').unwrap_or(version);
    // Drop pre-release and build metadata
    let version = version.split(['-', '+']).next().unwrap_or(version);

    version.split('.').map(parse_segment).collect()
}

/// Leading decimal digits of a segment, `0` when there are none.
fn parse_segment(segment: &str) -> u64 {
    segment
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit - b'0'))
        })
}
