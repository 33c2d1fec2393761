//! Schema version identifiers.

use std::fmt;
use std::str::FromStr;

/// Identity of one schema release: `(major, minor, patch)`.
///
/// Model files usually carry only `major.minor` (`Version, 24.1;`); the patch
/// component then defaults to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse `24.1`, `24.1.0`, `24-1-0` or a directory name like `V24-1-0`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let text = text
            .strip_prefix('V')
            .or_else(|| text.strip_prefix('v'))
            .unwrap_or(text);
        let mut parts = text.split(['.', '-']);
        let major = parts.next()?.trim().parse().ok()?;
        let minor = match parts.next() {
            Some(p) => p.trim().parse().ok()?,
            None => 0,
        };
        let patch = match parts.next() {
            Some(p) if !p.trim().is_empty() => p.trim().parse().ok()?,
            _ => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(major, minor, patch))
    }

    /// Directory name used for on-disk schema resources (`V24-1-0`).
    pub fn dir_name(&self) -> String {
        format!("V{}-{}-{}", self.major, self.minor, self.patch)
    }

    /// The `major.minor` form written into model files.
    pub fn short(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid version string '{s}'"))
    }
}
