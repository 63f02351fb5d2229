//! Utility functions and types.

use std::fmt::{Debug, Display, Formatter};

/// Redact hides secrets in `Debug` and `Display` output.
///
/// - Empty input is printed as `EMPTY`.
/// - Input shorter than 12 characters is fully masked as `***`.
/// - Longer input keeps its first and last three characters, so two different
///   access keys can still be told apart in logs.
#[derive(Clone, Copy)]
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Redact<'_> {
    fn write(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let value = self.0;
        let length = value.chars().count();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 {
            f.write_str("***")
        } else {
            let head: String = value.chars().take(3).collect();
            let tail: String = value.chars().skip(length - 3).collect();
            write!(f, "{head}***{tail}")
        }
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.write(f)
    }
}

impl Display for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.write(f)
    }
}
