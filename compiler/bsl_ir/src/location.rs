//! Source locations for diagnostics.
//!
//! A [`Location`] names a file and a line range inside it. Unlike byte
//! spans, locations survive across compilation stages unchanged and are
//! owned by the node that carries them.

use std::fmt;

/// Rendering used for the distinguished unknown location.
pub const UNKNOWN_LOCATION: &str = "<no location>";

/// Rendering used for a known location without a file name.
pub const NO_FILENAME: &str = "<no filename>";

/// A file and line range in a specification source.
///
/// `to_line < 0` marks a single-line location. The [`Location::NONE`]
/// instance is distinguishable from every real location and always renders
/// as [`UNKNOWN_LOCATION`], whatever its other fields hold.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    file: String,
    from_line: i32,
    to_line: i32,
    known: bool,
}

impl Location {
    /// The unknown location.
    pub const NONE: Location = Location {
        file: String::new(),
        from_line: -1,
        to_line: -1,
        known: false,
    };

    /// Create a location spanning `from_line..=to_line` in `file`.
    ///
    /// Pass a negative `to_line` for a single-line location.
    pub fn new(file: impl Into<String>, from_line: i32, to_line: i32) -> Self {
        Location {
            file: file.into(),
            from_line,
            to_line,
            known: true,
        }
    }

    /// Create a single-line location.
    pub fn line(file: impl Into<String>, line: i32) -> Self {
        Self::new(file, line, -1)
    }

    /// Returns `false` only for [`Location::NONE`].
    #[inline]
    pub fn is_known(&self) -> bool {
        self.known
    }

    /// File name, empty when none was recorded.
    #[inline]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[inline]
    pub fn from_line(&self) -> i32 {
        self.from_line
    }

    /// End line, or `None` for a single-line location.
    #[inline]
    pub fn to_line(&self) -> Option<i32> {
        (self.to_line >= 0).then_some(self.to_line)
    }

    /// Render as `file:from[-to]`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.known {
            return f.write_str(UNKNOWN_LOCATION);
        }

        let file = if self.file.is_empty() {
            NO_FILENAME
        } else {
            &self.file
        };

        match self.to_line() {
            Some(to) => write!(f, "{file}:{}-{to}", self.from_line),
            None => write!(f, "{file}:{}", self.from_line),
        }
    }
}
