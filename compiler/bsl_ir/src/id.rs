//! Scoped identifiers.
//!
//! An [`Id`] is a `::`-separated path such as `http::Request::method`.
//! Equality, ordering and hashing look only at the path; the attached
//! [`Location`] is carried for diagnostics.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use crate::Location;

/// Separator between path components.
pub const PATH_DELIMITER: &str = "::";

/// Most ids have at most four components (`module::Type::field`).
type Path = SmallVec<[String; 4]>;

/// A scoped, namespaced identifier.
#[derive(Clone)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Id {
    path: Path,
    location: Location,
}

impl Id {
    /// Create an id by splitting `path` on [`PATH_DELIMITER`].
    ///
    /// Never fails. Empty components are dropped, so `"::a"` and `"a"`
    /// name the same id.
    pub fn new(path: &str, location: Location) -> Self {
        Id {
            path: path
                .split(PATH_DELIMITER)
                .filter(|c| !c.is_empty())
                .map(str::to_owned)
                .collect(),
            location,
        }
    }

    /// Create an id from already-split components.
    pub fn from_components<I, S>(components: I, location: Location) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Id {
            path: components
                .into_iter()
                .map(Into::into)
                .filter(|c: &String| !c.is_empty())
                .collect(),
            location,
        }
    }

    /// Path components, outermost first.
    #[inline]
    pub fn components(&self) -> &[String] {
        &self.path
    }

    /// Number of components.
    #[inline]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// True if the id has a namespace (more than one component).
    #[inline]
    pub fn is_scoped(&self) -> bool {
        self.path.len() > 1
    }

    /// Last component, or `""` for an empty id.
    pub fn local(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    /// Everything but the last component.
    pub fn namespace(&self) -> Id {
        let keep = self.path.len().saturating_sub(1);
        Id {
            path: self.path[..keep].iter().cloned().collect(),
            location: self.location.clone(),
        }
    }

    #[inline]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// True if `prefix`'s components are a leading run of this id's.
    pub fn starts_with(&self, prefix: &Id) -> bool {
        self.path.len() >= prefix.path.len()
            && self.path.iter().zip(&prefix.path).all(|(a, b)| a == b)
    }

    /// Render the path, eliding the prefix shared with `relative_to`.
    ///
    /// `x::y::z` relative to `x::y::w` renders as `z`. When the whole
    /// path would be elided the last component is kept, so a non-empty id
    /// never renders as the empty string.
    pub fn path_as_string(&self, relative_to: Option<&Id>) -> String {
        let common = relative_to.map_or(0, |other| {
            self.path
                .iter()
                .zip(&other.path)
                .take_while(|(a, b)| a == b)
                .count()
        });

        let start = if common >= self.path.len() {
            self.path.len().saturating_sub(1)
        } else {
            common
        };

        self.path[start..].join(PATH_DELIMITER)
    }

    /// Concatenate `self` and `other` into a fresh id carrying `self`'s location.
    #[must_use]
    pub fn combine(&self, other: &Id) -> Id {
        combine_ids(self, other)
    }

    /// Qualify `self` under `scope` unless it is already scoped there.
    #[must_use]
    pub fn qualified_under(&self, scope: &Id) -> Id {
        if scope.is_empty() || self.starts_with(scope) {
            self.clone()
        } else {
            Id {
                path: scope.path.iter().chain(&self.path).cloned().collect(),
                location: self.location.clone(),
            }
        }
    }
}

/// Concatenate the paths of `a` and `b` into a new id.
///
/// Neither input is modified; the result owns freshly cloned components.
pub fn combine_ids(a: &Id, b: &Id) -> Id {
    Id {
        path: a.path.iter().chain(&b.path).cloned().collect(),
        location: a.location.clone(),
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Id {}

impl Hash for Id {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Id {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.path_as_string(None))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_as_string(None))
    }
}
