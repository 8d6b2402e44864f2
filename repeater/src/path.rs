use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A dot-separated path into an item, e.g. `manager.type`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Parses a whitespace-separated list such as `"type manager.type"`.
    pub fn parse_list(list: &str) -> Vec<Self> {
        list.split_whitespace().map(Self::new).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }

    /// Whether a mutation at `mutated` can change the value at this path.
    ///
    /// True when either path is a segment-wise prefix of the other: replacing `manager` changes
    /// `manager.type`, and mutating `manager.type.code` changes `manager.type`.
    pub fn is_affected_by(&self, mutated: &str) -> bool {
        let mut ours = self.segments();
        let mut theirs = mutated.split('.').filter(|s| !s.is_empty());
        loop {
            match (ours.next(), theirs.next()) {
                (Some(a), Some(b)) if a == b => continue,
                (Some(_), Some(_)) => return false,
                _ => return true,
            }
        }
    }
}

impl fmt::Debug for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldPath({:?})", self.0)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
