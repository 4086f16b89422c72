use std::fmt;
use std::path::PathBuf;

/// Location of a node relative to the declared root, as a sequence of names.
///
/// The empty path is the root itself. Ordering compares segment by segment,
/// which gives the lexical tie-break used by the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreePath(Vec<String>);

impl TreePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn file_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn join(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Replaces the last segment. The root has no last segment and stays the root.
    pub fn with_file_name(&self, name: impl Into<String>) -> Self {
        match self.parent() {
            Some(parent) => parent.join(name),
            None => Self::root(),
        }
    }

    /// True when `self` lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &TreePath) -> bool {
        self.0.len() > ancestor.0.len() && self.0.starts_with(&ancestor.0)
    }

    /// Moves a descendant of `from` underneath `to`, keeping the remaining segments.
    pub fn rebase(&self, from: &TreePath, to: &TreePath) -> Option<Self> {
        if !self.is_descendant_of(from) {
            return None;
        }
        let mut segments = to.0.clone();
        segments.extend_from_slice(&self.0[from.0.len()..]);
        Some(Self(segments))
    }

    pub fn to_relative_path(&self) -> PathBuf {
        self.0.iter().collect()
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, ".");
        }
        write!(f, "{}", self.0.join("/"))
    }
}

impl From<&str> for TreePath {
    fn from(value: &str) -> Self {
        Self::from_segments(value.split('/').filter(|segment| !segment.is_empty()))
    }
}
