use glob::{Pattern, PatternError};

use crate::config::plan_config::CONFIG_FILE_NAME;

/// Names skipped by every scan, on top of configured patterns.
pub const BUILTIN_IGNORES: [&str; 3] = [".git", CONFIG_FILE_NAME, "*.treeplan"];

/// Entry names left out of directory scans. Patterns match a single name,
/// never a path; only `*` and `?` are wildcards, anything else is literal.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    patterns: Vec<Pattern>,
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self {
            patterns: BUILTIN_IGNORES
                .iter()
                .filter_map(|pattern| compile(pattern).ok())
                .collect(),
        }
    }
}

impl IgnoreSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let mut set = Self::default();
        for pattern in patterns {
            set.patterns.push(compile(pattern.as_ref())?);
        }
        Ok(set)
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(name))
    }
}

fn compile(pattern: &str) -> Result<Pattern, PatternError> {
    if pattern.contains(['*', '?']) {
        Pattern::new(pattern)
    } else {
        Pattern::new(&Pattern::escape(pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(".git", true)]
    #[case("layout.treeplan", true)]
    #[case("treeplan.yaml", true)]
    #[case("target", true)]
    #[case("debug.log", true)]
    #[case("a1.tmp", true)]
    #[case("[draft]", true)]
    #[case("d", false)]
    #[case("src", false)]
    #[case("log", false)]
    #[case("a12.tmp", false)]
    fn matches_names_and_wildcards(#[case] name: &str, #[case] expected: bool) {
        let set = IgnoreSet::new(&["target", "*.log", "a?.tmp", "[draft]"])
            .expect("patterns should compile");
        assert_eq!(set.is_ignored(name), expected);
    }

    #[test]
    fn rejects_malformed_wildcards() {
        assert!(IgnoreSet::new(&["[*"]).is_err());
    }
}
