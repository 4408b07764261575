// src/types.rs

use clap::ValueEnum;

/// What to do with change events whose base name starts with `.`.
///
/// Editors and VCS tools churn through dot-prefixed swap, lock and temp
/// files on every save, so the default is to ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum HiddenFilePolicy {
    /// Dot-prefixed names never trigger a reload.
    #[default]
    Ignore,
    /// Dot-prefixed names are treated like any other change.
    Reload,
}

impl HiddenFilePolicy {
    /// Character that marks a base name as hidden.
    pub const MARKER: char = '.';
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policy_case_insensitively() {
        assert_eq!(
            HiddenFilePolicy::from_str("RELOAD", true),
            Ok(HiddenFilePolicy::Reload)
        );
        assert!(HiddenFilePolicy::from_str("sometimes", true).is_err());
    }

    #[test]
    fn default_ignores_hidden_files() {
        assert_eq!(HiddenFilePolicy::default(), HiddenFilePolicy::Ignore);
    }
}
