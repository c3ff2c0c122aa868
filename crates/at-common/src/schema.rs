//! Schema versioning for persisted artifacts.
//!
//! The Q-table artifact and the engine config file both carry a
//! `schema_version` field. Compatibility is judged on the major component:
//! readers accept any artifact whose major version matches theirs.

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Check whether an artifact schema version is readable by this build.
pub fn is_compatible(version: &str) -> bool {
    major(version) == major(SCHEMA_VERSION)
}

fn major(version: &str) -> Option<&str> {
    version.split('.').next().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_major_is_compatible() {
        assert!(is_compatible(SCHEMA_VERSION));
        assert!(is_compatible("1.2.7"));
    }

    #[test]
    fn different_major_is_not() {
        assert!(!is_compatible("2.0.0"));
        assert!(!is_compatible(""));
    }
}
