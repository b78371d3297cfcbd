// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for project root validation

use proptest::prelude::*;
use std::path::PathBuf;
use verdict::{Config, ConfigError};

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,8}"
}

fn absolute_path() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec(segment(), 1..5)
        .prop_map(|parts| PathBuf::from(format!("/{}", parts.join("/"))))
}

fn config_with_root(root: PathBuf) -> Config {
    Config {
        project_root: Some(root),
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: any directory below the root is accepted
    #[test]
    fn descendants_of_root_are_accepted(
        root in absolute_path(),
        below in prop::collection::vec(segment(), 0..4),
    ) {
        let cwd = below.iter().fold(root.clone(), |path, part| path.join(part));
        prop_assert!(config_with_root(root).validate_within(&cwd).is_ok());
    }

    /// Property: relative roots are always rejected, wherever we are
    #[test]
    fn relative_roots_are_rejected(
        root in prop::collection::vec(segment(), 1..4),
        cwd in absolute_path(),
    ) {
        let config = config_with_root(PathBuf::from(root.join("/")));
        prop_assert!(matches!(
            config.validate_within(&cwd),
            Err(ConfigError::NotAbsolute(_))
        ));
    }

    /// Property: a root is accepted exactly when cwd starts with it textually
    #[test]
    fn acceptance_matches_textual_prefix(root in absolute_path(), cwd in absolute_path()) {
        let expected = cwd.to_string_lossy().starts_with(root.to_string_lossy().as_ref());
        let result = config_with_root(root).validate_within(&cwd);
        prop_assert_eq!(result.is_ok(), expected);
    }
}
