//! Property-based tests for manifest validation and resolution.
//!
//! These tests use proptest to generate random declarations and verify that
//! the cross-field validation rules and resolution fallbacks hold for all
//! inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::manifest::{Defaults, Project, ProjectSpec};
    use proptest::prelude::*;

    fn opt_ident() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[a-z][a-z0-9-]{0,8}")
    }

    fn arb_spec() -> impl Strategy<Value = ProjectSpec> {
        (
            "[a-z][a-z0-9-]{0,8}",
            opt_ident(),
            opt_ident(),
            opt_ident(),
            opt_ident(),
            opt_ident(),
        )
            .prop_map(|(name, remote, sub_url, url, revision, path)| ProjectSpec {
                name,
                remote,
                sub_url,
                url,
                revision,
                path,
            })
    }

    proptest! {
        /// Property: validation accepts a declaration exactly when none of
        /// the three cross-field rules is violated.
        #[test]
        fn validate_matches_rule_table(spec in arb_spec()) {
            let valid = !(spec.remote.is_some() && spec.url.is_some())
                && !(spec.url.is_some() && spec.sub_url.is_some())
                && !(spec.sub_url.is_some() && spec.remote.is_none());
            prop_assert_eq!(spec.validate().is_ok(), valid);
        }

        /// Property: with sub_url absent, exactly the three combinations
        /// {neither remote nor url, only remote, only url} are valid.
        #[test]
        fn remote_url_exclusive(
            name in "[a-z][a-z0-9-]{0,8}",
            remote in opt_ident(),
            url in opt_ident(),
        ) {
            let mut spec = ProjectSpec::new(name);
            spec.remote = remote.clone();
            spec.url = url.clone();
            let valid = !(remote.is_some() && url.is_some());
            prop_assert_eq!(spec.validate().is_ok(), valid);
        }

        /// Property: a resolved project's path is never empty and equals the
        /// declared path when one is set, the name otherwise.
        #[test]
        fn resolved_path_falls_back_to_name(
            name in "[a-z][a-z0-9-]{0,8}",
            path in opt_ident(),
        ) {
            let mut spec = ProjectSpec::new(name.clone());
            spec.path = path.clone();
            let project = Project::from_spec(&Defaults::default(), &[], &spec, None).unwrap();
            prop_assert!(!project.path.is_empty());
            prop_assert_eq!(project.path, path.unwrap_or(name));
        }

        /// Property: a resolved project's revision is the declared revision
        /// when one is set, the default revision otherwise.
        #[test]
        fn resolved_revision_falls_back_to_defaults(
            revision in opt_ident(),
            default_revision in opt_ident(),
        ) {
            let defaults = Defaults {
                remote: None,
                revision: default_revision.clone(),
            };
            let mut spec = ProjectSpec::new("dep");
            spec.revision = revision.clone();
            let project = Project::from_spec(&defaults, &[], &spec, None).unwrap();
            prop_assert_eq!(project.revision, revision.or(default_revision));
        }
    }
}
