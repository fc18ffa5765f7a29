//! Property tests for directory scanning and classification.

use proptest::prelude::*;

use trellis::domain::services::classify;
use trellis::infrastructure::DirectoryScanner;

use crate::common::ResolverTree;

fn relative_file() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[A-Za-z0-9_.\\[\\]-]{1,12}")
        .unwrap()
        .prop_filter("no dot-only segments", |s| s != "." && s != "..");
    proptest::collection::vec(segment, 1..=3).prop_map(|segments| segments.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: scanning an unchanged tree twice yields identical snapshots,
    /// with every directory listed before its contents.
    #[test]
    fn property_scan_is_deterministic(
        files in proptest::collection::vec(relative_file(), 0..12)
    ) {
        let tree = ResolverTree::new();
        for file in &files {
            // Skip paths that collide with an existing file or directory.
            let target = tree.root().join(file);
            if target.exists() || target.ancestors().skip(1).any(|p| p.is_file()) {
                continue;
            }
            tree.write(file);
        }

        let first = DirectoryScanner::new().scan(&tree.root()).unwrap();
        let second = DirectoryScanner::new().scan(&tree.root()).unwrap();
        prop_assert_eq!(first.entries(), second.entries());

        for (i, entry) in first.entries().iter().enumerate() {
            let parent = entry.parent();
            if parent.as_os_str().is_empty() {
                continue;
            }
            let listed_before = first.entries()[..i]
                .iter()
                .any(|e| e.is_directory() && e.relative_path() == parent);
            prop_assert!(listed_before, "{:?} listed before its directory", entry);
        }

        for ds in ["users", "orders"] {
            prop_assert_eq!(classify(&first, ds), classify(&second, ds));
        }
    }
}
