//! Property tests for directory digests.

use config_reloader::digest::ContentDigester;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn file_set() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map("[a-z]{1,8}", prop::collection::vec(any::<u8>(), 0..64), 1..6)
}

fn write_all<'a>(root: &Path, files: impl Iterator<Item = (&'a String, &'a Vec<u8>)>) {
    for (name, content) in files {
        fs::write(root.join(name), content).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn creation_order_does_not_matter(files in file_set()) {
        let forward = TempDir::new().unwrap();
        let backward = TempDir::new().unwrap();
        write_all(forward.path(), files.iter());
        write_all(backward.path(), files.iter().rev());

        let a = ContentDigester::new(forward.path()).digest().unwrap();
        let b = ContentDigester::new(backward.path()).digest().unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn any_content_change_is_detected(files in file_set(), pick in any::<prop::sample::Index>()) {
        let temp_dir = TempDir::new().unwrap();
        write_all(temp_dir.path(), files.iter());
        let digester = ContentDigester::new(temp_dir.path());
        let before = digester.digest().unwrap();

        let names: Vec<_> = files.keys().collect();
        let name = names[pick.index(names.len())];
        let mut content = files[name].clone();
        content.push(0);
        fs::write(temp_dir.path().join(name), content).unwrap();

        prop_assert_ne!(before, digester.digest().unwrap());
    }

    #[test]
    fn adding_a_file_is_detected(files in file_set()) {
        let temp_dir = TempDir::new().unwrap();
        write_all(temp_dir.path(), files.iter());
        let digester = ContentDigester::new(temp_dir.path());
        let before = digester.digest().unwrap();

        // generated names never contain a dash
        fs::write(temp_dir.path().join("added-file"), b"").unwrap();
        prop_assert_ne!(before, digester.digest().unwrap());
    }
}
