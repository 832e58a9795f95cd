use crate::{Tree, TreeConfig};
use tempfile::tempdir;

fn config_with_limit(memtable_limit: usize) -> TreeConfig {
    TreeConfig {
        memtable_limit,
        ..TreeConfig::default()
    }
}

// -------------------- 1. Point-read consistency --------------------

#[test]
fn point_read_survives_flushes_and_compactions() {
    let dir = tempdir().unwrap();
    let mut t = Tree::open(dir.path(), config_with_limit(4)).unwrap();

    t.put(b"durable".to_vec(), b"value".to_vec()).unwrap();

    for i in 0..200u32 {
        t.put(format!("filler{}", i).into_bytes(), i.to_le_bytes().to_vec())
            .unwrap();
    }

    assert_eq!(t.get(b"durable").unwrap(), Some(b"value".to_vec()));
}

// -------------------- 2. Overwrite semantics --------------------

#[test]
fn overwrite_leaves_exactly_one_pair_in_range() {
    let dir = tempdir().unwrap();
    let mut t = Tree::open(dir.path(), config_with_limit(50)).unwrap();

    t.put(b"k".to_vec(), b"v1".to_vec()).unwrap();
    t.put(b"k".to_vec(), b"v2".to_vec()).unwrap();

    assert_eq!(t.get(b"k").unwrap(), Some(b"v2".to_vec()));

    let got = t.range(b"k", b"k").unwrap();
    assert_eq!(got, vec![(b"k".to_vec(), b"v2".to_vec())]);
}

// -------------------- 3. Absence --------------------

#[test]
fn never_written_key_is_absent() {
    let dir = tempdir().unwrap();
    let mut t = Tree::open(dir.path(), config_with_limit(10)).unwrap();
    t.put(b"present".to_vec(), b"v".to_vec()).unwrap();
    assert_eq!(t.get(b"absent").unwrap(), None);
}

// -------------------- 4. Range ordering --------------------

#[test]
fn range_is_strictly_ascending_and_within_bounds() {
    let dir = tempdir().unwrap();
    let mut t = Tree::open(dir.path(), config_with_limit(7)).unwrap();

    for i in (0..300u32).rev() {
        t.put(format!("k{:04}", i).into_bytes(), i.to_le_bytes().to_vec())
            .unwrap();
    }

    let got = t.range(b"k0050", b"k0150").unwrap();
    assert!(!got.is_empty());
    for pair in got.windows(2) {
        assert!(pair[0].0 < pair[1].0, "range output not strictly ascending");
    }
    for (k, _) in &got {
        assert!(k.as_slice() >= b"k0050".as_slice());
        assert!(k.as_slice() <= b"k0150".as_slice());
    }
}

// -------------------- 7. Compaction conservation --------------------

#[test]
fn compaction_conserves_keys_minus_shadowed() {
    let dir = tempdir().unwrap();
    let mut t = Tree::open(dir.path(), config_with_limit(1)).unwrap();

    t.put(b"a".to_vec(), b"1".to_vec()).unwrap();
    t.flush().unwrap();
    t.put(b"b".to_vec(), b"2".to_vec()).unwrap();
    t.flush().unwrap();
    // Shadow "a" with a newer write before compacting.
    t.put(b"a".to_vec(), b"1-new".to_vec()).unwrap();
    t.flush().unwrap();

    let before: std::collections::BTreeSet<_> = t.range(b"", b"").unwrap().into_iter().map(|(k, _)| k).collect();

    t.compact(0).unwrap();

    let after: std::collections::BTreeSet<_> = t.range(b"", b"").unwrap().into_iter().map(|(k, _)| k).collect();
    assert_eq!(before, after);
    assert_eq!(t.get(b"a").unwrap(), Some(b"1-new".to_vec()));
    assert_eq!(t.get(b"b").unwrap(), Some(b"2".to_vec()));
}

// -------------------- 8. Idempotent flush --------------------

#[test]
fn flushing_empty_memtable_creates_no_files() {
    let dir = tempdir().unwrap();
    let mut t = Tree::open(dir.path(), config_with_limit(10)).unwrap();

    let before = std::fs::read_dir(dir.path()).unwrap().count();
    t.flush().unwrap();
    let after = std::fs::read_dir(dir.path()).unwrap().count();

    assert_eq!(before, after);
    assert_eq!(before, 0);
}
