use nlkup::{Config, NumberDirectory, WindowOutcome};

fn fresh() -> NumberDirectory {
    NumberDirectory::init(Config::default()).unwrap()
}

#[test]
fn insert_and_lookup_single_key() {
    let dir = fresh();
    dir.insert("1234561000", "1234562000").unwrap();
    assert_eq!(dir.lookup("1234561000").unwrap(), Some("1234562000".to_string()));
    assert_eq!(dir.lookup("1234561001").unwrap(), None);
}

fn insert_shard_scenario(dir: &NumberDirectory) {
    for postfix in [
        "1000", "1005", "1010", "1015", "1020", "1025", "1030", "1035", "1012", "1033", "1003",
        "1002",
    ] {
        let number = format!("123456{postfix}");
        let alias = format!("1{postfix}2000");
        dir.insert(&number, &alias).unwrap();
    }
}

#[test]
fn ordering_within_a_shard() {
    let dir = fresh();
    insert_shard_scenario(&dir);

    let block = dir.get_block("1234561000").unwrap().unwrap();
    assert_eq!(block.len(), 12);
    let postfixes: Vec<_> = block.entries().iter().map(|e| e.postfix().unwrap()).collect();
    let mut sorted = postfixes.clone();
    sorted.sort_by_key(|p| p.parse::<u32>().unwrap());
    assert_eq!(postfixes, sorted);

    let mut dedup = postfixes.clone();
    dedup.sort();
    dedup.dedup();
    assert_eq!(dedup.len(), 12);
}

#[test]
fn overwrite_replaces_alias_and_keeps_single_entry() {
    let dir = fresh();
    dir.insert("1234561000", "1234562000").unwrap();
    dir.insert("1234561000", "9999999999").unwrap();
    assert_eq!(dir.lookup("1234561000").unwrap(), Some("9999999999".to_string()));
    assert_eq!(dir.get_block("1234561000").unwrap().unwrap().len(), 1);
}

#[test]
fn delete_to_empty_removes_the_block() {
    let dir = fresh();
    dir.insert("1234561000", "1234562000").unwrap();
    dir.delete("1234561000").unwrap();
    assert_eq!(dir.lookup("1234561000").unwrap(), None);
    assert!(dir.get_block("1234561000").unwrap().is_none());
}

#[test]
fn delete_on_missing_key_is_ok() {
    let dir = fresh();
    dir.delete("1234561000").unwrap();
}

#[test]
fn range_query_returns_the_padded_window() {
    let dir = fresh();
    insert_shard_scenario(&dir);

    // "123456100" -> prefix 123456, postfix "100" (3 digits); padding one
    // more digit gives the 4-digit range [1000, 1009], matching this
    // shard's 4-digit postfixes.
    let block = dir.get_range("123456100", "1").unwrap();
    let postfixes: Vec<_> = block.entries().iter().map(|e| e.postfix().unwrap()).collect();
    assert_eq!(postfixes, vec!["1000", "1002", "1003", "1005"]);
}

#[test]
fn range_query_is_empty_when_padded_length_does_not_match_stored_postfixes() {
    let dir = fresh();
    insert_shard_scenario(&dir);

    // "1234561" -> postfix "1" (1 digit); padded by 2 gives 3-digit keys,
    // but every stored entry here has a 4-digit postfix. Packed postfix
    // comparison is length-sensitive (the length byte sorts first), so
    // this never overlaps and comes back empty rather than matching on
    // numeric value.
    let block = dir.get_range("1234561", "2").unwrap();
    assert!(block.is_empty());
}

#[test]
fn window_across_shards() {
    let dir = fresh();
    for prefix in ["100000", "100001", "100002"] {
        for postfix in ["001", "002", "003"] {
            let number = format!("{prefix}{postfix}");
            dir.insert(&number, "5550001234").unwrap();
        }
    }

    let outcome = dir.get_window_around("1000011234", 4, 4).unwrap();
    let entries = match &outcome {
        WindowOutcome::Complete(v) => v,
        WindowOutcome::Partial(v) => v,
    };
    assert!(entries.len() <= 9);

    let numbers: Vec<_> = entries.iter().map(|(n, _)| n.clone()).collect();
    let mut sorted = numbers.clone();
    sorted.sort();
    assert_eq!(numbers, sorted);

    assert!(numbers.iter().any(|n| n.starts_with("100001")));
}

#[test]
fn window_pivot_on_a_miss_snaps_to_the_shards_own_edge_entry() {
    // The pivot-selection rule for a miss does not binary-search within
    // the home shard for the nearest neighbor; it only asks whether the
    // home shard (or the next non-empty one found by walking outward) is
    // non-empty, then takes that block's lowest (searching upward) or
    // highest (searching downward) entry as pivot. So a miss against a
    // non-empty home shard pivots on that shard's lowest entry, not on
    // whichever stored entry the queried key is numerically closest to.
    let dir = fresh();
    for postfix in ["001", "005", "009"] {
        dir.insert(&format!("100000{postfix}"), "5550001234").unwrap();
    }
    let outcome = dir.get_window_around("100000003", 1, 1).unwrap();
    let numbers: Vec<_> = outcome.entries().iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(numbers, vec!["100000001".to_string(), "100000005".to_string()]);
}

#[test]
fn window_on_completely_empty_directory_is_not_found() {
    let dir = fresh();
    assert!(dir.get_window_around("1234561000", 2, 2).is_err());
}

#[test]
fn snapshot_and_restore_round_trip() {
    let dir = fresh();
    insert_shard_scenario(&dir);

    let path = format!("/tmp/nlkup_integration_snapshot_{}.bin", std::process::id());
    dir.snapshot(&path).unwrap();

    let mut restored = fresh();
    restored.restore(&path).unwrap();

    for postfix in [
        "1000", "1005", "1010", "1015", "1020", "1025", "1030", "1035", "1012", "1033", "1003",
        "1002",
    ] {
        let number = format!("123456{postfix}");
        assert_eq!(dir.lookup(&number).unwrap(), restored.lookup(&number).unwrap());
    }

    let _ = std::fs::remove_file(&path);
}

#[test]
fn rejects_numbers_shorter_than_the_prefix() {
    let dir = fresh();
    assert!(dir.insert("12345", "1234567890").is_err());
}

#[test]
fn rejects_prefixes_below_the_offset() {
    let dir = fresh();
    // "099999" parses below OFFSET (100_000).
    assert!(dir.insert("0999991234", "1234567890").is_err());
}

#[test]
fn rejects_non_digit_numbers() {
    let dir = fresh();
    assert!(dir.insert("12345a1000", "1234567890").is_err());
}

#[test]
fn rejects_numbers_longer_than_max_number_len() {
    let dir = fresh();
    // 16 digits: one past the default `max_number_len` of 15.
    assert!(dir.insert("1234561000000000", "1234567890").is_err());
    assert!(dir.lookup("1234561000000000").is_err());
}
