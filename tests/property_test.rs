use rand::random;

use nlkup::{Config, NumberDirectory};

fn random_postfix(digits: usize) -> String {
    (0..digits)
        .map(|_| char::from(b'0' + (random::<u8>() % 10)))
        .collect()
}

#[test]
fn random_inserts_stay_sorted_and_duplicate_free() {
    let dir = NumberDirectory::init(Config::default()).unwrap();
    let prefix = "123456";
    let mut expected = std::collections::BTreeSet::new();

    for _ in 0..300 {
        let postfix = random_postfix(4);
        let number = format!("{prefix}{postfix}");
        let alias = format!("999{postfix}0000");
        dir.insert(&number, &alias).unwrap();
        expected.insert(postfix);
    }

    let block = dir.get_block(&format!("{prefix}0000")).unwrap().unwrap();
    let postfixes: Vec<_> = block.entries().iter().map(|e| e.postfix().unwrap()).collect();

    let mut sorted = postfixes.clone();
    sorted.sort_by_key(|p| p.parse::<u32>().unwrap());
    assert_eq!(postfixes, sorted, "block must stay sorted after random inserts");

    let mut dedup = postfixes.clone();
    dedup.sort();
    dedup.dedup();
    assert_eq!(dedup.len(), postfixes.len(), "no duplicate postfixes");

    assert_eq!(postfixes.len(), expected.len());
}

#[test]
fn every_inserted_number_is_looked_up_correctly() {
    let dir = NumberDirectory::init(Config::default()).unwrap();
    let mut inserted = Vec::new();

    for _ in 0..200 {
        let prefix = 100_000 + (random::<u32>() % 900_000);
        let postfix = random_postfix(3);
        let number = format!("{prefix}{postfix}");
        let alias = format!("555{postfix}1111");
        dir.insert(&number, &alias).unwrap();
        inserted.push((number, alias));
    }

    for (number, alias) in &inserted {
        assert_eq!(dir.lookup(number).unwrap().as_deref(), Some(alias.as_str()));
    }
}

#[test]
fn delete_then_lookup_is_always_none() {
    let dir = NumberDirectory::init(Config::default()).unwrap();
    let mut numbers = Vec::new();
    for _ in 0..100 {
        let postfix = random_postfix(2);
        let number = format!("500000{postfix}");
        dir.insert(&number, "1112223333").unwrap();
        numbers.push(number);
    }

    for number in &numbers {
        dir.delete(number).unwrap();
        assert_eq!(dir.lookup(number).unwrap(), None);
    }
}
