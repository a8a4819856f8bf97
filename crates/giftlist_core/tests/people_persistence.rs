use giftlist_core::store::CORRUPT_PEOPLE_KEY;
use giftlist_core::{
    decode_people, KeyValueStore, MemoryStore, PeopleRepository, RepoError, SqliteKvStore,
    StoreError, PEOPLE_KEY,
};
use std::sync::Arc;
use std::thread;

#[test]
fn every_mutation_writes_the_full_collection() {
    let store = MemoryStore::new();
    let repo = PeopleRepository::load(store.clone()).unwrap().repository;

    let ana = repo.add_person("Ana", "1990-03-15").unwrap();
    repo.add_idea(ana.id, "Book", "img://1", 600, 900).unwrap();

    assert_eq!(store.write_count(), 2);
    let stored = decode_people(&store.peek(PEOPLE_KEY).unwrap()).unwrap();
    assert_eq!(stored, repo.list_people());
}

#[test]
fn reload_from_sqlite_file_restores_people_and_ideas() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("giftlist.sqlite3");

    let (ana_id, idea_id) = {
        let store = SqliteKvStore::open(&path).unwrap();
        let repo = PeopleRepository::load(store).unwrap().repository;
        let ana = repo.add_person("Ana", "1990-03-15").unwrap();
        let ben = repo.add_person("Ben", "1985-01-01").unwrap();
        let idea = repo.add_idea(ana.id, "Book", "img://1", 600, 900).unwrap();
        repo.delete_person(ben.id).unwrap();
        (ana.id, idea.id)
    };

    let store = SqliteKvStore::open(&path).unwrap();
    let loaded = PeopleRepository::load(store).unwrap();
    assert!(loaded.warning.is_none());

    let people = loaded.repository.list_people();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].id, ana_id);
    assert_eq!(people[0].date_of_birth.to_string(), "1990-03-15");
    assert_eq!(people[0].ideas.len(), 1);
    assert_eq!(people[0].ideas[0].id, idea_id);
}

#[test]
fn failed_write_during_add_idea_leaves_ideas_unchanged() {
    let store = MemoryStore::new();
    let repo = PeopleRepository::load(store.clone()).unwrap().repository;
    let ana = repo.add_person("Ana", "1990-03-15").unwrap();
    repo.add_idea(ana.id, "Book", "img://1", 600, 900).unwrap();
    let before = repo.get_ideas_for(ana.id).unwrap();
    let blob_before = store.peek(PEOPLE_KEY);

    store.set_fail_writes(true);
    let err = repo
        .add_idea(ana.id, "Phantom", "img://2", 600, 900)
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Persist(StoreError::Unavailable(_))
    ));
    assert_eq!(repo.get_ideas_for(ana.id).unwrap(), before);
    assert_eq!(store.peek(PEOPLE_KEY), blob_before);
}

#[test]
fn failed_write_rolls_back_every_mutation_kind() {
    let store = MemoryStore::new();
    let repo = PeopleRepository::load(store.clone()).unwrap().repository;
    let ana = repo.add_person("Ana", "1990-03-15").unwrap();
    let idea = repo.add_idea(ana.id, "Book", "img://1", 600, 900).unwrap();
    let before = repo.list_people();

    store.set_fail_writes(true);
    assert!(matches!(
        repo.add_person("Ben", "1985-01-01"),
        Err(RepoError::Persist(_))
    ));
    assert!(matches!(
        repo.delete_idea(ana.id, idea.id),
        Err(RepoError::Persist(_))
    ));
    assert!(matches!(repo.delete_person(ana.id), Err(RepoError::Persist(_))));
    assert_eq!(repo.list_people(), before);

    store.set_fail_writes(false);
    repo.add_person("Ben", "1985-01-01").unwrap();
    assert_eq!(repo.list_people().len(), 2);
}

#[test]
fn missing_blob_loads_empty_without_warning() {
    let loaded = PeopleRepository::load(MemoryStore::new()).unwrap();
    assert!(loaded.warning.is_none());
    assert!(loaded.repository.list_people().is_empty());
}

#[test]
fn corrupt_blob_loads_empty_and_is_set_aside() {
    let store = MemoryStore::with_entry(PEOPLE_KEY, "{not json");
    let loaded = PeopleRepository::load(store.clone()).unwrap();

    assert!(matches!(loaded.warning, Some(RepoError::CorruptState(_))));
    assert!(loaded.repository.list_people().is_empty());
    assert_eq!(store.peek(CORRUPT_PEOPLE_KEY).as_deref(), Some("{not json"));

    loaded.repository.add_person("Ana", "1990-03-15").unwrap();
    let stored = decode_people(&store.peek(PEOPLE_KEY).unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
}

#[test]
fn blob_with_invalid_records_counts_as_corrupt() {
    let blob = r#"[{"id":"11111111-2222-4333-8444-555555555555","name":"","dob":"1990-03-15","ideas":[]}]"#;
    let loaded = PeopleRepository::load(MemoryStore::with_entry(PEOPLE_KEY, blob)).unwrap();
    assert!(matches!(loaded.warning, Some(RepoError::CorruptState(_))));
}

struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn get(&self, _key: &str) -> giftlist_core::StoreResult<Option<String>> {
        Err(StoreError::Unavailable("disk unavailable".to_string()))
    }

    fn set(&mut self, _key: &str, _blob: &str) -> giftlist_core::StoreResult<()> {
        panic!("load must not write after a failed read");
    }
}

#[test]
fn store_read_failure_is_an_error_not_an_empty_start() {
    let result = PeopleRepository::load(UnreadableStore);
    assert!(matches!(result, Err(RepoError::StoreRead(_))));
}

#[test]
fn concurrent_add_idea_calls_do_not_lose_updates() {
    let store = MemoryStore::new();
    let repo = Arc::new(PeopleRepository::load(store.clone()).unwrap().repository);
    let ana_id = repo.add_person("Ana", "1990-03-15").unwrap().id;

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                for n in 0..10 {
                    repo.add_idea(ana_id, &format!("idea {worker}-{n}"), "img://x", 10, 10)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(repo.get_ideas_for(ana_id).unwrap().len(), 80);
    let stored = decode_people(&store.peek(PEOPLE_KEY).unwrap()).unwrap();
    assert_eq!(stored[0].ideas.len(), 80);
}

#[test]
fn into_store_hands_back_the_written_store() {
    let repo = PeopleRepository::load(SqliteKvStore::open_in_memory().unwrap())
        .unwrap()
        .repository;
    repo.add_person("Ana", "1990-03-15").unwrap();

    let store = repo.into_store();
    let reloaded = PeopleRepository::load(store).unwrap().repository;
    assert_eq!(reloaded.list_people().len(), 1);
}
