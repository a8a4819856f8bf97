//! People repository with whole-blob persistence.
//!
//! # Responsibility
//! - Provide CRUD over people and their ideas.
//! - Persist the full collection under `PEOPLE_KEY` after each mutation.
//!
//! # Invariants
//! - Mutations are serialized by the store mutex; at most one write is in flight.
//! - Readers see the new collection as soon as it is swapped in, before the
//!   store write returns.
//! - A failed store write restores the pre-operation collection.
//! - Deleting an absent person or idea is `NotFound`, never a silent no-op.

use crate::codec::{decode_people, encode_people, CodecError};
use crate::model::person::{
    parse_date_of_birth, Idea, IdeaId, ModelValidationError, Person, PersonId,
};
use crate::ordering::order_by_birthday;
use crate::store::{KeyValueStore, StoreError, CORRUPT_PEOPLE_KEY, PEOPLE_KEY};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingEntity {
    Person(PersonId),
    Idea { person_id: PersonId, idea_id: IdeaId },
}

impl Display for MissingEntity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Person(id) => write!(f, "person not found: {id}"),
            Self::Idea { person_id, idea_id } => {
                write!(f, "idea not found: {idea_id} (person {person_id})")
            }
        }
    }
}

#[derive(Debug)]
pub enum RepoError {
    /// Malformed or missing input; nothing was changed.
    Validation(ModelValidationError),
    /// Referenced person or idea does not exist.
    NotFound(MissingEntity),
    /// The store write failed; the collection was rolled back.
    Persist(StoreError),
    /// The stored blob could not be decoded on load.
    CorruptState(CodecError),
    /// The collection could not be encoded; nothing was changed.
    Encode(CodecError),
    /// The store could not be read on load.
    StoreRead(StoreError),
}

impl RepoError {
    /// Stable code for log lines, free of user-provided text.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Persist(_) => "persist_failed",
            Self::CorruptState(_) => "corrupt_state",
            Self::Encode(_) => "encode_failed",
            Self::StoreRead(_) => "store_read_failed",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(missing) => write!(f, "{missing}"),
            Self::Persist(err) => write!(f, "failed to persist people: {err}"),
            Self::CorruptState(err) => {
                write!(f, "stored people data is unreadable and was set aside: {err}")
            }
            Self::Encode(err) => write!(f, "failed to encode people: {err}"),
            Self::StoreRead(err) => write!(f, "failed to read stored people: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Persist(err) | Self::StoreRead(err) => Some(err),
            Self::CorruptState(err) | Self::Encode(err) => Some(err),
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Result of `PeopleRepository::load`.
///
/// `warning` is `Some(RepoError::CorruptState(_))` when the stored blob was
/// unreadable and the repository started empty.
pub struct Loaded<S: KeyValueStore> {
    pub repository: PeopleRepository<S>,
    pub warning: Option<RepoError>,
}

/// Single source of truth for the people/ideas graph.
pub struct PeopleRepository<S: KeyValueStore> {
    people: RwLock<Vec<Person>>,
    store: Mutex<S>,
}

impl<S: KeyValueStore> PeopleRepository<S> {
    /// Reads the people blob and builds the in-memory collection.
    ///
    /// # Errors
    /// - `StoreRead` when the store itself fails; no repository is built so an
    ///   empty collection can never overwrite data that was merely unreachable.
    ///
    /// An undecodable blob is not an error here: it is copied to
    /// `CORRUPT_PEOPLE_KEY` (best effort), the repository starts empty, and the
    /// problem is reported through `Loaded::warning`.
    pub fn load(mut store: S) -> RepoResult<Loaded<S>> {
        let started_at = Instant::now();
        info!("event=people_load module=repo status=start");

        let blob = store.get(PEOPLE_KEY).map_err(|err| {
            error!(
                "event=people_load module=repo status=error duration_ms={} error_code=store_read_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            RepoError::StoreRead(err)
        })?;

        let (people, warning) = match blob {
            None => (Vec::new(), None),
            Some(blob) => match decode_people(&blob) {
                Ok(people) => (people, None),
                Err(err) => {
                    warn!(
                        "event=people_load module=repo status=corrupt blob_bytes={} error_code=corrupt_state",
                        blob.len()
                    );
                    if let Err(backup_err) = store.set(CORRUPT_PEOPLE_KEY, &blob) {
                        warn!(
                            "event=people_quarantine module=repo status=error error={}",
                            backup_err
                        );
                    }
                    (Vec::new(), Some(RepoError::CorruptState(err)))
                }
            },
        };

        info!(
            "event=people_load module=repo status=ok people={} duration_ms={}",
            people.len(),
            started_at.elapsed().as_millis()
        );

        Ok(Loaded {
            repository: Self {
                people: RwLock::new(people),
                store: Mutex::new(store),
            },
            warning,
        })
    }

    /// All people in insertion order.
    pub fn list_people(&self) -> Vec<Person> {
        self.read().clone()
    }

    /// All people ordered by month/day of birth.
    pub fn people_by_birthday(&self) -> Vec<Person> {
        order_by_birthday(&self.read())
    }

    pub fn get_person(&self, person_id: PersonId) -> RepoResult<Person> {
        self.read()
            .iter()
            .find(|person| person.id == person_id)
            .cloned()
            .ok_or(RepoError::NotFound(MissingEntity::Person(person_id)))
    }

    /// Ideas of one person in insertion order; empty when the person has none.
    pub fn get_ideas_for(&self, person_id: PersonId) -> RepoResult<Vec<Idea>> {
        self.read()
            .iter()
            .find(|person| person.id == person_id)
            .map(|person| person.ideas.clone())
            .ok_or(RepoError::NotFound(MissingEntity::Person(person_id)))
    }

    /// Creates a person from a name and a `YYYY-MM-DD` birthday.
    pub fn add_person(&self, name: &str, date_of_birth: &str) -> RepoResult<Person> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelValidationError::EmptyName.into());
        }
        let date_of_birth = parse_date_of_birth(date_of_birth)?;
        let person = Person::new(name, date_of_birth);

        self.mutate("person_add", |people| {
            people.push(person.clone());
            Ok(person)
        })
    }

    /// Removes a person together with all of their ideas.
    pub fn delete_person(&self, person_id: PersonId) -> RepoResult<()> {
        self.mutate("person_delete", |people| {
            let index = people
                .iter()
                .position(|person| person.id == person_id)
                .ok_or(RepoError::NotFound(MissingEntity::Person(person_id)))?;
            people.remove(index);
            Ok(())
        })
    }

    /// Appends an idea to a person's list.
    ///
    /// # Errors
    /// - `NotFound` for an unknown person (checked first).
    /// - `Validation` for blank text/image reference or zero dimensions.
    pub fn add_idea(
        &self,
        person_id: PersonId,
        text: &str,
        image_ref: &str,
        width: u32,
        height: u32,
    ) -> RepoResult<Idea> {
        self.mutate("idea_add", |people| {
            let person = find_person_mut(people, person_id)?;
            let idea = Idea::new(text, image_ref, width, height)?;
            person.ideas.push(idea.clone());
            Ok(idea)
        })
    }

    pub fn delete_idea(&self, person_id: PersonId, idea_id: IdeaId) -> RepoResult<()> {
        self.mutate("idea_delete", |people| {
            let person = find_person_mut(people, person_id)?;
            if person.find_idea(idea_id).is_none() {
                return Err(RepoError::NotFound(MissingEntity::Idea { person_id, idea_id }));
            }
            person.ideas.retain(|idea| idea.id != idea_id);
            Ok(())
        })
    }

    /// Consumes the repository and hands back its store.
    pub fn into_store(self) -> S {
        self.store
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one read-modify-write cycle.
    ///
    /// `apply` edits a copy of the collection. On success the copy is swapped
    /// in and written to the store; if the write fails the previous
    /// collection is swapped back.
    fn mutate<T>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut Vec<Person>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let started_at = Instant::now();
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);

        let snapshot = self.read().clone();
        let mut next = snapshot.clone();
        let output = match apply(&mut next) {
            Ok(output) => output,
            Err(err) => {
                warn!(
                    "event={operation} module=repo status=rejected error_code={}",
                    err.code()
                );
                return Err(err);
            }
        };

        let blob = encode_people(&next).map_err(|err| {
            error!("event={operation} module=repo status=error error_code=encode_failed error={err}");
            RepoError::Encode(err)
        })?;
        let people_count = next.len();
        *self.write() = next;

        if let Err(err) = store.set(PEOPLE_KEY, &blob) {
            *self.write() = snapshot;
            error!(
                "event={operation} module=repo status=error duration_ms={} error_code=persist_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(RepoError::Persist(err));
        }

        info!(
            "event={operation} module=repo status=ok people={} blob_bytes={} duration_ms={}",
            people_count,
            blob.len(),
            started_at.elapsed().as_millis()
        );
        Ok(output)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Person>> {
        self.people.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Person>> {
        self.people.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn find_person_mut(people: &mut [Person], person_id: PersonId) -> RepoResult<&mut Person> {
    people
        .iter_mut()
        .find(|person| person.id == person_id)
        .ok_or(RepoError::NotFound(MissingEntity::Person(person_id)))
}
