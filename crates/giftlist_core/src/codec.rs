//! People blob serializer.
//!
//! # Responsibility
//! - Convert the full people collection to and from the stored JSON blob.
//! - Reject decoded collections that break model invariants.
//!
//! # Invariants
//! - Encoding is compact and deterministic: known fields in declaration
//!   order, then unknown fields in key order.
//! - Unknown fields survive a decode/encode cycle.
//! - Person ids are unique within one blob.

use crate::model::person::{IdeaId, ModelValidationError, Person, PersonId};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    InvalidPerson {
        person_id: PersonId,
        source: ModelValidationError,
    },
    DuplicatePersonId(PersonId),
    DuplicateIdeaId {
        person_id: PersonId,
        idea_id: IdeaId,
    },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed people blob: {err}"),
            Self::InvalidPerson { person_id, source } => {
                write!(f, "invalid person {person_id} in people blob: {source}")
            }
            Self::DuplicatePersonId(id) => write!(f, "duplicate person id {id} in people blob"),
            Self::DuplicateIdeaId { person_id, idea_id } => write!(
                f,
                "duplicate idea id {idea_id} for person {person_id} in people blob"
            ),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidPerson { source, .. } => Some(source),
            Self::DuplicatePersonId(_) | Self::DuplicateIdeaId { .. } => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Serializes the whole collection into one blob.
pub fn encode_people(people: &[Person]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(people)?)
}

/// Parses a blob and checks every person/idea invariant.
pub fn decode_people(blob: &str) -> Result<Vec<Person>, CodecError> {
    let people: Vec<Person> = serde_json::from_str(blob)?;
    check_collection(&people)?;
    Ok(people)
}

fn check_collection(people: &[Person]) -> Result<(), CodecError> {
    let mut person_ids = HashSet::with_capacity(people.len());
    for person in people {
        if !person_ids.insert(person.id) {
            return Err(CodecError::DuplicatePersonId(person.id));
        }
        person
            .validate()
            .map_err(|source| CodecError::InvalidPerson {
                person_id: person.id,
                source,
            })?;

        let mut idea_ids = HashSet::with_capacity(person.ideas.len());
        for idea in &person.ideas {
            if !idea_ids.insert(idea.id) {
                return Err(CodecError::DuplicateIdeaId {
                    person_id: person.id,
                    idea_id: idea.id,
                });
            }
        }
    }
    Ok(())
}
