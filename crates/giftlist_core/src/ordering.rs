//! Recurring-birthday ordering of people.
//!
//! # Invariants
//! - Order key is `(month, day)`; the birth year never participates.
//! - People sharing a month/day keep their input order (stable sort).
//! - Ordering is calendar-absolute: January 1 sorts first regardless of today.

use crate::model::person::Person;

/// Returns people ordered by upcoming-in-calendar birthday.
pub fn order_by_birthday(people: &[Person]) -> Vec<Person> {
    let mut ordered = people.to_vec();
    // `sort_by_key` is stable, which keeps insertion order on ties.
    ordered.sort_by_key(Person::birthday_key);
    ordered
}
