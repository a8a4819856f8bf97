//! Person and idea domain records.
//!
//! # Responsibility
//! - Define the records persisted in the people blob.
//! - Validate user input at the boundary (names, birthdays, idea fields).
//!
//! # Invariants
//! - `id` values are generated once and never reused.
//! - `ideas` keeps insertion order.
//! - Unknown wire fields are carried in `extra` so a load/save cycle keeps them.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid iso date regex"));
static PICKER_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})/(\d{2})/(\d{2})$").expect("valid picker date regex"));
static DAY_FIRST_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid day-first date regex"));

pub type PersonId = Uuid;
pub type IdeaId = Uuid;

/// Field-level validation failure for person/idea input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    EmptyName,
    InvalidDateOfBirth {
        value: String,
        format: DateInputFormat,
    },
    EmptyIdeaText,
    EmptyImageRef,
    NonPositiveDimensions { width: u32, height: u32 },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::InvalidDateOfBirth { value, format } => write!(
                f,
                "invalid date of birth `{value}`; expected {}",
                format.pattern()
            ),
            Self::EmptyIdeaText => write!(f, "idea text cannot be empty"),
            Self::EmptyImageRef => write!(f, "idea image reference cannot be empty"),
            Self::NonPositiveDimensions { width, height } => write!(
                f,
                "idea image dimensions must be positive, got {width}x{height}"
            ),
        }
    }
}

impl Error for ModelValidationError {}

/// Accepted textual shapes for date-of-birth input.
///
/// Conversion is always explicit; no format is guessed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInputFormat {
    /// Canonical `YYYY-MM-DD`.
    Iso,
    /// Calendar picker output, `YYYY/MM/DD`.
    Picker,
    /// Day-first slash form, `DD/MM/YYYY`.
    DayFirst,
}

impl DateInputFormat {
    /// Human-readable pattern, e.g. `DD/MM/YYYY`.
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Iso => "YYYY-MM-DD",
            Self::Picker => "YYYY/MM/DD",
            Self::DayFirst => "DD/MM/YYYY",
        }
    }
}

/// Parses a canonical `YYYY-MM-DD` date of birth.
pub fn parse_date_of_birth(input: &str) -> Result<NaiveDate, ModelValidationError> {
    parse_with_format(input, DateInputFormat::Iso)
}

/// Converts date input in the given format to canonical `YYYY-MM-DD`.
pub fn normalize_date_input(
    input: &str,
    format: DateInputFormat,
) -> Result<String, ModelValidationError> {
    let date = parse_with_format(input, format)?;
    Ok(date.format("%Y-%m-%d").to_string())
}

fn parse_with_format(
    input: &str,
    format: DateInputFormat,
) -> Result<NaiveDate, ModelValidationError> {
    let trimmed = input.trim();
    let invalid = || ModelValidationError::InvalidDateOfBirth {
        value: trimmed.to_string(),
        format,
    };

    let (year, month, day) = match format {
        DateInputFormat::Iso => {
            let caps = ISO_DATE_RE.captures(trimmed).ok_or_else(invalid)?;
            (caps[1].to_string(), caps[2].to_string(), caps[3].to_string())
        }
        DateInputFormat::Picker => {
            let caps = PICKER_DATE_RE.captures(trimmed).ok_or_else(invalid)?;
            (caps[1].to_string(), caps[2].to_string(), caps[3].to_string())
        }
        DateInputFormat::DayFirst => {
            let caps = DAY_FIRST_DATE_RE.captures(trimmed).ok_or_else(invalid)?;
            (caps[3].to_string(), caps[2].to_string(), caps[1].to_string())
        }
    };

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// A tracked individual with a birthday and an owned list of gift ideas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    /// Serialized as `dob` (`YYYY-MM-DD`). Only month/day drive ordering.
    #[serde(rename = "dob")]
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub ideas: Vec<Idea>,
    /// Wire fields this version does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Person {
    /// Creates a person with a generated id and no ideas.
    pub fn new(name: impl Into<String>, date_of_birth: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date_of_birth,
            ideas: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Returns `(month, day)`, the recurring part of the birthday.
    pub fn birthday_key(&self) -> (u32, u32) {
        (self.date_of_birth.month(), self.date_of_birth.day())
    }

    /// Short list label such as `Mar 15`.
    pub fn birthday_label(&self) -> String {
        self.date_of_birth.format("%b %-d").to_string()
    }

    pub fn find_idea(&self, idea_id: IdeaId) -> Option<&Idea> {
        self.ideas.iter().find(|idea| idea.id == idea_id)
    }

    /// Checks invariants for a person loaded from storage.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::EmptyName);
        }
        self.ideas.iter().try_for_each(Idea::validate)
    }
}

/// A single gift concept owned by one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub id: IdeaId,
    pub text: String,
    /// Photo URI/path. Serialized as `img`.
    #[serde(rename = "img")]
    pub image_ref: String,
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Idea {
    /// Creates a validated idea with a generated id.
    ///
    /// # Errors
    /// - `EmptyIdeaText` / `EmptyImageRef` for blank strings.
    /// - `NonPositiveDimensions` when either dimension is zero.
    pub fn new(
        text: impl Into<String>,
        image_ref: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Result<Self, ModelValidationError> {
        let idea = Self {
            id: Uuid::new_v4(),
            text: text.into().trim().to_string(),
            image_ref: image_ref.into().trim().to_string(),
            width,
            height,
            extra: Map::new(),
        };
        idea.validate()?;
        Ok(idea)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.text.trim().is_empty() {
            return Err(ModelValidationError::EmptyIdeaText);
        }
        if self.image_ref.trim().is_empty() {
            return Err(ModelValidationError::EmptyImageRef);
        }
        if self.width == 0 || self.height == 0 {
            return Err(ModelValidationError::NonPositiveDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Width over height, for keeping the photo's proportions on display.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        normalize_date_input, parse_date_of_birth, DateInputFormat, Idea, ModelValidationError,
        Person,
    };
    use chrono::NaiveDate;

    #[test]
    fn parse_date_of_birth_accepts_iso_and_rejects_other_shapes() {
        let date = parse_date_of_birth(" 1990-03-15 ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1990, 3, 15).unwrap());

        for bad in ["1990/03/15", "15-03-1990", "1990-3-15", "", "march 15"] {
            assert!(
                matches!(
                    parse_date_of_birth(bad),
                    Err(ModelValidationError::InvalidDateOfBirth {
                        format: DateInputFormat::Iso,
                        ..
                    })
                ),
                "`{bad}` should be rejected"
            );
        }
    }

    #[test]
    fn parse_date_of_birth_rejects_impossible_calendar_dates() {
        assert!(parse_date_of_birth("2023-02-29").is_err());
        assert!(parse_date_of_birth("2024-13-01").is_err());
        assert!(parse_date_of_birth("2024-02-29").is_ok());
    }

    #[test]
    fn normalize_date_input_converts_explicit_formats() {
        assert_eq!(
            normalize_date_input("1990/03/15", DateInputFormat::Picker).unwrap(),
            "1990-03-15"
        );
        assert_eq!(
            normalize_date_input("15/03/1990", DateInputFormat::DayFirst).unwrap(),
            "1990-03-15"
        );
        assert!(normalize_date_input("1990/03/15", DateInputFormat::DayFirst).is_err());
    }

    #[test]
    fn invalid_date_message_names_the_requested_format() {
        let day_first = normalize_date_input("31/02/1990", DateInputFormat::DayFirst).unwrap_err();
        assert_eq!(
            day_first.to_string(),
            "invalid date of birth `31/02/1990`; expected DD/MM/YYYY"
        );

        let picker = normalize_date_input("1990-03-15", DateInputFormat::Picker).unwrap_err();
        assert!(picker.to_string().ends_with("expected YYYY/MM/DD"));

        let iso = parse_date_of_birth("15/03/1990").unwrap_err();
        assert!(iso.to_string().ends_with("expected YYYY-MM-DD"));
    }

    #[test]
    fn idea_new_trims_and_validates_fields() {
        let idea = Idea::new("  Book ", "img://1", 600, 900).unwrap();
        assert_eq!(idea.text, "Book");
        assert!(!idea.id.is_nil());

        assert_eq!(
            Idea::new(" ", "img://1", 1, 1).unwrap_err(),
            ModelValidationError::EmptyIdeaText
        );
        assert_eq!(
            Idea::new("Book", "", 1, 1).unwrap_err(),
            ModelValidationError::EmptyImageRef
        );
        assert!(matches!(
            Idea::new("Book", "img://1", 0, 900),
            Err(ModelValidationError::NonPositiveDimensions { width: 0, .. })
        ));
    }

    #[test]
    fn birthday_helpers_ignore_year() {
        let person = Person::new("Ana", NaiveDate::from_ymd_opt(1990, 3, 5).unwrap());
        assert_eq!(person.birthday_key(), (3, 5));
        assert_eq!(person.birthday_label(), "Mar 5");
    }

    #[test]
    fn aspect_ratio_uses_width_over_height() {
        let idea = Idea::new("Lamp", "file:///lamp.jpg", 600, 900).unwrap();
        assert!((idea.aspect_ratio() - 2.0 / 3.0).abs() < f64::EPSILON);
    }
}
