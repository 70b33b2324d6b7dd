//! The new-election form and its validation.
//!
//! Dates are accepted as Unix seconds (`"1746057600"`) or as an HTML
//! `datetime-local` value (`"2025-05-01T00:00"`, seconds optional), which is
//! read as UTC. Either way the validated [`NewElection`] carries seconds.

use chrono::NaiveDateTime;
use serde::Serialize;
use votechain_types::Timestamp;

use crate::error::ValidationError;

const DATETIME_LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    StartTime,
    EndTime,
    Candidates,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Description => "description",
            FormField::StartTime => "start time",
            FormField::EndTime => "end time",
            FormField::Candidates => "candidate names",
        }
    }
}

/// Raw field values as the user typed them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElectionForm {
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    /// Comma-separated.
    pub candidates: String,
}

/// A validated creation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewElection {
    pub title: String,
    pub description: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub candidate_names: Vec<String>,
}

impl ElectionForm {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Title => self.title = value,
            FormField::Description => self.description = value,
            FormField::StartTime => self.start_time = value,
            FormField::EndTime => self.end_time = value,
            FormField::Candidates => self.candidates = value,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check every field and build the request. Touches nothing outside the form.
    pub fn validate(&self) -> Result<NewElection, ValidationError> {
        let title = required(FormField::Title, &self.title)?;
        let description = required(FormField::Description, &self.description)?;
        let start = required(FormField::StartTime, &self.start_time)?;
        let end = required(FormField::EndTime, &self.end_time)?;
        let candidates = required(FormField::Candidates, &self.candidates)?;

        let start_time = parse_time(FormField::StartTime.label(), start)?;
        let end_time = parse_time(FormField::EndTime.label(), end)?;
        if start_time >= end_time {
            return Err(ValidationError::InvertedRange);
        }

        Ok(NewElection {
            title: title.to_string(),
            description: description.to_string(),
            start_time,
            end_time,
            candidate_names: parse_candidates(candidates)?,
        })
    }
}

fn required(field: FormField, value: &str) -> Result<&str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyField(field.label()))
    } else {
        Ok(trimmed)
    }
}

/// Parse a date field into Unix seconds.
pub fn parse_time(field: &'static str, value: &str) -> Result<Timestamp, ValidationError> {
    let value = value.trim();
    let invalid = || ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    };

    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse::<u64>().map(Timestamp::new).map_err(|_| invalid());
    }

    let parsed = DATETIME_LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(invalid)?;
    u64::try_from(parsed.and_utc().timestamp())
        .map(Timestamp::new)
        .map_err(|_| invalid())
}

/// Split a comma-separated name list, trimming each entry.
///
/// An entry that is empty after trimming is an error, not skipped.
pub fn parse_candidates(raw: &str) -> Result<Vec<String>, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::NoCandidates);
    }
    raw.split(',')
        .enumerate()
        .map(|(i, name)| {
            let name = name.trim();
            if name.is_empty() {
                Err(ValidationError::EmptyCandidateName { position: i + 1 })
            } else {
                Ok(name.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_form() -> ElectionForm {
        ElectionForm {
            title: "Board Election".into(),
            description: "Yearly board vote".into(),
            start_time: "2025-05-01T00:00".into(),
            end_time: "2025-05-10T00:00".into(),
            candidates: "Alice, Bob".into(),
        }
    }

    #[test]
    fn valid_form_builds_request() {
        let new = board_form().validate().unwrap();
        assert_eq!(new.title, "Board Election");
        assert_eq!(new.start_time, Timestamp::new(1_746_057_600));
        assert_eq!(new.end_time, Timestamp::new(1_746_835_200));
        assert_eq!(new.candidate_names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn datetime_local_with_seconds_and_raw_seconds() {
        assert_eq!(
            parse_time("start time", "2025-05-01T00:00:30").unwrap(),
            Timestamp::new(1_746_057_630)
        );
        assert_eq!(parse_time("start time", " 1746057600 ").unwrap(), Timestamp::new(1_746_057_600));
    }

    #[test]
    fn unparseable_date() {
        assert_eq!(
            parse_time("end time", "May 10, 2025"),
            Err(ValidationError::InvalidDate {
                field: "end time",
                value: "May 10, 2025".into(),
            })
        );
        assert!(parse_time("end time", "1969-12-31T23:59").is_err());
    }

    #[test]
    fn empty_candidate_after_trim() {
        assert_eq!(
            parse_candidates("Alice, , Bob"),
            Err(ValidationError::EmptyCandidateName { position: 2 })
        );
        assert_eq!(
            parse_candidates("Alice,"),
            Err(ValidationError::EmptyCandidateName { position: 2 })
        );
        assert_eq!(parse_candidates("  "), Err(ValidationError::NoCandidates));
        assert_eq!(parse_candidates(" Carol ").unwrap(), vec!["Carol"]);
    }

    #[test]
    fn missing_fields_reported_in_order() {
        let mut form = board_form();
        form.set(FormField::Title, "   ");
        assert_eq!(form.validate(), Err(ValidationError::EmptyField("title")));

        let mut form = board_form();
        form.set(FormField::Description, "");
        assert_eq!(form.validate(), Err(ValidationError::EmptyField("description")));
    }

    #[test]
    fn inverted_and_equal_ranges_rejected() {
        let mut form = board_form();
        form.set(FormField::EndTime, "2025-04-30T00:00");
        assert_eq!(form.validate(), Err(ValidationError::InvertedRange));
        form.set(FormField::EndTime, "2025-05-01T00:00");
        assert_eq!(form.validate(), Err(ValidationError::InvertedRange));
    }

    #[test]
    fn clear_resets_everything() {
        let mut form = board_form();
        form.clear();
        assert_eq!(form, ElectionForm::default());
    }
}
