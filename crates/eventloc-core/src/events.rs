//! Event submissions and their validation rules.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::location::CanonicalLocation;
use crate::manual::check_coordinates;
use crate::validation::{FieldError, ValidationErrors};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Upper bound (exclusive) of a `NUMERIC(10,2)` price.
const MAX_PRICE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Raw event submission as received from a form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub location: CanonicalLocation,
    pub organizer_name: String,
    pub organizer_email: String,
    pub max_attendees: Option<i64>,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
    pub tags: Vec<String>,
}

/// A validated event, ready to be persisted together with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub organizer_name: String,
    pub organizer_email: String,
    pub max_attendees: Option<i32>,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
    pub tags: Vec<String>,
    pub location: CanonicalLocation,
}

impl EventInput {
    /// Validates every field and returns the event ready for storage.
    ///
    /// # Errors
    ///
    /// Returns all field errors found, keyed by the camelCase input field.
    pub fn validate(self) -> Result<NewEvent, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = self.title.trim().to_owned();
        check_length(&mut errors, "title", "Title", &title, 3, Some(100));

        let description = self.description.trim().to_owned();
        check_length(
            &mut errors,
            "description",
            "Description",
            &description,
            10,
            Some(1000),
        );

        let start_date = match parse_event_date(&self.start_date) {
            Some(date) => Some(date),
            None => {
                errors.push(FieldError::new("startDate", "Start date is required"));
                None
            }
        };

        let end_date = match self.end_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let parsed = parse_event_date(raw);
                if parsed.is_none() {
                    errors.push(FieldError::new("endDate", format!("'{raw}' is not a date")));
                }
                parsed
            }
        };
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                errors.push(FieldError::new(
                    "endDate",
                    "End date cannot be before the start date",
                ));
            }
        }

        let organizer_name = self.organizer_name.trim().to_owned();
        check_length(
            &mut errors,
            "organizerName",
            "Organizer name",
            &organizer_name,
            3,
            None,
        );

        let organizer_email = self.organizer_email.trim().to_owned();
        if !EMAIL_RE.is_match(&organizer_email) {
            errors.push(FieldError::new(
                "organizerEmail",
                "Please enter a valid email address",
            ));
        }

        let max_attendees = match self.max_attendees {
            None => None,
            Some(n) => match i32::try_from(n) {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    errors.push(FieldError::new(
                        "maxAttendees",
                        "Max attendees must be a positive whole number",
                    ));
                    None
                }
            },
        };

        let image_url = self
            .image_url
            .map(|u| u.trim().to_owned())
            .filter(|u| !u.is_empty());
        if let Some(ref raw) = image_url {
            if url::Url::parse(raw).is_err() {
                errors.push(FieldError::new(
                    "imageUrl",
                    format!("'{raw}' is not a valid URL"),
                ));
            }
        }

        match self.price {
            Some(p) if p < Decimal::ZERO => {
                errors.push(FieldError::new("price", "Price cannot be negative"));
            }
            Some(p) if p >= MAX_PRICE => {
                errors.push(FieldError::new(
                    "price",
                    "Price must be less than 100000000",
                ));
            }
            Some(p) if p.normalize().scale() > 2 => {
                errors.push(FieldError::new(
                    "price",
                    "Price cannot have more than 2 decimal places",
                ));
            }
            _ => {}
        }

        let tags = self
            .tags
            .into_iter()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect();

        if let Err(e) = self.location.require_country() {
            errors.push(FieldError::new("location.country", e.message));
        }
        check_coordinates(
            &mut errors,
            ("location.latitude", self.location.latitude),
            ("location.longitude", self.location.longitude),
        );
        // A location comes from the provider or from manual entry, never both.
        if self.location.is_manually_entered
            && self.location.place_id.as_deref().is_some_and(|id| !id.trim().is_empty())
        {
            errors.push(FieldError::new(
                "location.placeId",
                "A manually entered location cannot have a place id",
            ));
        }

        let Some(start_date) = start_date else {
            return Err(errors);
        };

        errors.finish(NewEvent {
            title,
            description,
            start_date,
            end_date,
            organizer_name,
            organizer_email,
            max_attendees,
            image_url,
            price: self.price,
            tags,
            location: self.location,
        })
    }
}

/// Parses a calendar date (`YYYY-MM-DD`, midnight UTC) or an RFC 3339 timestamp.
#[must_use]
pub fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn check_length(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    value: &str,
    min: usize,
    max: Option<usize>,
) {
    let len = value.chars().count();
    if len < min {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at least {min} characters"),
        ));
    } else if let Some(max) = max.filter(|max| len > *max) {
        errors.push(FieldError::new(
            field,
            format!("{label} cannot exceed {max} characters"),
        ));
    }
}
