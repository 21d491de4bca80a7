//! Field rules for the booking form.
//!
//! Every rule runs on every call; the result lists each failing field with
//! the message shown next to it in the form.

use std::{collections::BTreeMap, sync::OnceLock};

use regex::Regex;
use shared::{domain::FormField, protocol::AppointmentDraft};

use crate::display::parse_calendar_date;

pub const MAX_AGE: u32 = 100;

pub const NAME_MESSAGE: &str = "Name should only contain alphabetic characters";
pub const PHONE_MESSAGE: &str = "Phone number should be a 10-digit number";
pub const DOCTOR_MESSAGE: &str =
    "Doctor name should start with \"Dr.\" and contain only alphabetic characters and spaces";
pub const GENDER_MESSAGE: &str = "Gender is required";
pub const AGE_MESSAGE: &str = "Age should be a number less than or equal to 100";
pub const DATE_MESSAGE: &str = "Date is required";
pub const DATE_FORMAT_MESSAGE: &str = "Date should be a valid calendar date (YYYY-MM-DD)";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: FormField, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

fn name_pattern() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(r"^[a-zA-Z ]+$").expect("name pattern"))
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern"))
}

fn doctor_pattern() -> &'static Regex {
    static DOCTOR: OnceLock<Regex> = OnceLock::new();
    DOCTOR.get_or_init(|| Regex::new(r"^Dr\. [a-zA-Z ]+$").expect("doctor pattern"))
}

fn digits_pattern() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"^[0-9]+$").expect("digits pattern"))
}

/// No lower bound: `"0"` is accepted. Digit strings too large for `u32`
/// are out of range.
fn age_is_acceptable(age: &str) -> bool {
    digits_pattern().is_match(age)
        && age
            .parse::<u32>()
            .map(|value| value <= MAX_AGE)
            .unwrap_or(false)
}

pub fn validate(draft: &AppointmentDraft) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if !name_pattern().is_match(&draft.name) {
        errors.insert(FormField::Name, NAME_MESSAGE);
    }
    if !phone_pattern().is_match(&draft.phone_number) {
        errors.insert(FormField::PhoneNumber, PHONE_MESSAGE);
    }
    if !doctor_pattern().is_match(&draft.doctor_name) {
        errors.insert(FormField::DoctorName, DOCTOR_MESSAGE);
    }
    if draft.gender.is_empty() {
        errors.insert(FormField::Gender, GENDER_MESSAGE);
    }
    if !age_is_acceptable(&draft.age) {
        errors.insert(FormField::Age, AGE_MESSAGE);
    }
    if draft.date.trim().is_empty() {
        errors.insert(FormField::Date, DATE_MESSAGE);
    } else if parse_calendar_date(&draft.date).is_none() {
        errors.insert(FormField::Date, DATE_FORMAT_MESSAGE);
    }

    errors
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
