use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Identifier assigned by the remote service when an appointment is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub String);

impl AppointmentId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VisitStatus {
    #[default]
    Consult,
    Revisit,
}

impl VisitStatus {
    pub const ALL: [VisitStatus; 2] = [VisitStatus::Consult, VisitStatus::Revisit];

    pub fn as_str(self) -> &'static str {
        match self {
            VisitStatus::Consult => "Consult",
            VisitStatus::Revisit => "Revisit",
        }
    }
}

impl FromStr for VisitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("consult") => Ok(VisitStatus::Consult),
            v if v.eq_ignore_ascii_case("revisit") => Ok(VisitStatus::Revisit),
            other => Err(format!("unknown visit status '{other}'")),
        }
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Selectable gender options. Drafts keep the raw string so an unselected
/// value stays representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown gender '{}'", s.trim()))
    }
}

/// Editable fields of the booking form, keyed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    Name,
    PhoneNumber,
    DoctorName,
    Gender,
    Age,
    Date,
    Time,
    Status,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::Name,
        FormField::PhoneNumber,
        FormField::DoctorName,
        FormField::Gender,
        FormField::Age,
        FormField::Date,
        FormField::Time,
        FormField::Status,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::PhoneNumber => "phoneNumber",
            FormField::DoctorName => "doctorName",
            FormField::Gender => "gender",
            FormField::Age => "age",
            FormField::Date => "date",
            FormField::Time => "time",
            FormField::Status => "status",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Patient Name",
            FormField::PhoneNumber => "Phone Number",
            FormField::DoctorName => "Doctor Name",
            FormField::Gender => "Gender",
            FormField::Age => "Age",
            FormField::Date => "Date",
            FormField::Time => "Time",
            FormField::Status => "Status",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visit_status_uses_capitalized_wire_names() {
        assert_eq!(
            serde_json::to_string(&VisitStatus::Revisit).expect("serialize"),
            "\"Revisit\""
        );
        let parsed: VisitStatus = serde_json::from_str("\"Consult\"").expect("deserialize");
        assert_eq!(parsed, VisitStatus::Consult);
        assert_eq!(VisitStatus::default(), VisitStatus::Consult);
    }

    #[test]
    fn parses_gender_case_insensitively() {
        assert_eq!("female".parse::<Gender>(), Ok(Gender::Female));
        assert!("".parse::<Gender>().is_err());
    }

    #[test]
    fn appointment_id_is_transparent_on_the_wire() {
        let id = AppointmentId::new("65f1c0ffee");
        assert_eq!(
            serde_json::to_string(&id).expect("serialize"),
            "\"65f1c0ffee\""
        );
    }
}
