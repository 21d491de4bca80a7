use std::fmt;

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize,
};

use crate::domain::{AppointmentId, FormField, VisitStatus};

/// Appointment fields as entered in the booking form. Strings are kept raw
/// so malformed input can be carried to the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub age: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub status: VisitStatus,
}

impl AppointmentDraft {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::PhoneNumber => &self.phone_number,
            FormField::DoctorName => &self.doctor_name,
            FormField::Gender => &self.gender,
            FormField::Age => &self.age,
            FormField::Date => &self.date,
            FormField::Time => &self.time,
            FormField::Status => self.status.as_str(),
        }
    }

    /// Writes a raw form value. An unrecognized status keeps the previous one.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::PhoneNumber => self.phone_number = value,
            FormField::DoctorName => self.doctor_name = value,
            FormField::Gender => self.gender = value,
            FormField::Age => self.age = value,
            FormField::Date => self.date = value,
            FormField::Time => self.time = value,
            FormField::Status => {
                if let Ok(status) = value.parse() {
                    self.status = status;
                }
            }
        }
    }
}

/// A stored appointment as returned by `GET /appointments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: AppointmentId,
    #[serde(flatten)]
    pub details: AppointmentDraft,
}

impl Appointment {
    pub fn new(id: AppointmentId, details: AppointmentDraft) -> Self {
        Self { id, details }
    }
}

/// Wire shape of a stored record. Documents may carry `_id`, `id`, or both
/// (virtual ids); `_id` wins when both are present.
#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default, rename = "_id")]
    object_id: Option<AppointmentId>,
    #[serde(default)]
    id: Option<AppointmentId>,
    #[serde(flatten)]
    details: AppointmentDraft,
}

impl TryFrom<StoredRecord> for Appointment {
    type Error = String;

    fn try_from(record: StoredRecord) -> Result<Self, Self::Error> {
        let id = record
            .object_id
            .or(record.id)
            .ok_or_else(|| "appointment record has neither `_id` nor `id`".to_string())?;
        Ok(Self::new(id, record.details))
    }
}

/// Body of `PATCH /appointments/{id}`; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VisitStatus>,
}

impl AppointmentPatch {
    pub fn full(draft: &AppointmentDraft) -> Self {
        Self {
            name: Some(draft.name.clone()),
            phone_number: Some(draft.phone_number.clone()),
            doctor_name: Some(draft.doctor_name.clone()),
            gender: Some(draft.gender.clone()),
            age: Some(draft.age.clone()),
            date: Some(draft.date.clone()),
            time: Some(draft.time.clone()),
            status: Some(draft.status),
        }
    }

    /// Only the fields of `edited` that differ from `stored`.
    pub fn between(stored: &AppointmentDraft, edited: &AppointmentDraft) -> Self {
        fn changed(before: &str, after: &str) -> Option<String> {
            (before != after).then(|| after.to_string())
        }

        Self {
            name: changed(&stored.name, &edited.name),
            phone_number: changed(&stored.phone_number, &edited.phone_number),
            doctor_name: changed(&stored.doctor_name, &edited.doctor_name),
            gender: changed(&stored.gender, &edited.gender),
            age: changed(&stored.age, &edited.age),
            date: changed(&stored.date, &edited.date),
            time: changed(&stored.time, &edited.time),
            status: (stored.status != edited.status).then_some(edited.status),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Accepts `"42"`, `42` or `null` and yields the decimal string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber;

    impl<'de> Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            if v.fract() == 0.0 && v.is_finite() {
                Ok(format!("{v:.0}"))
            } else {
                Ok(v.to_string())
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}
