use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Lenient parse for backend values; anything unrecognised maps to `None`
    /// so a bad value never pre-selects a radio button.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

/// The mutable, locally held copy of the user's profile fields.
///
/// The backend owns the durable copy; this one is hydrated from a successful
/// fetch, edited field-by-field, and written back wholesale on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Always a plain `YYYY-MM-DD` string (or empty), never a full timestamp.
    pub dob: String,
    /// Empty, or a city present in the current place index.
    pub birth_place: String,
    pub gender: Option<Gender>,
}

/// One edit to exactly one field. Applying it leaves every other field
/// untouched (shallow merge semantics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldEdit {
    FirstName(String),
    LastName(String),
    Email(String),
    Phone(String),
    Dob(String),
    Gender(Gender),
}

impl ProfileRecord {
    #[must_use]
    pub fn hydrate(response: ProfileResponse) -> Self {
        Self {
            first_name: response.first_name,
            last_name: response.last_name,
            email: response.email,
            phone: response.phone,
            dob: response.dob.as_deref().map(normalize_date).unwrap_or_default(),
            birth_place: response.birth_place.unwrap_or_default(),
            gender: response.gender.as_deref().and_then(Gender::parse),
        }
    }

    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::FirstName(v) => self.first_name = v,
            FieldEdit::LastName(v) => self.last_name = v,
            FieldEdit::Email(v) => self.email = v,
            FieldEdit::Phone(v) => self.phone = v,
            FieldEdit::Dob(v) => self.dob = normalize_date(&v),
            FieldEdit::Gender(v) => self.gender = Some(v),
        }
    }

    /// Snapshot of every field for the all-at-once save.
    #[must_use]
    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            dob: self.dob.clone(),
            birth_place: self.birth_place.clone(),
            gender: self.gender.map(|g| g.as_str().to_string()).unwrap_or_default(),
        }
    }
}

/// Profile payload as the backend's user-data endpoint returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub birth_place: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Save payload; the update endpoint expects camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub dob: String,
    pub birth_place: String,
    pub gender: String,
}

/// Normalizes an ISO-like date/time value to a plain `YYYY-MM-DD` string.
///
/// A pure string split, deliberately not timezone arithmetic: re-parsing the
/// timestamp through a local clock can shift the date by a day, a prefix cut
/// cannot. Values that do not carry a `YYYY-MM-DD` prefix pass through
/// trimmed and unchanged.
#[must_use]
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    let prefix = trimmed
        .find(|c: char| c == 'T' || c == ' ')
        .map_or(trimmed, |at| &trimmed[..at]);
    if is_plain_date(prefix) {
        prefix.to_string()
    } else {
        trimmed.to_string()
    }
}

fn is_plain_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}
