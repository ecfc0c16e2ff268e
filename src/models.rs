use crate::spelling::ConfirmAction;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const GENDER_CHOICES: [&str; 3] = ["Male", "Female", "Other"];
pub const CARE_STATUS_CHOICES: [&str; 3] = ["Active", "Inactive", "Under Review"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access: String,
    pub refresh: String,
    pub user_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareClient {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub care_notes: Option<String>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_number: Option<String>,
    #[serde(default)]
    pub care_status: String,
    #[serde(default)]
    pub assigned_caregiver: Option<u64>,
}

impl CareClient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whole years since `date_of_birth`, if it parses.
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        let born = NaiveDate::parse_from_str(self.date_of_birth.as_deref()?, "%Y-%m-%d").ok()?;
        let mut age = today.year() - born.year();
        if (today.month(), today.day()) < (born.month(), born.day()) {
            age -= 1;
        }
        Some(age)
    }
}

/// Body of the client creation call, also bound straight from the new
/// client form. Optional text fields are sent as empty strings when left blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewClient {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub care_notes: String,
    #[serde(default)]
    pub emergency_contact_name: String,
    #[serde(default)]
    pub emergency_contact_number: String,
    #[serde(default)]
    pub care_status: String,
    #[serde(default)]
    pub assigned_caregiver: Option<u64>,
}

impl NewClient {
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err("First and last name are required".to_string());
        }
        if NaiveDate::parse_from_str(&self.date_of_birth, "%Y-%m-%d").is_err() {
            return Err("Date of birth must be a valid date (YYYY-MM-DD)".to_string());
        }
        if !GENDER_CHOICES.contains(&self.gender.as_str()) {
            return Err(format!("Unknown gender '{}'", self.gender));
        }
        if !CARE_STATUS_CHOICES.contains(&self.care_status.as_str()) {
            return Err(format!("Unknown care status '{}'", self.care_status));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientNote {
    pub id: u64,
    pub created_at: String,
    pub note_text: String,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub emotion_tags: Option<Map<String, Value>>,
    #[serde(default)]
    pub ai_evaluated_notes: Option<String>,
    pub care_client: u64,
    pub created_by: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNote {
    pub note_text: String,
    pub care_client: u64,
    pub created_by: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentCount {
    pub sentiment: String,
    pub count: u64,
}

/// Raw analytics payload as served by the note-distribution endpoint.
/// Emotion keys keep the order they had in the response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsPayload {
    pub sentiment_distribution: Vec<SentimentCount>,
    pub emotion_distribution: Map<String, Value>,
    pub analysis_summary: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteForm {
    pub note_text: String,
    #[serde(default)]
    pub confirmed: Option<String>,
}

impl NoteForm {
    /// The button pressed on the spelling prompt, if any.
    pub fn action(&self) -> Option<ConfirmAction> {
        match self.confirmed.as_deref() {
            Some("true") => Some(ConfirmAction::Continue),
            Some("review") => Some(ConfirmAction::ReviewChanges),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientPageQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub toast: Option<String>,
}
