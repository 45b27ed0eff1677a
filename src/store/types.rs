use crate::models::{ContactEnquiry, Enquiry, TourEnquiry};
use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

/// Identifier the record store assigned to a created record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordId(pub String);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure to create a record. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request to record store failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("record store returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("record store response had no record id")]
    MissingId,
}

/// One field value in the store's typed envelope
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Title(String),
    RichText(String),
    Email(String),
    PhoneNumber(String),
    Date(NaiveDate),
    Number(u64),
    Checkbox(bool),
}

impl PropertyValue {
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Title(text) => json!({"title": [{"text": {"content": text}}]}),
            PropertyValue::RichText(text) => json!({"rich_text": [{"text": {"content": text}}]}),
            PropertyValue::Email(email) => json!({"email": email}),
            PropertyValue::PhoneNumber(phone) => json!({"phone_number": phone}),
            PropertyValue::Date(date) => {
                json!({"date": {"start": date.format("%Y-%m-%d").to_string()}})
            }
            PropertyValue::Number(n) => json!({"number": n}),
            PropertyValue::Checkbox(checked) => json!({"checkbox": checked}),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Column name to value mapping for one record, in column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<(&'static str, PropertyValue)>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: PropertyValue) -> Self {
        self.0.push((name, value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl From<&TourEnquiry> for Properties {
    fn from(tour: &TourEnquiry) -> Self {
        use PropertyValue::*;

        Properties::new()
            .with("Name", Title(tour.full_name.clone()))
            .with("Email", Email(tour.email.clone()))
            .with("Contact", PhoneNumber(tour.contact_number.clone()))
            .with("Preference", RichText(tour.preference.clone()))
            .with("Start Date", Date(tour.start_date))
            .with("End Date", Date(tour.end_date))
            .with("Adults", Number(tour.num_of_people.adult))
            .with("Children", Number(tour.num_of_people.child))
            .with("Room With Double Bed", Number(tour.num_of_rooms.double_bedroom))
            .with("Room With Twin Bed", Number(tour.num_of_rooms.twin_bedroom))
            .with("Tour Slug", RichText(tour.tour_slug.clone()))
    }
}

impl From<&ContactEnquiry> for Properties {
    fn from(contact: &ContactEnquiry) -> Self {
        use PropertyValue::*;

        Properties::new()
            .with(
                "Name",
                Title(format!("{} {}", contact.first_name, contact.last_name)),
            )
            .with("Email", Email(contact.email.clone()))
            .with(
                "Telephone",
                PhoneNumber(format!("{}{}", contact.country_code, contact.phone_number)),
            )
            .with(
                "How did you hear about us?",
                RichText(contact.referral_source.clone()),
            )
            .with("Newsletter Signup", Checkbox(contact.signup_newsletter))
            .with(
                "Where would you like to go?",
                RichText(contact.destinations.clone()),
            )
            .with(
                "When would you like to go?",
                RichText(contact.travel_date.clone()),
            )
            .with("How long for?", RichText(contact.duration.clone()))
            .with(
                "How many people are travelling?",
                Number(contact.num_of_peoples),
            )
            .with(
                "How much would you like to spend per person?",
                RichText(contact.spend_per_person.clone()),
            )
            .with(
                "Any other comments or requests?",
                RichText(contact.requests.clone()),
            )
    }
}

impl From<&Enquiry> for Properties {
    fn from(enquiry: &Enquiry) -> Self {
        match enquiry {
            Enquiry::Tour(tour) => tour.into(),
            Enquiry::Contact(contact) => contact.into(),
        }
    }
}
