use crate::models::{
    ContactEnquiry, Enquiry, EnquiryKind, NumOfPeople, NumOfRooms, TourEnquiry,
};
use chrono::NaiveDate;
use serde_json::{Map, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a submission was rejected before reaching the record store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid JSON format")]
    InvalidJson,
    #[error("Query param 'type' is required")]
    MissingType,
    #[error("Invalid type. Must be 'tour-enquiry' or 'contact-enquiry'")]
    InvalidType(String),
    #[error("Body is required")]
    EmptyBody,
    #[error("Email is required")]
    MissingEmail,
    #[error("All fields are required")]
    MissingFields(Vec<&'static str>),
    #[error("Invalid date format. Use YYYY-MM-DD.")]
    InvalidDate { field: &'static str, value: String },
}

/// Resolve the `type` query parameter
pub fn parse_kind(param: Option<&str>) -> Result<EnquiryKind, ValidationError> {
    match param {
        None | Some("") => Err(ValidationError::MissingType),
        Some(raw) => raw
            .parse()
            .map_err(|_| ValidationError::InvalidType(raw.to_string())),
    }
}

/// Parse the raw body text into a JSON value
pub fn parse_body(text: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(text).map_err(|_| ValidationError::InvalidJson)
}

/// The body must be a non-empty JSON object
pub fn require_body(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    if !is_truthy(body) {
        return Err(ValidationError::EmptyBody);
    }
    body.as_object().ok_or(ValidationError::InvalidJson)
}

/// Validate a body against the selected enquiry type
pub fn validate(kind: EnquiryKind, body: &Map<String, Value>) -> Result<Enquiry, ValidationError> {
    match kind {
        EnquiryKind::TourEnquiry => validate_tour(body).map(Enquiry::Tour),
        EnquiryKind::ContactEnquiry => validate_contact(body).map(Enquiry::Contact),
    }
}

fn validate_tour(body: &Map<String, Value>) -> Result<TourEnquiry, ValidationError> {
    let email = required_email(body)?;
    let mut fields = Fields::new(body);

    let full_name = fields.text("full_name");
    let contact_number = fields.text_or_number("contact_number");
    let preference = fields.text("preference");
    let start_date = fields.text("start_date");
    let end_date = fields.text("end_date");
    let adult = fields.nested_count("num_of_people", "adult");
    let child = fields.nested_count("num_of_people", "child");
    let double_bedroom = fields.nested_count("num_of_rooms", "double_bedroom");
    let twin_bedroom = fields.nested_count("num_of_rooms", "twin_bedroom");
    let tour_slug = fields.text("tour_slug");
    fields.finish()?;

    let start_date = parse_date("start_date", &start_date)?;
    let end_date = parse_date("end_date", &end_date)?;

    Ok(TourEnquiry {
        email,
        full_name,
        contact_number,
        preference,
        start_date,
        end_date,
        num_of_people: NumOfPeople { adult, child },
        num_of_rooms: NumOfRooms {
            double_bedroom,
            twin_bedroom,
        },
        tour_slug,
    })
}

fn validate_contact(body: &Map<String, Value>) -> Result<ContactEnquiry, ValidationError> {
    let email = required_email(body)?;
    let mut fields = Fields::new(body);

    let first_name = fields.text("first_name");
    let last_name = fields.text("last_name");
    let country_code = fields.text_or_number("country_code");
    let phone_number = fields.text_or_number("phone_number");
    let referral_source = fields.text("referral_source");
    let destinations = fields.destinations("destinations");
    let travel_date = fields.text("travel_date");
    let duration = fields.text("duration");
    let num_of_peoples = fields.count("num_of_peoples");
    let spend_per_person = fields.text("spend_per_person");
    let requests = fields.text("requests");
    fields.finish()?;

    // Optional and never validated
    let signup_newsletter = body
        .get("signup_newsletter")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok(ContactEnquiry {
        email,
        first_name,
        last_name,
        country_code,
        phone_number,
        referral_source,
        destinations,
        travel_date,
        duration,
        num_of_peoples,
        spend_per_person,
        requests,
        signup_newsletter,
    })
}

fn required_email(body: &Map<String, Value>) -> Result<String, ValidationError> {
    match body.get("email") {
        Some(Value::String(email)) if !email.is_empty() => Ok(email.clone()),
        _ => Err(ValidationError::MissingEmail),
    }
}

/// Accepts exactly `YYYY-MM-DD` naming a real calendar day
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    };

    // chrono alone would also take unpadded months and days
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// JSON truthiness: empty, zero, false and null are all falsy, so a count of zero is missing
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Pulls required fields out of a body, recording every one that is missing
struct Fields<'a> {
    body: &'a Map<String, Value>,
    missing: Vec<&'static str>,
}

impl<'a> Fields<'a> {
    fn new(body: &'a Map<String, Value>) -> Self {
        Self {
            body,
            missing: Vec::new(),
        }
    }

    fn text(&mut self, key: &'static str) -> String {
        match self.body.get(key) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => self.miss(key),
        }
    }

    /// Phone-like fields arrive as either strings or bare numbers
    fn text_or_number(&mut self, key: &'static str) -> String {
        match self.body.get(key) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
            _ => self.miss(key),
        }
    }

    fn count(&mut self, key: &'static str) -> u64 {
        match self.body.get(key).and_then(Value::as_u64) {
            Some(n) if n > 0 => n,
            _ => {
                self.missing.push(key);
                0
            }
        }
    }

    fn nested_count(&mut self, parent: &'static str, key: &'static str) -> u64 {
        let group = self
            .body
            .get(parent)
            .and_then(Value::as_object)
            .filter(|group| !group.is_empty());

        let Some(group) = group else {
            if !self.missing.contains(&parent) {
                self.missing.push(parent);
            }
            self.missing.push(key);
            return 0;
        };

        match group.get(key).and_then(Value::as_u64) {
            Some(n) if n > 0 => n,
            _ => {
                self.missing.push(key);
                0
            }
        }
    }

    /// A list of destination names is flattened to "A, B"; a plain string is kept as-is
    fn destinations(&mut self, key: &'static str) -> String {
        match self.body.get(key) {
            Some(Value::Array(items)) if !items.is_empty() => {
                let names: Option<Vec<&str>> = items.iter().map(Value::as_str).collect();
                match names {
                    Some(names) => names.join(", "),
                    None => self.miss(key),
                }
            }
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => self.miss(key),
        }
    }

    fn miss(&mut self, key: &'static str) -> String {
        self.missing.push(key);
        String::new()
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(self.missing))
        }
    }
}
