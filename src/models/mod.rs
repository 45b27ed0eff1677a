pub mod event;

pub use event::{RequestEvent, Response};

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Which form the submission came from, selected by the `type` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnquiryKind {
    TourEnquiry,
    ContactEnquiry,
}

impl EnquiryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnquiryKind::TourEnquiry => "tour-enquiry",
            EnquiryKind::ContactEnquiry => "contact-enquiry",
        }
    }
}

impl fmt::Display for EnquiryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnquiryKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tour-enquiry" => Ok(EnquiryKind::TourEnquiry),
            "contact-enquiry" => Ok(EnquiryKind::ContactEnquiry),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown enquiry type: {0}")]
pub struct UnknownKind(pub String);

/// Party size on a tour enquiry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumOfPeople {
    pub adult: u64,
    pub child: u64,
}

/// Rooms requested on a tour enquiry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumOfRooms {
    pub double_bedroom: u64,
    pub twin_bedroom: u64,
}

/// Booking request for a specific tour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourEnquiry {
    pub email: String,
    pub full_name: String,
    pub contact_number: String,
    pub preference: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_of_people: NumOfPeople,
    pub num_of_rooms: NumOfRooms,
    pub tour_slug: String,
}

/// General "plan my trip" contact request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEnquiry {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub phone_number: String,
    pub referral_source: String,
    /// Destinations already joined with ", "
    pub destinations: String,
    pub travel_date: String,
    pub duration: String,
    pub num_of_peoples: u64,
    pub spend_per_person: String,
    pub requests: String,
    pub signup_newsletter: bool,
}

/// A validated submission, exactly one shape per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enquiry {
    Tour(TourEnquiry),
    Contact(ContactEnquiry),
}

impl Enquiry {
    pub fn kind(&self) -> EnquiryKind {
        match self {
            Enquiry::Tour(_) => EnquiryKind::TourEnquiry,
            Enquiry::Contact(_) => EnquiryKind::ContactEnquiry,
        }
    }

    /// Address the confirmation goes to
    pub fn email(&self) -> &str {
        match self {
            Enquiry::Tour(tour) => &tour.email,
            Enquiry::Contact(contact) => &contact.email,
        }
    }

    /// Confirmation email sent back to the submitter
    pub fn notification(&self) -> Notification {
        let (subject, name) = match self {
            Enquiry::Tour(tour) => ("Tour Enquiry Form Submission", &tour.full_name),
            Enquiry::Contact(contact) => ("Contact Enquiry Form Submission", &contact.first_name),
        };

        Notification {
            to: self.email().to_string(),
            subject: subject.to_string(),
            body: format!(
                "Thank you for your enquiry, {}. We will get back to you soon.",
                name
            ),
        }
    }
}

/// Plain-text email ready for the mailer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}
