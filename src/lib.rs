pub mod config;
pub mod error;
pub mod handler;
pub mod mailer;
pub mod models;
pub mod server;
pub mod store;
pub mod validation;

pub use config::{Config, DatabaseIds};
pub use error::EnquiryError;
pub use handler::EnquiryHandler;
pub use models::{Enquiry, EnquiryKind, RequestEvent, Response};
