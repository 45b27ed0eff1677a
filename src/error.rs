use crate::mailer::MailError;
use crate::models::Response;
use crate::store::StoreError;
use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum EnquiryError {
    /// Bad request from the submitter: malformed JSON, bad type selector,
    /// missing fields or a bad date
    #[error(transparent)]
    ClientInput(#[from] ValidationError),

    /// The record could not be created
    #[error("record store failure: {0}")]
    RecordStore(#[from] StoreError),

    /// The record was created but the confirmation email failed
    #[error("mail failure: {0}")]
    Mail(#[from] MailError),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl EnquiryError {
    pub fn status_code(&self) -> u16 {
        match self {
            EnquiryError::ClientInput(_) => 400,
            EnquiryError::RecordStore(_) | EnquiryError::Mail(_) | EnquiryError::Unexpected(_) => {
                500
            }
        }
    }

    /// Message shown to the caller
    pub fn public_message(&self) -> String {
        match self {
            EnquiryError::ClientInput(err) => err.to_string(),
            EnquiryError::RecordStore(_) => "Failed to add data to Notion".to_string(),
            EnquiryError::Mail(_) => "Failed to send email".to_string(),
            EnquiryError::Unexpected(_) => "Internal server error".to_string(),
        }
    }

    pub fn to_response(&self) -> Response {
        Response::with_message(self.status_code(), &self.public_message())
    }
}
