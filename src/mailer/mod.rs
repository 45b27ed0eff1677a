pub mod smtp;
pub mod traits;

pub use smtp::{SmtpMailer, SmtpSettings};
pub use traits::{MailError, Mailer};
