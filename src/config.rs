use crate::mailer::smtp::{SmtpSettings, DEFAULT_SMTP_PORT, DEFAULT_SMTP_SERVER};
use crate::models::EnquiryKind;
use crate::store::notion::DEFAULT_API_URL;
use anyhow::{Context, Result};
use std::fmt;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Target database for each enquiry type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseIds {
    pub tour: String,
    pub contact: String,
}

impl DatabaseIds {
    pub fn for_kind(&self, kind: EnquiryKind) -> &str {
        match kind {
            EnquiryKind::TourEnquiry => &self.tour,
            EnquiryKind::ContactEnquiry => &self.contact,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub smtp: SmtpSettings,
    pub notion_token: String,
    pub notion_api_url: String,
    pub databases: DatabaseIds,
    pub bind_addr: SocketAddr,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("smtp", &self.smtp)
            .field("notion_token", &"<redacted>")
            .field("notion_api_url", &self.notion_api_url)
            .field("databases", &self.databases)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl Config {
    /// Load from the process environment, after an optional `.env` file
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine; real deployments set variables directly
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .with_context(|| format!("Missing required environment variable {key}"))
        };

        let smtp_port = match lookup("SMTP_PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("Invalid SMTP_PORT: {port}"))?,
            None => DEFAULT_SMTP_PORT,
        };

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid BIND_ADDR: {bind_addr}"))?;

        Ok(Self {
            smtp: SmtpSettings {
                server: lookup("SMTP_SERVER").unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
                port: smtp_port,
                sender: required("EMAIL_USER")?,
                password: required("EMAIL_PASS")?,
            },
            notion_token: required("NOTION_TOKEN")?,
            notion_api_url: lookup("NOTION_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            databases: DatabaseIds {
                tour: required("TOUR_DATABASE_ID")?,
                contact: required("CONTACT_DATABASE_ID")?,
            },
            bind_addr,
        })
    }
}
