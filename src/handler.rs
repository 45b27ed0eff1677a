use crate::config::DatabaseIds;
use crate::error::EnquiryError;
use crate::mailer::Mailer;
use crate::models::{RequestEvent, Response};
use crate::store::{Properties, RecordId, RecordStore};
use crate::validation;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

pub const SUCCESS_MESSAGE: &str = "Enquiry submitted successfully";

/// Runs enquiries against a record store and a mailer
#[derive(Clone)]
pub struct EnquiryHandler {
    store: Arc<dyn RecordStore>,
    mailer: Arc<dyn Mailer>,
    databases: DatabaseIds,
}

impl EnquiryHandler {
    pub fn new(
        store: Arc<dyn RecordStore>,
        mailer: Arc<dyn Mailer>,
        databases: DatabaseIds,
    ) -> Self {
        Self {
            store,
            mailer,
            databases,
        }
    }

    /// Handle one event and always produce a response.
    /// A failed email still leaves the record in place.
    #[instrument(name = "handle_enquiry", skip_all, fields(kind = event.query_param("type").unwrap_or("none")))]
    pub async fn handle(&self, event: &RequestEvent) -> Response {
        match self.process(event).await {
            Ok(record_id) => {
                info!("Enquiry {} stored and confirmed", record_id);
                Response::ok(SUCCESS_MESSAGE)
            }
            Err(err) => {
                match &err {
                    EnquiryError::ClientInput(detail) => {
                        error!("Rejected enquiry: {:?}", detail)
                    }
                    EnquiryError::RecordStore(detail) => {
                        error!("Failed to create {} record: {}", self.store.store_name(), detail)
                    }
                    EnquiryError::Mail(detail) => {
                        error!("Record created but email failed: {}", detail)
                    }
                    EnquiryError::Unexpected(detail) => error!("Unexpected error: {}", detail),
                }
                err.to_response()
            }
        }
    }

    async fn process(&self, event: &RequestEvent) -> Result<RecordId, EnquiryError> {
        let text = event.body_text().map_err(|e| {
            debug!("Undecodable body: {}", e);
            validation::ValidationError::InvalidJson
        })?;
        let body = validation::parse_body(&text)?;

        let kind = validation::parse_kind(event.query_param("type"))?;
        let fields = validation::require_body(&body)?;
        let enquiry = validation::validate(kind, fields)?;
        info!("Processing {}", enquiry.kind());

        let properties = Properties::from(&enquiry);
        let database_id = self.databases.for_kind(kind);
        let record_id = self.store.create_record(database_id, &properties).await?;
        info!("{} response: {}", self.store.store_name(), record_id);

        let notification = enquiry.notification();
        self.mailer.send_notification(&notification).await?;
        info!("Email sent to {}", notification.to);

        Ok(record_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MailError;
    use crate::models::Notification;
    use crate::store::StoreError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        fail: bool,
        created: Mutex<Vec<(String, Properties)>>,
    }

    #[async_trait]
    impl RecordStore for FakeStore {
        async fn create_record(
            &self,
            database_id: &str,
            properties: &Properties,
        ) -> Result<RecordId, StoreError> {
            if self.fail {
                return Err(StoreError::MissingId);
            }
            let mut created = self.created.lock().unwrap();
            created.push((database_id.to_string(), properties.clone()));
            Ok(RecordId(format!("page-{}", created.len())))
        }

        fn store_name(&self) -> &'static str {
            "Fake"
        }
    }

    #[derive(Default)]
    struct FakeMailer {
        fail: bool,
        sent: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl Mailer for FakeMailer {
        async fn send_notification(&self, notification: &Notification) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Transport("connection refused".to_string()));
            }
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn handler(store: Arc<FakeStore>, mailer: Arc<FakeMailer>) -> EnquiryHandler {
        EnquiryHandler::new(
            store,
            mailer,
            DatabaseIds {
                tour: "tour-db".to_string(),
                contact: "contact-db".to_string(),
            },
        )
    }

    fn tour_event() -> RequestEvent {
        let body = json!({
            "email": "jo@example.com",
            "full_name": "Jo Bloggs",
            "contact_number": "07700900123",
            "preference": "Private",
            "start_date": "2025-03-01",
            "end_date": "2025-03-14",
            "num_of_people": {"adult": 2, "child": 1},
            "num_of_rooms": {"double_bedroom": 1, "twin_bedroom": 1},
            "tour_slug": "inca-trail"
        });
        RequestEvent::new(body.to_string(), &[("type", "tour-enquiry")])
    }

    #[tokio::test]
    async fn stores_then_emails() {
        let store = Arc::new(FakeStore::default());
        let mailer = Arc::new(FakeMailer::default());

        let response = handler(store.clone(), mailer.clone()).handle(&tour_event()).await;

        assert_eq!(response, Response::ok(SUCCESS_MESSAGE));
        let created = store.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].0, "tour-db");
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Tour Enquiry Form Submission");
    }

    #[tokio::test]
    async fn store_failure_skips_email() {
        let store = Arc::new(FakeStore {
            fail: true,
            ..Default::default()
        });
        let mailer = Arc::new(FakeMailer::default());

        let response = handler(store, mailer.clone()).handle(&tour_event()).await;

        assert_eq!(response.status_code, 500);
        assert_eq!(response.message().as_deref(), Some("Failed to add data to Notion"));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn email_failure_keeps_record() {
        let store = Arc::new(FakeStore::default());
        let mailer = Arc::new(FakeMailer {
            fail: true,
            ..Default::default()
        });

        let response = handler(store.clone(), mailer).handle(&tour_event()).await;

        assert_eq!(response.status_code, 500);
        assert_eq!(response.message().as_deref(), Some("Failed to send email"));
        assert_eq!(store.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_collaborators() {
        let store = Arc::new(FakeStore::default());
        let mailer = Arc::new(FakeMailer::default());
        let handler = handler(store.clone(), mailer.clone());

        let events = [
            RequestEvent::new("{not json", &[("type", "tour-enquiry")]),
            RequestEvent::new("{\"email\":\"a@b.c\"}", &[]),
            RequestEvent::new("{\"email\":\"a@b.c\"}", &[("type", "enquiry")]),
            RequestEvent::new("{}", &[("type", "contact-enquiry")]),
            RequestEvent::new("{\"email\":\"a@b.c\"}", &[("type", "tour-enquiry")]),
        ];
        for event in &events {
            assert_eq!(handler.handle(event).await.status_code, 400);
        }

        assert!(store.created.lock().unwrap().is_empty());
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn json_is_parsed_before_type_is_checked() {
        let handler = handler(Arc::default(), Arc::default());

        let response = handler.handle(&RequestEvent::new("[", &[])).await;

        assert_eq!(response.message().as_deref(), Some("Invalid JSON format"));
    }
}
