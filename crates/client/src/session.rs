//! Per-page submission lifecycle.
//!
//! A [`FormSession`] is one open checklist page: it owns the in-memory
//! record, knows whether it creates or updates, and walks through
//! [`Phase`]s as it loads and submits. Every transition takes `&mut self`,
//! so a session cannot be submitted twice concurrently; the phase guard
//! additionally refuses to resubmit after a success until the record is
//! edited again.
//!
//! Failures are logged with their raw detail and stored as the single
//! normalized sentence meant for the user.

use sts_core::{ChecklistForm, ChecklistRecord, Mode, OperationRef, PageQuery};

use crate::error::ProxyError;
use crate::proxy::ProxyClient;
use crate::transport::Transport;

pub const SUCCESS_MESSAGE: &str = "Checklist saved successfully.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, not mounted yet.
    Idle,
    LoadingExisting,
    Ready,
    Submitting,
    Succeeded,
    /// Holds the sentence shown to the user.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FormSession<F: ChecklistForm> {
    query: PageQuery,
    mode: Mode,
    phase: Phase,
    record: ChecklistRecord<F>,
    location: String,
}

impl<F: ChecklistForm> FormSession<F> {
    pub fn new(query: PageQuery) -> Self {
        let mode = query.mode();
        let record = ChecklistRecord::defaults(query.operation_ref.as_ref());
        let location = page_location(F::KIND.page_path(), &query);
        Self {
            query,
            mode,
            phase: Phase::Idle,
            record,
            location,
        }
    }

    /// Load the existing record in update mode; seed defaults otherwise.
    ///
    /// A failed load leaves the record at its defaults and keeps update mode.
    pub fn mount<T: Transport>(&mut self, client: &ProxyClient<T>) {
        let target = match (self.mode, &self.query.operation_ref) {
            (Mode::Update, Some(op)) => op.clone(),
            _ => {
                self.record = ChecklistRecord::defaults(self.query.operation_ref.as_ref());
                self.phase = Phase::Ready;
                return;
            }
        };

        self.phase = Phase::LoadingExisting;
        match client.fetch(F::KIND, &target) {
            Ok(value) => {
                self.record = ChecklistRecord::from_backend(&value);
                self.phase = Phase::Ready;
                tracing::debug!(form = F::KIND.slug(), operation_ref = %target, "loaded existing record");
            }
            Err(err) => self.fail("load", err),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn record(&self) -> &ChecklistRecord<F> {
        &self.record
    }

    pub fn query(&self) -> &PageQuery {
        &self.query
    }

    /// Page path plus query string the session currently sits on.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn success_message(&self) -> Option<&'static str> {
        (self.phase == Phase::Succeeded).then_some(SUCCESS_MESSAGE)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Apply a user edit to the record. Editing after a success makes the
    /// session ready for the next submission.
    pub fn edit(&mut self, change: impl FnOnce(&mut ChecklistRecord<F>)) {
        change(&mut self.record);
        if self.phase == Phase::Succeeded {
            self.phase = Phase::Ready;
        }
    }

    /// Submit the record. Returns `true` on success.
    ///
    /// Refused without a request while submitting or right after a success.
    pub fn submit<T: Transport>(&mut self, client: &ProxyClient<T>) -> bool {
        if matches!(self.phase, Phase::Submitting | Phase::Succeeded) {
            tracing::debug!(form = F::KIND.slug(), phase = ?self.phase, "submit ignored");
            return false;
        }

        let Some(record_ref) = self.record.operation_ref() else {
            self.fail("submit", ProxyError::MissingOperationRef);
            return false;
        };

        self.phase = Phase::Submitting;
        match self.send(&record_ref, client) {
            Ok(()) => {
                self.succeed();
                true
            }
            Err(err) => {
                self.fail("submit", err);
                false
            }
        }
    }

    fn send<T: Transport>(
        &self,
        record_ref: &OperationRef,
        client: &ProxyClient<T>,
    ) -> Result<(), ProxyError> {
        let payload = self
            .record
            .to_payload()
            .map_err(|e| ProxyError::Encode(e.to_string()))?;
        match self.mode {
            Mode::Update => {
                let target = self.query.operation_ref.as_ref().unwrap_or(record_ref);
                client.update(F::KIND, target, &payload)?;
            }
            Mode::Create => {
                client.create(F::KIND, &payload)?;
            }
        }
        tracing::info!(form = F::KIND.slug(), operation_ref = %record_ref, mode = ?self.mode, "checklist submitted");
        Ok(())
    }

    fn succeed(&mut self) {
        match self.mode {
            Mode::Update => {
                self.query = PageQuery::default();
                self.mode = Mode::Create;
                self.record = ChecklistRecord::defaults(None);
                self.location = F::KIND.page_path();
            }
            Mode::Create => {
                self.record = ChecklistRecord::defaults(self.query.operation_ref.as_ref());
            }
        }
        self.phase = Phase::Succeeded;
    }

    fn fail(&mut self, action: &str, err: ProxyError) {
        tracing::error!(form = F::KIND.slug(), action, error = %err, "checklist request failed");
        self.phase = Phase::Failed(err.user_message());
    }
}

fn page_location(path: String, query: &PageQuery) -> String {
    match query.to_query_string() {
        q if q.is_empty() => path,
        q => format!("{path}?{q}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::testing::ScriptedTransport;
    use crate::transport::Method;
    use serde_json::json;
    use sts_core::{BeforeMooring, PreFixture, SignatureImage, Status};

    const BASE: &str = "http://proxy.test/api/sts-proxy";

    fn client(transport: &ScriptedTransport) -> ProxyClient<&ScriptedTransport> {
        ProxyClient::with_transport(BASE, transport)
    }

    fn create_page(op: Option<&str>) -> FormSession<PreFixture> {
        FormSession::new(PageQuery::new(op, false))
    }

    fn update_page(op: &str) -> FormSession<BeforeMooring> {
        FormSession::new(PageQuery::parse(&format!("operationRef={op}&mode=update")))
    }

    #[test]
    fn create_mount_seeds_defaults_with_query_reference() {
        let transport = ScriptedTransport::new();
        let mut session = create_page(Some("OP123,  "));
        session.mount(&client(&transport));

        assert_eq!(session.phase(), &Phase::Ready);
        assert_eq!(session.mode(), Mode::Create);
        assert_eq!(session.record().operation_ref, "OP123");
        assert_eq!(session.location(), "/forms/ops-ofd-001?operationRef=OP123");
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn update_mode_needs_a_reference() {
        let session: FormSession<PreFixture> =
            FormSession::new(PageQuery::parse("operationRef=%2C&mode=update"));
        assert_eq!(session.mode(), Mode::Create);

        let session: FormSession<PreFixture> =
            FormSession::new(PageQuery::parse("operationRef=OP1&mode=edit"));
        assert_eq!(session.mode(), Mode::Create);
    }

    #[test]
    fn update_mount_loads_record() {
        let transport = ScriptedTransport::new();
        transport.respond(
            200,
            &json!({"success": true, "data": {
                "operationRef": "OP9",
                "status": "SIGNED",
                "generalRemarks": "calm sea",
                "mooringPlan": {"fendersRigged": true, "numberOfFenders": 4}
            }}),
        );
        let mut session = update_page("OP9");
        session.mount(&client(&transport));

        assert_eq!(session.phase(), &Phase::Ready);
        assert_eq!(session.mode(), Mode::Update);
        assert_eq!(session.record().status, Status::Signed);
        assert_eq!(session.record().general_remarks, "calm sea");
        assert!(session.record().details.fenders_rigged);
        assert_eq!(session.record().details.number_of_fenders, "4");
        assert_eq!(
            transport.requests()[0].url,
            format!("{BASE}/ops-ofd-003?operationRef=OP9")
        );
    }

    #[test]
    fn update_mount_404_shows_not_found_and_keeps_defaults() {
        let transport = ScriptedTransport::new();
        transport.respond(404, &json!({"success": false, "message": "Checklist not found"}));
        let mut session = update_page("MISSING");
        session.mount(&client(&transport));

        assert_eq!(
            session.error_message(),
            Some("Checklist not found. Please verify the operation reference number.")
        );
        assert_eq!(session.mode(), Mode::Update);
        assert_eq!(session.record().general_remarks, "");
        assert_eq!(session.record().status, Status::Draft);
    }

    #[test]
    fn update_mount_bad_bodies() {
        for (status, body, sentence) in [
            (200, "", "No data was received from the server. Please try again."),
            (
                200,
                "<html>",
                "The server returned an invalid response. Please try again later.",
            ),
            (
                500,
                "",
                "The server encountered an error. Please try again later.",
            ),
        ] {
            let transport = ScriptedTransport::new();
            transport.respond_raw(status, body);
            let mut session = update_page("OP1");
            session.mount(&client(&transport));
            assert_eq!(session.error_message(), Some(sentence), "status {status} body {body:?}");
        }
    }

    #[test]
    fn submit_without_reference_fails_locally() {
        let transport = ScriptedTransport::new();
        let mut session = create_page(None);
        session.mount(&client(&transport));
        session.edit(|r| r.operation_ref = ",".into());

        assert!(!session.submit(&client(&transport)));
        assert_eq!(
            session.error_message(),
            Some("Operation reference is required. Please provide a valid reference number.")
        );
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn create_success_resets_and_keeps_page_reference() {
        let transport = ScriptedTransport::new();
        transport.respond(200, &json!({"success": true}));
        let mut session = create_page(Some("OP123"));
        session.mount(&client(&transport));
        session.edit(|r| {
            r.general_remarks = "all clear".into();
            r.status = Status::Approved;
            r.signatures.stamp = SignatureImage::from_base64("image/png", "QUJD");
        });

        assert!(session.submit(&client(&transport)));
        assert_eq!(session.phase(), &Phase::Succeeded);
        assert_eq!(session.success_message(), Some(SUCCESS_MESSAGE));
        assert_eq!(session.error_message(), None);
        assert_eq!(session.record(), &ChecklistRecord::defaults(OperationRef::parse("OP123").as_ref()));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].url, format!("{BASE}/ops-ofd-001/create"));
        let sent = String::from_utf8(requests[0].body.as_ref().unwrap().bytes.clone()).unwrap();
        assert!(sent.contains(r#""status":"DRAFT""#));
        assert!(sent.contains(r#""stamp":"QUJD""#));
        assert!(sent.contains(r#""generalRemarks":"all clear""#));
    }

    #[test]
    fn no_resubmit_until_edited() {
        let transport = ScriptedTransport::new();
        transport.respond(200, &json!({"success": true}));
        transport.respond(200, &json!({"success": true}));
        let mut session = create_page(Some("OP1"));
        session.mount(&client(&transport));

        assert!(session.submit(&client(&transport)));
        assert!(!session.submit(&client(&transport)));
        assert_eq!(transport.requests().len(), 1);

        session.edit(|r| r.general_remarks = "second".into());
        assert_eq!(session.phase(), &Phase::Ready);
        assert!(session.submit(&client(&transport)));
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn update_failure_shows_backend_validation_verbatim() {
        let transport = ScriptedTransport::new();
        transport.respond(200, &json!({"success": true, "data": {"operationRef": "OP5"}}));
        transport.respond(500, &json!({"message": "Validation failed: name required"}));
        let mut session = update_page("OP5");
        let client = client(&transport);
        session.mount(&client);

        assert!(!session.submit(&client));
        assert_eq!(session.error_message(), Some("Validation failed: name required"));
        assert_eq!(session.mode(), Mode::Update);

        let requests = transport.requests();
        assert_eq!(requests[1].method, Method::Put);
        assert_eq!(requests[1].url, format!("{BASE}/ops-ofd-003?operationRef=OP5"));
    }

    #[test]
    fn update_success_reverts_to_create_on_bare_path() {
        let transport = ScriptedTransport::new();
        transport.respond(200, &json!({"success": true, "data": {"operationRef": "OP5"}}));
        transport.respond(200, &json!({"success": true}));
        let mut session = update_page("OP5");
        let client = client(&transport);
        session.mount(&client);
        assert_eq!(session.location(), "/forms/ops-ofd-003?operationRef=OP5&mode=update");

        assert!(session.submit(&client));
        assert_eq!(session.mode(), Mode::Create);
        assert_eq!(session.location(), "/forms/ops-ofd-003");
        assert_eq!(session.record().operation_ref, "");
        assert_eq!(session.query(), &PageQuery::default());
    }

    #[test]
    fn transport_failure_shows_connect_sentence() {
        let transport = ScriptedTransport::new();
        transport.fail(TransportError::Network("TypeError: Failed to fetch".into()));
        let mut session = create_page(Some("OP1"));
        let client = client(&transport);
        session.mount(&client);

        assert!(!session.submit(&client));
        assert_eq!(
            session.error_message(),
            Some("Unable to connect to server. Please check your internet connection and try again.")
        );
        assert_eq!(session.success_message(), None);
    }

    #[test]
    fn success_false_in_2xx_is_a_failure() {
        let transport = ScriptedTransport::new();
        transport.respond(200, &json!({"success": false, "message": "Operation reference is missing"}));
        let mut session = create_page(Some("OP1"));
        let client = client(&transport);
        session.mount(&client);

        assert!(!session.submit(&client));
        assert_eq!(session.error_message(), Some("Operation reference is missing"));
    }
}
