//! UI state controller for the phonebook front end
//!
//! Holds the contact list, the search filter, the form fields and a transient
//! notification. Local state only changes after the server confirms.

use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error};

use super::abort::AbortController;
use super::http::{ClientError, PersonsApi};
use crate::api::types::{PersonBody, PersonResponse};

/// How long a notification stays visible
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    expires_at: Instant,
}

impl Notification {
    fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            expires_at: Instant::now() + NOTIFICATION_TIMEOUT,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// A confirmed-by-the-user deletion waiting to be issued.
///
/// Only [`PhonebookState::request_delete`] creates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    id: String,
    prompt: String,
}

impl PendingDelete {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Confirmation question to show the user
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Tears the view down from another task while a request is in flight
#[derive(Debug, Clone)]
pub struct UnmountHandle {
    mounted: Arc<AtomicBool>,
    load_abort: AbortController,
}

impl UnmountHandle {
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        self.load_abort.abort();
    }
}

#[derive(Debug)]
pub struct PhonebookState<A: PersonsApi> {
    api: Arc<A>,
    persons: Vec<PersonResponse>,
    visible: Vec<PersonResponse>,
    search: String,
    new_name: String,
    new_number: String,
    notification: Option<Notification>,
    mounted: Arc<AtomicBool>,
    load_abort: AbortController,
}

impl<A: PersonsApi> PhonebookState<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            persons: Vec::new(),
            visible: Vec::new(),
            search: String::new(),
            new_name: String::new(),
            new_number: String::new(),
            notification: None,
            mounted: Arc::new(AtomicBool::new(true)),
            load_abort: AbortController::new(),
        }
    }

    // Accessors

    pub fn persons(&self) -> &[PersonResponse] {
        &self.persons
    }

    /// Persons matching the search filter
    pub fn visible(&self) -> &[PersonResponse] {
        &self.visible
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn new_name(&self) -> &str {
        &self.new_name
    }

    pub fn new_number(&self) -> &str {
        &self.new_number
    }

    /// The current notification, if it has not expired
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| !n.is_expired())
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn unmount_handle(&self) -> UnmountHandle {
        UnmountHandle {
            mounted: self.mounted.clone(),
            load_abort: self.load_abort.clone(),
        }
    }

    /// Stop applying results and abort the initial fetch
    pub fn unmount(&self) {
        self.unmount_handle().unmount();
    }

    // Inputs

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.refresh_visible();
    }

    pub fn set_new_name(&mut self, name: impl Into<String>) {
        self.new_name = name.into();
    }

    pub fn set_new_number(&mut self, number: impl Into<String>) {
        self.new_number = number.into();
    }

    /// Drop the notification once its time is up
    pub fn clear_expired_notification(&mut self) {
        if self.notification.as_ref().is_some_and(Notification::is_expired) {
            self.notification = None;
        }
    }

    // Actions

    /// Initial fetch of all persons
    pub async fn load(&mut self) {
        let result = self.api.get_all(Some(self.load_abort.signal())).await;

        if !self.is_mounted() {
            debug!("Discarding person list, view is unmounted");
            return;
        }

        match result {
            Ok(persons) => {
                self.persons = persons;
                self.refresh_visible();
            }
            Err(ClientError::Aborted) => debug!("Person list load aborted"),
            Err(e) => {
                error!(error = %e, "Failed to load persons");
                self.notify(NotificationKind::Error, "Failed to load persons");
            }
        }
    }

    /// Update the number of an existing person with the typed name, or create a new one
    pub async fn submit(&mut self) {
        let existing = self
            .persons
            .iter()
            .find(|p| p.name == self.new_name)
            .map(|p| (p.id.clone(), p.name.clone()));

        match existing {
            Some((id, name)) => {
                let body = PersonBody::new(name, self.new_number.clone());
                let result = self.api.update(&id, &body).await;

                if !self.is_mounted() {
                    return;
                }

                match result {
                    Ok(updated) => {
                        if let Some(slot) = self.persons.iter_mut().find(|p| p.id == id) {
                            *slot = updated;
                        }
                        self.refresh_visible();
                        self.clear_form();
                        self.notify(NotificationKind::Success, "person updated");
                    }
                    Err(e) => {
                        error!(error = %e, id = %id, "Failed to update person");
                        self.notify(NotificationKind::Error, "failed to update person");
                    }
                }
            }
            None => {
                let body = PersonBody::new(self.new_name.clone(), self.new_number.clone());
                let result = self.api.create(&body).await;

                if !self.is_mounted() {
                    return;
                }

                match result {
                    Ok(created) => {
                        self.persons.push(created);
                        self.refresh_visible();
                        self.clear_form();
                        self.notify(NotificationKind::Success, "person created");
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to create person");
                        self.notify(NotificationKind::Error, "failed to create new person");
                    }
                }
            }
        }
    }

    /// Start a deletion. `None` when no listed person has this id.
    pub fn request_delete(&self, id: &str) -> Option<PendingDelete> {
        self.persons
            .iter()
            .find(|p| p.id == id)
            .map(|p| PendingDelete {
                id: p.id.clone(),
                prompt: format!("Delete {}?", p.name),
            })
    }

    /// Issue a deletion the user confirmed
    pub async fn confirm_delete(&mut self, pending: PendingDelete) {
        let result = self.api.delete(&pending.id).await;

        if !self.is_mounted() {
            return;
        }

        match result {
            Ok(()) => {
                self.persons.retain(|p| p.id != pending.id);
                self.refresh_visible();
                self.notify(
                    NotificationKind::Info,
                    format!("person with ID: {} deleted successfully", pending.id),
                );
            }
            Err(e) => {
                error!(error = %e, id = %pending.id, "Failed to delete person");
                self.notify(
                    NotificationKind::Error,
                    format!("failed to delete person with ID: {}", pending.id),
                );
            }
        }
    }

    /// Plain-text rendering of the view
    pub fn render(&self) -> String {
        let mut out = String::from("Phonebook\n");

        if let Some(notification) = self.notification() {
            let tag = match notification.kind {
                NotificationKind::Info => "info",
                NotificationKind::Success => "ok",
                NotificationKind::Error => "error",
            };
            let _ = writeln!(out, "[{}] {}", tag, notification.message);
        }

        if !self.search.trim().is_empty() {
            let _ = writeln!(out, "filter: {}", self.search.trim());
        }

        out.push_str("Numbers\n");

        if self.visible.is_empty() {
            out.push_str("  (none)\n");
        }

        for person in &self.visible {
            let _ = writeln!(out, "  {} {}  [{}]", person.name, person.number, person.id);
        }

        out
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notification = Some(Notification::new(kind, message));
    }

    fn clear_form(&mut self) {
        self.new_name.clear();
        self.new_number.clear();
    }

    fn refresh_visible(&mut self) {
        let term = self.search.trim().to_lowercase();

        self.visible = if term.is_empty() {
            self.persons.clone()
        } else {
            self.persons
                .iter()
                .filter(|p| p.name.to_lowercase().contains(&term))
                .cloned()
                .collect()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::http::mock::MockPersonsApi;

    fn state(api: MockPersonsApi) -> (Arc<MockPersonsApi>, PhonebookState<MockPersonsApi>) {
        let api = Arc::new(api);
        (api.clone(), PhonebookState::new(api))
    }

    fn names(persons: &[PersonResponse]) -> Vec<&str> {
        persons.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_load() {
        let (_, mut state) = state(
            MockPersonsApi::new()
                .with_person("Ada Lovelace", "212-555-0192")
                .with_person("Grace Hopper", "313-555-0100"),
        );

        state.load().await;

        assert_eq!(names(state.visible()), vec!["Ada Lovelace", "Grace Hopper"]);
        assert!(state.notification().is_none());
    }

    #[tokio::test]
    async fn test_load_failure_notifies() {
        let (_, mut state) = state(MockPersonsApi::new().failing());

        state.load().await;

        let notification = state.notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, "Failed to load persons");
        assert!(state.persons().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_during_load_discards_result() {
        let (_, mut state) = state(
            MockPersonsApi::new()
                .with_person("Ada Lovelace", "212-555-0192")
                .with_list_delay(Duration::from_secs(1)),
        );
        let handle = state.unmount_handle();

        tokio::join!(state.load(), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            handle.unmount();
        });

        assert!(!state.is_mounted());
        assert!(state.persons().is_empty());
        assert!(state.notification().is_none());
    }

    #[tokio::test]
    async fn test_filter_is_case_insensitive_and_trimmed() {
        let (_, mut state) = state(
            MockPersonsApi::new()
                .with_person("Ann Smith", "212-555-0101")
                .with_person("Hannah", "212-555-0102")
                .with_person("Bob", "212-555-0103"),
        );
        state.load().await;

        state.set_search("  ANN ");
        assert_eq!(names(state.visible()), vec!["Ann Smith", "Hannah"]);

        state.set_search("");
        assert_eq!(state.visible().len(), 3);
    }

    #[tokio::test]
    async fn test_submit_creates_new_person() {
        let (api, mut state) = state(MockPersonsApi::new());
        state.load().await;
        state.set_search("ada");

        state.set_new_name("Ada Lovelace");
        state.set_new_number("212-555-0192");
        state.submit().await;

        assert_eq!(names(state.visible()), vec!["Ada Lovelace"]);
        assert_eq!(api.persons().len(), 1);
        assert_eq!(state.new_name(), "");
        assert_eq!(state.new_number(), "");

        let notification = state.notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Success);
        assert_eq!(notification.message, "person created");
    }

    #[tokio::test]
    async fn test_submit_existing_name_updates_number() {
        let (api, mut state) = state(MockPersonsApi::new().with_person("Ada Lovelace", "212-555-0192"));
        state.load().await;

        state.set_new_name("Ada Lovelace");
        state.set_new_number("313-555-0100");
        state.submit().await;

        assert_eq!(state.persons().len(), 1);
        assert_eq!(state.persons()[0].number, "313-555-0100");
        assert_eq!(api.persons()[0].number, "313-555-0100");
        assert_eq!(state.notification().unwrap().message, "person updated");
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_form() {
        let (_, mut state) = state(MockPersonsApi::new().failing());

        state.set_new_name("Ada Lovelace");
        state.set_new_number("212-555-0192");
        state.submit().await;

        assert!(state.persons().is_empty());
        assert_eq!(state.new_name(), "Ada Lovelace");
        assert_eq!(state.new_number(), "212-555-0192");

        let notification = state.notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, "failed to create new person");
    }

    #[tokio::test]
    async fn test_delete_requires_pending_confirmation() {
        let (api, mut state) = state(MockPersonsApi::new().with_person("Ada Lovelace", "212-555-0192"));
        state.load().await;
        let id = state.persons()[0].id.clone();
        let calls_before = api.calls();

        let pending = state.request_delete(&id).unwrap();
        assert_eq!(pending.prompt(), "Delete Ada Lovelace?");
        assert_eq!(api.calls(), calls_before);

        state.confirm_delete(pending).await;

        assert!(state.persons().is_empty());
        let notification = state.notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Info);
        assert_eq!(
            notification.message,
            format!("person with ID: {} deleted successfully", id)
        );
    }

    #[tokio::test]
    async fn test_request_delete_unknown_id() {
        let (_, state) = state(MockPersonsApi::new());

        assert!(state.request_delete("missing").is_none());
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_person() {
        let (_, mut state) = state(MockPersonsApi::new().with_person("Ada Lovelace", "212-555-0192"));
        state.load().await;
        let id = state.persons()[0].id.clone();
        let pending = state.request_delete(&id).unwrap();

        // Someone else removed it first
        let _ = state.api.delete(&id).await;
        state.confirm_delete(pending).await;

        assert_eq!(state.persons().len(), 1);
        assert_eq!(
            state.notification().unwrap().message,
            format!("failed to delete person with ID: {}", id)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_expires_after_timeout() {
        let (_, mut state) = state(MockPersonsApi::new());
        state.set_new_name("Ada Lovelace");
        state.set_new_number("212-555-0192");
        state.submit().await;

        tokio::time::advance(Duration::from_millis(2900)).await;
        assert!(state.notification().is_some());

        tokio::time::advance(Duration::from_millis(200)).await;
        assert!(state.notification().is_none());

        state.clear_expired_notification();
        assert!(!state.render().contains("person created"));
    }

    #[tokio::test]
    async fn test_render() {
        let (_, mut state) = state(MockPersonsApi::new().with_person("Ada Lovelace", "212-555-0192"));
        state.load().await;
        state.set_search("grace");

        let view = state.render();
        assert!(view.contains("filter: grace"));
        assert!(view.contains("(none)"));

        state.set_search("");
        assert!(state.render().contains("Ada Lovelace 212-555-0192"));
    }
}
