//! Phonebook client: typed HTTP calls and the UI state controller

mod abort;
mod http;
mod state;

pub use abort::{AbortController, AbortSignal};
pub use http::{ClientError, PersonsApi, PhonebookClient};
pub use state::{
    NOTIFICATION_TIMEOUT, Notification, NotificationKind, PendingDelete, PhonebookState,
    UnmountHandle,
};
