//! Concrete collaborator adapters for the desktop window manager.
//!
//! The runtime consumes installed applications and shell settings through the traits in
//! `desktop_app_contract`. This crate provides the persisted implementations of those
//! traits on top of a small key/value [`PrefsStore`] contract, plus the PIN gate that guards
//! protected settings changes.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod catalog;
pub mod settings;
pub mod storage;
pub mod time;

pub use catalog::{mint_app_id, normalize_target, AppCatalogService, CatalogError};
pub use settings::{requires_pin, PinGate, SettingsError, SettingsService};
pub use storage::{
    load_typed, save_typed, MemoryPrefsStore, NoopPrefsStore, PrefsStore, PrefsStoreFuture,
    StorageError, APPS_PREFS_KEY, SETTINGS_PREFS_KEY,
};
pub use time::{Clock, ManualClock, SystemClock};
