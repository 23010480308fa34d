//! Contract types shared between the desktop window manager and its collaborators.
//!
//! The window manager only reads installed applications and cosmetic settings through the
//! narrow traits defined here. Concrete catalog and settings adapters live in
//! `platform_host`; the core runtime lives in `desktop_runtime`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod settings;

use serde::{Deserialize, Serialize};

pub use settings::{
    AccentColor, ClockFormat, FontSize, IconSize, ParticleIntensity, SettingsSource,
    ShellSettings, TaskbarHeight, UiTransparency, WindowBorderGlow,
};

/// Identifier of the settings surface. It never becomes a managed window.
pub const SETTINGS_APP_ID: &str = "settings";
/// Content reference of the settings surface.
pub const SETTINGS_TARGET: &str = "internal://settings";
/// Scheme prefix reserved for shell-internal surfaces.
pub const INTERNAL_SCHEME: &str = "internal://";

/// Stable identifier for an installed application.
///
/// One application owns at most one window at a time, so this is also the window identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Returns an app identifier when `raw` is a non-empty token without whitespace.
    pub fn new(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(format!(
                "invalid application id `{raw}`; expected 1-120 printable characters without whitespace"
            ))
        }
    }

    /// Creates an id without validation for trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the reserved settings-surface id.
    pub fn settings() -> Self {
        Self::trusted(SETTINGS_APP_ID)
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id routes to the settings overlay instead of a window.
    pub fn is_settings_surface(&self) -> bool {
        self.0 == SETTINGS_APP_ID
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_valid_application_id(raw: &str) -> bool {
    !raw.is_empty()
        && raw.len() <= 120
        && raw
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control())
}

/// A launchable application as reported by the application catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEntry {
    /// Application id.
    pub id: ApplicationId,
    /// Display name used for icons, taskbar buttons and window titles.
    pub name: String,
    /// Opaque content reference hosted by the window (usually a URL).
    #[serde(rename = "url")]
    pub target: String,
}

impl AppEntry {
    /// Creates an entry.
    pub fn new(id: ApplicationId, name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            target: target.into(),
        }
    }

    /// The built-in settings surface entry.
    pub fn settings_surface() -> Self {
        Self::new(ApplicationId::settings(), "Settings", SETTINGS_TARGET)
    }
}

/// Change notifications published by the application catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogEvent {
    /// A new application shortcut was installed.
    Installed(AppEntry),
    /// An application was removed; any open window for it must close.
    Removed(ApplicationId),
}

/// Read access to the currently installed applications.
pub trait AppCatalog {
    /// Returns installed applications in install order.
    fn installed_apps(&self) -> Vec<AppEntry>;

    /// Looks up one installed application.
    fn find_app(&self, app_id: &ApplicationId) -> Option<AppEntry> {
        self.installed_apps()
            .into_iter()
            .find(|entry| &entry.id == app_id)
    }

    /// Whether `app_id` is currently installed.
    fn is_installed(&self, app_id: &ApplicationId) -> bool {
        self.find_app(app_id).is_some()
    }
}

impl AppCatalog for [AppEntry] {
    fn installed_apps(&self) -> Vec<AppEntry> {
        self.to_vec()
    }
}

impl AppCatalog for Vec<AppEntry> {
    fn installed_apps(&self) -> Vec<AppEntry> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn application_id_rejects_blank_and_whitespace() {
        assert!(ApplicationId::new("mail").is_ok());
        assert!(ApplicationId::new("app-1712000000000-x1y2z").is_ok());
        assert!(ApplicationId::new("").is_err());
        assert!(ApplicationId::new("two words").is_err());
        assert!(ApplicationId::new("tab\tseparated").is_err());
        assert!(ApplicationId::new("x".repeat(121)).is_err());
    }

    #[test]
    fn settings_surface_is_recognized_by_id() {
        assert!(ApplicationId::settings().is_settings_surface());
        assert!(!ApplicationId::trusted("mail").is_settings_surface());
        assert_eq!(AppEntry::settings_surface().target, SETTINGS_TARGET);
    }

    #[test]
    fn catalog_lookup_uses_installed_list() {
        let apps = vec![
            AppEntry::new(ApplicationId::trusted("mail"), "Mail", "https://mail.example"),
            AppEntry::new(ApplicationId::trusted("docs"), "Docs", "https://docs.example"),
        ];
        let docs = apps.find_app(&ApplicationId::trusted("docs")).expect("docs");
        assert_eq!(docs.name, "Docs");
        assert!(!apps.is_installed(&ApplicationId::trusted("chat")));
    }

    #[test]
    fn app_entry_serializes_target_as_url() {
        let entry = AppEntry::new(ApplicationId::trusted("mail"), "Mail", "https://mail.example");
        let raw = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(raw["url"], "https://mail.example");
        assert_eq!(raw["id"], "mail");
    }
}
