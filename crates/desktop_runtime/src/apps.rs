//! Launchable applications shown as desktop icons.

use desktop_app_contract::{AppCatalog, AppEntry, ApplicationId};

use crate::model::DesktopState;

/// One launchable app on the desktop, annotated with its window state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopIcon {
    pub entry: AppEntry,
    pub built_in: bool,
    /// Open and visible on the desktop surface.
    pub is_open: bool,
    pub is_minimized: bool,
}

impl DesktopIcon {
    /// Built-ins cannot be uninstalled from the desktop.
    pub fn removable(&self) -> bool {
        !self.built_in
    }
}

/// Apps shipped with the shell, listed before catalog apps.
pub fn built_in_apps() -> Vec<AppEntry> {
    vec![AppEntry::settings_surface()]
}

/// Resolves `app_id` against the built-ins first, then the catalog.
pub fn resolve_app(catalog: &dyn AppCatalog, app_id: &ApplicationId) -> Option<AppEntry> {
    built_in_apps()
        .into_iter()
        .find(|entry| &entry.id == app_id)
        .or_else(|| catalog.find_app(app_id))
}

/// Desktop icon grid: built-ins followed by installed apps, annotated with window state.
pub fn desktop_icons(catalog: &dyn AppCatalog, state: &DesktopState) -> Vec<DesktopIcon> {
    let built_ins = built_in_apps().into_iter().map(|entry| (entry, true));
    let installed = catalog
        .installed_apps()
        .into_iter()
        .map(|entry| (entry, false));

    built_ins
        .chain(installed)
        .map(|(entry, built_in)| {
            let window = state.windows.get(&entry.id);
            DesktopIcon {
                is_open: window.map(|w| !w.minimized).unwrap_or(false),
                is_minimized: window.map(|w| w.minimized).unwrap_or(false),
                built_in,
                entry,
            }
        })
        .collect()
}
