//! Desktop session wiring the window manager to its persisted collaborators.
//!
//! [`DesktopSession`] owns the [`WindowManager`] together with the app catalog and settings
//! services so that catalog removals and settings changes reach the window manager in the
//! same call that persists them.

use desktop_app_contract::{AppEntry, ApplicationId, ShellSettings};
use leptos::logging;
use platform_host::{
    AppCatalogService, CatalogError, Clock, PinGate, PrefsStore, SettingsError, SettingsService,
    SystemClock,
};
use thiserror::Error;

use crate::{
    apps::{desktop_icons, resolve_app, DesktopIcon},
    manager::WindowManager,
    model::Viewport,
    reducer::{ReducerError, RuntimeEffect},
};

/// Failure surfaced by a [`DesktopSession`] operation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no installed application with id `{0}`")]
    UnknownApp(ApplicationId),
    #[error("built-in application `{0}` cannot be removed")]
    BuiltIn(ApplicationId),
    #[error(transparent)]
    Window(#[from] ReducerError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// One running desktop: window manager plus the catalog and settings it reacts to.
pub struct DesktopSession<S> {
    manager: WindowManager,
    catalog: AppCatalogService<S>,
    settings: SettingsService<S>,
}

impl<S: PrefsStore + Clone> DesktopSession<S> {
    /// Loads persisted settings and apps from `store` and builds the window manager.
    pub async fn boot(store: S, viewport: Viewport, gate: PinGate) -> Self {
        Self::boot_with_clock(store, viewport, gate, Box::new(SystemClock)).await
    }

    /// Same as [`DesktopSession::boot`] with a custom clock for minting app ids.
    pub async fn boot_with_clock(
        store: S,
        viewport: Viewport,
        gate: PinGate,
        clock: Box<dyn Clock>,
    ) -> Self {
        let settings = SettingsService::load(store.clone(), gate).await;
        let catalog = AppCatalogService::load_with_clock(store, clock).await;
        let manager = WindowManager::with_settings(viewport, settings.current());
        logging::log!(
            "desktop session booted with {} installed apps",
            catalog.entries().len()
        );
        Self {
            manager,
            catalog,
            settings,
        }
    }
}

impl<S: PrefsStore> DesktopSession<S> {
    /// Window manager driving this session.
    pub fn manager(&self) -> &WindowManager {
        &self.manager
    }

    /// Mutable access for pointer and window commands that bypass the catalog.
    pub fn manager_mut(&mut self) -> &mut WindowManager {
        &mut self.manager
    }

    /// Installed application catalog.
    pub fn catalog(&self) -> &AppCatalogService<S> {
        &self.catalog
    }

    /// Settings currently in effect.
    pub fn settings(&self) -> &ShellSettings {
        self.settings.current()
    }

    /// Icon grid for the current catalog and window state.
    pub fn desktop_icons(&self) -> Vec<DesktopIcon> {
        desktop_icons(&self.catalog, self.manager.state())
    }

    /// Opens (or focuses) the window for `app_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownApp`] when the id is neither built-in nor installed.
    pub fn launch(&mut self, app_id: &ApplicationId) -> Result<Vec<RuntimeEffect>, SessionError> {
        let entry = resolve_app(&self.catalog, app_id)
            .ok_or_else(|| SessionError::UnknownApp(app_id.clone()))?;
        Ok(self.manager.open_app(&entry)?)
    }

    /// Installs a shortcut from user input and returns the stored entry.
    pub async fn install_app(&mut self, name: &str, url: &str) -> Result<AppEntry, SessionError> {
        let entry = self.catalog.add_app(name, url).await?;
        logging::log!("installed app `{}`", entry.id);
        Ok(entry)
    }

    /// Uninstalls `app_id` and closes its window if one is open.
    pub async fn remove_app(&mut self, app_id: &ApplicationId) -> Result<(), SessionError> {
        if app_id.is_settings_surface() {
            return Err(SessionError::BuiltIn(app_id.clone()));
        }
        let event = self.catalog.remove_app(app_id).await?;
        self.manager.handle_catalog_event(&event)?;
        Ok(())
    }

    /// Persists `next` and applies its layout and chrome fields to the desktop.
    ///
    /// # Errors
    ///
    /// Nothing is applied when the PIN gate or the store refuses the change.
    pub async fn update_settings(
        &mut self,
        next: ShellSettings,
        pin: Option<&str>,
    ) -> Result<(), SessionError> {
        self.settings.save(next, pin).await?;
        self.manager.apply_settings(self.settings.current())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::TaskbarHeight;
    use futures::executor::block_on;
    use platform_host::{ManualClock, MemoryPrefsStore, APPS_PREFS_KEY};
    use pretty_assertions::assert_eq;

    use super::*;

    const PIN: &str = "2011";

    fn boot(store: MemoryPrefsStore) -> DesktopSession<MemoryPrefsStore> {
        block_on(DesktopSession::boot_with_clock(
            store,
            Viewport::new(1920, 1080),
            PinGate::new(PIN),
            Box::new(ManualClock::starting_at(1_700_000_000_000)),
        ))
    }

    #[test]
    fn boot_restores_installed_apps() {
        let store = MemoryPrefsStore::default();
        store.seed(
            APPS_PREFS_KEY,
            r#"[{"id":"mail","name":"Mail","url":"https://mail.example"}]"#,
        );
        let session = boot(store);

        let ids: Vec<_> = session
            .desktop_icons()
            .into_iter()
            .map(|icon| icon.entry.id.to_string())
            .collect();
        assert_eq!(ids, vec!["settings".to_string(), "mail".to_string()]);
    }

    #[test]
    fn launch_opens_catalog_app_and_routes_settings_to_overlay() {
        let store = MemoryPrefsStore::default();
        store.seed(
            APPS_PREFS_KEY,
            r#"[{"id":"mail","name":"Mail","url":"https://mail.example"}]"#,
        );
        let mut session = boot(store);

        session
            .launch(&ApplicationId::trusted("mail"))
            .expect("launch mail");
        assert_eq!(
            session.manager().topmost().map(|w| w.title.as_str()),
            Some("Mail")
        );

        let effects = session
            .launch(&ApplicationId::settings())
            .expect("launch settings");
        assert_eq!(effects, vec![RuntimeEffect::ShowSettingsOverlay]);
        assert!(session.manager().snapshot().settings_overlay_open);
        assert!(session.manager().window(&ApplicationId::settings()).is_none());
    }

    #[test]
    fn launch_unknown_app_fails() {
        let mut session = boot(MemoryPrefsStore::default());
        let err = session
            .launch(&ApplicationId::trusted("ghost"))
            .expect_err("unknown app");
        assert!(matches!(err, SessionError::UnknownApp(id) if id.as_str() == "ghost"));
    }

    #[test]
    fn removing_an_app_closes_its_window() {
        let mut session = boot(MemoryPrefsStore::default());
        let entry = block_on(session.install_app("Docs", "docs.example")).expect("install");
        session.launch(&entry.id).expect("launch");
        assert!(session.manager().window(&entry.id).is_some());

        block_on(session.remove_app(&entry.id)).expect("remove");
        assert!(session.manager().window(&entry.id).is_none());
        assert!(session.catalog().entries().is_empty());
        assert!(session.manager().topmost().is_none());
    }

    #[test]
    fn settings_surface_cannot_be_removed() {
        let mut session = boot(MemoryPrefsStore::default());
        let err = block_on(session.remove_app(&ApplicationId::settings())).expect_err("built-in");
        assert!(matches!(err, SessionError::BuiltIn(_)));
    }

    #[test]
    fn settings_update_reaches_the_desktop_and_respects_the_pin() {
        let mut session = boot(MemoryPrefsStore::default());

        let taller = ShellSettings {
            taskbar_height: TaskbarHeight::Tall,
            ..session.settings().clone()
        };
        block_on(session.update_settings(taller, None)).expect("no pin needed");
        assert_eq!(
            session.manager().state().taskbar_band_px,
            TaskbarHeight::Tall.band_px()
        );

        let rewallpapered = ShellSettings {
            wallpaper_url: "https://example.com/wall.png".to_string(),
            ..session.settings().clone()
        };
        let err = block_on(session.update_settings(rewallpapered.clone(), Some("0000")))
            .expect_err("wrong pin");
        assert!(matches!(err, SessionError::Settings(SettingsError::PinRejected)));

        block_on(session.update_settings(rewallpapered, Some(PIN))).expect("right pin");
        assert_eq!(session.settings().wallpaper_url, "https://example.com/wall.png");
    }
}
