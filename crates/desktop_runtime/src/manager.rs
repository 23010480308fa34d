//! Owned window-manager controller.
//!
//! [`WindowManager`] is the single writer of the window registry and stack counter. Every
//! command runs [`reduce_desktop`] to completion, rebuilds the [`DesktopSnapshot`], and
//! notifies subscribers only when that snapshot changed. Independent managers share nothing,
//! so several desktops (or tests) can coexist.

use desktop_app_contract::{AppCatalog, AppEntry, ApplicationId, CatalogEvent, ShellSettings};
use leptos::logging;

use crate::{
    model::{
        DesktopSnapshot, DesktopState, InteractionState, OpenWindowRequest, PointerPosition,
        Viewport, WindowHandle,
    },
    reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect},
};

/// Handle returned by [`WindowManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type SnapshotListener = Box<dyn FnMut(&DesktopSnapshot)>;

/// Owns one desktop's windows and publishes a snapshot after every settled command.
pub struct WindowManager {
    state: DesktopState,
    interaction: InteractionState,
    snapshot: DesktopSnapshot,
    listeners: Vec<(SubscriptionId, SnapshotListener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("state", &self.state)
            .field("interaction", &self.interaction)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl WindowManager {
    /// Empty desktop with the default taskbar band.
    pub fn new(viewport: Viewport) -> Self {
        let state = DesktopState::new(viewport);
        let snapshot = state.snapshot();
        Self {
            state,
            interaction: InteractionState::default(),
            snapshot,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Builds a manager with `settings` already applied.
    pub fn with_settings(viewport: Viewport, settings: &ShellSettings) -> Self {
        let mut manager = Self::new(viewport);
        if let Err(err) = manager.apply_settings(settings) {
            logging::warn!("initial settings were not applied: {err}");
        }
        manager
    }

    /// Runs one command to completion and publishes the resulting snapshot.
    ///
    /// # Errors
    ///
    /// Propagates [`ReducerError`]; state is unchanged and nobody is notified in that case.
    pub fn dispatch(
        &mut self,
        action: DesktopAction,
    ) -> Result<Vec<RuntimeEffect>, ReducerError> {
        match reduce_desktop(&mut self.state, &mut self.interaction, action) {
            Ok(effects) => {
                self.publish();
                Ok(effects)
            }
            Err(err) => {
                logging::warn!("window manager command rejected: {err}");
                Err(err)
            }
        }
    }

    fn publish(&mut self) {
        let next = self.state.snapshot();
        if next == self.snapshot {
            return;
        }
        self.snapshot = next;
        for (_, listener) in &mut self.listeners {
            listener(&self.snapshot);
        }
    }

    /// Registers `listener` to receive every changed snapshot.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&DesktopSnapshot) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Latest settled snapshot.
    pub fn snapshot(&self) -> &DesktopSnapshot {
        &self.snapshot
    }

    /// Live state, for read-only queries.
    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    /// Drag or resize session in progress, if any.
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Handle for `app_id`, minimized or not.
    pub fn window(&self, app_id: &ApplicationId) -> Option<&WindowHandle> {
        self.state.windows.get(app_id)
    }

    /// Focused window: the visible handle with the greatest stack order.
    pub fn topmost(&self) -> Option<&WindowHandle> {
        self.state.topmost()
    }

    /// Opens a window, or focuses and restores the one already open for the same app.
    pub fn open(
        &mut self,
        request: OpenWindowRequest,
    ) -> Result<Vec<RuntimeEffect>, ReducerError> {
        self.dispatch(DesktopAction::OpenWindow(request))
    }

    /// [`WindowManager::open`] using the entry's name and target.
    pub fn open_app(&mut self, entry: &AppEntry) -> Result<Vec<RuntimeEffect>, ReducerError> {
        self.open(OpenWindowRequest::from(entry))
    }

    /// Raises `app_id` to the top and clears its minimized flag.
    pub fn focus(&mut self, app_id: &ApplicationId) -> Result<Vec<RuntimeEffect>, ReducerError> {
        self.dispatch(DesktopAction::FocusWindow {
            app_id: app_id.clone(),
        })
    }

    /// Hides `app_id` from the desktop; it stays in the taskbar.
    pub fn minimize(&mut self, app_id: &ApplicationId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::MinimizeWindow {
            app_id: app_id.clone(),
        })
        .map(drop)
    }

    /// Taskbar click: focus when minimized, minimize otherwise.
    pub fn toggle_minimize(
        &mut self,
        app_id: &ApplicationId,
    ) -> Result<Vec<RuntimeEffect>, ReducerError> {
        self.dispatch(DesktopAction::ToggleMinimize {
            app_id: app_id.clone(),
        })
    }

    /// Destroys the window for `app_id`.
    pub fn close(&mut self, app_id: &ApplicationId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::CloseWindow {
            app_id: app_id.clone(),
        })
        .map(drop)
    }

    /// Enters or leaves the maximized state.
    pub fn toggle_maximize(
        &mut self,
        app_id: &ApplicationId,
    ) -> Result<Vec<RuntimeEffect>, ReducerError> {
        self.dispatch(DesktopAction::ToggleMaximize {
            app_id: app_id.clone(),
        })
    }

    /// Title-bar pointer-down. Focuses the window and starts a drag session.
    pub fn begin_drag(
        &mut self,
        app_id: &ApplicationId,
        pointer: PointerPosition,
    ) -> Result<Vec<RuntimeEffect>, ReducerError> {
        self.dispatch(DesktopAction::BeginMove {
            app_id: app_id.clone(),
            pointer,
        })
    }

    /// Moves the dragged window to follow `pointer`.
    pub fn drag_to(&mut self, pointer: PointerPosition) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::UpdateMove { pointer }).map(drop)
    }

    /// Pointer-up ending a drag.
    pub fn end_drag(&mut self) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::EndMove).map(drop)
    }

    /// Resize-handle pointer-down. Focuses the window and starts a resize session.
    pub fn begin_resize(
        &mut self,
        app_id: &ApplicationId,
        pointer: PointerPosition,
    ) -> Result<Vec<RuntimeEffect>, ReducerError> {
        self.dispatch(DesktopAction::BeginResize {
            app_id: app_id.clone(),
            pointer,
        })
    }

    /// Resizes the window under interaction to follow `pointer`.
    pub fn resize_to(&mut self, pointer: PointerPosition) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::UpdateResize { pointer }).map(drop)
    }

    /// Pointer-up ending a resize.
    pub fn end_resize(&mut self) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::EndResize).map(drop)
    }

    /// Drops any drag or resize in progress. Hosts call this on blur and on pointer-down
    /// outside a window.
    pub fn release_interaction(&mut self) {
        if let Err(err) = self.dispatch(DesktopAction::ReleaseInteraction) {
            logging::warn!("interaction release failed: {err}");
        }
    }

    /// Host resize; maximized windows refill the area and others stay reachable.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::SetViewport { viewport }).map(drop)
    }

    /// Applies the taskbar band and window chrome from `settings`.
    pub fn apply_settings(&mut self, settings: &ShellSettings) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::ApplySettings {
            settings: settings.clone(),
        })
        .map(drop)
    }

    /// Dismisses the settings overlay.
    pub fn close_settings_overlay(&mut self) {
        if let Err(err) = self.dispatch(DesktopAction::CloseSettingsOverlay) {
            logging::warn!("settings overlay close failed: {err}");
        }
    }

    /// Reacts to an application catalog notification.
    pub fn handle_catalog_event(&mut self, event: &CatalogEvent) -> Result<(), ReducerError> {
        match event {
            CatalogEvent::Installed(_) => Ok(()),
            CatalogEvent::Removed(app_id) => self
                .dispatch(DesktopAction::AppRemoved {
                    app_id: app_id.clone(),
                })
                .map(drop),
        }
    }

    /// Closes every window whose application is no longer installed.
    ///
    /// Built-in surfaces never own windows, so only catalog membership matters here.
    pub fn sync_with_catalog(&mut self, catalog: &dyn AppCatalog) -> Result<(), ReducerError> {
        let installed = catalog.installed_apps();
        for app_id in self.state.windows.ids() {
            if !installed.iter().any(|entry| entry.id == app_id) {
                self.dispatch(DesktopAction::AppRemoved { app_id })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;

    fn mail() -> AppEntry {
        AppEntry::new(ApplicationId::trusted("mail"), "Mail", "https://mail.example")
    }

    #[test]
    fn subscribers_see_changed_snapshots_only() {
        let mut manager = WindowManager::new(Viewport::new(1920, 1080));
        let seen = Rc::new(RefCell::new(Vec::<DesktopSnapshot>::new()));
        let sink = Rc::clone(&seen);
        manager.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.clone()));

        manager.open_app(&mail()).expect("open");
        manager.end_drag().expect("idle end");
        manager.release_interaction();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].desktop.len(), 1);
        assert_eq!(seen[0].topmost, Some(ApplicationId::trusted("mail")));
    }

    #[test]
    fn rejected_commands_do_not_notify() {
        let mut manager = WindowManager::new(Viewport::new(1920, 1080));
        let calls = Rc::new(RefCell::new(0usize));
        let counter = Rc::clone(&calls);
        manager.subscribe(move |_| *counter.borrow_mut() += 1);

        let ghost = ApplicationId::trusted("ghost");
        assert_eq!(
            manager.close(&ghost),
            Err(ReducerError::WindowNotFound(ghost))
        );
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut manager = WindowManager::new(Viewport::new(1920, 1080));
        let calls = Rc::new(RefCell::new(0usize));
        let counter = Rc::clone(&calls);
        let subscription = manager.subscribe(move |_| *counter.borrow_mut() += 1);

        assert!(manager.unsubscribe(subscription));
        assert!(!manager.unsubscribe(subscription));
        manager.open_app(&mail()).expect("open");
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn independent_managers_do_not_share_counters() {
        let mut left = WindowManager::new(Viewport::new(1920, 1080));
        let mut right = WindowManager::new(Viewport::new(1920, 1080));
        left.open_app(&mail()).expect("open left");
        left.focus(&mail().id).expect("focus left");
        right.open_app(&mail()).expect("open right");

        let left_order = left.window(&mail().id).unwrap().stack_order;
        let right_order = right.window(&mail().id).unwrap().stack_order;
        assert!(left_order > right_order);
        assert_eq!(right.snapshot().taskbar.len(), 1);
    }

    #[test]
    fn sync_with_catalog_closes_uninstalled_apps() {
        let mut manager = WindowManager::new(Viewport::new(1920, 1080));
        let docs = AppEntry::new(ApplicationId::trusted("docs"), "Docs", "https://docs.example");
        manager.open_app(&mail()).expect("open mail");
        manager.open_app(&docs).expect("open docs");

        manager.sync_with_catalog(&vec![docs.clone()]).expect("sync");
        assert!(manager.window(&mail().id).is_none());
        assert!(manager.window(&docs.id).is_some());
    }

    #[test]
    fn with_settings_applies_taskbar_band() {
        let settings = ShellSettings {
            taskbar_height: desktop_app_contract::TaskbarHeight::Compact,
            ..ShellSettings::default()
        };
        let manager = WindowManager::with_settings(Viewport::new(1280, 720), &settings);
        assert_eq!(manager.state().taskbar_band_px, 44);
        assert_eq!(manager.state().desktop_area(), Viewport::new(1280, 676));
    }
}
