//! Reducer actions, side-effect intents, and transition logic for the window manager.

use desktop_app_contract::{ApplicationId, ShellSettings};
use leptos::logging;
use thiserror::Error;

use crate::{
    geometry::{
        apply_drag, apply_resize, initial_geometry, maximized_geometry, reachable_geometry,
    },
    model::{
        DesktopState, DragSession, InteractionSession, InteractionState, OpenWindowRequest,
        PointerPosition, ResizeSession, Viewport, WindowChrome, WindowHandle,
    },
    registry::WindowPatch,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window for an application, or focus and restore the one already open.
    OpenWindow(OpenWindowRequest),
    /// Raise a window to the top and clear its minimized flag.
    FocusWindow {
        /// Window to focus.
        app_id: ApplicationId,
    },
    /// Hide a window from the desktop surface, keeping it in the taskbar.
    MinimizeWindow {
        /// Window to minimize.
        app_id: ApplicationId,
    },
    /// Taskbar click: focus when minimized, minimize otherwise.
    ToggleMinimize {
        /// Window associated with the taskbar button.
        app_id: ApplicationId,
    },
    /// Destroy a window.
    CloseWindow {
        /// Window to close.
        app_id: ApplicationId,
    },
    /// Enter or leave the maximized state.
    ToggleMaximize {
        /// Window to maximize or restore.
        app_id: ApplicationId,
    },
    /// Pointer-down on a title bar.
    BeginMove {
        /// Window being dragged.
        app_id: ApplicationId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Pointer-move during a drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Pointer-up ending a drag.
    EndMove,
    /// Pointer-down on the resize handle.
    BeginResize {
        /// Window being resized.
        app_id: ApplicationId,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Pointer-move during a resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Pointer-up ending a resize.
    EndResize,
    /// Drop any drag or resize in progress (blur, foreign pointer-down, lost pointer-up).
    ReleaseInteraction,
    /// Host viewport changed size.
    SetViewport {
        /// New viewport.
        viewport: Viewport,
    },
    /// Settings collaborator published new values.
    ApplySettings {
        /// Settings now in effect.
        settings: ShellSettings,
    },
    /// The application catalog removed an app; its window must not survive.
    AppRemoved {
        /// Removed application.
        app_id: ApplicationId,
    },
    /// Dismiss the settings overlay.
    CloseSettingsOverlay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host to execute.
pub enum RuntimeEffect {
    /// Show the settings overlay outside the windowing model.
    ShowSettingsOverlay,
    /// Move input focus into the embedded content of a freshly focused window.
    FocusWindowContent(ApplicationId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors. State is left untouched whenever one is returned.
pub enum ReducerError {
    /// No open window exists for the application.
    #[error("window `{0}` not found")]
    WindowNotFound(ApplicationId),
    /// The application is hosted outside the window manager.
    #[error("`{0}` is not a managed window")]
    ReservedWindow(ApplicationId),
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// Opening an already-open application focuses and restores it instead of creating a second
/// window. Geometry input is clamped, never rejected.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action names an application without an
/// open window, and [`ReducerError::ReservedWindow`] when a window command targets the
/// settings surface.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            if req.app_id.is_settings_surface() {
                logging::log!("routing `{}` to the settings overlay", req.app_id);
                state.settings_overlay_open = true;
                effects.push(RuntimeEffect::ShowSettingsOverlay);
                return Ok(effects);
            }
            release_stale_interaction(interaction);
            if state.windows.contains(&req.app_id) {
                focus_window_internal(state, &req.app_id)?;
            } else {
                let stack_order = state.stack.next_stack_order();
                let geometry = initial_geometry(stack_order, state.desktop_area());
                state.windows.insert(WindowHandle {
                    id: req.app_id.clone(),
                    title: req.title,
                    target: req.target,
                    geometry,
                    restore_geometry: None,
                    minimized: false,
                    maximized: false,
                    stack_order,
                    opened_order: stack_order,
                });
            }
            effects.push(RuntimeEffect::FocusWindowContent(req.app_id));
        }
        DesktopAction::FocusWindow { app_id } => {
            ensure_managed(&app_id)?;
            state.windows.require(&app_id)?;
            release_stale_interaction(interaction);
            focus_window_internal(state, &app_id)?;
            effects.push(RuntimeEffect::FocusWindowContent(app_id));
        }
        DesktopAction::MinimizeWindow { app_id } => {
            ensure_managed(&app_id)?;
            minimize_window_internal(state, interaction, &app_id)?;
        }
        DesktopAction::ToggleMinimize { app_id } => {
            ensure_managed(&app_id)?;
            let minimized = state.windows.require(&app_id)?.minimized;
            release_stale_interaction(interaction);
            if minimized {
                focus_window_internal(state, &app_id)?;
                effects.push(RuntimeEffect::FocusWindowContent(app_id));
            } else {
                minimize_window_internal(state, interaction, &app_id)?;
            }
        }
        DesktopAction::CloseWindow { app_id } => {
            ensure_managed(&app_id)?;
            state
                .windows
                .remove(&app_id)
                .ok_or_else(|| ReducerError::WindowNotFound(app_id.clone()))?;
            interaction.release_for(&app_id);
        }
        DesktopAction::ToggleMaximize { app_id } => {
            ensure_managed(&app_id)?;
            let handle = state.windows.require(&app_id)?;
            let patch = if handle.maximized {
                let restore = handle.restore_geometry.unwrap_or(handle.geometry);
                WindowPatch {
                    geometry: Some(reachable_geometry(restore, state.desktop_area())),
                    restore_geometry: Some(None),
                    maximized: Some(false),
                    ..WindowPatch::default()
                }
            } else {
                WindowPatch {
                    geometry: Some(maximized_geometry(state.viewport, state.taskbar_band_px)),
                    restore_geometry: Some(Some(handle.geometry)),
                    maximized: Some(true),
                    ..WindowPatch::default()
                }
            };
            state.windows.update(&app_id, patch)?;
            interaction.release_for(&app_id);
            focus_window_internal(state, &app_id)?;
            effects.push(RuntimeEffect::FocusWindowContent(app_id));
        }
        DesktopAction::BeginMove { app_id, pointer } => {
            ensure_managed(&app_id)?;
            let handle = state.windows.require(&app_id)?;
            if handle.maximized {
                return Ok(effects);
            }
            let origin = handle.geometry.position();
            release_stale_interaction(interaction);
            focus_window_internal(state, &app_id)?;
            interaction.active = Some(InteractionSession::Drag(DragSession {
                app_id: app_id.clone(),
                pointer_start: pointer,
                origin,
            }));
            effects.push(RuntimeEffect::FocusWindowContent(app_id));
        }
        DesktopAction::UpdateMove { pointer } => {
            let Some(session) = interaction.dragging().cloned() else {
                return Ok(effects);
            };
            let Some(handle) = state.windows.get(&session.app_id) else {
                interaction.active = None;
                return Ok(effects);
            };
            if !handle.maximized {
                let position = apply_drag(
                    session.origin,
                    pointer.delta_from(session.pointer_start),
                    state.desktop_area(),
                );
                let geometry = handle.geometry.with_position(position);
                state
                    .windows
                    .update(&session.app_id, WindowPatch::geometry(geometry))?;
            }
        }
        DesktopAction::EndMove => {
            if interaction.dragging().is_some() {
                interaction.active = None;
            }
        }
        DesktopAction::BeginResize { app_id, pointer } => {
            ensure_managed(&app_id)?;
            let handle = state.windows.require(&app_id)?;
            if handle.maximized {
                return Ok(effects);
            }
            let origin = handle.geometry.size();
            release_stale_interaction(interaction);
            focus_window_internal(state, &app_id)?;
            interaction.active = Some(InteractionSession::Resize(ResizeSession {
                app_id: app_id.clone(),
                pointer_start: pointer,
                origin,
            }));
            effects.push(RuntimeEffect::FocusWindowContent(app_id));
        }
        DesktopAction::UpdateResize { pointer } => {
            let Some(session) = interaction.resizing().cloned() else {
                return Ok(effects);
            };
            let Some(handle) = state.windows.get(&session.app_id) else {
                interaction.active = None;
                return Ok(effects);
            };
            if !handle.maximized {
                let size = apply_resize(session.origin, pointer.delta_from(session.pointer_start));
                let geometry = handle.geometry.with_size(size);
                state
                    .windows
                    .update(&session.app_id, WindowPatch::geometry(geometry))?;
            }
        }
        DesktopAction::EndResize => {
            if interaction.resizing().is_some() {
                interaction.active = None;
            }
        }
        DesktopAction::ReleaseInteraction => {
            interaction.active = None;
        }
        DesktopAction::SetViewport { viewport } => {
            state.viewport = viewport;
            relayout_windows(state)?;
        }
        DesktopAction::ApplySettings { settings } => {
            state.taskbar_band_px = settings.taskbar_height.band_px();
            state.chrome = WindowChrome {
                border_glow: settings.window_border_glow,
                transparency: settings.ui_transparency,
            };
            relayout_windows(state)?;
        }
        DesktopAction::AppRemoved { app_id } => {
            if state.windows.remove(&app_id).is_some() {
                logging::log!("closed window for removed app `{app_id}`");
                interaction.release_for(&app_id);
            }
        }
        DesktopAction::CloseSettingsOverlay => {
            state.settings_overlay_open = false;
        }
    }

    Ok(effects)
}

fn ensure_managed(app_id: &ApplicationId) -> Result<(), ReducerError> {
    if app_id.is_settings_surface() {
        return Err(ReducerError::ReservedWindow(app_id.clone()));
    }
    Ok(())
}

fn focus_window_internal(
    state: &mut DesktopState,
    app_id: &ApplicationId,
) -> Result<(), ReducerError> {
    state.windows.require(app_id)?;
    let stack_order = state.stack.next_stack_order();
    state.windows.update(app_id, WindowPatch::raise(stack_order))
}

fn minimize_window_internal(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    app_id: &ApplicationId,
) -> Result<(), ReducerError> {
    state.windows.update(
        app_id,
        WindowPatch {
            minimized: Some(true),
            ..WindowPatch::default()
        },
    )?;
    interaction.release_for(app_id);
    Ok(())
}

fn release_stale_interaction(interaction: &mut InteractionState) {
    if let Some(stale) = interaction.active.take() {
        logging::log!("released stale interaction on `{}`", stale.app_id());
    }
}

/// Recomputes maximized windows for the current area and keeps the rest reachable.
fn relayout_windows(state: &mut DesktopState) -> Result<(), ReducerError> {
    let area = state.desktop_area();
    let maximized = maximized_geometry(state.viewport, state.taskbar_band_px);
    for app_id in state.windows.ids() {
        let handle = state.windows.require(&app_id)?;
        let geometry = if handle.maximized {
            maximized
        } else {
            reachable_geometry(handle.geometry, area)
        };
        if geometry != handle.geometry {
            state
                .windows
                .update(&app_id, WindowPatch::geometry(geometry))?;
        }
    }
    Ok(())
}
