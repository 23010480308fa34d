use desktop_app_contract::{AppEntry, ApplicationId, UiTransparency, WindowBorderGlow};
use serde::{Deserialize, Serialize};

use crate::{registry::WindowRegistry, stack::StackAllocator};

pub const DEFAULT_WINDOW_WIDTH: i32 = 900;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;
pub const DEFAULT_TASKBAR_BAND_PX: i32 = 56;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowGeometry {
    pub fn position(self) -> WindowPosition {
        WindowPosition {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(self) -> WindowSize {
        WindowSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn with_position(self, position: WindowPosition) -> Self {
        Self {
            x: position.x,
            y: position.y,
            ..self
        }
    }

    pub fn with_size(self, size: WindowSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            ..self
        }
    }
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            x: 80,
            y: 60,
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Host viewport (or the desktop area inside it), in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Delta from `origin` to this pointer position.
    pub fn delta_from(self, origin: PointerPosition) -> PointerDelta {
        PointerDelta {
            dx: self.x.saturating_sub(origin.x),
            dy: self.y.saturating_sub(origin.y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PointerDelta {
    pub dx: i32,
    pub dy: i32,
}

impl PointerDelta {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// Live state record for one open application window.
///
/// `id`, `title` and `target` are fixed for the handle's lifetime; the registry only patches
/// the remaining fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowHandle {
    pub id: ApplicationId,
    pub title: String,
    pub target: String,
    pub geometry: WindowGeometry,
    /// Geometry to return to when leaving the maximized state.
    pub restore_geometry: Option<WindowGeometry>,
    pub minimized: bool,
    pub maximized: bool,
    pub stack_order: u64,
    /// Stack order allocated at creation; orders taskbar buttons.
    pub opened_order: u64,
}

/// Window cosmetics forwarded from the settings collaborator to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WindowChrome {
    pub border_glow: WindowBorderGlow,
    pub transparency: UiTransparency,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopState {
    pub windows: WindowRegistry,
    pub stack: StackAllocator,
    pub viewport: Viewport,
    pub taskbar_band_px: i32,
    pub chrome: WindowChrome,
    pub settings_overlay_open: bool,
}

impl DesktopState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            windows: WindowRegistry::default(),
            stack: StackAllocator::default(),
            viewport,
            taskbar_band_px: DEFAULT_TASKBAR_BAND_PX,
            chrome: WindowChrome::default(),
            settings_overlay_open: false,
        }
    }

    /// Viewport minus the reserved taskbar band.
    pub fn desktop_area(&self) -> Viewport {
        crate::geometry::desktop_area(self.viewport, self.taskbar_band_px)
    }

    /// Topmost (focused) handle: highest stack order among non-minimized windows.
    pub fn topmost(&self) -> Option<&WindowHandle> {
        crate::stack::topmost_among(self.windows.iter())
    }

    pub fn topmost_id(&self) -> Option<&ApplicationId> {
        self.topmost().map(|handle| &handle.id)
    }

    /// Builds the immutable view handed to the renderer and taskbar.
    pub fn snapshot(&self) -> DesktopSnapshot {
        let topmost = self.topmost_id().cloned();
        let view = |handle: &WindowHandle| WindowView {
            id: handle.id.clone(),
            title: handle.title.clone(),
            target: handle.target.clone(),
            geometry: handle.geometry,
            minimized: handle.minimized,
            maximized: handle.maximized,
            topmost: topmost.as_ref() == Some(&handle.id),
            stack_order: handle.stack_order,
        };

        let mut painted: Vec<&WindowHandle> =
            self.windows.iter().filter(|handle| !handle.minimized).collect();
        painted.sort_by_key(|handle| handle.stack_order);

        let mut taskbar: Vec<&WindowHandle> = self.windows.iter().collect();
        taskbar.sort_by_key(|handle| handle.opened_order);

        DesktopSnapshot {
            desktop: painted.into_iter().map(view).collect(),
            taskbar: taskbar.into_iter().map(view).collect(),
            topmost,
            chrome: self.chrome,
            settings_overlay_open: self.settings_overlay_open,
        }
    }
}

/// Read-only projection of one window for painting or for a taskbar button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowView {
    pub id: ApplicationId,
    pub title: String,
    pub target: String,
    pub geometry: WindowGeometry,
    pub minimized: bool,
    pub maximized: bool,
    pub topmost: bool,
    pub stack_order: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopSnapshot {
    /// Non-minimized windows, bottom to top.
    pub desktop: Vec<WindowView>,
    /// Every open window (minimized included) in the order it was opened.
    pub taskbar: Vec<WindowView>,
    pub topmost: Option<ApplicationId>,
    pub chrome: WindowChrome,
    pub settings_overlay_open: bool,
}

impl DesktopSnapshot {
    pub fn taskbar_entry(&self, app_id: &ApplicationId) -> Option<&WindowView> {
        self.taskbar.iter().find(|view| &view.id == app_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub app_id: ApplicationId,
    pub title: String,
    pub target: String,
}

impl OpenWindowRequest {
    pub fn new(app_id: ApplicationId, title: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            app_id,
            title: title.into(),
            target: target.into(),
        }
    }
}

impl From<&AppEntry> for OpenWindowRequest {
    fn from(entry: &AppEntry) -> Self {
        Self::new(entry.id.clone(), entry.name.clone(), entry.target.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub app_id: ApplicationId,
    pub pointer_start: PointerPosition,
    pub origin: WindowPosition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub app_id: ApplicationId,
    pub pointer_start: PointerPosition,
    pub origin: WindowSize,
}

/// Pointer-driven interaction in progress. Each move recomputes from the captured origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionSession {
    Drag(DragSession),
    Resize(ResizeSession),
}

impl InteractionSession {
    pub fn app_id(&self) -> &ApplicationId {
        match self {
            Self::Drag(session) => &session.app_id,
            Self::Resize(session) => &session.app_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub active: Option<InteractionSession>,
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    pub fn dragging(&self) -> Option<&DragSession> {
        match &self.active {
            Some(InteractionSession::Drag(session)) => Some(session),
            _ => None,
        }
    }

    pub fn resizing(&self) -> Option<&ResizeSession> {
        match &self.active {
            Some(InteractionSession::Resize(session)) => Some(session),
            _ => None,
        }
    }

    /// Drops the session if it targets `app_id`. Returns whether one was dropped.
    pub fn release_for(&mut self, app_id: &ApplicationId) -> bool {
        if self.active.as_ref().map(InteractionSession::app_id) == Some(app_id) {
            self.active = None;
            return true;
        }
        false
    }
}
