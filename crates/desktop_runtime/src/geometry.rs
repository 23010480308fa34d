//! Pure geometry transforms applied by the window manager during drag, resize and maximize.
//!
//! Nothing here touches state; the reducer calls these on every pointer move and writes the
//! result back into the registry. Out-of-range input is clamped, never rejected.

use crate::model::{
    PointerDelta, Viewport, WindowGeometry, WindowPosition, WindowSize, DEFAULT_WINDOW_HEIGHT,
    DEFAULT_WINDOW_WIDTH,
};

/// Minimum usable window width.
pub const MIN_WINDOW_WIDTH: i32 = 320;
/// Minimum usable window height.
pub const MIN_WINDOW_HEIGHT: i32 = 200;
/// Height of the title bar band at the top of every window.
pub const TITLE_BAR_HEIGHT: i32 = 36;
/// Horizontal sliver of title bar that must stay on-screen so the window can be grabbed.
pub const TITLE_BAR_GRIP: i32 = 64;

const INITIAL_OFFSET_X: i32 = 80;
const INITIAL_OFFSET_Y: i32 = 60;
const INITIAL_SPREAD_X: u64 = 121;
const INITIAL_SPREAD_Y: u64 = 81;

/// Viewport minus the reserved taskbar band.
pub fn desktop_area(viewport: Viewport, taskbar_band_px: i32) -> Viewport {
    Viewport {
        width: viewport.width.max(0),
        height: viewport.height.saturating_sub(taskbar_band_px).max(0),
    }
}

/// Moves `origin` by `delta`, keeping the title bar reachable inside `area`.
///
/// Vertically the title bar stays within `[0, area.height - TITLE_BAR_HEIGHT]`. Horizontally
/// only `x >= 0` is enforced, plus enough room on the right for [`TITLE_BAR_GRIP`]; the rest
/// of the window may hang off the right edge.
pub fn apply_drag(origin: WindowPosition, delta: PointerDelta, area: Viewport) -> WindowPosition {
    WindowPosition {
        x: origin
            .x
            .saturating_add(delta.dx)
            .min(area.width.saturating_sub(TITLE_BAR_GRIP))
            .max(0),
        y: origin
            .y
            .saturating_add(delta.dy)
            .min(area.height.saturating_sub(TITLE_BAR_HEIGHT))
            .max(0),
    }
}

/// Grows `origin` by `delta`, flooring each dimension at the minimum usable size.
pub fn apply_resize(origin: WindowSize, delta: PointerDelta) -> WindowSize {
    WindowSize {
        width: origin.width.saturating_add(delta.dx).max(MIN_WINDOW_WIDTH),
        height: origin.height.saturating_add(delta.dy).max(MIN_WINDOW_HEIGHT),
    }
}

/// Geometry of a maximized window: the full viewport above the taskbar band.
pub fn maximized_geometry(viewport: Viewport, taskbar_band_px: i32) -> WindowGeometry {
    let area = desktop_area(viewport, taskbar_band_px);
    WindowGeometry {
        x: 0,
        y: 0,
        width: area.width,
        height: area.height,
    }
}

/// Default geometry for a newly opened window.
///
/// The offset is derived from `seed` so successive windows land in different spots while
/// staying reproducible for a given seed.
pub fn initial_geometry(seed: u64, area: Viewport) -> WindowGeometry {
    let mix = seed.wrapping_mul(0x9e37_79b9_7f4a_7c15) ^ (seed >> 7);
    let offset_x = (mix % INITIAL_SPREAD_X) as i32;
    let offset_y = ((mix >> 32) % INITIAL_SPREAD_Y) as i32;
    let position = apply_drag(
        WindowPosition {
            x: INITIAL_OFFSET_X + offset_x,
            y: INITIAL_OFFSET_Y + offset_y,
        },
        PointerDelta::default(),
        area,
    );
    WindowGeometry {
        x: position.x,
        y: position.y,
        width: DEFAULT_WINDOW_WIDTH.max(MIN_WINDOW_WIDTH),
        height: DEFAULT_WINDOW_HEIGHT.max(MIN_WINDOW_HEIGHT),
    }
}

/// Re-applies the size floor and title bar reachability, e.g. after the viewport shrank.
pub fn reachable_geometry(geometry: WindowGeometry, area: Viewport) -> WindowGeometry {
    let size = apply_resize(geometry.size(), PointerDelta::default());
    let position = apply_drag(geometry.position(), PointerDelta::default(), area);
    geometry.with_size(size).with_position(position)
}
