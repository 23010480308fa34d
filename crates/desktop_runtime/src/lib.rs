//! Window manager core for the browser desktop: window registry, stacking, geometry rules,
//! pointer interaction sessions and the reducer that ties them together.

pub mod apps;
pub mod geometry;
pub mod host;
pub mod manager;
pub mod model;
pub mod reducer;
pub mod registry;
pub mod stack;

pub use apps::{built_in_apps, desktop_icons, resolve_app, DesktopIcon};
pub use host::{DesktopSession, SessionError};
pub use manager::{SubscriptionId, WindowManager};
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use registry::{WindowPatch, WindowRegistry};
pub use stack::{topmost_among, StackAllocator, STACK_ORDER_SEED};
