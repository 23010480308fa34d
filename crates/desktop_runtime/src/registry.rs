//! Authoritative map from application id to its open window.

use std::collections::{hash_map::Entry, HashMap};

use desktop_app_contract::ApplicationId;

use crate::{
    model::{WindowGeometry, WindowHandle},
    reducer::ReducerError,
};

/// Partial update applied to a [`WindowHandle`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowPatch {
    pub geometry: Option<WindowGeometry>,
    pub restore_geometry: Option<Option<WindowGeometry>>,
    pub minimized: Option<bool>,
    pub maximized: Option<bool>,
    pub stack_order: Option<u64>,
}

impl WindowPatch {
    pub fn geometry(geometry: WindowGeometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Self::default()
        }
    }

    /// Raise to `stack_order` and clear `minimized`.
    pub fn raise(stack_order: u64) -> Self {
        Self {
            stack_order: Some(stack_order),
            minimized: Some(false),
            ..Self::default()
        }
    }

    fn apply(self, handle: &mut WindowHandle) {
        if let Some(geometry) = self.geometry {
            handle.geometry = geometry;
        }
        if let Some(restore_geometry) = self.restore_geometry {
            handle.restore_geometry = restore_geometry;
        }
        if let Some(minimized) = self.minimized {
            handle.minimized = minimized;
        }
        if let Some(maximized) = self.maximized {
            handle.maximized = maximized;
        }
        if let Some(stack_order) = self.stack_order {
            handle.stack_order = stack_order;
        }
    }
}

/// At most one handle per application id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowRegistry {
    handles: HashMap<ApplicationId, WindowHandle>,
}

impl WindowRegistry {
    /// Inserts `handle` unless its id is already present. Returns whether it was inserted.
    pub fn insert(&mut self, handle: WindowHandle) -> bool {
        match self.handles.entry(handle.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(handle);
                true
            }
        }
    }

    /// Applies `patch` to the handle for `app_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::WindowNotFound`] when no handle exists.
    pub fn update(
        &mut self,
        app_id: &ApplicationId,
        patch: WindowPatch,
    ) -> Result<(), ReducerError> {
        let handle = self
            .handles
            .get_mut(app_id)
            .ok_or_else(|| ReducerError::WindowNotFound(app_id.clone()))?;
        patch.apply(handle);
        Ok(())
    }

    /// Removes the handle for `app_id`. Absent ids are a no-op.
    pub fn remove(&mut self, app_id: &ApplicationId) -> Option<WindowHandle> {
        self.handles.remove(app_id)
    }

    pub fn get(&self, app_id: &ApplicationId) -> Option<&WindowHandle> {
        self.handles.get(app_id)
    }

    /// Looks up a handle, mapping absence to [`ReducerError::WindowNotFound`].
    pub fn require(&self, app_id: &ApplicationId) -> Result<&WindowHandle, ReducerError> {
        self.get(app_id)
            .ok_or_else(|| ReducerError::WindowNotFound(app_id.clone()))
    }

    pub fn contains(&self, app_id: &ApplicationId) -> bool {
        self.handles.contains_key(app_id)
    }

    /// All handles in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &WindowHandle> {
        self.handles.values()
    }

    pub fn ids(&self) -> Vec<ApplicationId> {
        self.handles.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
