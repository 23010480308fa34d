//! Settings persistence and the PIN gate guarding protected changes.

use desktop_app_contract::{SettingsSource, ShellSettings};
use leptos::logging;
use thiserror::Error;

use crate::storage::{load_typed, save_typed, PrefsStore, StorageError, SETTINGS_PREFS_KEY};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons a settings change was refused.
pub enum SettingsError {
    /// The change touches a protected field and no PIN was supplied.
    #[error("a PIN is required for this change")]
    PinRequired,
    /// The supplied PIN did not match.
    #[error("incorrect PIN, access denied")]
    PinRejected,
    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Clone)]
/// Authentication gate for protected settings fields.
pub struct PinGate {
    pin: String,
}

impl std::fmt::Debug for PinGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinGate").finish_non_exhaustive()
    }
}

impl PinGate {
    /// Creates a gate accepting `pin`.
    pub fn new(pin: impl Into<String>) -> Self {
        Self { pin: pin.into() }
    }

    /// Checks a candidate PIN. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::PinRequired`] for a missing or blank PIN and
    /// [`SettingsError::PinRejected`] for a mismatch.
    pub fn verify(&self, candidate: Option<&str>) -> Result<(), SettingsError> {
        let candidate = candidate.map(str::trim).unwrap_or_default();
        if candidate.is_empty() {
            return Err(SettingsError::PinRequired);
        }
        if candidate != self.pin {
            return Err(SettingsError::PinRejected);
        }
        Ok(())
    }
}

/// Whether moving from `current` to `next` touches a PIN-protected field.
pub fn requires_pin(current: &ShellSettings, next: &ShellSettings) -> bool {
    current.wallpaper_url != next.wallpaper_url
}

/// Settings store with a cached copy of the value in effect.
pub struct SettingsService<S> {
    store: S,
    gate: PinGate,
    current: ShellSettings,
}

impl<S: PrefsStore> SettingsService<S> {
    /// Loads settings from `store`, falling back to defaults when absent or unreadable.
    pub async fn load(store: S, gate: PinGate) -> Self {
        let current = match load_typed::<_, ShellSettings>(&store, SETTINGS_PREFS_KEY).await {
            Ok(settings) => settings.unwrap_or_default(),
            Err(err) => {
                logging::warn!("settings load failed, using defaults: {err}");
                ShellSettings::default()
            }
        };
        Self {
            store,
            gate,
            current,
        }
    }

    /// Settings currently in effect.
    pub fn current(&self) -> &ShellSettings {
        &self.current
    }

    /// Persists `next`, checking `pin` when a protected field changes.
    ///
    /// # Errors
    ///
    /// Fails when the PIN gate refuses or the store write fails; the cached value is
    /// unchanged in both cases.
    pub async fn save(
        &mut self,
        next: ShellSettings,
        pin: Option<&str>,
    ) -> Result<(), SettingsError> {
        if requires_pin(&self.current, &next) {
            self.gate.verify(pin)?;
        }
        save_typed(&self.store, SETTINGS_PREFS_KEY, &next).await?;
        self.current = next;
        Ok(())
    }
}

impl<S> SettingsSource for SettingsService<S> {
    fn current_settings(&self) -> ShellSettings {
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::{TaskbarHeight, WindowBorderGlow};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::storage::MemoryPrefsStore;

    fn service(store: MemoryPrefsStore) -> SettingsService<MemoryPrefsStore> {
        block_on(SettingsService::load(store, PinGate::new("2011")))
    }

    #[test]
    fn missing_or_corrupt_settings_fall_back_to_defaults() {
        assert_eq!(
            service(MemoryPrefsStore::default()).current(),
            &ShellSettings::default()
        );

        let store = MemoryPrefsStore::default();
        store.seed(SETTINGS_PREFS_KEY, "[1,2]");
        assert_eq!(service(store).current(), &ShellSettings::default());
    }

    #[test]
    fn cosmetic_changes_save_without_pin() {
        let store = MemoryPrefsStore::default();
        let mut settings = service(store.clone());
        let next = ShellSettings {
            taskbar_height: TaskbarHeight::Tall,
            window_border_glow: WindowBorderGlow::Intense,
            ..ShellSettings::default()
        };

        block_on(settings.save(next.clone(), None)).expect("save");
        assert_eq!(settings.current_settings(), next);
        assert_eq!(service(store).current(), &next);
    }

    #[test]
    fn wallpaper_change_is_pin_gated() {
        let mut settings = service(MemoryPrefsStore::default());
        let next = ShellSettings {
            wallpaper_url: "https://walls.example/neon.mp4".to_string(),
            ..ShellSettings::default()
        };

        assert_eq!(
            block_on(settings.save(next.clone(), None)),
            Err(SettingsError::PinRequired)
        );
        assert_eq!(
            block_on(settings.save(next.clone(), Some("0000"))),
            Err(SettingsError::PinRejected)
        );
        assert_eq!(settings.current(), &ShellSettings::default());

        block_on(settings.save(next.clone(), Some(" 2011 "))).expect("unlocked");
        assert_eq!(settings.current(), &next);
    }

    #[test]
    fn pin_gate_debug_hides_secret() {
        let rendered = format!("{:?}", PinGate::new("2011"));
        assert!(!rendered.contains("2011"));
    }
}
