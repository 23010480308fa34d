//! Installed application catalog persisted through a [`PrefsStore`].

use desktop_app_contract::{AppCatalog, AppEntry, ApplicationId, CatalogEvent, INTERNAL_SCHEME};
use leptos::logging;
use thiserror::Error;

use crate::{
    storage::{load_typed, save_typed, PrefsStore, StorageError, APPS_PREFS_KEY},
    time::{Clock, SystemClock},
};

const ID_SUFFIX_LEN: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons an install or removal request was refused.
pub enum CatalogError {
    /// A required field was blank after trimming.
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    /// The supplied id is not a valid application id.
    #[error("{0}")]
    InvalidId(String),
    /// An application with this id is already installed.
    #[error("app `{0}` already exists")]
    Duplicate(ApplicationId),
    /// The id or target points at a shell-internal surface.
    #[error("`{0}` is reserved for the shell")]
    ReservedTarget(String),
    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Prefixes `https://` unless the target already names an http(s) scheme.
pub fn normalize_target(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return trimmed.to_string();
    }
    format!("https://{trimmed}")
}

/// Mints `app-<unix-ms>-<suffix>` where the suffix mixes the timestamp, display name and a
/// caller-held sequence number.
pub fn mint_app_id(now_ms: u64, name: &str, sequence: u64) -> ApplicationId {
    let mut mix = now_ms ^ 0xcbf2_9ce4_8422_2325;
    for byte in sequence.to_le_bytes().into_iter().chain(name.bytes()) {
        mix ^= u64::from(byte);
        mix = mix.wrapping_mul(0x0100_0000_01b3);
    }
    let mut suffix = String::with_capacity(ID_SUFFIX_LEN);
    for _ in 0..ID_SUFFIX_LEN {
        let digit = (mix % 36) as u32;
        suffix.push(char::from_digit(digit, 36).unwrap_or('0'));
        mix /= 36;
    }
    ApplicationId::trusted(format!("app-{now_ms}-{suffix}"))
}

/// Application catalog with an in-memory view of the persisted list.
pub struct AppCatalogService<S> {
    store: S,
    clock: Box<dyn Clock>,
    entries: Vec<AppEntry>,
    minted: u64,
}

impl<S: PrefsStore> AppCatalogService<S> {
    /// Loads the catalog from `store`. Corrupt data yields an empty catalog.
    pub async fn load(store: S) -> Self {
        Self::load_with_clock(store, Box::new(SystemClock)).await
    }

    /// Loads the catalog using a custom id clock.
    pub async fn load_with_clock(store: S, clock: Box<dyn Clock>) -> Self {
        let entries = match load_typed::<_, Vec<AppEntry>>(&store, APPS_PREFS_KEY).await {
            Ok(entries) => entries.unwrap_or_default(),
            Err(err) => {
                logging::warn!("app catalog load failed, starting empty: {err}");
                Vec::new()
            }
        };
        Self {
            store,
            clock,
            entries,
            minted: 0,
        }
    }

    /// Installed applications in install order.
    pub fn entries(&self) -> &[AppEntry] {
        &self.entries
    }

    /// Installs a new shortcut from user input, minting a fresh id.
    ///
    /// # Errors
    ///
    /// Fails on blank fields, shell-internal targets, id collisions or storage failures.
    pub async fn add_app(&mut self, name: &str, url: &str) -> Result<AppEntry, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::MissingField("name"));
        }
        let target = normalize_target(url);
        if target.is_empty() {
            return Err(CatalogError::MissingField("url"));
        }
        let entry = AppEntry::new(self.next_app_id(name), name, target);
        self.install(entry.clone()).await?;
        Ok(entry)
    }

    /// Same-millisecond installs of one name differ by sequence number.
    fn next_app_id(&mut self, name: &str) -> ApplicationId {
        let now_ms = self.clock.now_ms();
        loop {
            let id = mint_app_id(now_ms, name, self.minted);
            self.minted += 1;
            if !self.entries.iter().any(|entry| entry.id == id) {
                return id;
            }
        }
    }

    /// Installs an entry with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// Fails on reserved ids or targets, duplicates, or storage failures. The catalog is
    /// unchanged on failure.
    pub async fn install(&mut self, entry: AppEntry) -> Result<CatalogEvent, CatalogError> {
        ApplicationId::new(entry.id.as_str()).map_err(CatalogError::InvalidId)?;
        if entry.id.is_settings_surface() {
            return Err(CatalogError::ReservedTarget(entry.id.to_string()));
        }
        if entry.target.starts_with(INTERNAL_SCHEME) {
            return Err(CatalogError::ReservedTarget(entry.target));
        }
        if self.entries.iter().any(|existing| existing.id == entry.id) {
            return Err(CatalogError::Duplicate(entry.id));
        }

        let mut updated = self.entries.clone();
        updated.push(entry.clone());
        save_typed(&self.store, APPS_PREFS_KEY, &updated).await?;
        self.entries = updated;
        Ok(CatalogEvent::Installed(entry))
    }

    /// Removes an application. Removing an unknown id still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] when persisting the shortened list fails.
    pub async fn remove_app(
        &mut self,
        app_id: &ApplicationId,
    ) -> Result<CatalogEvent, CatalogError> {
        let updated: Vec<AppEntry> = self
            .entries
            .iter()
            .filter(|entry| &entry.id != app_id)
            .cloned()
            .collect();
        if updated.len() != self.entries.len() {
            save_typed(&self.store, APPS_PREFS_KEY, &updated).await?;
            self.entries = updated;
        }
        Ok(CatalogEvent::Removed(app_id.clone()))
    }
}

impl<S> AppCatalog for AppCatalogService<S> {
    fn installed_apps(&self) -> Vec<AppEntry> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{storage::MemoryPrefsStore, time::ManualClock};

    fn catalog(store: MemoryPrefsStore) -> AppCatalogService<MemoryPrefsStore> {
        block_on(AppCatalogService::load_with_clock(
            store,
            Box::new(ManualClock::starting_at(1_700_000_000_000)),
        ))
    }

    #[test]
    fn urls_without_scheme_get_https() {
        assert_eq!(normalize_target("example.com"), "https://example.com");
        assert_eq!(normalize_target(" http://intra.net "), "http://intra.net");
        assert_eq!(normalize_target("https://x.io"), "https://x.io");
        assert_eq!(normalize_target("   "), "");
    }

    #[test]
    fn minted_ids_carry_timestamp_and_five_char_suffix() {
        let id = mint_app_id(1_700_000_000_000, "Mail", 0);
        let raw = id.as_str();
        assert!(raw.starts_with("app-1700000000000-"));
        let suffix = raw.rsplit('-').next().expect("suffix");
        assert_eq!(suffix.len(), 5);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, mint_app_id(1_700_000_000_000, "Docs", 0));
        assert_ne!(id, mint_app_id(1_700_000_000_000, "Mail", 1));
    }

    #[test]
    fn add_app_persists_trimmed_entry() {
        let store = MemoryPrefsStore::default();
        let mut apps = catalog(store.clone());

        let entry = block_on(apps.add_app("  Mail ", "mail.example")).expect("add");
        assert_eq!(entry.name, "Mail");
        assert_eq!(entry.target, "https://mail.example");
        assert_eq!(apps.installed_apps(), vec![entry.clone()]);

        let reloaded = catalog(store);
        assert_eq!(reloaded.entries(), &[entry]);
    }

    struct FrozenClock(u64);

    impl Clock for FrozenClock {
        fn now_ms(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn same_name_installed_twice_in_one_millisecond_gets_distinct_ids() {
        let mut apps = block_on(AppCatalogService::load_with_clock(
            MemoryPrefsStore::default(),
            Box::new(FrozenClock(1_700_000_000_000)),
        ));

        let first = block_on(apps.add_app("Mail", "mail.example")).expect("first install");
        let second = block_on(apps.add_app("Mail", "mail.example")).expect("second install");
        assert_ne!(first.id, second.id);
        assert!(second.id.as_str().starts_with("app-1700000000000-"));
        assert_eq!(apps.entries().len(), 2);
    }

    #[test]
    fn add_app_rejects_blank_fields() {
        let mut apps = catalog(MemoryPrefsStore::default());
        assert_eq!(
            block_on(apps.add_app("  ", "x.io")),
            Err(CatalogError::MissingField("name"))
        );
        assert_eq!(
            block_on(apps.add_app("X", " ")),
            Err(CatalogError::MissingField("url"))
        );
        assert!(apps.entries().is_empty());
    }

    #[test]
    fn install_refuses_duplicates_and_reserved_surfaces() {
        let mut apps = catalog(MemoryPrefsStore::default());
        let mail = AppEntry::new(ApplicationId::trusted("mail"), "Mail", "https://m.io");
        block_on(apps.install(mail.clone())).expect("install");

        assert_eq!(
            block_on(apps.install(mail)),
            Err(CatalogError::Duplicate(ApplicationId::trusted("mail")))
        );
        assert!(matches!(
            block_on(apps.install(AppEntry::settings_surface())),
            Err(CatalogError::ReservedTarget(_))
        ));
        assert!(matches!(
            block_on(apps.install(AppEntry::new(
                ApplicationId::trusted("sneaky"),
                "Sneaky",
                "internal://settings"
            ))),
            Err(CatalogError::ReservedTarget(_))
        ));
        assert_eq!(apps.entries().len(), 1);
    }

    #[test]
    fn remove_app_is_idempotent_and_reports_removal() {
        let store = MemoryPrefsStore::default();
        let mut apps = catalog(store.clone());
        let mail = ApplicationId::trusted("mail");
        block_on(apps.install(AppEntry::new(mail.clone(), "Mail", "https://m.io"))).expect("install");

        assert_eq!(
            block_on(apps.remove_app(&mail)),
            Ok(CatalogEvent::Removed(mail.clone()))
        );
        assert_eq!(
            block_on(apps.remove_app(&mail)),
            Ok(CatalogEvent::Removed(mail))
        );
        assert_eq!(store.raw(APPS_PREFS_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn corrupt_catalog_loads_empty() {
        let store = MemoryPrefsStore::default();
        store.seed(APPS_PREFS_KEY, "{oops");
        assert!(catalog(store).entries().is_empty());
    }
}
