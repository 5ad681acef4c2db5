use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use super::document;
use super::errors::StoreError;
use super::paths::StorePaths;
use super::profile::ConnectionProfile;

/// What happened when one configuration document was read.
#[derive(Debug)]
pub enum LoadOutcome {
    /// No file at that path; nothing changed.
    Missing,
    /// The document was merged; holds the number of named profiles it contained.
    Loaded(usize),
    /// The document could not be read or parsed; nothing from it was merged.
    Failed(StoreError),
}

/// Whether a change reached the user-level document.
///
/// The in-memory mapping is updated either way.
#[derive(Debug)]
pub enum Persistence {
    Written(PathBuf),
    InMemoryOnly(StoreError),
}

impl Persistence {
    pub fn is_written(&self) -> bool {
        matches!(self, Persistence::Written(_))
    }
}

/// Named connection profiles, layered from two `connections.xml` documents.
///
/// The application-level document is read first and the user-level document
/// second, so user entries win on a name collision. Every change is written
/// back as a full rewrite of the user-level document only.
///
/// The mapping sits behind an `RwLock`, so a shared `ProfileStore` can serve
/// lookups from several threads while another thread saves.
#[derive(Debug)]
pub struct ProfileStore {
    paths: StorePaths,
    profiles: RwLock<HashMap<String, ConnectionProfile>>,
    last_persist_error: Mutex<Option<String>>,
}

impl ProfileStore {
    /// Create the user-level directory if needed, then load both layers.
    pub fn open(paths: StorePaths) -> Self {
        if let Some(dir) = paths.user.as_deref().and_then(Path::parent) {
            if let Err(e) = fs::create_dir_all(dir) {
                warn!("Unable to create config dir {:?}: {}", dir, e);
            }
        }

        let store = Self {
            paths,
            profiles: RwLock::new(HashMap::new()),
            last_persist_error: Mutex::new(None),
        };
        store.load_layers();
        store
    }

    /// Load from the locations found by [`StorePaths::discover`].
    pub fn open_default() -> Self {
        Self::open(StorePaths::discover())
    }

    /// A store with no backing files; every write reports `InMemoryOnly`.
    pub fn in_memory() -> Self {
        Self::open(StorePaths::default())
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    fn load_layers(&self) {
        for path in [&self.paths.application, &self.paths.user].into_iter().flatten() {
            self.load_from(path);
        }
    }

    /// Merge the profiles of one document into the mapping.
    ///
    /// Best effort: a missing, unreadable or malformed document leaves the
    /// mapping exactly as it was.
    pub fn load_from(&self, path: &Path) -> LoadOutcome {
        if !path.exists() {
            debug!("No profile document at {:?}", path);
            return LoadOutcome::Missing;
        }

        let parsed = fs::read_to_string(path)
            .map_err(StoreError::from)
            .and_then(|xml| document::parse(&xml));
        match parsed {
            Ok(loaded) => {
                let count = loaded.len();
                let mut profiles = self.write_profiles();
                for profile in loaded {
                    profiles.insert(profile.name.clone(), profile);
                }
                info!("Loaded {} profile(s) from {:?}", count, path);
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                warn!("Ignoring profile document {:?}: {}", path, e);
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Drop everything held in memory and read both layers again.
    pub fn reload(&self) {
        self.write_profiles().clear();
        self.load_layers();
    }

    pub fn get(&self, name: &str) -> Option<ConnectionProfile> {
        self.read_profiles().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read_profiles().contains_key(name)
    }

    /// Every profile name currently held, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read_profiles().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.read_profiles().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_profiles().is_empty()
    }

    /// Create or overwrite a profile, then rewrite the user-level document.
    pub fn save(&self, profile: ConnectionProfile) -> Result<Persistence, StoreError> {
        if profile.name.trim().is_empty() {
            return Err(StoreError::InvalidProfile(
                "profile name must not be empty".into(),
            ));
        }

        let mut profiles = self.write_profiles();
        debug!("Saving profile '{}'", profile.name);
        profiles.insert(profile.name.clone(), profile);
        Ok(self.write_user_document(&profiles))
    }

    /// Remove a profile, then rewrite the user-level document.
    ///
    /// A profile of the same name in the application-level document is not
    /// touched and comes back on the next [`reload`](Self::reload).
    pub fn delete(&self, name: &str) -> Result<Persistence, StoreError> {
        let mut profiles = self.write_profiles();
        if profiles.remove(name).is_none() {
            return Err(StoreError::ProfileNotFound(name.to_string()));
        }
        debug!("Deleted profile '{}'", name);
        Ok(self.write_user_document(&profiles))
    }

    /// Rewrite the user-level document from the current mapping.
    pub fn persist(&self) -> Persistence {
        let profiles = self.read_profiles();
        self.write_user_document(&profiles)
    }

    /// The most recent write failure, cleared by the next successful write.
    pub fn last_persist_error(&self) -> Option<String> {
        self.last_persist_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write_user_document(&self, profiles: &HashMap<String, ConnectionProfile>) -> Persistence {
        let outcome = match self.paths.user.as_deref() {
            Some(path) => match write_document(path, profiles) {
                Ok(()) => {
                    info!("Wrote {} profile(s) to {:?}", profiles.len(), path);
                    Persistence::Written(path.to_path_buf())
                }
                Err(e) => {
                    warn!("Profiles kept in memory only; writing {:?} failed: {}", path, e);
                    Persistence::InMemoryOnly(e)
                }
            },
            None => {
                warn!("Profiles kept in memory only: {}", StoreError::NoConfigPath);
                Persistence::InMemoryOnly(StoreError::NoConfigPath)
            }
        };

        let mut last_error = self
            .last_persist_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *last_error = match &outcome {
            Persistence::Written(_) => None,
            Persistence::InMemoryOnly(e) => Some(e.to_string()),
        };
        outcome
    }

    fn read_profiles(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, ConnectionProfile>> {
        self.profiles.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_profiles(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<String, ConnectionProfile>> {
        self.profiles.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn write_document(
    path: &Path,
    profiles: &HashMap<String, ConnectionProfile>,
) -> Result<(), StoreError> {
    let mut ordered: Vec<&ConnectionProfile> = profiles.values().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));
    let xml = document::render(ordered)?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, xml)?;
    Ok(())
}
