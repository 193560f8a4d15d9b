use std::path::{Path, PathBuf};
use std::sync::Mutex;

use uuid::Uuid;

use crate::domain::entities::outcome::CheckOutcome;
use crate::domain::entities::target::{CheckStatus, Target};
use crate::domain::ports::store::{StoreError, TargetStore};

/// Target store backed by a YAML file.
///
/// The in-memory list is authoritative; every mutation rewrites the whole
/// file through a temp-file-plus-rename so a crash mid-write can never leave
/// a truncated file behind. All access goes through one mutex, so concurrent
/// writers from a check cycle are serialized.
#[derive(Debug)]
pub struct YamlStore {
    path: PathBuf,
    targets: Mutex<Vec<Target>>,
}

impl YamlStore {
    /// Open the store at `path`, loading any existing target list.
    ///
    /// Loading never blocks startup: a missing file starts empty, and an
    /// unreadable or unparsable one is logged and treated as empty. The
    /// damaged file is left on disk until the next successful write replaces
    /// it.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let targets = Mutex::new(Self::load(&path));
        Self { path, targets }
    }

    fn load(path: &Path) -> Vec<Target> {
        if !path.exists() {
            return Vec::new();
        }
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    "could not read {}: {e}; starting with an empty target list",
                    path.display()
                );
                return Vec::new();
            }
        };
        if raw.trim().is_empty() {
            return Vec::new();
        }
        match serde_yaml::from_str(&raw) {
            Ok(targets) => targets,
            Err(e) => {
                tracing::warn!(
                    "could not parse {}: {e}; starting with an empty target list",
                    path.display()
                );
                Vec::new()
            }
        }
    }

    fn save(&self, targets: &[Target]) -> Result<(), StoreError> {
        let yaml = serde_yaml::to_string(targets)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = dir {
            std::fs::create_dir_all(dir)
                .map_err(|e| StoreError::WriteFailed(format!("{}: {e}", dir.display())))?;
        }

        // The temp file must live in the destination directory so the final
        // rename stays on one filesystem and is atomic.
        let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        std::io::Write::write_all(&mut tmp, yaml.as_bytes())
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Target>>, StoreError> {
        self.targets
            .lock()
            .map_err(|_| StoreError::ReadFailed("target list lock poisoned".to_string()))
    }
}

impl TargetStore for YamlStore {
    fn snapshot(&self) -> Result<Vec<Target>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn append(&self, target: Target) -> Result<(), StoreError> {
        let mut targets = self.lock()?;
        targets.push(target);
        self.save(&targets)
    }

    fn update_status(&self, id: Uuid, outcome: CheckOutcome) -> Result<(), StoreError> {
        let mut targets = self.lock()?;
        let Some(target) = targets.iter_mut().find(|t| t.id == id) else {
            return Ok(());
        };
        target.last_status = Some(CheckStatus::from_outcome(outcome));
        self.save(&targets)
    }

    fn reload(&self) -> Result<(), StoreError> {
        let fresh = Self::load(&self.path);
        *self.lock()? = fresh;
        Ok(())
    }
}
