use std::sync::Mutex;

use uuid::Uuid;

use crate::domain::entities::outcome::CheckOutcome;
use crate::domain::entities::target::{CheckStatus, Target};
use crate::domain::ports::store::{StoreError, TargetStore};

/// Volatile target store. Backs one-shot CLI runs and tests, where nothing
/// should touch the filesystem.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    targets: Mutex<Vec<Target>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-seeded with `targets`.
    #[must_use]
    pub fn with_targets(targets: Vec<Target>) -> Self {
        Self {
            targets: Mutex::new(targets),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Target>>, StoreError> {
        self.targets
            .lock()
            .map_err(|_| StoreError::ReadFailed("target list lock poisoned".to_string()))
    }
}

impl TargetStore for InMemoryStore {
    fn snapshot(&self) -> Result<Vec<Target>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn append(&self, target: Target) -> Result<(), StoreError> {
        self.lock()?.push(target);
        Ok(())
    }

    fn update_status(&self, id: Uuid, outcome: CheckOutcome) -> Result<(), StoreError> {
        let mut targets = self.lock()?;
        if let Some(target) = targets.iter_mut().find(|t| t.id == id) {
            target.last_status = Some(CheckStatus::from_outcome(outcome));
        }
        Ok(())
    }

    fn reload(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
