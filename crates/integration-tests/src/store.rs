use std::sync::Mutex;

use async_trait::async_trait;
use storage::{NewPlanRecord, PlanStore, StorageError};

/// In-memory plan store double.
///
/// Records every insert so tests can assert on exactly what would have been
/// written, including the zero-writes cases.
#[derive(Default)]
pub struct InMemoryPlanStore {
    plans: Mutex<Vec<NewPlanRecord>>,
    fail_inserts: bool,
}

impl InMemoryPlanStore {
    /// A store where every insert fails, for exercising the log-only
    /// persistence failure path.
    pub fn failing() -> Self {
        Self {
            plans: Mutex::new(Vec::new()),
            fail_inserts: true,
        }
    }

    /// All records inserted so far.
    pub fn plans(&self) -> Vec<NewPlanRecord> {
        self.plans.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl PlanStore for InMemoryPlanStore {
    async fn insert_plan(&self, record: NewPlanRecord) -> Result<(), StorageError> {
        if self.fail_inserts {
            return Err(StorageError::Insert("connection refused".to_string()));
        }

        self.plans.lock().expect("store mutex poisoned").push(record);

        Ok(())
    }
}
