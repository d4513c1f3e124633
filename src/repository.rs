use std::sync::{PoisonError, RwLock};

use crate::error::{ApiError, ApiResult};
use crate::models::{Activity, Channel, Message, Notification, Project, Task, User};

/// Anything stored in a repository is addressed by a string id.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(impl Record for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

impl_record!(User, Project, Task, Channel, Message, Activity, Notification);

/// Storage for one collection. Handlers only ever see this trait, so the
/// in-memory store can be swapped for a persistent one.
///
/// Each call is one synchronous critical section; implementations must not
/// hold their lock across an `.await`.
pub trait Repository<T: Record>: Send + Sync {
    /// Human-readable entity name used in not-found messages.
    fn entity(&self) -> &'static str;

    /// Snapshot of every record in insertion order.
    fn list(&self) -> Vec<T>;

    fn find(&self, id: &str) -> Option<T>;

    fn get(&self, id: &str) -> ApiResult<T> {
        self.find(id).ok_or_else(|| ApiError::not_found(self.entity()))
    }

    fn insert(&self, record: T) -> T;

    /// Runs `apply` against a copy of the record and writes the copy back
    /// only if `apply` succeeds.
    fn update(&self, id: &str, apply: &mut dyn FnMut(&mut T) -> ApiResult<()>) -> ApiResult<T>;

    fn delete(&self, id: &str) -> ApiResult<T>;
}

pub struct InMemoryRepository<T> {
    entity: &'static str,
    records: RwLock<Vec<T>>,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new(entity: &'static str, seed: Vec<T>) -> Self {
        Self {
            entity,
            records: RwLock::new(seed),
        }
    }
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn entity(&self) -> &'static str {
        self.entity
    }

    fn list(&self) -> Vec<T> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn find(&self, id: &str) -> Option<T> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    fn insert(&self, record: T) -> T {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        record
    }

    fn update(&self, id: &str, apply: &mut dyn FnMut(&mut T) -> ApiResult<()>) -> ApiResult<T> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| ApiError::not_found(self.entity))?;

        let mut draft = slot.clone();
        apply(&mut draft)?;
        *slot = draft.clone();
        Ok(draft)
    }

    fn delete(&self, id: &str) -> ApiResult<T> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| ApiError::not_found(self.entity))?;
        Ok(records.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationType;
    use chrono::Utc;

    fn note(id: &str) -> Notification {
        Notification {
            id: id.to_string(),
            title: format!("title {}", id),
            message: String::new(),
            kind: NotificationType::Info,
            is_read: false,
            action_url: None,
            created_at: Utc::now(),
        }
    }

    fn repo() -> InMemoryRepository<Notification> {
        InMemoryRepository::new("Notification", vec![note("n_1"), note("n_2")])
    }

    #[test]
    fn get_hits_and_misses() {
        let repo = repo();
        assert_eq!(repo.get("n_2").unwrap().id, "n_2");
        match repo.get("n_9") {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "Notification not found"),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn insert_appends_in_order() {
        let repo = repo();
        repo.insert(note("n_3"));
        let ids: Vec<_> = repo.list().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, ["n_1", "n_2", "n_3"]);
    }

    #[test]
    fn failed_update_leaves_record_untouched() {
        let repo = repo();
        let result = repo.update("n_1", &mut |n: &mut Notification| {
            n.is_read = true;
            Err(ApiError::BadRequest("rejected".into()))
        });
        assert!(result.is_err());
        assert!(!repo.get("n_1").unwrap().is_read);

        let updated = repo
            .update("n_1", &mut |n: &mut Notification| {
                n.is_read = true;
                Ok(())
            })
            .unwrap();
        assert!(updated.is_read);
        assert!(repo.get("n_1").unwrap().is_read);
    }

    #[test]
    fn delete_removes_once() {
        let repo = repo();
        assert_eq!(repo.delete("n_1").unwrap().id, "n_1");
        assert!(repo.delete("n_1").is_err());
        assert_eq!(repo.list().len(), 1);
    }
}
