mod activity;
mod message;
mod notification;
mod project;
mod task;
mod user;

pub use activity::*;
pub use message::*;
pub use notification::*;
pub use project::*;
pub use task::*;
pub use user::*;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Shared by projects and tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

/// Fields an update body may never overwrite.
const PROTECTED_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// Records that carry an `updatedAt` stamp.
pub trait Stamped {
    fn updated_at_mut(&mut self) -> &mut DateTime<Utc>;

    fn touch(&mut self) {
        let slot = self.updated_at_mut();
        *slot = next_timestamp(*slot);
    }
}

/// Now, or one millisecond past `previous` when the clock has not moved on.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

/// Shallow merge: every top-level key of `patch` replaces the record's field
/// of the same (camelCase) name. Unknown keys are dropped.
pub fn merge_fields<T>(record: &T, patch: &Value) -> ApiResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let Value::Object(fields) = patch else {
        return Err(ApiError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    };

    let mut current = serde_json::to_value(record)
        .map_err(|e| ApiError::Internal(format!("record serialization failed: {}", e)))?;
    if let Value::Object(target) = &mut current {
        for (key, value) in fields {
            if PROTECTED_FIELDS.contains(&key.as_str()) {
                continue;
            }
            target.insert(key.clone(), value.clone());
        }
    }

    Ok(serde_json::from_value(current)?)
}
