use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::auth::Credential;
use crate::config::Config;
use crate::fixtures::{Fixtures, DEMO_EMAIL, DEMO_PASSWORD};
use crate::models::{Activity, Channel, Message, Notification, Project, Task, User};
use crate::repository::{InMemoryRepository, Repository};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn Repository<User>>,
    pub projects: Arc<dyn Repository<Project>>,
    pub tasks: Arc<dyn Repository<Task>>,
    pub channels: Arc<dyn Repository<Channel>>,
    pub messages: Arc<dyn Repository<Message>>,
    pub activities: Arc<dyn Repository<Activity>>,
    pub notifications: Arc<dyn Repository<Notification>>,
    pub credentials: Arc<Vec<Credential>>,
    pub ids: Arc<IdGenerator>,
    pub clock: Clock,
    pub config: Config,
}

impl AppState {
    /// Fresh repositories loaded from the fixture set.
    pub fn seeded(config: Config) -> Result<Self, bcrypt::BcryptError> {
        Self::seeded_at(config, Clock::System)
    }

    /// Fixtures are laid out around `clock.now()`, and date-relative views
    /// read "today" from the same clock.
    pub fn seeded_at(config: Config, clock: Clock) -> Result<Self, bcrypt::BcryptError> {
        let fixtures = Fixtures::seed(clock.now());
        let demo_user = fixtures
            .users
            .iter()
            .find(|u| u.email == DEMO_EMAIL)
            .map(|u| u.id.clone())
            .unwrap_or_default();
        let credentials = vec![Credential {
            email: DEMO_EMAIL.to_string(),
            password_hash: bcrypt::hash(DEMO_PASSWORD, config.bcrypt_cost)?,
            user_id: demo_user,
        }];

        Ok(Self {
            users: Arc::new(InMemoryRepository::new("User", fixtures.users)),
            projects: Arc::new(InMemoryRepository::new("Project", fixtures.projects)),
            tasks: Arc::new(InMemoryRepository::new("Task", fixtures.tasks)),
            channels: Arc::new(InMemoryRepository::new("Channel", fixtures.channels)),
            messages: Arc::new(InMemoryRepository::new("Message", fixtures.messages)),
            activities: Arc::new(InMemoryRepository::new("Activity", fixtures.activities)),
            notifications: Arc::new(InMemoryRepository::new(
                "Notification",
                fixtures.notifications,
            )),
            credentials: Arc::new(credentials),
            ids: Arc::new(IdGenerator::default()),
            clock,
            config,
        })
    }

    /// Stand-in for network latency; the only suspension point of a handler.
    pub async fn simulate_latency(&self) {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
    }

    pub async fn simulate_upload_latency(&self) {
        if !self.config.upload_latency.is_zero() {
            tokio::time::sleep(self.config.upload_latency).await;
        }
    }

    /// Clock pinned to the moment of seeding.
    #[cfg(test)]
    pub fn for_tests() -> actix_web::web::Data<Self> {
        Self::for_tests_at(Utc::now())
    }

    #[cfg(test)]
    pub fn for_tests_at(at: DateTime<Utc>) -> actix_web::web::Data<Self> {
        match Self::seeded_at(Config::for_tests(), Clock::Fixed(at)) {
            Ok(state) => actix_web::web::Data::new(state),
            Err(e) => panic!("seeding test state failed: {}", e),
        }
    }
}

/// Where "now" comes from for date-relative views.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Fixed(at) => at,
        }
    }

    pub fn today(self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Issues `<prefix>_<millis>` ids. A second id in the same millisecond gets
/// the next millisecond, so ids never repeat within a process.
#[derive(Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn next(&self, prefix: &str) -> String {
        let now = Utc::now().timestamp_millis();
        let issued = match self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(now.max(prev + 1))
            }) {
            Ok(prev) | Err(prev) => now.max(prev + 1),
        };
        format!("{}_{}", prefix, issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_never_repeat() {
        let ids = IdGenerator::default();
        let issued: HashSet<_> = (0..1000).map(|_| ids.next("task")).collect();
        assert_eq!(issued.len(), 1000);
        assert!(issued.iter().all(|id| id.starts_with("task_")));
    }

    #[test]
    fn id_suffix_is_epoch_millis() {
        let before = Utc::now().timestamp_millis();
        let id = IdGenerator::default().next("proj");
        let millis: i64 = id.trim_start_matches("proj_").parse().unwrap();
        assert!(millis >= before);
    }

    #[test]
    fn fixed_clock_does_not_move() {
        let at = Utc::now() - chrono::Duration::days(400);
        let clock = Clock::Fixed(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.today(), at.date_naive());
        assert_eq!(AppState::for_tests_at(at).clock.today(), at.date_naive());
    }

    #[test]
    fn seeded_state_has_demo_credential() {
        let state = AppState::for_tests();
        assert_eq!(state.credentials.len(), 1);
        assert_eq!(state.credentials[0].user_id, "user_1");
        assert!(bcrypt::verify(DEMO_PASSWORD, &state.credentials[0].password_hash).unwrap());
    }
}
