// Seed data loaded into the repositories at startup.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{
    Activity, ActivityTarget, ActivityType, Channel, ChannelType, Message, MessageType,
    Notification, NotificationType, Priority, Project, ProjectStatus, TargetType, Task,
    TaskStatus, User, UserRole, UserStatus,
};

pub const DEMO_EMAIL: &str = "admin@example.com";
pub const DEMO_PASSWORD: &str = "123456";

pub struct Fixtures {
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub channels: Vec<Channel>,
    pub messages: Vec<Message>,
    pub activities: Vec<Activity>,
    pub notifications: Vec<Notification>,
}

impl Fixtures {
    /// Some tasks are due relative to `now`, so the dashboard always has
    /// something to show for "today".
    pub fn seed(now: DateTime<Utc>) -> Self {
        let users = users();
        let projects = projects(&users);
        let tasks = tasks(&users, now);
        let channels = channels(&users);
        let messages = messages(&users);
        let activities = activities(&users);
        Self {
            users,
            projects,
            tasks,
            channels,
            messages,
            activities,
            notifications: notifications(),
        }
    }
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn user(n: u32, name: &str, email: &str, seed: &str, role: UserRole, status: UserStatus) -> User {
    let joined = at(2024, 1, n, 0, 0);
    User {
        id: format!("user_{}", n),
        name: name.to_string(),
        email: email.to_string(),
        avatar: Some(format!(
            "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
            seed
        )),
        role,
        status,
        created_at: joined,
        updated_at: joined,
    }
}

fn users() -> Vec<User> {
    vec![
        user(1, "Zhang San", DEMO_EMAIL, "Zhang", UserRole::Admin, UserStatus::Online),
        user(2, "Li Si", "lisi@example.com", "Li", UserRole::Manager, UserStatus::Online),
        user(3, "Wang Wu", "wangwu@example.com", "Wang", UserRole::Member, UserStatus::Away),
        user(4, "Zhao Liu", "zhaoliu@example.com", "Zhao", UserRole::Member, UserStatus::Offline),
        user(5, "Sun Qi", "sunqi@example.com", "Sun", UserRole::Member, UserStatus::Online),
    ]
}

struct ProjectSeed {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    status: ProjectStatus,
    priority: Priority,
    progress: u8,
    start: NaiveDate,
    end: NaiveDate,
    members: std::ops::Range<usize>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

fn projects(users: &[User]) -> Vec<Project> {
    let seeds = [
        ProjectSeed {
            name: "TaskAI project management system",
            description: "A modern project management system with task tracking, team collaboration and progress reporting",
            category: "Software development",
            status: ProjectStatus::Active,
            priority: Priority::High,
            progress: 75,
            start: day(2024, 1, 1),
            end: day(2024, 6, 30),
            members: 0..4,
            created: at(2024, 1, 1, 0, 0),
            updated: at(2024, 1, 15, 0, 0),
        },
        ProjectSeed {
            name: "Mobile app development",
            description: "An iOS and Android app for working on the go",
            category: "Mobile development",
            status: ProjectStatus::Active,
            priority: Priority::Medium,
            progress: 45,
            start: day(2024, 2, 1),
            end: day(2024, 8, 31),
            members: 1..4,
            created: at(2024, 2, 1, 0, 0),
            updated: at(2024, 2, 15, 0, 0),
        },
        ProjectSeed {
            name: "Data analytics platform",
            description: "A web application for data visualization",
            category: "Data analytics",
            status: ProjectStatus::Overdue,
            priority: Priority::Urgent,
            progress: 30,
            start: day(2024, 1, 15),
            end: day(2024, 7, 15),
            members: 2..5,
            created: at(2024, 1, 15, 0, 0),
            updated: at(2024, 2, 1, 0, 0),
        },
        ProjectSeed {
            name: "Customer relationship management",
            description: "A CRM that helps the business manage customers and the sales pipeline",
            category: "Business management",
            status: ProjectStatus::Completed,
            priority: Priority::Medium,
            progress: 100,
            start: day(2023, 9, 1),
            end: day(2023, 12, 31),
            members: 0..3,
            created: at(2023, 9, 1, 0, 0),
            updated: at(2023, 12, 31, 0, 0),
        },
        ProjectSeed {
            name: "E-commerce platform rebuild",
            description: "Rebuild the storefront for better performance and user experience",
            category: "Software development",
            status: ProjectStatus::Active,
            priority: Priority::High,
            progress: 60,
            start: day(2024, 1, 20),
            end: day(2024, 5, 20),
            members: 0..3,
            created: at(2024, 1, 20, 0, 0),
            updated: at(2024, 2, 10, 0, 0),
        },
        ProjectSeed {
            name: "Recommendation engine",
            description: "A machine-learning based recommendation system",
            category: "Artificial intelligence",
            status: ProjectStatus::Active,
            priority: Priority::Low,
            progress: 25,
            start: day(2024, 2, 15),
            end: day(2024, 8, 15),
            members: 2..5,
            created: at(2024, 2, 15, 0, 0),
            updated: at(2024, 2, 20, 0, 0),
        },
        ProjectSeed {
            name: "Campaign management",
            description: "Planning and execution of marketing campaigns",
            category: "Marketing",
            status: ProjectStatus::Completed,
            priority: Priority::Low,
            progress: 100,
            start: day(2023, 10, 1),
            end: day(2024, 1, 31),
            members: 1..4,
            created: at(2023, 10, 1, 0, 0),
            updated: at(2024, 1, 31, 0, 0),
        },
        ProjectSeed {
            name: "Financial reporting",
            description: "Automated generation of financial statements",
            category: "Business management",
            status: ProjectStatus::Active,
            priority: Priority::Medium,
            progress: 80,
            start: day(2023, 11, 1),
            end: day(2024, 3, 31),
            members: 0..2,
            created: at(2023, 11, 1, 0, 0),
            updated: at(2024, 2, 15, 0, 0),
        },
    ];

    seeds
        .into_iter()
        .enumerate()
        .map(|(i, seed)| Project {
            id: format!("proj_{}", i + 1),
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            category: seed.category.to_string(),
            status: seed.status,
            priority: seed.priority,
            progress: seed.progress,
            start_date: seed.start,
            end_date: Some(seed.end),
            members: users[seed.members].to_vec(),
            tasks: Vec::new(),
            created_at: seed.created,
            updated_at: seed.updated,
        })
        .collect()
}

struct TaskSeed {
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: Priority,
    assignee: usize,
    reporter: usize,
    project: &'static str,
    due: NaiveDate,
    hours: (f32, f32),
    tags: [&'static str; 2],
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

fn tasks(users: &[User], now: DateTime<Utc>) -> Vec<Task> {
    let today = now.date_naive();
    let tomorrow = today + Duration::days(1);

    let seeds = [
        TaskSeed {
            title: "Design the system architecture",
            description: "Technical architecture covering frontend, backend and database",
            status: TaskStatus::Completed,
            priority: Priority::High,
            assignee: 0,
            reporter: 1,
            project: "proj_1",
            due: day(2024, 1, 15),
            hours: (40.0, 0.0),
            tags: ["architecture", "design"],
            created: at(2024, 1, 1, 0, 0),
            updated: at(2024, 1, 15, 0, 0),
        },
        TaskSeed {
            title: "Implement user authentication",
            description: "Login, registration and password reset",
            status: TaskStatus::Pending,
            priority: Priority::High,
            assignee: 1,
            reporter: 0,
            project: "proj_1",
            due: today,
            hours: (24.0, 16.0),
            tags: ["auth", "security"],
            created: at(2024, 1, 10, 0, 0),
            updated: at(2024, 1, 20, 0, 0),
        },
        TaskSeed {
            title: "Design the UI",
            description: "Page layouts and component design",
            status: TaskStatus::Overdue,
            priority: Priority::Medium,
            assignee: 2,
            reporter: 0,
            project: "proj_1",
            due: day(2024, 1, 25),
            hours: (32.0, 8.0),
            tags: ["ui", "design"],
            created: at(2024, 1, 5, 0, 0),
            updated: at(2024, 1, 22, 0, 0),
        },
        TaskSeed {
            title: "Database design",
            description: "Table layout and data model",
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            assignee: 3,
            reporter: 0,
            project: "proj_1",
            due: tomorrow,
            hours: (16.0, 16.0),
            tags: ["database", "design"],
            created: at(2024, 1, 12, 0, 0),
            updated: at(2024, 1, 12, 0, 0),
        },
        TaskSeed {
            title: "Adapt screens for mobile",
            description: "Make sure every page renders well on small devices",
            status: TaskStatus::Pending,
            priority: Priority::Low,
            assignee: 2,
            reporter: 1,
            project: "proj_2",
            due: today,
            hours: (20.0, 12.0),
            tags: ["mobile", "layout"],
            created: at(2024, 2, 1, 0, 0),
            updated: at(2024, 2, 10, 0, 0),
        },
        TaskSeed {
            title: "API development",
            description: "Backend endpoints serving the app's data",
            status: TaskStatus::Overdue,
            priority: Priority::Urgent,
            assignee: 4,
            reporter: 1,
            project: "proj_2",
            due: day(2024, 2, 20),
            hours: (30.0, 18.0),
            tags: ["api", "backend"],
            created: at(2024, 2, 5, 0, 0),
            updated: at(2024, 2, 5, 0, 0),
        },
        TaskSeed {
            title: "Write unit tests",
            description: "Unit tests for the core features",
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            assignee: 0,
            reporter: 1,
            project: "proj_1",
            due: today,
            hours: (12.0, 12.0),
            tags: ["testing", "quality"],
            created: now,
            updated: now,
        },
        TaskSeed {
            title: "Performance tuning",
            description: "Improve response times across the system",
            status: TaskStatus::Completed,
            priority: Priority::High,
            assignee: 1,
            reporter: 0,
            project: "proj_1",
            due: today,
            hours: (8.0, 0.0),
            tags: ["performance", "optimization"],
            created: now,
            updated: now,
        },
    ];

    seeds
        .into_iter()
        .enumerate()
        .map(|(i, seed)| Task {
            id: format!("task_{}", i + 1),
            title: seed.title.to_string(),
            description: Some(seed.description.to_string()),
            status: seed.status,
            priority: seed.priority,
            assignee: Some(users[seed.assignee].clone()),
            reporter: users[seed.reporter].clone(),
            project_id: seed.project.to_string(),
            due_date: Some(seed.due),
            estimated_hours: Some(seed.hours.0),
            remaining_hours: Some(seed.hours.1),
            tags: seed.tags.iter().map(|t| t.to_string()).collect(),
            attachments: Vec::new(),
            comments: Vec::new(),
            created_at: seed.created,
            updated_at: seed.updated,
        })
        .collect()
}

fn channels(users: &[User]) -> Vec<Channel> {
    vec![
        Channel {
            id: "channel_1".to_string(),
            name: "Project discussion".to_string(),
            kind: ChannelType::Group,
            members: users[0..3].to_vec(),
            unread_count: 2,
            created_at: at(2024, 1, 1, 0, 0),
        },
        Channel {
            id: "channel_2".to_string(),
            name: "Tech talk".to_string(),
            kind: ChannelType::Group,
            members: users[1..4].to_vec(),
            unread_count: 0,
            created_at: at(2024, 1, 2, 0, 0),
        },
    ]
}

fn messages(users: &[User]) -> Vec<Message> {
    let seeds = [
        ("channel_1", 0, "Morning all, the sprint review is at 10:00", at(2024, 1, 15, 9, 0)),
        ("channel_1", 1, "Auth work is on track for this week", at(2024, 1, 15, 9, 5)),
        ("channel_1", 2, "UI mockups are uploaded to the shared drive", at(2024, 1, 15, 9, 12)),
        ("channel_2", 1, "Anyone tried the new connection pool settings?", at(2024, 1, 16, 14, 0)),
        ("channel_2", 3, "Yes, p99 latency dropped noticeably", at(2024, 1, 16, 14, 20)),
    ];

    seeds
        .into_iter()
        .enumerate()
        .map(|(i, (channel, sender, content, sent))| Message {
            id: format!("msg_{}", i + 1),
            channel_id: channel.to_string(),
            content: content.to_string(),
            kind: MessageType::Text,
            sender: users[sender].clone(),
            created_at: sent,
        })
        .collect()
}

fn activities(users: &[User]) -> Vec<Activity> {
    let task_target = |id: &str, name: &str| ActivityTarget {
        kind: TargetType::Task,
        id: id.to_string(),
        name: name.to_string(),
    };
    let seeds = [
        (
            ActivityType::TaskCompleted,
            0,
            "completed the task \"Design the system architecture\"",
            Some(task_target("task_1", "Design the system architecture")),
            Some("proj_1"),
            at(2024, 1, 15, 18, 0),
        ),
        (
            ActivityType::TaskCreated,
            0,
            "created the task \"Implement user authentication\"",
            Some(task_target("task_2", "Implement user authentication")),
            Some("proj_1"),
            at(2024, 1, 10, 9, 0),
        ),
        (
            ActivityType::CommentAdded,
            1,
            "commented on \"Design the UI\"",
            Some(task_target("task_3", "Design the UI")),
            Some("proj_1"),
            at(2024, 1, 20, 11, 30),
        ),
        (
            ActivityType::TaskUpdated,
            2,
            "updated the task \"Adapt screens for mobile\"",
            Some(task_target("task_5", "Adapt screens for mobile")),
            Some("proj_2"),
            at(2024, 2, 10, 16, 45),
        ),
        (
            ActivityType::FileUploaded,
            3,
            "uploaded the schema diagram",
            Some(ActivityTarget {
                kind: TargetType::Project,
                id: "proj_1".to_string(),
                name: "TaskAI project management system".to_string(),
            }),
            Some("proj_1"),
            at(2024, 1, 12, 10, 0),
        ),
        (
            ActivityType::UserJoined,
            4,
            "joined the team",
            None,
            None,
            at(2024, 1, 5, 8, 0),
        ),
    ];

    seeds
        .into_iter()
        .enumerate()
        .map(|(i, (kind, actor, description, target, project, when))| Activity {
            id: format!("activity_{}", i + 1),
            kind,
            description: description.to_string(),
            actor: users[actor].clone(),
            target,
            project_id: project.map(String::from),
            created_at: when,
        })
        .collect()
}

fn notifications() -> Vec<Notification> {
    let seeds = [
        (
            "New task assigned",
            "You were assigned: Implement user authentication",
            NotificationType::Info,
            false,
            "/tasks/task_2",
            at(2024, 1, 1, 9, 30),
        ),
        (
            "Task due soon",
            "\"Design the UI\" is due in 3 days",
            NotificationType::Warning,
            false,
            "/tasks/task_3",
            at(2024, 1, 1, 10, 0),
        ),
        (
            "Project progress updated",
            "TaskAI project management system is now 75% complete",
            NotificationType::Success,
            true,
            "/projects/proj_1",
            at(2024, 1, 1, 11, 0),
        ),
        (
            "New message",
            "You have new messages in Project discussion",
            NotificationType::Info,
            true,
            "/messages/channel_1",
            at(2024, 1, 1, 12, 0),
        ),
        (
            "Scheduled maintenance",
            "The system will be down for maintenance tonight 22:00-24:00",
            NotificationType::Warning,
            false,
            "",
            at(2024, 1, 1, 15, 0),
        ),
    ];

    seeds
        .into_iter()
        .enumerate()
        .map(|(i, (title, message, kind, is_read, url, when))| Notification {
            id: format!("notif_{}", i + 1),
            title: title.to_string(),
            message: message.to_string(),
            kind,
            is_read,
            action_url: Some(url.to_string()).filter(|u| !u.is_empty()),
            created_at: when,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn collection_sizes() {
        let fixtures = Fixtures::seed(Utc::now());
        assert_eq!(fixtures.users.len(), 5);
        assert_eq!(fixtures.projects.len(), 8);
        assert_eq!(fixtures.tasks.len(), 8);
        assert_eq!(fixtures.notifications.len(), 5);
        assert_eq!(fixtures.channels.len(), 2);
    }

    #[test]
    fn ids_are_unique_per_collection() {
        let fixtures = Fixtures::seed(Utc::now());
        let project_ids: HashSet<_> = fixtures.projects.iter().map(|p| &p.id).collect();
        let task_ids: HashSet<_> = fixtures.tasks.iter().map(|t| &t.id).collect();
        assert_eq!(project_ids.len(), fixtures.projects.len());
        assert_eq!(task_ids.len(), fixtures.tasks.len());
    }

    #[test]
    fn demo_user_is_first_and_admin() {
        let fixtures = Fixtures::seed(Utc::now());
        assert_eq!(fixtures.users[0].email, DEMO_EMAIL);
        assert_eq!(fixtures.users[0].role, UserRole::Admin);
    }

    #[test]
    fn pending_tasks_match_seed() {
        let fixtures = Fixtures::seed(Utc::now());
        let pending: Vec<_> = fixtures
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(pending, ["task_2", "task_4", "task_5", "task_7"]);
    }

    #[test]
    fn messages_belong_to_seeded_channels() {
        let fixtures = Fixtures::seed(Utc::now());
        let channel_ids: HashSet<_> = fixtures.channels.iter().map(|c| c.id.as_str()).collect();
        assert!(fixtures
            .messages
            .iter()
            .all(|m| channel_ids.contains(m.channel_id.as_str())));
    }
}
