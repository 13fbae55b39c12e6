use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::course::{Level, RecentCourse};

/// Shown as "Courses Viewed" until viewing history is tracked.
const MOCK_COURSES_VIEWED: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: u32,
    pub course: String,
    pub level: Level,
    pub institution: String,
    pub status: ApplicationStatus,
    pub submitted: NaiveDate,
}

pub fn mock_applications() -> Vec<Application> {
    vec![
        Application {
            id: 1,
            course: "Computer Science".to_string(),
            level: Level::BSc,
            institution: "MIT".to_string(),
            status: ApplicationStatus::Pending,
            submitted: NaiveDate::from_ymd_opt(2023, 6, 15).unwrap_or_default(),
        },
        Application {
            id: 2,
            course: "Economics".to_string(),
            level: Level::MS,
            institution: "Harvard".to_string(),
            status: ApplicationStatus::Accepted,
            submitted: NaiveDate::from_ymd_opt(2023, 5, 10).unwrap_or_default(),
        },
    ]
}

/// Counters for the student dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub courses_viewed: usize,
    pub applications: usize,
    pub accepted_offers: usize,
}

impl DashboardStats {
    pub fn from_records(recent: &[RecentCourse], applications: &[Application]) -> Self {
        Self {
            courses_viewed: MOCK_COURSES_VIEWED.max(recent.len()),
            applications: applications.len(),
            accepted_offers: applications
                .iter()
                .filter(|a| a.status == ApplicationStatus::Accepted)
                .count(),
        }
    }
}
