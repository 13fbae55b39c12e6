//! Data models for the course marketplace.
//!
//! All records here are mock data standing in for a future backend:
//!
//! - `Course`, `Level`: the browsable course catalog and its filter
//! - `RecentCourse`: courses a student viewed lately
//! - `Application`, `ApplicationStatus`: a student's submitted applications
//! - `DashboardStats`: the counters shown on the student dashboard

pub mod application;
pub mod course;

pub use application::{mock_applications, Application, ApplicationStatus, DashboardStats};
pub use course::{mock_courses, mock_recent_courses, Course, CourseFilter, Level, RecentCourse};
