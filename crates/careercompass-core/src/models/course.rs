use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::contains_ignore_case;

/// Degree level a course leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    BSc,
    MS,
    PhD,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::BSc, Level::MS, Level::PhD];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::BSc => "BSc",
            Level::MS => "MS",
            Level::PhD => "PhD",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: u32,
    pub name: String,
    pub level: Level,
    pub institution: String,
    pub location: String,
    pub duration: String,
    pub deadline: NaiveDate,
    pub description: String,
}

/// A course the student looked at recently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentCourse {
    pub id: u32,
    pub name: String,
    pub level: Level,
    pub institution: String,
    /// Relative time, already formatted for display.
    pub viewed: String,
}

/// Search text plus an optional level, applied to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    pub search: String,
    pub level: Option<Level>,
}

impl CourseFilter {
    /// Select `level`, or clear it when it is already selected.
    pub fn toggle_level(&mut self, level: Level) {
        self.level = if self.level == Some(level) {
            None
        } else {
            Some(level)
        };
    }

    pub fn reset(&mut self) {
        self.search.clear();
        self.level = None;
    }

    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.level.is_some()
    }

    /// Name or institution contains the search text, ignoring case.
    pub fn matches(&self, course: &Course) -> bool {
        let search_ok = self.search.is_empty()
            || contains_ignore_case(&course.name, &self.search)
            || contains_ignore_case(&course.institution, &self.search);
        let level_ok = self.level.map_or(true, |level| course.level == level);
        search_ok && level_ok
    }

    pub fn apply<'a>(&self, courses: &'a [Course]) -> Vec<&'a Course> {
        courses.iter().filter(|c| self.matches(c)).collect()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// The browsable catalog.
pub fn mock_courses() -> Vec<Course> {
    vec![
        Course {
            id: 1,
            name: "Computer Science".to_string(),
            level: Level::BSc,
            institution: "Massachusetts Institute of Technology".to_string(),
            location: "Cambridge, USA".to_string(),
            duration: "3 years".to_string(),
            deadline: date(2023, 12, 15),
            description: "A comprehensive program covering algorithms, data structures, and software engineering principles.".to_string(),
        },
        Course {
            id: 2,
            name: "Data Science".to_string(),
            level: Level::MS,
            institution: "Stanford University".to_string(),
            location: "Stanford, USA".to_string(),
            duration: "2 years".to_string(),
            deadline: date(2023, 11, 30),
            description: "Advanced study of statistical methods, machine learning, and data visualization techniques.".to_string(),
        },
        Course {
            id: 3,
            name: "Artificial Intelligence".to_string(),
            level: Level::PhD,
            institution: "University of Oxford".to_string(),
            location: "Oxford, UK".to_string(),
            duration: "4 years".to_string(),
            deadline: date(2023, 10, 25),
            description: "Research-focused program exploring cutting-edge AI technologies and their applications.".to_string(),
        },
    ]
}

pub fn mock_recent_courses() -> Vec<RecentCourse> {
    let recent = |id, name: &str, level, institution: &str, viewed: &str| RecentCourse {
        id,
        name: name.to_string(),
        level,
        institution: institution.to_string(),
        viewed: viewed.to_string(),
    };
    vec![
        recent(1, "Computer Science", Level::BSc, "MIT", "2 days ago"),
        recent(2, "Data Science", Level::MS, "Stanford University", "4 days ago"),
        recent(3, "Artificial Intelligence", Level::PhD, "Oxford University", "1 week ago"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(courses: Vec<&Course>) -> Vec<&str> {
        courses.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let courses = mock_courses();
        let filter = CourseFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&courses).len(), 3);
    }

    #[test]
    fn test_search_matches_name_or_institution() {
        let courses = mock_courses();
        let mut filter = CourseFilter::default();

        filter.search = "DATA".to_string();
        assert_eq!(names(filter.apply(&courses)), vec!["Data Science"]);

        filter.search = "oxford".to_string();
        assert_eq!(names(filter.apply(&courses)), vec!["Artificial Intelligence"]);

        filter.search = "university".to_string();
        assert_eq!(filter.apply(&courses).len(), 2);
    }

    #[test]
    fn test_level_toggle() {
        let courses = mock_courses();
        let mut filter = CourseFilter::default();

        filter.toggle_level(Level::PhD);
        assert_eq!(names(filter.apply(&courses)), vec!["Artificial Intelligence"]);

        filter.toggle_level(Level::MS);
        assert_eq!(filter.level, Some(Level::MS));

        filter.toggle_level(Level::MS);
        assert_eq!(filter.level, None);
    }

    #[test]
    fn test_combined_filter_and_reset() {
        let courses = mock_courses();
        let mut filter = CourseFilter {
            search: "stanford".to_string(),
            level: Some(Level::BSc),
        };
        assert!(filter.apply(&courses).is_empty());

        filter.reset();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&courses).len(), 3);
    }

    #[test]
    fn test_mock_deadlines_parse() {
        let courses = mock_courses();
        assert_eq!(courses[0].deadline.to_string(), "2023-12-15");
        assert_eq!(mock_recent_courses()[1].viewed, "4 days ago");
    }
}
