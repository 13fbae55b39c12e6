//! Fixed route table and navbar link sets.

use std::fmt;

use crate::auth::UserKind;

/// Every destination the front-ends know how to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    StudentLogin,
    StudentRegister,
    StudentDashboard,
    StudentCourses,
    InstitutionLogin,
    InstitutionRegister,
    InstitutionDashboard,
    NotFound,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::StudentLogin => "/student/login",
            Route::StudentRegister => "/student/register",
            Route::StudentDashboard => "/student/dashboard",
            Route::StudentCourses => "/student/courses",
            Route::InstitutionLogin => "/institution/login",
            Route::InstitutionRegister => "/institution/register",
            Route::InstitutionDashboard => "/institution/dashboard",
            Route::NotFound => "*",
        }
    }

    /// Resolve a path. Unknown paths are `NotFound`.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match if trimmed.is_empty() { "/" } else { trimmed } {
            "/" => Route::Home,
            "/student/login" => Route::StudentLogin,
            "/student/register" => Route::StudentRegister,
            "/student/dashboard" => Route::StudentDashboard,
            "/student/courses" => Route::StudentCourses,
            "/institution/login" => Route::InstitutionLogin,
            "/institution/register" => Route::InstitutionRegister,
            "/institution/dashboard" => Route::InstitutionDashboard,
            _ => Route::NotFound,
        }
    }

    pub fn dashboard_for(kind: UserKind) -> Self {
        match kind {
            UserKind::Student => Route::StudentDashboard,
            UserKind::Institution => Route::InstitutionDashboard,
        }
    }

    pub fn login_for(kind: UserKind) -> Self {
        match kind {
            UserKind::Student => Route::StudentLogin,
            UserKind::Institution => Route::InstitutionLogin,
        }
    }

    pub fn register_for(kind: UserKind) -> Self {
        match kind {
            UserKind::Student => Route::StudentRegister,
            UserKind::Institution => Route::InstitutionRegister,
        }
    }

    /// The session kind a route is restricted to, if any.
    pub fn required_kind(&self) -> Option<UserKind> {
        match self {
            Route::StudentDashboard | Route::StudentCourses => Some(UserKind::Student),
            _ => None,
        }
    }

    /// Where to go instead when the session does not match `required_kind`.
    pub fn guard(self, kind: Option<UserKind>) -> Self {
        match self.required_kind() {
            Some(required) if kind != Some(required) => Route::login_for(required),
            _ => self,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A navbar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub name: &'static str,
    pub href: &'static str,
}

impl NavLink {
    const fn new(name: &'static str, href: &'static str) -> Self {
        Self { name, href }
    }

    pub fn route(&self) -> Route {
        Route::from_path(self.href)
    }
}

const ANONYMOUS_LINKS: [NavLink; 3] = [
    NavLink::new("Home", "/"),
    NavLink::new("About", "/about"),
    NavLink::new("Contact", "/contact"),
];

const STUDENT_LINKS: [NavLink; 3] = [
    NavLink::new("Dashboard", "/student/dashboard"),
    NavLink::new("Courses", "/student/courses"),
    NavLink::new("My Applications", "/student/applications"),
];

const INSTITUTION_LINKS: [NavLink; 3] = [
    NavLink::new("Dashboard", "/institution/dashboard"),
    NavLink::new("Manage Courses", "/institution/courses"),
    NavLink::new("Applications", "/institution/applications"),
];

/// Navbar links for the current session kind.
pub fn nav_links(kind: Option<UserKind>) -> &'static [NavLink] {
    match kind {
        None => &ANONYMOUS_LINKS,
        Some(UserKind::Student) => &STUDENT_LINKS,
        Some(UserKind::Institution) => &INSTITUTION_LINKS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Route; 8] = [
        Route::Home,
        Route::StudentLogin,
        Route::StudentRegister,
        Route::StudentDashboard,
        Route::StudentCourses,
        Route::InstitutionLogin,
        Route::InstitutionRegister,
        Route::InstitutionDashboard,
    ];

    #[test]
    fn test_route_paths_resolve_back() {
        for route in ALL {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn test_route_unknown_paths() {
        assert_eq!(Route::from_path("/about"), Route::NotFound);
        assert_eq!(Route::from_path("/student/applications"), Route::NotFound);
        assert_eq!(Route::from_path("/student/courses/1/apply"), Route::NotFound);
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/student/login/"), Route::StudentLogin);
    }

    #[test]
    fn test_dashboard_for_kind() {
        assert_eq!(Route::dashboard_for(UserKind::Student).path(), "/student/dashboard");
        assert_eq!(Route::dashboard_for(UserKind::Institution).path(), "/institution/dashboard");
    }

    #[test]
    fn test_guard_redirects_non_students() {
        assert_eq!(Route::StudentCourses.guard(None), Route::StudentLogin);
        assert_eq!(Route::StudentDashboard.guard(Some(UserKind::Institution)), Route::StudentLogin);
        assert_eq!(Route::StudentDashboard.guard(Some(UserKind::Student)), Route::StudentDashboard);
        assert_eq!(Route::Home.guard(None), Route::Home);
        assert_eq!(Route::InstitutionDashboard.guard(None), Route::InstitutionDashboard);
    }

    #[test]
    fn test_nav_links_per_kind() {
        let names = |kind| nav_links(kind).iter().map(|l| l.name).collect::<Vec<_>>();
        assert_eq!(names(None), vec!["Home", "About", "Contact"]);
        assert_eq!(names(Some(UserKind::Student)), vec!["Dashboard", "Courses", "My Applications"]);
        assert_eq!(
            names(Some(UserKind::Institution)),
            vec!["Dashboard", "Manage Courses", "Applications"]
        );
        assert_eq!(nav_links(Some(UserKind::Student))[1].route(), Route::StudentCourses);
        assert_eq!(nav_links(None)[1].route(), Route::NotFound);
    }
}
