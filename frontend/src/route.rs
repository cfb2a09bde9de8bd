use crate::session::SessionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Todos,
    Categories,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    /// Only for anonymous viewers (login, register).
    AuthOnly,
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// Session not resolved yet: show a neutral placeholder, decide later.
    Pending,
    RedirectToLogin,
    RedirectToHome,
}

impl Route {
    pub const HOME: Route = Route::Dashboard;

    pub fn to_path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/",
            Route::Todos => "/todos",
            Route::Categories => "/categories",
            Route::Profile => "/profile",
        }
    }

    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/todos" => Route::Todos,
            "/categories" => Route::Categories,
            "/profile" => Route::Profile,
            _ => Route::Dashboard,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Register => "Create account",
            Route::Dashboard => "Dashboard",
            Route::Todos => "Todos",
            Route::Categories => "Categories",
            Route::Profile => "Profile",
        }
    }

    pub fn protection(&self) -> Protection {
        match self {
            Route::Login | Route::Register => Protection::AuthOnly,
            _ => Protection::Protected,
        }
    }
}

pub fn guard(status: SessionStatus, route: Route) -> GuardDecision {
    match (status, route.protection()) {
        (SessionStatus::Idle | SessionStatus::Loading, _) => GuardDecision::Pending,
        (SessionStatus::Unauthenticated, Protection::Protected) => GuardDecision::RedirectToLogin,
        (SessionStatus::Authenticated, Protection::AuthOnly) => GuardDecision::RedirectToHome,
        _ => GuardDecision::Render,
    }
}

/// Where the viewer actually ends up after the guard has run.
pub fn resolve(status: SessionStatus, requested: Route) -> Route {
    match guard(status, requested) {
        GuardDecision::RedirectToLogin => Route::Login,
        GuardDecision::RedirectToHome => Route::HOME,
        GuardDecision::Render | GuardDecision::Pending => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Route; 6] = [
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Todos,
        Route::Categories,
        Route::Profile,
    ];

    #[test]
    fn paths_round_trip_and_unknown_goes_home() {
        for route in ALL {
            assert_eq!(Route::from_path(route.to_path()), route);
        }
        assert_eq!(Route::from_path("/todos/"), Route::Todos);
        assert_eq!(Route::from_path("/nope"), Route::Dashboard);
        assert_eq!(Route::from_path(""), Route::Dashboard);
    }

    #[test]
    fn never_redirects_before_session_resolves() {
        for status in [SessionStatus::Idle, SessionStatus::Loading] {
            for route in ALL {
                assert_eq!(guard(status, route), GuardDecision::Pending);
                assert_eq!(resolve(status, route), route);
            }
        }
    }

    #[test]
    fn anonymous_viewers_are_sent_to_login() {
        assert_eq!(guard(SessionStatus::Unauthenticated, Route::Todos), GuardDecision::RedirectToLogin);
        assert_eq!(resolve(SessionStatus::Unauthenticated, Route::Profile), Route::Login);
        assert_eq!(guard(SessionStatus::Unauthenticated, Route::Register), GuardDecision::Render);
    }

    #[test]
    fn signed_in_viewers_skip_auth_pages() {
        assert_eq!(guard(SessionStatus::Authenticated, Route::Login), GuardDecision::RedirectToHome);
        assert_eq!(resolve(SessionStatus::Authenticated, Route::Register), Route::Dashboard);
        assert_eq!(guard(SessionStatus::Authenticated, Route::Categories), GuardDecision::Render);
    }
}
