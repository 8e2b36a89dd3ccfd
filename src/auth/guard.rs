//! The session guard's decision function.
//!
//! `decide` maps a route class and the state of the session token to what should
//! happen to the request. It holds no state and performs no I/O; `SessionGuard`
//! (see `middleware.rs`) applies its answer to live requests.

/// Where unauthenticated visitors of protected pages are sent.
pub const LOGIN_PATH: &str = "/login";
/// Where authenticated visitors of the login/register pages are sent.
pub const DASHBOARD_PATH: &str = "/dashboard";

const PROTECTED_PREFIXES: [&str; 3] = ["/dashboard", "/todos", "/categories"];
const AUTH_ONLY_PATHS: [&str; 2] = ["/login", "/register"];

/// The guard's view of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Pages that need a session: `/dashboard`, `/todos`, `/categories` and below.
    Protected,
    /// Pages only meaningful without a session: `/login`, `/register`.
    AuthOnly,
    /// Everything else, including the JSON API and `/health`.
    Public,
}

impl RouteClass {
    pub fn of(path: &str) -> Self {
        if PROTECTED_PREFIXES.iter().any(|prefix| under(path, prefix)) {
            RouteClass::Protected
        } else if AUTH_ONLY_PATHS.contains(&path) {
            RouteClass::AuthOnly
        } else {
            RouteClass::Public
        }
    }
}

/// `path` is `prefix` itself or a segment below it.
fn under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// What the request carried in the `token` cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Absent,
    Valid,
    Invalid,
}

/// What the guard does with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Hand the request to the handler untouched.
    Allow,
    /// Hand the request on as anonymous and clear the stale cookie on the way out.
    AllowAndClearCookie,
    /// Answer with a redirect instead of calling the handler.
    Redirect {
        location: &'static str,
        clear_cookie: bool,
    },
}

pub fn decide(route: RouteClass, token: TokenState) -> Decision {
    match (route, token) {
        (RouteClass::Protected, TokenState::Absent) => Decision::Redirect {
            location: LOGIN_PATH,
            clear_cookie: false,
        },
        (RouteClass::Protected, TokenState::Invalid) => Decision::Redirect {
            location: LOGIN_PATH,
            clear_cookie: true,
        },
        (RouteClass::Protected, TokenState::Valid) => Decision::Allow,
        (RouteClass::AuthOnly, TokenState::Valid) => Decision::Redirect {
            location: DASHBOARD_PATH,
            clear_cookie: false,
        },
        (RouteClass::AuthOnly, TokenState::Invalid) => Decision::AllowAndClearCookie,
        (RouteClass::AuthOnly, TokenState::Absent) | (RouteClass::Public, _) => Decision::Allow,
    }
}
