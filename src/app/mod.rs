// src/app/mod.rs
pub mod screens;

pub use screens::{
    logout, resolve_root, AppContext, ArticleScreen, BookmarksScreen, FeedScreen, FormMode,
    LoginScreen, ScreenState,
};

use crate::title::ArticleRef;

/// Application routes. `Article` carries the page name decoded from its
/// percent-encoded path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Logout,
    Feed,
    Bookmarks,
    Article(ArticleRef),
}

const ARTICLE_PREFIX: &str = "/article/";

impl Route {
    /// Parse a path. Unknown paths (including an empty article segment)
    /// resolve to `None`.
    pub fn parse(path: &str) -> Option<Route> {
        match path {
            "/" => Some(Route::Root),
            "/login" => Some(Route::Login),
            "/logout" => Some(Route::Logout),
            "/feed" => Some(Route::Feed),
            "/bookmarks" => Some(Route::Bookmarks),
            p => {
                let rest = p.strip_prefix(ARTICLE_PREFIX)?;
                if rest.is_empty() {
                    return None;
                }
                let decoded = urlencoding::decode(rest).ok()?;
                Some(Route::Article(ArticleRef::from_wire(decoded.into_owned())))
            }
        }
    }

    /// Render the path form, article titles percent-encoded as a single
    /// segment.
    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Logout => "/logout".to_string(),
            Route::Feed => "/feed".to_string(),
            Route::Bookmarks => "/bookmarks".to_string(),
            Route::Article(page) => format!("{ARTICLE_PREFIX}{}", page.encoded()),
        }
    }
}

/// Minimal navigation surface the screens drive: push a path or replace
/// the current location. History is kept so an embedder can walk back.
#[derive(Debug, Clone)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn push(&mut self, route: Route) {
        let prev = std::mem::replace(&mut self.current, route);
        self.history.push(prev);
    }

    /// Swap the current location without growing history (redirects).
    pub fn replace(&mut self, route: Route) {
        self.current = route;
    }

    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_routes_round_trip() {
        for path in ["/", "/login", "/logout", "/feed", "/bookmarks"] {
            let route = Route::parse(path).unwrap();
            assert_eq!(route.path(), path);
        }
    }

    #[test]
    fn article_route_round_trips_with_encoding() {
        let route = Route::Article(ArticleRef::from_wire("AC/DC"));
        let path = route.path();
        assert_eq!(path, "/article/AC%2FDC");
        assert_eq!(Route::parse(&path), Some(route));
    }

    #[test]
    fn unknown_and_empty_article_paths_do_not_parse() {
        assert_eq!(Route::parse("/nope"), None);
        assert_eq!(Route::parse("/article/"), None);
    }

    #[test]
    fn push_grows_history_and_replace_does_not() {
        let mut r = Router::new(Route::Root);
        r.push(Route::Feed);
        r.replace(Route::Login);
        assert_eq!(r.current(), &Route::Login);
        assert!(r.back());
        assert_eq!(r.current(), &Route::Root);
        assert!(!r.back());
    }
}
