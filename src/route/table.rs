//! Route registration and resolution.
//!
//! [`RouteTable`] keeps patterns in registration order and resolves a path to
//! the payload built by the first matching route. The [`Resolver`] trait is
//! the seam the navigator consumes, so any `Fn(&str) -> Option<P>` works too.

use std::fmt;

use super::pattern::{Params, RouteError, RoutePattern};

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Turns a path into a rendered payload, or `None` for an unknown path.
pub trait Resolver<P> {
    fn resolve(&self, path: &str) -> Option<P>;
}

impl<P, F> Resolver<P> for F
where
    F: Fn(&str) -> Option<P>,
{
    fn resolve(&self, path: &str) -> Option<P> {
        self(path)
    }
}

// ---------------------------------------------------------------------------
// RouteTable
// ---------------------------------------------------------------------------

type Builder<P> = Box<dyn Fn(&Params) -> P>;

struct Route<P> {
    pattern: RoutePattern,
    build: Builder<P>,
}

/// Ordered set of `(pattern, builder)` registrations.
pub struct RouteTable<P> {
    routes: Vec<Route<P>>,
}

impl<P> RouteTable<P> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a route. An invalid template is a programmer error and is
    /// reported immediately.
    pub fn route(
        mut self,
        template: &str,
        build: impl Fn(&Params) -> P + 'static,
    ) -> Result<Self, RouteError> {
        self.add(template, build)?;
        Ok(self)
    }

    /// Register a route on an existing table.
    pub fn add(
        &mut self,
        template: &str,
        build: impl Fn(&Params) -> P + 'static,
    ) -> Result<(), RouteError> {
        let pattern = RoutePattern::parse(template)?;
        self.routes.push(Route {
            pattern,
            build: Box::new(build),
        });
        Ok(())
    }

    /// Find the first pattern matching `path` and its captured parameters.
    pub fn find(&self, path: &str) -> Option<(&RoutePattern, Params)> {
        self.routes
            .iter()
            .find_map(|r| r.pattern.matches(path).map(|params| (&r.pattern, params)))
    }

    /// Registered templates in order.
    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.pattern.template())
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<P> Default for RouteTable<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for RouteTable<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.templates().collect::<Vec<_>>())
            .finish()
    }
}

impl<P> Resolver<P> for RouteTable<P> {
    fn resolve(&self, path: &str) -> Option<P> {
        self.routes.iter().find_map(|r| {
            r.pattern.matches(path).map(|params| (r.build)(&params))
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> RouteTable<String> {
        RouteTable::new()
            .route("/", |_| "root".to_string())
            .unwrap()
            .route("/users/new", |_| "new-user".to_string())
            .unwrap()
            .route("/users/:id", |p| format!("user {}", p.get("id").unwrap_or("?")))
            .unwrap()
    }

    #[test]
    fn resolve_literal() {
        assert_eq!(table().resolve("/"), Some("root".to_string()));
    }

    #[test]
    fn resolve_param() {
        assert_eq!(table().resolve("/users/42"), Some("user 42".to_string()));
    }

    #[test]
    fn first_registration_wins() {
        assert_eq!(table().resolve("/users/new"), Some("new-user".to_string()));
    }

    #[test]
    fn unknown_path_is_none() {
        assert_eq!(table().resolve("/nowhere"), None);
        assert_eq!(table().resolve("/users/42/extra"), None);
    }

    #[test]
    fn find_reports_pattern() {
        let t = table();
        let (pattern, params) = t.find("/users/9").unwrap();
        assert_eq!(pattern.template(), "/users/:id");
        assert_eq!(params.get("id"), Some("9"));
    }

    #[test]
    fn invalid_template_fails_fast() {
        let result = RouteTable::<String>::new().route("/:", |_| String::new());
        assert!(result.is_err());
    }

    #[test]
    fn closure_resolver() {
        let resolver = |path: &str| (path == "/a").then(|| 1u8);
        assert_eq!(resolver.resolve("/a"), Some(1));
        assert_eq!(resolver.resolve("/b"), None);
    }

    #[test]
    fn debug_lists_templates() {
        let t = table();
        assert_eq!(t.len(), 3);
        assert_eq!(
            format!("{t:?}"),
            r#"RouteTable { routes: ["/", "/users/new", "/users/:id"] }"#
        );
    }
}
