use auth::Role;

/// Access rule a route pattern maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRule {
    /// No session required.
    Public,

    /// Never served from this service, for any principal.
    DenyAll,

    /// Requires a session whose role equals the given role.
    RequireRole(Role),

    /// Requires any valid session.
    Authenticated,
}

/// The coarse route table, first match wins.
///
/// Ordering is the policy: the administrative denylist sits ahead of the
/// trailing authenticated catch-all, and self-service entries carry their
/// role explicitly so the Employee role is never granted anything by falling
/// through. `/api/v1/employees/me` precedes `/api/v1/employees` so the
/// narrower rule cannot be shadowed.
///
/// Patterns ending in "/*" match the bare prefix and anything beneath it;
/// everything else matches exactly.
const ROUTE_TABLE: &[(&str, RouteRule)] = &[
    // Credential endpoints are public by design
    ("/api/v1/auth/login", RouteRule::Public),
    ("/api/v1/auth/set-password", RouteRule::Public),
    ("/api/v1/auth/validate-token", RouteRule::Public),
    // Administrative namespaces, closed outright
    ("/api/v1/admin/*", RouteRule::DenyAll),
    ("/api/v1/governance/*", RouteRule::DenyAll),
    ("/api/v1/finance/*", RouteRule::DenyAll),
    ("/api/v1/payroll/*", RouteRule::DenyAll),
    // Self-service surface, Employee role only
    ("/api/v1/employees/me", RouteRule::RequireRole(Role::Employee)),
    ("/api/v1/attendance/me", RouteRule::RequireRole(Role::Employee)),
    ("/api/v1/leave/me", RouteRule::RequireRole(Role::Employee)),
    ("/api/v1/leave/balance/me", RouteRule::RequireRole(Role::Employee)),
    ("/api/v1/timesheets/me", RouteRule::RequireRole(Role::Employee)),
    // Everything else needs a session; per-operation checks take it from here
    ("/*", RouteRule::Authenticated),
];

/// Look up the rule for a path. Paths that somehow escape the table fall
/// back to `DenyAll`.
pub fn route_rule(path: &str) -> RouteRule {
    for (pattern, rule) in ROUTE_TABLE {
        if matches_pattern(pattern, path) {
            return *rule;
        }
    }
    RouteRule::DenyAll
}

fn matches_pattern(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix("/*") {
        Some(prefix) => {
            path == prefix || (path.starts_with(prefix) && path[prefix.len()..].starts_with('/'))
        }
        None => path == pattern,
    }
}
