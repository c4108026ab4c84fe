// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup wiring
// - infrastructure: Postgres adapters behind the application ports
// - presentation: HTTP handlers, extractors and routing
// - application: access policy, use cases and ports
// - domain: users, roles and documents

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

#[cfg(test)]
mod test_support;
