//! Account ledger service library.
//!
//! - **domain**: entities, ports and the ledger services
//! - **inbound**: HTTP adapter
//! - **outbound**: in-memory and PostgreSQL storage adapters
//! - **settings**: environment-driven configuration

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
