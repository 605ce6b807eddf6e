// Public fallible APIs in this crate share one concrete error contract (`NavError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod config;
pub mod error;
pub mod models;
pub mod outline;
pub mod repository;
pub mod service;
pub mod store;

pub use config::NavConfig;
pub use error::{NavError, RepositoryError, Result};
pub use models::{NavEntry, NavEntryWithSections, NavSection, Navigator, NavigatorTree};
pub use outline::{Heading, Outline, build_outline, parse_headings};
pub use repository::NavigationRepository;
pub use service::{AddEntryRequest, NavigationService};
pub use store::SqliteNavigationStore;
