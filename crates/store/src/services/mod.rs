//! Business logic services for Quickbuy.
//!
//! # Services
//!
//! - `auth` - Agent and admin login, agent registration, password hashing
//! - `workflow` - Trade-in status transitions
//! - `migration` - One-shot import of legacy sell-flow submissions
//! - `dashboard` - Admin dashboard figures

pub mod auth;
pub mod dashboard;
pub mod migration;
pub mod workflow;

pub use auth::{AuthError, AuthService};
pub use dashboard::DashboardStats;
pub use migration::{MigrationReport, SkippedEntry, migrate_legacy_submissions};
pub use workflow::{Tracking, WorkflowError, WorkflowService};
