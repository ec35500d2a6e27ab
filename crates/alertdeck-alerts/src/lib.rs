//! Alert definition orchestration
//!
//! Composes full triggers (trigger, dampenings, conditions, actions) and
//! synchronizes them with a remote alerting service, and turns alert
//! listings into display-ready summaries.
//!
//! - [`TriggerSynchronizer`]: create, diff-and-update through the owning
//!   group template, delete
//! - [`criteria`]: sparse query parameters for alert and trigger listings
//! - [`normalizer`]: alert summaries with averaged values and time spans
//! - [`lifecycle`]: resolve, acknowledge and annotate alerts
//! - [`AlertsBackend`]: the service seam, with [`RestBackend`] over HTTP
//! - [`AlertsManager`]: facade over all of the above

pub mod actions;
pub mod backend;
pub mod criteria;
pub mod error;
pub mod lifecycle;
pub mod manager;
pub mod normalizer;
pub mod paging;
pub mod rest;
pub mod sync;

pub use actions::{ensure_action, ensure_actions, ActionDefaults, ActionOutcome, Provisioned};
pub use backend::AlertsBackend;
pub use criteria::{AlertsCriteria, PageRequest, QueryParams, SortOrder, TriggersCriteria};
pub use error::{AlertsError, Result};
pub use lifecycle::{AckRequest, NoteRequest, ResolveRequest};
pub use manager::AlertsManager;
pub use normalizer::{normalize_alert, normalize_alerts, normalize_alerts_local, AlertSummary};
pub use paging::{Page, Paging};
pub use rest::RestBackend;
pub use sync::{SyncFailure, SyncReport, TriggerSynchronizer, WriteTarget};
