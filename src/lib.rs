//! Housing allocation workflow engine.
//!
//! The crate models BTO-style project applications end to end: applicants
//! apply, withdraw, and enquire; officers register to administer projects
//! and book flats; managers open projects and rule on applications. All
//! entities live in a single [`store::Store`] and reference each other by
//! typed id. State moves only through the [`lifecycle`] engine, whose
//! per-kind guards and cascades keep the entity graph consistent, and the
//! whole store round-trips through flat record files in [`persist`].

pub mod config;
pub mod domain;
pub mod eligibility;
pub mod ident;
pub mod lifecycle;
pub mod persist;
pub mod store;
pub mod telemetry;
pub mod workflows;

pub use config::{AppConfig, ConfigError, DataConfig};
pub use lifecycle::LifecycleError;
pub use persist::{load_store, save_store, PersistError};
pub use store::Store;
pub use workflows::WorkflowError;
