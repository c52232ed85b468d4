//! Background Tasks Module
//!
//! Poll-based background work: clients submit a job, get a task id back
//! straight away, and poll the id until the job reaches a terminal status.
//!
//! # Module Structure
//!
//! ```text
//! tasks/
//! ├── mod.rs         - Module exports and documentation
//! ├── error.rs       - TaskError
//! ├── registry.rs    - Task id -> status store (read-once terminal status)
//! ├── pool.rs        - Bounded worker pool for blocking jobs
//! ├── dispatcher.rs  - Job submission onto the two execution media
//! └── handlers.rs    - HTTP handlers under /v1/async
//! ```
//!
//! # Status Lifecycle
//!
//! ```text
//! ACCEPTED -> IN_PROGRESS -> COMPLETED
//!                        \-> FAILED
//! ```
//!
//! The first poll that observes COMPLETED or FAILED removes the record.
//! Terminal records nobody reads are removed by the retention sweep started
//! in `server::init`.

pub mod error;

pub mod registry;

pub mod pool;

pub mod dispatcher;

pub mod handlers;

pub use dispatcher::{Dispatcher, Job, JobResult, WorkError};
pub use error::TaskError;
pub use pool::{PoolSlot, WorkerFailure, WorkerPool};
pub use registry::{TaskIdGenerator, TaskRegistry, UuidGenerator};
