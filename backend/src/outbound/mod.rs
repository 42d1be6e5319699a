//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **kv**: key-value stores holding the service directory (in-memory and
//!   Redis via `bb8-redis`).
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod kv;
