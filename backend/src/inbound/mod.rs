//! Inbound adapters that translate external requests into domain calls while
//! keeping framework details at the edge.
//!
//! The chat webhook is the only transport and lives under [`http`].

pub mod http;
