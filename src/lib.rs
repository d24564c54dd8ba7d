//! Kanban core: owner-scoped boards, columns, and tasks.
//!
//! This crate keeps an ordered hierarchy of boards, columns, and tasks
//! consistent under concurrent writes. Siblings keep stable positions,
//! deleting a parent removes its descendants, and no operation can link a
//! record into another owner's hierarchy.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure values and entities with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Ordering, hierarchy checks, and cascading deletes
//!
//! # Modules
//!
//! - [`board`]: Board hierarchy domain, persistence, and services
//! - [`config`]: Store configuration and connection pooling
//! - [`worker`]: Shell quoting for the `pg_worker` test database helper

pub mod board;
pub mod config;
pub mod worker;
