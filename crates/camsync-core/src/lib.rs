//! Camsync Core - Domain logic and port definitions
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Marker`, `PickedMedia`, `SyncedMedia`, `OrchestratorState`
//! - **Directory derivation** - the pure resolver for the active camera directory
//! - **Port definitions** - Traits for adapters: `IPrivilegedShell`, `IContentResolver`,
//!   `IPreferenceStore`, `ITargetAppProvider`, `IRootStatusListener`, `ILogSink`
//! - **Configuration** - YAML-backed settings with validation and a builder
//!
//! # Architecture
//!
//! The domain module contains pure business logic with no side effects.
//! Ports define trait interfaces that the adapter crates (`camsync-root`,
//! `camsync-log`) implement. The orchestrator in `camsync-root` drives the
//! domain through these ports.

pub mod config;
pub mod domain;
pub mod ports;
