//! # Repository Module
//!
//! Database access for the storefront, one repository per table.
//!
//! ```text
//! command ──► state.save(&db) ──► db.snapshots().save_json(key, &value)
//!                                        │
//!                                        ▼  INSERT .. ON CONFLICT(key) DO UPDATE
//!                                   snapshots table
//! ```
//!
//! - [`snapshot::SnapshotRepository`] - keyed JSON snapshots of the stores

pub mod snapshot;
