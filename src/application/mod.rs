//! Application layer containing the core orchestration logic.
//!
//! This module defines the `Reconciler`, which drives the submission and
//! status-refresh protocol between the local case store and the remote
//! status store through the ports declared in the domain layer.

pub mod reconciler;
