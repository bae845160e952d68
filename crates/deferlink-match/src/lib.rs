//! # deferlink-match
//!
//! The candidate matching and resolution engine: feature comparators,
//! temporal plausibility, the dynamic decision threshold, at-most-once
//! resolution, feedback-driven weight adaptation, and the abuse risk
//! heuristic.
//!
//! The engine performs no network I/O. Its only external seam is the
//! [`deferlink_core::CandidateStore`] trait; transport concerns live
//! entirely outside this workspace's scope.

pub mod adaptation;
pub mod caches;
pub mod compare;
pub mod coordinator;
pub mod maintenance;
pub mod policy;
pub mod quality;
pub mod risk;
pub mod scoring;
pub mod temporal;

pub use coordinator::Resolver;
pub use maintenance::{spawn as spawn_maintenance, MaintenanceHandle};
pub use scoring::MatchScorer;
