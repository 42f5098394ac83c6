//! Walkshed Lookup - Classification, orchestration, caching, and quotas
//!
//! This crate answers "what is within a walk of this coordinate": it calls the
//! providers, keeps only what lies inside the isochrone, buckets the results,
//! and fronts the whole pipeline with a two-tier cache and a per-client quota.

pub mod cache;
pub mod classify;
pub mod orchestrator;
pub mod quota;
pub mod service;

pub use cache::{CacheLookup, CacheSettings, TieredCache};
pub use classify::{ClassificationRule, Classifier, DEFAULT_RULES};
pub use orchestrator::{LookupOrchestrator, LookupSettings};
pub use quota::{Admission, QuotaGuard, QuotaSettings};
pub use service::LookupService;
