//! Port trait definitions
//!
//! These traits define the interfaces that upstream provider adapters must implement.

pub mod providers;

pub use providers::{IsochroneProvider, IsochroneRequest, PoiProvider, PoiSearch, TravelMode};
