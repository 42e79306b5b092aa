//! Domain ports
//!
//! - [`providers`]: capability contracts implemented by backend crates
//! - [`vendor`]: seams over vendor SDKs consumed by the lifecycle controller

pub mod providers;
pub mod vendor;
