//! Business services
//!
//! - `registry`: get-or-create with unique code generation
//! - `resolver`: redirect resolution, access accounting, disablement
//! - `link_service`: facade combining both for outer layers

pub mod link_service;
pub mod registry;
pub mod resolver;

pub use link_service::{CreatedLink, LinkService, ShortUrlBuilder, policy_from_config};
pub use registry::{RegistryOutcome, RegistryService, RegistrySettings};
pub use resolver::Resolver;
