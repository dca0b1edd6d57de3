// Platform Handler Module
//
// Uniform handler contract over execution targets, the factory that selects
// a concrete handler from a target descriptor, and OS detection.

pub mod descriptor;
pub mod docker;
pub mod error;
pub mod factory;
pub mod handler;
pub mod local;
pub mod os;

// Re-export main types and traits
pub use descriptor::{keys, TargetDescriptor};
pub use docker::{DockerContainerHandler, Locality};
pub use error::{HandlerError, HandlerResult};
pub use factory::{PlatformHandlerFactory, PlatformHandlerProvider, PlatformType};
pub use handler::PlatformHandler;
pub use local::LocalHandler;
pub use os::OperatingSystem;
