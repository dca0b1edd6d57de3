// hashi: uniform command execution and file operations across local, SSH,
// and Docker targets
//
// A caller describes a target with key-value connection parameters, asks the
// factory for a handler, and drives commands and file transfers through one
// trait whatever the transport. Timeout and cancellation are ordinary
// results, inspectable on the returned output.

pub mod execution;
pub mod platform;

pub use execution::{
    CommandError, CommandResult, CompletionStatus, ExecutionOutput, ExecutionRequest,
    LocalExecutor,
};
pub use platform::{
    HandlerError, HandlerResult, LocalHandler, OperatingSystem, PlatformHandler,
    PlatformHandlerFactory, PlatformHandlerProvider, PlatformType, TargetDescriptor,
};
