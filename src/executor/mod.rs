pub mod interrupt;
pub mod launcher;
pub mod runner;
pub mod validator;

// Re-exports for convenience (used by the maintenance and devenv modules)
pub use launcher::{ProcessLauncher, ProcessOutput};
pub use runner::{CommandRunner, ExecutionResult, Outcome};
pub use validator::CommandValidator;
