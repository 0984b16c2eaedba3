//! # Host CLI Adapters
//!
//! Process-backed implementations of the collaborator traits. Each one
//! shells out to the host CLI (`ns` unless configured otherwise) inside the
//! project directory.
//!
//! - [`SessionSupervisor`]: owns the running `run`/`debug` child; serves as
//!   start service, live-sync helper and file-watch controller
//! - [`CliPipeline`]: `prepare` and `install`, run attached to the terminal
//! - [`TokioSpawner`]: streaming children and detached launches
//! - [`DirProject`] / [`RealFs`]: project layout and path probing

mod devices;
mod fs;
mod pipeline;
mod process;
mod supervisor;

pub use devices::parse_devices;
pub use fs::{DirProject, RealFs};
pub use pipeline::CliPipeline;
pub use process::TokioSpawner;
pub use supervisor::SessionSupervisor;

/// `program arg arg` for log lines and error messages.
fn describe(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
