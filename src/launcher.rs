use std::io;
use std::process::{Child, Command};

use tracing::debug;

use crate::error::ExecError;
use crate::pipeline::Stage;
use crate::redirect::{Sink, Source};

/// Start one process for `stage` with the given standard streams.
///
/// Both descriptors are moved into the spawned process; the shell's copies
/// are closed when this function returns, whether or not the spawn succeeded.
/// Bare program names are resolved through `PATH`.
pub fn launch(stage: &Stage, stdin: Source, stdout: Sink) -> Result<Child, ExecError> {
    let mut command = Command::new(stage.program());
    command.args(stage.args()).stdin(stdin).stdout(stdout);

    let child = command.spawn().map_err(|source| spawn_error(stage.program(), source))?;
    debug!(pid = child.id(), program = stage.program(), "spawned stage");

    Ok(child)
}

fn spawn_error(program: &str, source: io::Error) -> ExecError {
    if source.kind() == io::ErrorKind::NotFound {
        ExecError::CommandNotFound(program.to_string())
    } else {
        ExecError::Spawn {
            program: program.to_string(),
            source,
        }
    }
}
