use os_pipe::PipeReader;
use tracing::{trace, warn};

use crate::error::ExecError;
use crate::launcher;
use crate::pipeline::Pipeline;
use crate::redirect;
use crate::status::{self, StageProcess};

/// Run every stage of `pipeline` and return the last stage's exit code.
///
/// Stages are started one after another without waiting in between; the
/// function blocks only once, while reaping. A redirection or spawn failure
/// stops the remaining stages from starting, but processes that are already
/// running are still waited for before the error is returned.
pub fn execute(pipeline: &Pipeline) -> Result<i32, ExecError> {
    let mut processes = Vec::with_capacity(pipeline.len());
    let launched = launch_stages(pipeline, &mut processes);
    let reaped = status::reap(processes);
    launched?;
    reaped
}

fn launch_stages(pipeline: &Pipeline, processes: &mut Vec<StageProcess>) -> Result<(), ExecError> {
    let last = pipeline.len() - 1;
    // Read end of the pipe fed by the previous stage, owned by the shell until handed over.
    let mut upstream: Option<PipeReader> = None;

    for (index, stage) in pipeline.stages().iter().enumerate() {
        let stdin = redirect::resolve_input(stage, upstream.take())?;
        let (stdout, downstream) = redirect::resolve_output(stage)?;

        // `launch` consumes both ends, so the shell's copies of this stage's
        // descriptors (including the pipe write end) are closed past this point.
        match launcher::launch(stage, stdin, stdout) {
            Ok(child) => processes.push(StageProcess::Running(child)),
            Err(ExecError::CommandNotFound(program)) => {
                eprintln!("pipesh: command not found: {program}");
                if index < last {
                    warn!(program = %program, stage = index, "stage not found; continuing with an empty pipe");
                }
                processes.push(StageProcess::NotLaunched);
            }
            Err(err) => return Err(err),
        }

        trace!(stage = index, piped = downstream.is_some(), "stage descriptors handed over");
        upstream = downstream;
    }

    Ok(())
}
