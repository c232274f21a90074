use std::fs::{File, OpenOptions};
use std::path::Path;
use std::process::Stdio;

use os_pipe::{PipeReader, PipeWriter};
use tracing::trace;

use crate::error::ExecError;
use crate::pipeline::{Output, Stage};

/// What a stage's standard input is connected to.
///
/// Each variant owns its descriptor; dropping the value closes it.
#[derive(Debug)]
pub enum Source {
    Inherit,
    File(File),
    Pipe(PipeReader),
}

/// What a stage's standard output is connected to.
#[derive(Debug)]
pub enum Sink {
    Inherit,
    File(File),
    Pipe(PipeWriter),
}

impl From<Source> for Stdio {
    fn from(source: Source) -> Stdio {
        match source {
            Source::Inherit => Stdio::inherit(),
            Source::File(file) => Stdio::from(file),
            Source::Pipe(reader) => Stdio::from(reader),
        }
    }
}

impl From<Sink> for Stdio {
    fn from(sink: Sink) -> Stdio {
        match sink {
            Sink::Inherit => Stdio::inherit(),
            Sink::File(file) => Stdio::from(file),
            Sink::Pipe(writer) => Stdio::from(writer),
        }
    }
}

/// Decide where a stage reads from.
///
/// A `<` file wins over the upstream pipe; in that case the upstream read end
/// is closed here so the previous stage is not left writing into a pipe
/// nobody holds open for reading.
pub fn resolve_input(stage: &Stage, upstream: Option<PipeReader>) -> Result<Source, ExecError> {
    match &stage.input {
        Some(path) => {
            if upstream.is_some() {
                trace!(program = stage.program(), "input file overrides upstream pipe");
            }
            drop(upstream);
            open_input(path).map(Source::File)
        }
        None => Ok(upstream.map_or(Source::Inherit, Source::Pipe)),
    }
}

/// Decide where a stage writes to.
///
/// For [`Output::Pipe`] a fresh pipe is created; the write end goes to the
/// stage and the read end is returned for the next stage.
pub fn resolve_output(stage: &Stage) -> Result<(Sink, Option<PipeReader>), ExecError> {
    match &stage.output {
        Output::Terminal => Ok((Sink::Inherit, None)),
        Output::Pipe => {
            let (reader, writer) = os_pipe::pipe().map_err(ExecError::Pipe)?;
            Ok((Sink::Pipe(writer), Some(reader)))
        }
        Output::Truncate(path) => {
            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true);
            open_output(&mut options, path).map(|file| (Sink::File(file), None))
        }
        Output::Append(path) => {
            let mut options = OpenOptions::new();
            options.append(true).create(true);
            open_output(&mut options, path).map(|file| (Sink::File(file), None))
        }
    }
}

fn open_input(path: &Path) -> Result<File, ExecError> {
    File::open(path).map_err(|source| ExecError::OpenInput {
        path: path.to_path_buf(),
        source,
    })
}

fn open_output(options: &mut OpenOptions, path: &Path) -> Result<File, ExecError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    options.open(path).map_err(|source| ExecError::OpenOutput {
        path: path.to_path_buf(),
        source,
    })
}
