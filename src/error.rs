use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why an input line could not be turned into a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated quote")]
    UnterminatedQuote,

    #[error("expected filename after '{0}'")]
    MissingRedirectTarget(&'static str),

    #[error("empty command in pipeline")]
    EmptyCommand,

    #[error("multiple input redirections for one command")]
    DuplicateInput,

    #[error("multiple output redirections for one command")]
    DuplicateOutput,

    #[error("output redirection cannot be combined with a pipe")]
    OutputBeforePipe,
}

/// Failures while running a pipeline.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("{}: {source}", path.display())]
    OpenInput { path: PathBuf, source: io::Error },

    #[error("{}: {source}", path.display())]
    OpenOutput { path: PathBuf, source: io::Error },

    #[error("cannot create pipe: {0}")]
    Pipe(#[source] io::Error),

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("{program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("error waiting for process {pid}: {source}")]
    Wait { pid: u32, source: io::Error },
}
