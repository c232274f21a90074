use tracing::debug;

use crate::builtins;
use crate::coordinator;
use crate::parser;
use crate::pipeline::Pipeline;
use crate::status::FAILURE_STATUS;

/// Parse and run one input line.
///
/// A blank line returns `last_status` unchanged. Parse and execution errors
/// are printed to stderr and reported as [`FAILURE_STATUS`]. `should_exit` is
/// set when a builtin asks the shell to terminate.
pub fn dispatch_line(input: &str, last_status: i32, should_exit: &mut bool) -> i32 {
    match parser::parse(input) {
        Ok(Some(pipeline)) => dispatch(&pipeline, last_status, should_exit),
        Ok(None) => last_status,
        Err(e) => {
            eprintln!("pipesh: parse error: {e}");
            FAILURE_STATUS
        }
    }
}

/// Run a parsed pipeline: in-process if its head names a builtin, otherwise
/// as external processes.
///
/// Only the head is checked against the builtin registry; a builtin head runs
/// alone and the rest of the line is ignored.
pub fn dispatch(pipeline: &Pipeline, last_status: i32, should_exit: &mut bool) -> i32 {
    let head = pipeline.head();
    if let Some(builtin) = builtins::lookup(head.program()) {
        debug!(builtin = builtin.name, "running builtin");
        return (builtin.handler)(&head.argv, last_status, should_exit);
    }

    match coordinator::execute(pipeline) {
        Ok(status) => status,
        Err(e) => {
            eprintln!("pipesh: {e}");
            FAILURE_STATUS
        }
    }
}
