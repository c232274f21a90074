use std::path::PathBuf;

/// Where a stage's standard output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Inherit the shell's standard output.
    Terminal,
    /// Feed the next stage through a pipe.
    Pipe,
    /// `>`: create or truncate the file.
    Truncate(PathBuf),
    /// `>>`: create the file if needed, write at end-of-file.
    Append(PathBuf),
}

/// One command in a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Program name followed by its arguments. Never empty.
    pub argv: Vec<String>,
    /// `<` target; `None` means inherited stdin or the previous stage's pipe.
    pub input: Option<PathBuf>,
    pub output: Output,
}

impl Stage {
    pub fn new(argv: Vec<String>) -> Self {
        Self {
            argv,
            input: None,
            output: Output::Terminal,
        }
    }

    /// The program name (`argv[0]`).
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }
}

/// An ordered chain of stages connected by pipes.
///
/// Every stage except the last has [`Output::Pipe`]; the parser guarantees this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Build a pipeline, wiring `Output::Pipe` onto every stage but the last.
    ///
    /// Returns `None` for an empty stage list.
    pub fn new(mut stages: Vec<Stage>) -> Option<Self> {
        let last = stages.len().checked_sub(1)?;
        for stage in &mut stages[..last] {
            stage.output = Output::Pipe;
        }
        if stages[last].output == Output::Pipe {
            stages[last].output = Output::Terminal;
        }
        Some(Self { stages })
    }

    /// The first stage, which the dispatcher checks against the builtin registry.
    pub fn head(&self) -> &Stage {
        &self.stages[0]
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }
}
