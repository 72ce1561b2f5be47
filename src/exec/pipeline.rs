// src/exec/pipeline.rs

use std::fmt;
use std::path::PathBuf;

/// One stage of a pipeline: a program and its arguments.
///
/// No shell is involved anywhere; arguments are passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// An ordered multi-stage command: each stage's stdout feeds the next stage's
/// stdin, and the last stage's stdout optionally goes to a file.
///
/// The runner treats a non-zero exit of **any** stage as failure of the whole
/// pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub stages: Vec<CommandSpec>,
    pub stdout_to: Option<PathBuf>,
}

impl Pipeline {
    /// A pipeline always has at least one stage.
    pub fn new(first: CommandSpec) -> Self {
        Self {
            stages: vec![first],
            stdout_to: None,
        }
    }

    /// Append a stage, consuming the previous stage's stdout.
    pub fn pipe(mut self, next: CommandSpec) -> Self {
        self.stages.push(next);
        self
    }

    /// Redirect the last stage's stdout to a file instead of capturing it.
    pub fn redirect_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout_to = Some(path.into());
        self
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, stage) in self.stages.iter().enumerate() {
            if idx > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{stage}")?;
        }
        if let Some(path) = &self.stdout_to {
            write!(f, " > {}", path.display())?;
        }
        Ok(())
    }
}
