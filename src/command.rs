use crate::env::Environment;
use std::io::Write;

/// Whether the read-eval loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Prompt for the next line.
    Continue,
    /// Leave the loop.
    Terminate,
}

/// Output streams a command writes to.
///
/// External programs do not use these: a child inherits the interpreter's
/// real standard streams.
pub struct Io<'a> {
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Runs the command to completion.
    fn execute(self: Box<Self>, io: &mut Io<'_>, env: &Environment) -> Flow;
}

/// Factory that tries to create a command from a tokenized command line.
///
/// Returns `None` when the factory doesn't recognize the first token.
pub trait CommandFactory {
    /// The command name this factory answers to, `None` for a catch-all.
    fn name(&self) -> Option<&'static str>;

    /// Attempt to create a command for `argv`; `argv[0]` is the command name.
    ///
    /// Words are the raw bytes the operator typed.
    fn try_create(&self, argv: &[&[u8]]) -> Option<Box<dyn ExecutableCommand>>;
}
