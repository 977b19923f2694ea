use crate::SHELL_NAME;
use crate::command::{CommandFactory, ExecutableCommand, Flow, Io};
use crate::env::Environment;
use crate::interpreter::Factory;
use crate::process::{LaunchError, spawn_and_wait};
use std::ffi::CString;
use std::io::Write;

/// Command that is not a builtin.
///
/// Never ends the session: whatever happens to the program, the loop goes on.
pub struct ExternalCommand {
    argv: Vec<Vec<u8>>,
}

impl ExternalCommand {
    /// Command running `argv[0]` with `argv` passed through byte for byte.
    pub fn new(argv: Vec<Vec<u8>>) -> Self {
        Self { argv }
    }

    fn run(&self, io: &mut Io<'_>) -> anyhow::Result<()> {
        let argv = self
            .argv
            .iter()
            .map(|arg| CString::new(arg.as_slice()))
            .collect::<Result<Vec<_>, _>>()?;
        let Some(program) = argv.first() else {
            return Ok(());
        };
        let shown = String::from_utf8_lossy(program.as_bytes());

        // Anything still buffered would otherwise land after the child's output.
        io.stdout.flush()?;
        match spawn_and_wait(program, &argv) {
            Ok(status) => log::debug!("{shown:?} finished: {status:?}"),
            Err(LaunchError::Exec(errno)) => {
                log::debug!("{shown:?} could not be executed: {errno}");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}

/// Accepts any command line; registered last so builtins take precedence.
impl CommandFactory for Factory<ExternalCommand> {
    fn name(&self) -> Option<&'static str> {
        None
    }

    fn try_create(&self, argv: &[&[u8]]) -> Option<Box<dyn ExecutableCommand>> {
        if argv.is_empty() {
            return None;
        }
        Some(Box::new(ExternalCommand::new(
            argv.iter().map(|arg| arg.to_vec()).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, io: &mut Io<'_>, _env: &Environment) -> Flow {
        if let Err(e) = self.run(io) {
            if let Err(write_err) = writeln!(io.stderr, "{SHELL_NAME}: {e:#}") {
                log::warn!("could not report launch failure: {write_err}");
            }
        }
        Flow::Continue
    }
}
