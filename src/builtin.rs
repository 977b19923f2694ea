use crate::SHELL_NAME;
use crate::command::{CommandFactory, ExecutableCommand, Flow, Io};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::{Context, Result, bail};
use std::env;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::os::unix::ffi::OsStrExt;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are executed directly in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "cd" or "exit".
    fn name() -> &'static str;

    /// Builds the command from its arguments, `argv[0]` excluded.
    fn from_args(args: &[&[u8]]) -> Self;

    /// Executes the command. An error is reported on stderr and the loop
    /// carries on.
    fn execute(self, io: &mut Io<'_>, env: &Environment) -> Result<Flow>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, io: &mut Io<'_>, env: &Environment) -> Flow {
        match <T as BuiltinCommand>::execute(*self, io, env) {
            Ok(flow) => flow,
            Err(e) => {
                if let Err(write_err) = writeln!(io.stderr, "{SHELL_NAME}: {e:#}") {
                    log::warn!("could not report `{}` failure: {write_err}", T::name());
                }
                Flow::Continue
            }
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn name(&self) -> Option<&'static str> {
        Some(T::name())
    }

    fn try_create(&self, argv: &[&[u8]]) -> Option<Box<dyn ExecutableCommand>> {
        match argv.split_first() {
            Some((name, args)) if *name == T::name().as_bytes() => {
                Some(Box::new(T::from_args(args)))
            }
            _ => None,
        }
    }
}

/// Change the current working directory of the interpreter process.
pub struct Cd {
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<OsString>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn from_args(args: &[&[u8]]) -> Self {
        Self {
            target: args.first().map(|t| OsStr::from_bytes(t).to_os_string()),
        }
    }

    fn execute(self, _io: &mut Io<'_>, _env: &Environment) -> Result<Flow> {
        let Some(target) = self.target else {
            bail!("expected argument to \"cd\"");
        };
        env::set_current_dir(&target)
            .with_context(|| format!("cd: {}", target.to_string_lossy()))?;
        log::debug!("working directory is now {target:?}");
        Ok(Flow::Continue)
    }
}

/// Print a short usage banner and the list of built-in commands.
pub struct Help;

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn from_args(_args: &[&[u8]]) -> Self {
        Help
    }

    fn execute(self, io: &mut Io<'_>, env: &Environment) -> Result<Flow> {
        writeln!(io.stdout, "Brice's Shell BSH")?;
        writeln!(io.stdout, "Type the name of the command <args>, and hit enter")?;
        writeln!(io.stdout, "The following functions are builtin")?;
        for name in &env.builtins {
            writeln!(io.stdout, "  {name}")?;
        }
        writeln!(io.stdout, "Use man <command> for information on other programs")?;
        Ok(Flow::Continue)
    }
}

/// Leave the shell. Arguments are ignored.
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn from_args(_args: &[&[u8]]) -> Self {
        Exit
    }

    fn execute(self, _io: &mut Io<'_>, _env: &Environment) -> Result<Flow> {
        Ok(Flow::Terminate)
    }
}
