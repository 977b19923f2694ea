use crate::SHELL_NAME;
use crate::command::{CommandFactory, Flow, Io};
use crate::env::Environment;
use crate::lexer::split_into_tokens;
use crate::reader::LineReader;
use std::io::{BufRead, Write};

/// Prompt printed before each line when none is configured.
pub const DEFAULT_PROMPT: &str = ">> ";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: builtins and ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal interactive shell that runs built-in and external commands.
///
/// The interpreter keeps an ordered list of [`CommandFactory`] objects and asks
/// each of them in turn to handle a command line; the first one that accepts
/// it wins. See [`Default`] for the factories included out of the box.
///
/// Example
/// ```
/// use bsh::{Flow, Interpreter, Io};
/// let sh = Interpreter::default();
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let mut io = Io { stdout: &mut out, stderr: &mut err };
/// assert_eq!(sh.execute(&[b"exit".as_slice()], &mut io), Flow::Terminate);
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
    prompt: String,
}

impl Interpreter {
    /// Create a new interpreter with a custom, ordered set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        let builtins = commands.iter().filter_map(|f| f.name()).collect();
        Self {
            env: Environment::new(builtins),
            commands,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    /// Replace the prompt printed before each line.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// The environment handed to every command.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Run one tokenized command line.
    ///
    /// An empty line does nothing. Otherwise the first factory that accepts
    /// the line creates the command, which runs with every token.
    pub fn execute(&self, tokens: &[&[u8]], io: &mut Io<'_>) -> Flow {
        let Some(&first) = tokens.first() else {
            return Flow::Continue;
        };
        let name = String::from_utf8_lossy(first);
        log::debug!("dispatching {name:?} (builtin: {})", self.env.is_builtin(first));
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(tokens) {
                return cmd.execute(io, &self.env);
            }
        }
        if let Err(e) = writeln!(io.stderr, "{SHELL_NAME}: {name}: command not found") {
            log::warn!("could not report unknown command: {e}");
        }
        Flow::Continue
    }

    /// Read-eval loop: prompt, read a line, split it, run it.
    ///
    /// Returns once a command asks to terminate or the input ends. Fails only
    /// when the prompt cannot be written.
    pub fn repl<R: BufRead>(
        &self,
        input: R,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let mut reader = LineReader::new(input);
        loop {
            write!(stdout, "{}", self.prompt)?;
            stdout.flush()?;

            let line = reader.read_line();
            if line.is_eof() && line.is_empty() {
                log::debug!("end of input");
                break;
            }

            let tokens = split_into_tokens(line.as_bytes());
            let mut io = Io {
                stdout: &mut *stdout,
                stderr: &mut *stderr,
            };
            if self.execute(&tokens, &mut io) == Flow::Terminate {
                break;
            }
        }
        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands:
    /// - built-ins: `cd`, `help`, `exit`
    /// - external command launcher
    fn default() -> Self {
        use crate::builtin::*;
        use crate::external::ExternalCommand;
        Self::new(vec![
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Help>::default()),
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ])
    }
}
