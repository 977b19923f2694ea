//! A basic interactive shell.
//!
//! Each line read from the operator is split on whitespace into words. The
//! first word names either a built-in command (`cd`, `help`, `exit`), run
//! inside the interpreter, or an external program, which is forked, executed
//! from `PATH` and waited for before the next prompt.
//!
//! The main entry point is [`Interpreter`]. The public modules [`command`],
//! [`env`], [`lexer`], [`process`] and [`reader`] expose the pieces the loop is
//! built from.

mod buffer;
mod builtin;
pub mod command;
pub mod env;
mod external;
mod interpreter;
pub mod lexer;
pub mod process;
pub mod reader;

pub use command::{Flow, Io};
pub use interpreter::{DEFAULT_PROMPT, Interpreter};

/// Prefix of every diagnostic the shell writes to stderr.
pub const SHELL_NAME: &str = "bsh";

/// Serializes tests that change the process working directory.
#[cfg(test)]
pub(crate) fn lock_current_dir() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
