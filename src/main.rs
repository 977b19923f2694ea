use argh::FromArgs;
use bsh::{DEFAULT_PROMPT, Interpreter};
use std::io;

#[derive(FromArgs)]
/// A basic interactive shell: built-in cd, help and exit, everything else is
/// run from PATH.
struct Args {
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// text printed before each command line
    prompt: String,

    #[argh(switch, short = 'v')]
    /// log debug events to stderr (BSH_LOG overrides the level)
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("BSH_LOG", default_level))
        .init();

    let stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    Interpreter::default()
        .with_prompt(args.prompt)
        .repl(stdin, &mut stdout, &mut stderr)
}
