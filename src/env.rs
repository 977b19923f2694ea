/// Read-only view of the interpreter handed to every command.
///
/// Built once when the interpreter is created and never changed afterwards.
/// The working directory is not kept here: `cd` changes the process's own.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Names of the built-in commands, in lookup order.
    pub builtins: Vec<&'static str>,
}

impl Environment {
    /// Environment listing `builtins` in lookup order.
    pub fn new(builtins: Vec<&'static str>) -> Self {
        Self { builtins }
    }

    /// Whether `name` is exactly one of the built-in command names.
    pub fn is_builtin(&self, name: &[u8]) -> bool {
        self.builtins.iter().any(|b| b.as_bytes() == name)
    }
}
