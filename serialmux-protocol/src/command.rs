//! Command table for the line protocol
//!
//! The application owns an immutable table of `(name, help, handler)`
//! entries; the line parser only looks names up in it. Handlers receive the
//! application context, the argument string and the table itself (so a
//! `HELP` command can list its siblings).
//!
//! ```ignore
//! struct Led;
//!
//! impl Handler<dyn Device> for Led {
//!     fn execute(&self, dev: &mut dyn Device, args: &str, _: &CommandTable<'_, dyn Device>)
//!         -> Result<(), CommandError> { ... }
//! }
//!
//! static ENTRIES: [Command<'static, dyn Device>; 1] = [
//!     Command::new("LED", "Control LED (Usage: LED ON/OFF)", &Led),
//! ];
//!
//! static COMMANDS: CommandTable<'static, dyn Device> = CommandTable::new(&ENTRIES);
//! ```

use core::fmt;

/// Reasons a handler can refuse a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// The command needs an argument and none was given
    MissingArgument,
    /// The argument could not be understood
    InvalidArgument,
    /// The hardware behind the command did not respond
    Unavailable,
}

/// Executes one named command
pub trait Handler<C: ?Sized>: Sync {
    /// Run the command with `args`, the text after the command name
    fn execute(
        &self,
        ctx: &mut C,
        args: &str,
        commands: &CommandTable<'_, C>,
    ) -> Result<(), CommandError>;
}

/// One entry of a [`CommandTable`]
pub struct Command<'a, C: ?Sized> {
    name: &'a str,
    help: &'a str,
    handler: &'a dyn Handler<C>,
}

impl<C: ?Sized> Clone for Command<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for Command<'_, C> {}

impl<C: ?Sized> fmt::Debug for Command<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}

impl<'a, C: ?Sized> Command<'a, C> {
    pub const fn new(name: &'a str, help: &'a str, handler: &'a dyn Handler<C>) -> Self {
        Self {
            name,
            help,
            handler,
        }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn help(&self) -> &'a str {
        self.help
    }

    pub fn execute(
        &self,
        ctx: &mut C,
        args: &str,
        commands: &CommandTable<'_, C>,
    ) -> Result<(), CommandError> {
        self.handler.execute(ctx, args, commands)
    }
}

/// Immutable, ordered list of commands
pub struct CommandTable<'a, C: ?Sized> {
    commands: &'a [Command<'a, C>],
}

impl<C: ?Sized> Clone for CommandTable<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for CommandTable<'_, C> {}

impl<C: ?Sized> fmt::Debug for CommandTable<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.commands.iter()).finish()
    }
}

impl<'a, C: ?Sized> CommandTable<'a, C> {
    pub const fn new(commands: &'a [Command<'a, C>]) -> Self {
        Self { commands }
    }

    /// Look a command up by exact, case-sensitive name
    pub fn find(&self, name: &str) -> Option<&Command<'a, C>> {
        self.commands.iter().find(|command| command.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command<'a, C>> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
