//! Interactive shell command grammar.
//!
//! ```text
//! edit <field> <text...>      type into a field
//! select <field> <n|id>       pick the n-th shown suggestion (1-based) or one by id
//! add                         append an empty stop
//! remove <field>              remove a stop
//! clear <field>               empty a field
//! optimize on|off             toggle waypoint optimization
//! show | submit | help | quit
//! ```
//!
//! `<field>` is `origin` (`o`), `destination` (`dest`, `d`) or a field id
//! such as `2` or `#2`.

use crate::field::FieldId;
use crate::form::FormState;
use crate::provider::SuggestionId;
use std::str::FromStr;
use thiserror::Error;

/// Reference to a field as typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef {
    Origin,
    Destination,
    Id(FieldId),
}

impl FieldRef {
    /// Map to the form's field id. Origin and destination always resolve;
    /// numeric ids are passed through and may name no field.
    pub fn resolve(self, form: &FormState) -> FieldId {
        match self {
            FieldRef::Origin => form.origin().id(),
            FieldRef::Destination => form.destination().id(),
            FieldRef::Id(id) => id,
        }
    }
}

impl FromStr for FieldRef {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "origin" | "o" => Ok(FieldRef::Origin),
            "destination" | "dest" | "d" => Ok(FieldRef::Destination),
            other => other
                .parse()
                .map(FieldRef::Id)
                .map_err(|_| CommandError::InvalidField(s.to_string())),
        }
    }
}

/// Which suggestion to select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectTarget {
    /// 1-based position in the displayed list.
    Index(usize),
    Id(SuggestionId),
}

impl SelectTarget {
    fn parse(s: &str) -> Self {
        match s.parse::<usize>() {
            Ok(index) => SelectTarget::Index(index),
            Err(_) => SelectTarget::Id(SuggestionId::new(s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Edit { field: FieldRef, text: String },
    Select { field: FieldRef, target: SelectTarget },
    Add,
    Remove { field: FieldRef },
    Clear { field: FieldRef },
    Optimize(bool),
    Show,
    Submit,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a field. Use origin, destination or a field id.")]
    InvalidField(String),

    #[error("Expected 'on' or 'off', got '{0}'")]
    InvalidToggle(String),
}

pub const HELP: &str = "\
Commands:
  edit <field> <text>     type an address into a field
  select <field> <n|id>   confirm a field with a shown suggestion
  add                     add an empty stop
  remove <field>          remove a stop
  clear <field>           empty a field
  optimize on|off         let the provider reorder stops
  show                    print the form
  submit                  compute the route
  help                    show this help
  quit                    leave the shell
Fields: origin (o), destination (dest, d), or an id like #2";

/// Parse one input line. Blank lines parse to `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "edit" | "e" => {
            let (field, text) = split_field(rest, "edit")?;
            ShellCommand::Edit {
                field,
                text: text.to_string(),
            }
        }
        "select" | "s" => {
            let (field, target) = split_field(rest, "select")?;
            if target.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "select",
                    argument: "a suggestion number or id",
                });
            }
            ShellCommand::Select {
                field,
                target: SelectTarget::parse(target),
            }
        }
        "add" => ShellCommand::Add,
        "remove" | "rm" => ShellCommand::Remove {
            field: split_field(rest, "remove")?.0,
        },
        "clear" => ShellCommand::Clear {
            field: split_field(rest, "clear")?.0,
        },
        "optimize" => match rest.to_lowercase().as_str() {
            "on" | "true" | "yes" => ShellCommand::Optimize(true),
            "off" | "false" | "no" => ShellCommand::Optimize(false),
            "" => {
                return Err(CommandError::MissingArgument {
                    command: "optimize",
                    argument: "on or off",
                })
            }
            other => return Err(CommandError::InvalidToggle(other.to_string())),
        },
        "show" | "ls" => ShellCommand::Show,
        "submit" | "go" => ShellCommand::Submit,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        _ => return Err(CommandError::Unknown(verb.to_string())),
    };

    Ok(Some(command))
}

/// Split `<field> <remainder>`; the remainder may be empty.
fn split_field<'a>(
    rest: &'a str,
    command: &'static str,
) -> Result<(FieldRef, &'a str), CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "a field",
        });
    }
    let (field, remainder) = match rest.split_once(char::is_whitespace) {
        Some((field, remainder)) => (field, remainder.trim()),
        None => (rest, ""),
    };
    Ok((field.parse()?, remainder))
}
