//! Chat commands understood by the bot and the replies they produce.
//!
//! The first space-delimited word of the argument text selects the command.
//! `add` and `delete` read their arguments from [`tokenize`], so quoted
//! multi-word values work for both:
//!
//! | First word | Command                                   |
//! |------------|-------------------------------------------|
//! | `add`      | [`Command::Add`], tokenized positionals   |
//! | `delete`   | [`Command::Delete`], second token         |
//! | `help`     | [`Command::Help`]                         |
//! | `export`   | [`Command::Export`]                       |
//! | otherwise  | [`Command::Query`] on the whole text      |
//!
//! Command words are case-sensitive: `Add` is a query for a service called
//! `Add`.

use tracing::debug;

use crate::domain::ports::DirectoryStore;
use crate::domain::{DirectoryError, ServiceDirectory, ServiceRecord, tokenize};

/// Usage hint returned when `add` receives the wrong number of arguments.
pub const ADD_USAGE: &str = "Adding a service requireth Name, Owner, Room Name, Google Chat Room Url and a list of '*space* separated aliases in quotes'. Consider this, and the virtues.";

/// Reply confirming a deletion.
pub const DELETE_CONFIRMATION: &str = "It is done and shallt be eventually consistent in my Codex";

const HELP_LINES: [&str; 5] = [
    "@ownerbot Kibana",
    "@ownerbot add NinjaPanel 'Internal Tools' 'Internal Tools' 'https://chat.google.com/room/abc' 'np alias2'",
    "@ownerbot delete NinjaPanel",
    "@ownerbot export",
    "@ownerbot help",
];

/// Usage examples for every command, one per line.
#[must_use]
pub fn help_text() -> String {
    HELP_LINES.join("\r\n")
}

/// Reply text plus whether the command achieved its goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Text shown to the chat user.
    pub text: String,
    /// False for usage errors and for deleting an unknown service. An unknown
    /// query still counts as a success.
    pub success: bool,
}

impl CommandResult {
    /// A successful reply.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    /// An unsuccessful reply.
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }
}

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register a service. Holds every token, including the `add` word.
    Add {
        /// Output of [`tokenize`] over the full argument text.
        tokens: Vec<String>,
    },
    /// Remove a service by exact name.
    Delete {
        /// Second token from [`tokenize`], if any.
        target: Option<String>,
    },
    /// List usage examples.
    Help,
    /// Dump the directory document.
    Export,
    /// Look up a service by name or alias.
    Query {
        /// The full argument text.
        key: String,
    },
}

impl Command {
    /// Select the command for `argument_text`.
    ///
    /// # Examples
    /// ```
    /// use ownerbot::domain::Command;
    ///
    /// assert_eq!(Command::parse("help"), Command::Help);
    /// assert_eq!(
    ///     Command::parse("Kibana"),
    ///     Command::Query { key: "Kibana".into() }
    /// );
    /// ```
    #[must_use]
    pub fn parse(argument_text: &str) -> Self {
        match argument_text.split(' ').next().unwrap_or_default() {
            "add" => Self::Add {
                tokens: tokenize(argument_text),
            },
            "delete" => Self::Delete {
                target: tokenize(argument_text).into_iter().nth(1),
            },
            "help" => Self::Help,
            "export" => Self::Export,
            _ => Self::Query {
                key: argument_text.to_owned(),
            },
        }
    }

    /// Run the command against a loaded directory.
    ///
    /// # Errors
    /// Propagates every [`DirectoryError`], including validation and conflict
    /// failures from `add`. Usage mistakes and misses are replies, not errors.
    pub async fn respond<S>(
        &self,
        directory: &mut ServiceDirectory<S>,
    ) -> Result<CommandResult, DirectoryError>
    where
        S: DirectoryStore + ?Sized,
    {
        debug!(command = ?self, "running command");
        match self {
            Self::Add { tokens } => add(tokens, directory).await,
            Self::Delete { target } => delete(target.as_deref(), directory).await,
            Self::Help => Ok(CommandResult::success(help_text())),
            Self::Export => export(directory),
            Self::Query { key } => query(key, directory),
        }
    }
}

async fn add<S>(
    tokens: &[String],
    directory: &mut ServiceDirectory<S>,
) -> Result<CommandResult, DirectoryError>
where
    S: DirectoryStore + ?Sized,
{
    let [_, name, owner, room, url, aliases] = tokens else {
        debug!(token_count = tokens.len(), "add rejected: wrong arity");
        return Ok(CommandResult::failure(ADD_USAGE));
    };

    let record = ServiceRecord::new(
        name.as_str(),
        owner.as_str(),
        room.as_str(),
        url.as_str(),
        aliases.split(' '),
    );
    directory.add(record).await?;
    Ok(CommandResult::success(format!(
        "My codex has expanded to contain knowledge of {name}. Congratulations virtuous Paladin."
    )))
}

async fn delete<S>(
    target: Option<&str>,
    directory: &mut ServiceDirectory<S>,
) -> Result<CommandResult, DirectoryError>
where
    S: DirectoryStore + ?Sized,
{
    let deleted = match target {
        Some(name) => directory.delete(name).await?,
        None => None,
    };
    if deleted.is_some() {
        return Ok(CommandResult::success(DELETE_CONFIRMATION));
    }

    let names = directory.names()?.join(", ");
    Ok(CommandResult::failure(format!(
        "I knoweth not of {} and I do not deleteth by alias. Tryeth thee one of: {names}",
        target.unwrap_or_default()
    )))
}

fn export<S>(directory: &ServiceDirectory<S>) -> Result<CommandResult, DirectoryError>
where
    S: DirectoryStore + ?Sized,
{
    let json = directory
        .export()?
        .to_pretty_json()
        .map_err(|err| DirectoryError::Corrupt {
            message: err.to_string(),
        })?;
    Ok(CommandResult::success(json))
}

fn query<S>(key: &str, directory: &ServiceDirectory<S>) -> Result<CommandResult, DirectoryError>
where
    S: DirectoryStore + ?Sized,
{
    if let Some(service) = directory.find(key)? {
        return Ok(CommandResult::success(format!(
            "{} owns {}. Seeketh thee room {} - {}",
            service.owner, service.name, service.room, service.url
        )));
    }

    let names = directory.names()?.join(", ");
    Ok(CommandResult::success(format!(
        "I knoweth not of that service. Thou mightst asketh me of: {names}"
    )))
}
