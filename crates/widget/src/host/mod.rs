//! Terminal development host: drives the widget controller from stdin.

mod repl;
pub mod terminal;

use snafu::Snafu;
use stp_client::ClientError;
use stp_storage::sqlite::SqliteError;

pub use repl::run;
pub use terminal::TerminalView;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HostError {
    #[snafu(display("{stage}: failed to build the async runtime: {source}"))]
    RuntimeInit {
        stage: &'static str,
        source: std::io::Error,
    },
    #[snafu(display("{stage}: failed to open history database '{location}': {source}"))]
    OpenStorage {
        stage: &'static str,
        location: String,
        source: SqliteError,
    },
    #[snafu(display("{stage}: invalid backend endpoint: {source}"))]
    Backend {
        stage: &'static str,
        source: ClientError,
    },
}

pub type HostResult<T> = Result<T, HostError>;

/// One line typed into the terminal host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// A line with nothing but whitespace.
    Blank,
    Send(String),
    Toggle,
    Reset,
    History,
    Help,
    Quit,
    Unknown(String),
}

impl HostCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Blank;
        }
        let Some(command) = trimmed.strip_prefix('/') else {
            return Self::Send(line.trim_end_matches(['\r', '\n']).to_string());
        };

        match command.to_ascii_lowercase().as_str() {
            "toggle" | "open" | "close" => Self::Toggle,
            "reset" => Self::Reset,
            "history" => Self::History,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }
}

pub const HELP_TEXT: &str = "\
commands:
  <text>     send a message
  /toggle    open or close the panel
  /reset     clear the conversation
  /history   print the stored history
  /quit      leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_sent_verbatim() {
        assert_eq!(
            HostCommand::parse("  Bonjour  \n"),
            HostCommand::Send("  Bonjour  ".to_string())
        );
    }

    #[test]
    fn blank_lines_are_not_sends() {
        assert_eq!(HostCommand::parse("\n"), HostCommand::Blank);
        assert_eq!(HostCommand::parse("   \t\r\n"), HostCommand::Blank);
    }

    #[test]
    fn slash_commands_are_recognized() {
        assert_eq!(HostCommand::parse("/toggle"), HostCommand::Toggle);
        assert_eq!(HostCommand::parse(" /RESET "), HostCommand::Reset);
        assert_eq!(HostCommand::parse("/exit"), HostCommand::Quit);
        assert_eq!(
            HostCommand::parse("/nope"),
            HostCommand::Unknown("/nope".to_string())
        );
    }
}
