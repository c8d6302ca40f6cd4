use anyhow::{Result, bail};

use logharbor_types::LevelFilter;

/// Operator commands accepted on stdin, one per line.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Set the search term; empty clears it
    Search(String),
    /// Set the level selector
    Level(LevelFilter),
    /// Drop all retained events
    Clear,
    /// Reopen the feed connection
    Open,
    /// Close the feed connection
    Close,
    /// Print a snapshot immediately
    Stats,
    /// Exit the monitor
    Quit,
}

impl Command {
    /// Parse one input line. Unknown verbs and bad arguments are reported,
    /// never fatal.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb {
            "search" => Ok(Self::Search(rest.to_string())),
            "level" => {
                if rest.is_empty() {
                    bail!("usage: level <ALL|INFO|WARN|ERROR|DEBUG>");
                }
                Ok(Self::Level(rest.parse()?))
            }
            "clear" => Ok(Self::Clear),
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            "stats" => Ok(Self::Stats),
            "quit" | "exit" => Ok(Self::Quit),
            "" => bail!("empty command"),
            other => bail!("unknown command '{other}'"),
        }
    }
}
