//! Slash-command parsing.
//!
//! Input lines starting with `/` are commands; anything else is rejected
//! (there is no chat in this client). Parsing is separated from execution so
//! it can be tested without an App or terminal.

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/login <user> <password>`
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// `/logout`
    Logout,
    /// `/search <query>`
    Search {
        /// Space name query.
        query: String,
    },
    /// `/start <n>` — start or join via the n-th search result.
    Start {
        /// 1-based result index.
        index: usize,
    },
    /// `/join <n>` — accept the n-th join offer.
    Join {
        /// 1-based offer index.
        index: usize,
    },
    /// `/mute`
    Mute,
    /// `/unmute`
    Unmute,
    /// `/video` — publish local video.
    Video,
    /// `/novideo` — retract local video.
    NoVideo,
    /// `/hangup` — end or leave the conference.
    HangUp,
    /// `/invite <name>` — simulation: a remote participant joins.
    Invite {
        /// Display name for the scripted participant.
        name: String,
    },
    /// `/quit`
    Quit,
    /// Not a recognized command.
    Unknown {
        /// The raw input.
        input: String,
    },
    /// Recognized command with bad arguments.
    InvalidArgs {
        /// Command name without the slash.
        command: &'static str,
        /// What was wrong.
        error: String,
    },
}

/// Parse one input line.
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Unknown { input: trimmed.to_string() };
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match name {
        "login" => match args.as_slice() {
            [username, password] => Command::Login {
                username: (*username).to_string(),
                password: (*password).to_string(),
            },
            _ => Command::InvalidArgs {
                command: "login",
                error: "usage: /login <user> <password>".to_string(),
            },
        },
        "logout" => Command::Logout,
        "search" => {
            if args.is_empty() {
                Command::InvalidArgs {
                    command: "search",
                    error: "usage: /search <query>".to_string(),
                }
            } else {
                Command::Search { query: args.join(" ") }
            }
        },
        "start" => parse_index("start", &args).map_or_else(
            |error| Command::InvalidArgs { command: "start", error },
            |index| Command::Start { index },
        ),
        "join" => parse_index("join", &args).map_or_else(
            |error| Command::InvalidArgs { command: "join", error },
            |index| Command::Join { index },
        ),
        "mute" => Command::Mute,
        "unmute" => Command::Unmute,
        "video" => Command::Video,
        "novideo" => Command::NoVideo,
        "hangup" => Command::HangUp,
        "invite" => {
            if args.is_empty() {
                Command::InvalidArgs {
                    command: "invite",
                    error: "usage: /invite <name>".to_string(),
                }
            } else {
                Command::Invite { name: args.join(" ") }
            }
        },
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown { input: trimmed.to_string() },
    }
}

fn parse_index(command: &str, args: &[&str]) -> Result<usize, String> {
    match args {
        [raw] => raw
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| format!("'{raw}' is not a valid index")),
        _ => Err(format!("usage: /{command} <n>")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_login_with_credentials() {
        assert_eq!(parse("/login alice secret"), Command::Login {
            username: "alice".to_string(),
            password: "secret".to_string(),
        });
        assert!(matches!(parse("/login alice"), Command::InvalidArgs { command: "login", .. }));
    }

    #[test]
    fn parses_multi_word_search() {
        assert_eq!(parse("/search product team"), Command::Search {
            query: "product team".to_string()
        });
    }

    #[test]
    fn parses_indices_one_based() {
        assert_eq!(parse("/start 2"), Command::Start { index: 2 });
        assert_eq!(parse("/join 1"), Command::Join { index: 1 });
        assert!(matches!(parse("/start 0"), Command::InvalidArgs { .. }));
        assert!(matches!(parse("/join x"), Command::InvalidArgs { .. }));
    }

    #[test]
    fn bare_words_and_unknown_commands_are_rejected() {
        assert!(matches!(parse("hello there"), Command::Unknown { .. }));
        assert!(matches!(parse("/teleport"), Command::Unknown { .. }));
    }

    #[test]
    fn simple_commands_parse() {
        assert_eq!(parse("/mute"), Command::Mute);
        assert_eq!(parse("/unmute"), Command::Unmute);
        assert_eq!(parse("/video"), Command::Video);
        assert_eq!(parse("/novideo"), Command::NoVideo);
        assert_eq!(parse("/hangup"), Command::HangUp);
        assert_eq!(parse("/quit"), Command::Quit);
        assert_eq!(parse("  /q  "), Command::Quit);
    }
}
