//! Operator command tokenizer
//!
//! Parsing is a pure function of the input line: the returned request
//! borrows from the line and nothing is modified in place.

/// Help text listing every recognised command
pub const AVAILABLE_COMMANDS: &str =
    "Available commands: START <filename>, STOP, LIST, READ <filename>, DELETE <filename>, DEBUG, GPS";

/// Command verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verb {
    /// Open (or create) a log file and start recording
    Start,
    /// Close the log file
    Stop,
    /// List files in the root directory
    List,
    /// Dump a file to the diagnostics channel
    Read,
    /// Remove a file
    Delete,
    /// Toggle diagnostic output
    Debug,
    /// Report the current fix
    Gps,
    /// Anything else
    Unknown,
}

impl Verb {
    /// Match a verb token, ignoring ASCII case
    pub fn from_token(token: &str) -> Self {
        const VERBS: [(&str, Verb); 7] = [
            ("START", Verb::Start),
            ("STOP", Verb::Stop),
            ("LIST", Verb::List),
            ("READ", Verb::Read),
            ("DELETE", Verb::Delete),
            ("DEBUG", Verb::Debug),
            ("GPS", Verb::Gps),
        ];

        VERBS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|&(_, verb)| verb)
            .unwrap_or(Verb::Unknown)
    }
}

/// One parsed operator command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandRequest<'a> {
    /// Recognised verb
    pub verb: Verb,
    /// Everything after the verb, possibly empty
    pub parameter: &'a str,
}

/// Split a command line into verb and parameter
///
/// The line is trimmed, then split on its first whitespace character. The
/// parameter keeps its interior spacing but loses any leading whitespace.
pub fn parse(line: &str) -> CommandRequest<'_> {
    let line = line.trim();

    let (token, parameter) = match line.find(char::is_whitespace) {
        Some(split) => (&line[..split], line[split..].trim_start()),
        None => (line, ""),
    };

    CommandRequest {
        verb: Verb::from_token(token),
        parameter,
    }
}
