//! Command parsing for inbound messages.
//!
//! Only messages starting with `/` are commands; everything else is plain
//! text (which the dispatcher feeds to an active wizard, or answers with a
//! hint).

/// Parsed command from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Greeting.
    Start,
    /// Show the command summary.
    Help,
    /// Start the expense entry wizard.
    Add,
    /// Total spending, optionally restricted to a period token.
    Stats { period: Option<String> },
    /// A command the bot does not know.
    Unknown(String),
    /// Plain text (not a command).
    Text(String),
}

impl Command {
    /// Parse a command from user input.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if !input.starts_with('/') {
            return Command::Text(input.to_string());
        }

        let mut parts = input[1..].split_whitespace();
        let cmd = parts.next().unwrap_or("").to_lowercase();
        let arg = parts.next();

        match cmd.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "add" => Command::Add,
            "stats" => Command::Stats {
                period: arg.map(str::to_string),
            },
            _ => Command::Unknown(cmd),
        }
    }

    /// Help text listing all commands.
    pub fn help_text() -> &'static str {
        "Available commands:\n\
         /add - record a new expense\n\
         /stats [day|week|month] - total spending for the period (all time if omitted)\n\
         /help - show this message"
    }
}
