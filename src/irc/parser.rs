use super::{Command, Prefix};
use anyhow::Context as _;

/// One decoded line off the wire, still close to the raw shape.
#[derive(Debug)]
pub struct RawMessage {
    pub prefix: Option<Prefix>,
    pub command: Command,
    pub args: Vec<String>,
    pub data: Option<String>,
}

impl RawMessage {
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let input = input
            .trim_end_matches(|c| c == '\r' || c == '\n')
            .trim_start_matches(' ');
        if input.is_empty() {
            anyhow::bail!("message was empty after trimming")
        }

        let mut parser = Parser::new(input);
        Ok(Self {
            prefix: parser.prefix(),
            command: parser.command()?,
            args: parser.args(),
            data: parser.data(),
        })
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn prefix(&mut self) -> Option<Prefix> {
        let input = &self.input[self.pos..];
        if input.starts_with(':') {
            let pos = input.find(' ')?;
            self.pos += pos + 1;
            return Prefix::parse(&input[..pos]);
        }
        None
    }

    fn command(&mut self) -> anyhow::Result<Command> {
        let input = &self.input[self.pos..];
        let pos = input.find(' ').unwrap_or_else(|| input.len());
        self.pos += (pos + 1).min(input.len());

        let head = &input[..pos];
        if head.is_empty() {
            return Err(anyhow::anyhow!("command not found"))
                .with_context(|| format!("input: {}", self.input.escape_debug()));
        }

        let cmd = match head {
            "PING" => Command::Ping,
            "PRIVMSG" => Command::Privmsg,
            s => s
                .parse::<u16>()
                .map(Command::Numeric)
                .unwrap_or_else(|_| Command::Unknown(s.into())),
        };
        Ok(cmd)
    }

    fn args(&mut self) -> Vec<String> {
        let input = match self.input.get(self.pos..) {
            Some(input) => input,
            None => return Vec::new(),
        };
        let pos = input.find(':').unwrap_or_else(|| input.len());
        self.pos += pos + 1;
        input[..pos]
            .split_whitespace()
            .map(ToString::to_string)
            .collect()
    }

    fn data(&mut self) -> Option<String> {
        self.input
            .get(self.pos..)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    }
}
