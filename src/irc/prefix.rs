/// Message origin. Only the nick of a user prefix is kept, the
/// `user@host` part is stripped before anything downstream sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prefix {
    User { nick: String },
    Server { host: String },
}

impl Prefix {
    pub(super) fn parse(input: &str) -> Option<Self> {
        let input = input.strip_prefix(':')?;

        let prefix = match input.find('!') {
            Some(pos) => Self::User {
                nick: input[..pos].to_string(),
            },
            None => Self::Server {
                host: input.to_string(),
            },
        };
        Some(prefix)
    }

    pub fn nick(&self) -> Option<&str> {
        match self {
            Self::User { nick } => Some(nick),
            Self::Server { .. } => None,
        }
    }
}
