use super::{Command, RawMessage, RPL_WELCOME};

/// The closed set of session events delivered to a bot. `PING` never shows
/// up here, the session answers it on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Registration went through, the server accepted us
    Connected,
    /// A 3-digit server reply
    Numeric {
        code: u16,
        args: Vec<String>,
        data: Option<String>,
    },
    /// Someone messaged the bot directly
    DirectMessage { sender: String, data: String },
    /// Someone said something in a channel the bot is in
    ChannelMessage {
        sender: String,
        channel: String,
        data: String,
    },
}

impl Event {
    /// Turns a decoded line into zero or more events. The welcome reply
    /// yields both its numeric and `Connected` so the verbose banner and
    /// the lifecycle transition each get their turn.
    pub(super) fn decode(msg: RawMessage) -> Vec<Self> {
        match msg.command {
            Command::Numeric(code) => {
                let numeric = Self::Numeric {
                    code,
                    args: msg.args,
                    data: msg.data,
                };
                if code == RPL_WELCOME {
                    return vec![numeric, Self::Connected];
                }
                vec![numeric]
            }

            Command::Privmsg => {
                let sender = match msg.prefix.as_ref().and_then(|prefix| prefix.nick()) {
                    Some(nick) => nick.to_string(),
                    None => {
                        log::warn!("privmsg without a user prefix, ignoring");
                        return Vec::new();
                    }
                };
                let (target, data) = match (msg.args.into_iter().next(), msg.data) {
                    (Some(target), Some(data)) => (target, data),
                    _ => {
                        log::warn!("privmsg without a target or body, ignoring");
                        return Vec::new();
                    }
                };

                // not quite what the grammar allows, but close enough for
                // the channels this bot sits in
                let event = if target.starts_with('#') {
                    Self::ChannelMessage {
                        sender,
                        channel: target,
                        data,
                    }
                } else {
                    Self::DirectMessage { sender, data }
                };
                vec![event]
            }

            Command::Ping | Command::Unknown(..) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(line: &str) -> Vec<Event> {
        Event::decode(RawMessage::parse(line).unwrap())
    }

    #[test]
    fn welcome_yields_numeric_then_connected() {
        let events = decode(":irc.example.com 001 qircbot :Welcome\r\n");
        assert_eq!(
            events,
            vec![
                Event::Numeric {
                    code: 1,
                    args: vec!["qircbot".into()],
                    data: Some("Welcome".into()),
                },
                Event::Connected,
            ]
        );
    }

    #[test]
    fn other_numerics_stay_plain() {
        let events = decode(":irc.example.com 372 qircbot :- motd line\r\n");
        assert_eq!(
            events,
            vec![Event::Numeric {
                code: 372,
                args: vec!["qircbot".into()],
                data: Some("- motd line".into()),
            }]
        );
    }

    #[test]
    fn privmsg_to_channel() {
        let events = decode(":serv!u@h PRIVMSG #qircbot :hello\r\n");
        assert_eq!(
            events,
            vec![Event::ChannelMessage {
                sender: "serv".into(),
                channel: "#qircbot".into(),
                data: "hello".into(),
            }]
        );
    }

    #[test]
    fn privmsg_to_the_bot() {
        let events = decode(":serv!u@h PRIVMSG qircbot :psst\r\n");
        assert_eq!(
            events,
            vec![Event::DirectMessage {
                sender: "serv".into(),
                data: "psst".into(),
            }]
        );
    }

    #[test]
    fn privmsg_from_a_server_prefix_is_dropped() {
        assert!(decode(":irc.example.com PRIVMSG #qircbot :hi\r\n").is_empty());
    }

    #[test]
    fn unknown_commands_are_dropped() {
        assert!(decode(":irc.example.com MODE #qircbot +nt\r\n").is_empty());
    }
}
