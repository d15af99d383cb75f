/// Wire commands the session cares about. Everything else comes through as
/// `Unknown` and is dropped before it reaches a bot.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Privmsg,
    Ping,
    Numeric(u16),
    Unknown(Box<str>),
}

pub const RPL_WELCOME: u16 = 1;
pub const RPL_YOURHOST: u16 = 2;
pub const RPL_NAMREPLY: u16 = 353;
pub const RPL_ENDOFNAMES: u16 = 366;
pub const RPL_MOTD: u16 = 372;
