mod command;
mod event;
mod parser;
mod prefix;
mod session;

pub use command::{
    Command, RPL_ENDOFNAMES, RPL_MOTD, RPL_NAMREPLY, RPL_WELCOME, RPL_YOURHOST,
};
pub use event::Event;
pub use parser::RawMessage;
pub use prefix::Prefix;
pub use session::{Registration, Session, Writer};
