use super::Quiz;
use crate::config::Config;
use crate::irc::{
    Event, Registration, Session, Writer, RPL_ENDOFNAMES, RPL_MOTD, RPL_NAMREPLY, RPL_WELCOME,
    RPL_YOURHOST,
};

use std::time::Duration;
use tokio::sync::mpsc;

/// Drives one connection from start to finish: construct the session,
/// register, then pump events until the connection dies. Single shot, no
/// reconnects; the error that ends the loop is the process's exit reason.
pub async fn run(config: Config, quiz: Option<Quiz>) -> anyhow::Result<()> {
    let address = config.address();
    log::debug!(
        "attempting to connect to server {} channel {} with nick {}",
        address,
        config.channel,
        config.nick
    );

    let mut session = Session::connect(
        address.as_str(),
        Registration {
            nick: &config.nick,
            user: &config.username,
            real: &config.realname,
        },
    )
    .await?;

    let (tx, mut rx) = mpsc::channel(64);
    let mut runner = Runner::new(config, Writer(tx), quiz);

    let mut line = String::new();
    loop {
        tokio::select! {
            events = session.read(&mut line) => {
                for event in events? {
                    runner.react(event).await?;
                }
                line.clear();
            }
            Some(data) = rx.recv() => session.write_raw(&data).await?,
        }
    }
}

/// Reacts to session events, one at a time, in arrival order. A handler
/// that sleeps holds up everything behind it.
pub struct Runner {
    config: Config,
    writer: Writer,
    quiz: Option<Quiz>,
}

impl Runner {
    pub fn new(config: Config, writer: Writer, quiz: Option<Quiz>) -> Self {
        Self {
            config,
            writer,
            quiz,
        }
    }

    pub async fn react(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::Connected => self.on_connect().await,

            Event::Numeric { code, data, .. } => {
                self.on_numeric(code, data.as_deref());
                Ok(())
            }

            Event::DirectMessage { sender, data } => {
                // intentionally inert, the bots take no commands this way
                log::info!("'{}' said to me: {}", sender, data);
                Ok(())
            }

            Event::ChannelMessage {
                sender,
                channel,
                data,
            } => match &mut self.quiz {
                Some(quiz) => {
                    quiz.on_channel_message(&sender, &channel, &data, &mut self.writer)
                        .await
                }
                None => Ok(()),
            },
        }
    }

    async fn on_connect(&mut self) -> anyhow::Result<()> {
        log::info!("successfully connected to server {}", self.config.server);

        greet(
            &mut self.writer,
            "server_connect",
            &self.config.server_connect_msg,
            &self.config.server_connect_nick,
            &self.config.server_connect_delay,
        )
        .await?;

        log::debug!("attempting to join {}", self.config.channel);
        if let Err(err) = self.writer.join(&self.config.channel).await {
            log::error!("error joining channel {}: {}", self.config.channel, err);
            return Ok(());
        }
        log::info!("connected to {}", self.config.channel);

        greet(
            &mut self.writer,
            "channel_connect",
            &self.config.channel_connect_msg,
            &self.config.channel_connect_nick,
            &self.config.channel_connect_delay,
        )
        .await
    }

    fn on_numeric(&self, code: u16, data: Option<&str>) {
        let data = data.unwrap_or_default();
        match code {
            RPL_WELCOME | RPL_YOURHOST | RPL_MOTD => log::debug!("{}", data),
            RPL_NAMREPLY => log::debug!("user list: {}", data),
            RPL_ENDOFNAMES => log::debug!("end of user list"),
            code => log::debug!("unhandled numeric {}", code),
        }
    }
}

/// Sends an optional service greeting as a direct message. A configured
/// delay sleeps right here, holding up the dispatch path for its full
/// length; inbound events queue in the meantime.
async fn greet(
    writer: &mut Writer,
    kind: &str,
    msg: &str,
    nick: &str,
    delay: &str,
) -> anyhow::Result<()> {
    if msg.is_empty() {
        return Ok(());
    }
    if nick.is_empty() {
        log::error!("{}_msg specified but not {}_nick", kind, kind);
        return Ok(());
    }

    // atoi semantics: anything unparseable or non-positive means no delay
    let delay = delay.parse::<i64>().unwrap_or(0);
    if delay > 0 {
        log::debug!("waiting {} seconds before sending command", delay);
        tokio::time::sleep(Duration::from_secs(delay as u64)).await;
    }

    log::debug!("sending {}_msg", kind);
    writer.privmsg(nick, msg).await
}
