use super::{Command, Event, RawMessage};

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use anyhow::{Context as _, Result};

#[derive(Copy, Clone, Debug)]
pub struct Registration<'a> {
    pub nick: &'a str,
    pub user: &'a str,
    pub real: &'a str,
}

/// One server connection. Created once, registered once, then pumped by
/// [`Session::read`] until the peer goes away.
pub struct Session<T> {
    stream: BufStream<T>,
}

impl Session<TcpStream> {
    /// Connects and registers. A failure here is fatal to the caller,
    /// there is no deferred outcome to wait on.
    pub async fn connect(addr: &str, reg: Registration<'_>) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("cannot connect to {}", addr))?;

        let mut session = Self::from_stream(stream);
        session.register(reg).await?;
        Ok(session)
    }
}

impl<T> Session<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub fn from_stream(inner: T) -> Self {
        Self {
            stream: BufStream::new(inner),
        }
    }

    pub async fn register(&mut self, reg: Registration<'_>) -> Result<()> {
        let Registration { nick, user, real } = reg;
        self.send(format!("NICK {}", nick)).await?;
        self.send(format!("USER {} * 8 :{}", user, real)).await
    }

    /// Reads the next line into `buf` and decodes it into events. PING is
    /// answered here and produces nothing; garbled lines are skipped. The
    /// caller owns `buf` so a cancelled read does not lose a partial line,
    /// and clears it once the events are handled.
    pub async fn read(&mut self, buf: &mut String) -> Result<Vec<Event>> {
        if 0 == self
            .stream
            .read_line(buf)
            .await
            .context("cannot read message")?
        {
            anyhow::bail!("disconnected");
        }

        let msg = match RawMessage::parse(buf) {
            Ok(msg) => msg,
            Err(err) => {
                log::warn!("ignoring line '{}': {}", buf.escape_debug(), err);
                return Ok(Vec::new());
            }
        };

        if let Command::Ping = msg.command {
            self.send(format!("PONG {}", msg.data.unwrap_or_default()))
                .await?;
            return Ok(Vec::new());
        }

        Ok(Event::decode(msg))
    }

    /// Writes one already-terminated line, as produced by [`Writer`].
    pub async fn write_raw(&mut self, data: &str) -> Result<()> {
        log::trace!("-> {}", data.trim_end());
        self.stream
            .write_all(data.as_bytes())
            .await
            .with_context(|| format!("line: {}", data.escape_debug()))?;
        self.stream.flush().await.map_err(Into::into)
    }

    async fn send(&mut self, resp: impl ToString) -> Result<()> {
        let mut resp = resp.to_string();
        resp.push_str("\r\n");
        self.write_raw(&resp).await
    }
}

/// Outbound command interface handed to the bots. Lines queue on a channel
/// and hit the socket from the run loop.
#[derive(Clone)]
pub struct Writer(pub mpsc::Sender<String>);

impl Writer {
    pub async fn join(&mut self, channel: impl std::fmt::Display) -> Result<()> {
        self.raw(format!("JOIN {}", channel)).await
    }

    pub async fn privmsg(
        &mut self,
        target: impl std::fmt::Display,
        data: impl std::fmt::Display,
    ) -> Result<()> {
        self.raw(format!("PRIVMSG {} :{}", target, data)).await
    }

    pub async fn raw(&mut self, data: impl std::fmt::Display) -> Result<()> {
        self.0.send(format!("{}\r\n", data)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn read_all(session: &mut Session<tokio::io::DuplexStream>) -> Vec<Event> {
        let mut events = Vec::new();
        let mut buf = String::new();
        while let Ok(batch) = session.read(&mut buf).await {
            events.extend(batch);
            buf.clear();
        }
        events
    }

    #[tokio::test]
    async fn ping_is_answered_internally() {
        let (inner, mut remote) = tokio::io::duplex(4096);
        let mut session = Session::from_stream(inner);

        remote.write_all(b"PING :12345\r\n").await.unwrap();

        let mut buf = String::new();
        let events = session.read(&mut buf).await.unwrap();
        assert!(events.is_empty());

        let mut out = vec![0_u8; 64];
        let n = tokio::io::AsyncReadExt::read(&mut remote, &mut out)
            .await
            .unwrap();
        assert_eq!(&out[..n], b"PONG 12345\r\n");
    }

    #[tokio::test]
    async fn registration_lines() {
        let (inner, mut remote) = tokio::io::duplex(4096);
        let mut session = Session::from_stream(inner);

        session
            .register(Registration {
                nick: "qircbot",
                user: "qircbot",
                real: "qircbot",
            })
            .await
            .unwrap();

        let mut out = vec![0_u8; 128];
        let n = tokio::io::AsyncReadExt::read(&mut remote, &mut out)
            .await
            .unwrap();
        assert_eq!(&out[..n], b"NICK qircbot\r\nUSER qircbot * 8 :qircbot\r\n");
    }

    #[tokio::test]
    async fn disconnect_surfaces_as_an_error() {
        let (inner, remote) = tokio::io::duplex(4096);
        let mut session = Session::from_stream(inner);
        drop(remote);

        let mut buf = String::new();
        let err = session.read(&mut buf).await.unwrap_err();
        assert!(err.to_string().contains("disconnected"));
    }

    #[tokio::test]
    async fn garbled_lines_are_skipped() {
        let (inner, mut remote) = tokio::io::duplex(4096);
        let mut session = Session::from_stream(inner);

        remote.write_all(b"   \r\n").await.unwrap();
        remote
            .write_all(b":serv!u@h PRIVMSG #qircbot :hello\r\n")
            .await
            .unwrap();
        drop(remote);

        let events = read_all(&mut session).await;
        assert_eq!(
            events,
            vec![Event::ChannelMessage {
                sender: "serv".into(),
                channel: "#qircbot".into(),
                data: "hello".into(),
            }]
        );
    }

    #[tokio::test]
    async fn writer_formats_outbound_commands() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut writer = Writer(tx);

        writer.join("#qircbot").await.unwrap();
        writer.privmsg("#qircbot", "hello").await.unwrap();
        writer.raw("AWAY :brb").await.unwrap();
        drop(writer);

        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }
        assert_eq!(
            lines,
            vec![
                "JOIN #qircbot\r\n".to_string(),
                "PRIVMSG #qircbot :hello\r\n".to_string(),
                "AWAY :brb\r\n".to_string(),
            ]
        );
    }
}
