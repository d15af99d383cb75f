use anyhow::Context as _;
use std::path::{Path, PathBuf};

/// The recognized option keys, checked in this order against every line.
const OPTIONS: [&str; 13] = [
    "server",
    "port",
    "channel",
    "nick",
    "username",
    "realname",
    "server_connect_msg",
    "server_connect_nick",
    "server_connect_delay",
    "channel_connect_msg",
    "channel_connect_nick",
    "channel_connect_delay",
    "quizbot_nick",
];

/// The bot configuration. Built from the compiled-in defaults, overridden
/// field-by-field from a `key=value` file, then read-only for the rest of
/// the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub server: String,
    pub port: String,
    pub channel: String,
    pub nick: String,
    pub username: String,
    pub realname: String,

    /// Sent to `server_connect_nick` after connecting, useful for NickServ
    pub server_connect_msg: String,
    pub server_connect_nick: String,
    pub server_connect_delay: String,

    /// Sent to `channel_connect_nick` after joining, useful for ChanServ
    pub channel_connect_msg: String,
    pub channel_connect_nick: String,
    pub channel_connect_delay: String,

    /// Nick to listen to for questions (quiz variant only)
    pub quizbot_nick: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: "irc.freenode.org".into(),
            port: "6667".into(),
            channel: "#qircbot".into(),
            nick: "qircbot".into(),
            username: "qircbot".into(),
            realname: "qircbot".into(),
            server_connect_msg: String::new(),
            server_connect_nick: String::new(),
            server_connect_delay: String::new(),
            channel_connect_msg: String::new(),
            channel_connect_nick: String::new(),
            channel_connect_delay: String::new(),
            quizbot_nick: "juicer".into(),
        }
    }
}

impl Config {
    /// Resolves the config location: an explicit `-c` path wins, otherwise
    /// `<home>/<default_name>`. The bool reports whether the path was
    /// explicit, which decides if a missing file is fatal.
    pub fn resolve_path(explicit: Option<PathBuf>, default_name: &str) -> (PathBuf, bool) {
        match explicit {
            Some(path) => (path, true),
            None => (
                dirs::home_dir().unwrap_or_default().join(default_name),
                false,
            ),
        }
    }

    /// Loads the configuration from `path`. A missing file is fatal only
    /// when the path was explicit; with the default location the defaults
    /// are retained.
    pub async fn load(path: impl AsRef<Path>, explicit: bool) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::debug!("attempting to load config file {}", path.display());

        let data = match tokio::fs::read_to_string(path).await {
            Ok(data) => data,
            Err(..) if !explicit => {
                log::info!("no configuration file found, using defaults");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("cannot read configuration file {}", path.display()))
            }
        };

        let mut config = Self::default();
        for line in data.lines() {
            config.apply(line)?;
        }

        log::debug!("configuration options: {:#?}", config);
        Ok(config)
    }

    /// `host:port` form the session connects to. An unparseable port shows
    /// up as a connect failure, not a config error.
    pub fn address(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }

    /// Applies one config line. A line overrides a field when it starts
    /// with `<key>=`; the first matching key wins and an empty value is an
    /// error. Anything else is silently ignored.
    fn apply(&mut self, line: &str) -> anyhow::Result<()> {
        for &key in &OPTIONS {
            let value = match line.strip_prefix(key).and_then(|rest| rest.strip_prefix('=')) {
                Some(value) => value,
                None => continue,
            };

            if value.is_empty() {
                anyhow::bail!("empty cfg option {}", key);
            }

            *self.field_mut(key) = value.to_string();
            break;
        }
        Ok(())
    }

    fn field_mut(&mut self, key: &str) -> &mut String {
        match key {
            "server" => &mut self.server,
            "port" => &mut self.port,
            "channel" => &mut self.channel,
            "nick" => &mut self.nick,
            "username" => &mut self.username,
            "realname" => &mut self.realname,
            "server_connect_msg" => &mut self.server_connect_msg,
            "server_connect_nick" => &mut self.server_connect_nick,
            "server_connect_delay" => &mut self.server_connect_delay,
            "channel_connect_msg" => &mut self.channel_connect_msg,
            "channel_connect_nick" => &mut self.channel_connect_nick,
            "channel_connect_delay" => &mut self.channel_connect_delay,
            "quizbot_nick" => &mut self.quizbot_nick,
            key => unreachable!("unknown cfg option {}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_key_overrides_exactly_its_field() {
        let mut config = Config::default();
        config.apply("server=irc.example.com").unwrap();
        config.apply("port=6697").unwrap();
        config.apply("nick=trebek").unwrap();

        assert_eq!(config.server, "irc.example.com");
        assert_eq!(config.port, "6697");
        assert_eq!(config.nick, "trebek");

        // untouched fields keep their defaults
        let default = Config::default();
        assert_eq!(config.channel, default.channel);
        assert_eq!(config.username, default.username);
        assert_eq!(config.quizbot_nick, default.quizbot_nick);
    }

    #[test]
    fn unrecognized_lines_are_ignored() {
        let mut config = Config::default();
        config.apply("# not a comment, just an unknown line").unwrap();
        config.apply("servers=irc.example.com").unwrap();
        config.apply("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn empty_value_aborts_and_keeps_earlier_overrides() {
        let mut config = Config::default();
        config.apply("nick=newnick").unwrap();
        config.apply("channel=").unwrap_err();

        // lines before the offending one are already applied, the rest
        // stays at default
        assert_eq!(config.nick, "newnick");
        assert_eq!(config.channel, Config::default().channel);
    }

    #[test]
    fn similar_prefixes_do_not_collide() {
        let mut config = Config::default();
        config.apply("server_connect_msg=identify hunter2").unwrap();
        assert_eq!(config.server, Config::default().server);
        assert_eq!(config.server_connect_msg, "identify hunter2");
    }

    #[tokio::test]
    async fn load_overrides_from_file() {
        use std::io::Write as _;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server=irc.example.com").unwrap();
        writeln!(file, "channel=#trivia").unwrap();
        writeln!(file, "bogus line").unwrap();

        let config = Config::load(file.path(), true).await.unwrap();
        assert_eq!(config.server, "irc.example.com");
        assert_eq!(config.channel, "#trivia");
        assert_eq!(config.nick, Config::default().nick);
    }

    #[tokio::test]
    async fn load_with_empty_value_is_fatal() {
        use std::io::Write as _;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "nick=").unwrap();

        let err = Config::load(file.path(), true).await.unwrap_err();
        assert!(err.to_string().contains("empty cfg option nick"));
    }

    #[tokio::test]
    async fn missing_default_path_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join(".quizbot.cfg"), false)
            .await
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn missing_explicit_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        Config::load(dir.path().join("nope.cfg"), true)
            .await
            .unwrap_err();
    }

    #[test]
    fn address_joins_server_and_port() {
        let config = Config::default();
        assert_eq!(config.address(), "irc.freenode.org:6667");
    }
}
