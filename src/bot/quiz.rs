use crate::irc::Writer;

use std::path::PathBuf;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use anyhow::Context as _;

/// Marker MoxQuizz prefixes onto the line announcing a new question.
pub const QUIZ_PROMPT: &str = "{MoxQuizz} The question no.";

/// On-disk question/answer database, resolved relative to the working
/// directory.
pub const QUESTIONS_DB: &str = "questions.db";

/// Watches a channel for MoxQuizz questions and answers them out of a
/// flat-file database.
///
/// Two states: idle until the quizmaster posts the prompt marker, then the
/// quizmaster's next message is the question. At most one prompt is pending
/// at a time.
pub struct Quiz {
    quizmaster: String,
    database: PathBuf,
    awaiting_question: bool,
}

impl Quiz {
    pub fn new(quizmaster: impl ToString, database: impl Into<PathBuf>) -> Self {
        Self {
            quizmaster: quizmaster.to_string(),
            database: database.into(),
            awaiting_question: false,
        }
    }

    /// Feeds one channel message through the state machine. Messages from
    /// anyone but the quizmaster never touch it.
    pub async fn on_channel_message(
        &mut self,
        sender: &str,
        channel: &str,
        data: &str,
        writer: &mut Writer,
    ) -> anyhow::Result<()> {
        if sender != self.quizmaster {
            return Ok(());
        }

        if self.awaiting_question {
            self.awaiting_question = false;
            return self.answer(channel, data, writer).await;
        }

        if data.contains(QUIZ_PROMPT) {
            log::debug!("found prompt, ready for question");
            self.awaiting_question = true;
        }
        Ok(())
    }

    async fn answer(
        &self,
        channel: &str,
        question: &str,
        writer: &mut Writer,
    ) -> anyhow::Result<()> {
        let key = question_key(question);
        log::debug!("question was: {}", key);

        let answer = match self.lookup(key).await {
            Ok(Some(answer)) => answer,
            Ok(None) => {
                log::debug!("no answer found for: {}", key);
                return Ok(());
            }
            Err(err) => {
                log::error!("error reading question database: {:#}", err);
                return Ok(());
            }
        };

        log::debug!("i think the answer is {}", answer);
        writer.privmsg(channel, &answer).await
    }

    /// Scans the database for the first line containing `key` and takes
    /// the line after it as `label:answer`. The file is opened fresh for
    /// every lookup. A miss, a match on the last line, or a malformed
    /// answer line all come back as `None`.
    async fn lookup(&self, key: &str) -> anyhow::Result<Option<String>> {
        let file = File::open(&self.database)
            .await
            .with_context(|| format!("cannot open {}", self.database.display()))?;
        let mut lines = BufReader::new(file).lines();

        while let Some(line) = lines.next_line().await? {
            if !line.contains(key) {
                continue;
            }
            log::debug!("found match {}", line);

            let answer = lines.next_line().await?.and_then(|answer| {
                answer
                    .splitn(2, ':')
                    .nth(1)
                    .map(|answer| answer.trim_end().to_string())
            });
            return Ok(answer);
        }
        Ok(None)
    }
}

/// Strips the `(Category) ` prefix off a question by discarding everything
/// through the first `')'` plus the two characters after it. Without a
/// usable prefix the whole text is the key; substring matching makes up for
/// the sliced-off leading character either way.
fn question_key(question: &str) -> &str {
    match question.find(')') {
        Some(pos) => question.get(pos + 3..).unwrap_or(question),
        None => question,
    }
}
