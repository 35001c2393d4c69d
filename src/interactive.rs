//! The describe session: the first description and the follow-up REPL.
//!
//! Answers go to `out` (stdout); prompts, notices and errors go to `err`
//! (stderr). A spoken answer is never also printed, so a screen reader
//! does not talk over the synthesized voice.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::describe::{build_follow_up_prompt, Describer, ImageInput};
use crate::error::Result;
use crate::narrator::Speaker;
use crate::playback::PlaybackOutcome;

const SPEAK_SUFFIX: &str = "/tts";

const HELP_TEXT: &str = "Commands:
  /tts              Speak the last response (Google Cloud TTS)
  <question> /tts   Ask a question and speak the answer
  /save [file]      Save last response to file
  /quit             Exit interactive mode
  /help             Show this help
Anything else is sent as a follow-up question about the image.";

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    Quit,
    /// Speak the last response
    Tts,
    /// Save the last response, to the given file or the session default
    Save(Option<String>),
    Help,
    Ask { question: String, speak: bool },
}

pub fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim();

    match line {
        "" => ReplCommand::Empty,
        "/quit" | "/q" | "/exit" => ReplCommand::Quit,
        "/tts" => ReplCommand::Tts,
        "/help" | "/?" => ReplCommand::Help,
        _ if line.starts_with("/save") => {
            let file = line["/save".len()..].trim();
            ReplCommand::Save((!file.is_empty()).then(|| file.to_string()))
        }
        _ => match line.strip_suffix(SPEAK_SUFFIX) {
            Some(question) => ReplCommand::Ask {
                question: question.trim().to_string(),
                speak: true,
            },
            None => ReplCommand::Ask {
                question: line.to_string(),
                speak: false,
            },
        },
    }
}

/// State carried across one image's conversation
pub struct Session<'a> {
    describer: &'a dyn Describer,
    speaker: &'a dyn Speaker,
    image: ImageInput,
    output_file: Option<PathBuf>,
    last_response: String,
}

impl<'a> Session<'a> {
    pub fn new(
        describer: &'a dyn Describer,
        speaker: &'a dyn Speaker,
        image: ImageInput,
        output_file: Option<PathBuf>,
    ) -> Self {
        Self {
            describer,
            speaker,
            image,
            output_file: output_file.filter(|p| !p.as_os_str().is_empty()),
            last_response: String::new(),
        }
    }

    pub fn last_response(&self) -> &str {
        &self.last_response
    }

    /// Produce the first description, deliver it and save it
    ///
    /// A model failure is returned to the caller; TTS and save failures
    /// are reported on `err` and do not fail the run.
    pub async fn describe_initial(
        &mut self,
        prompt: &str,
        speak: bool,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<()> {
        let description = self.describer.describe(prompt, Some(&self.image)).await?;
        self.last_response = description;

        self.deliver(speak, out, err).await?;

        if let Some(path) = self.output_file.clone() {
            if let Err(e) = std::fs::write(&path, &self.last_response) {
                writeln!(err, "Error writing output file: {}", e)?;
            }
        }

        Ok(())
    }

    /// Read commands and follow-up questions until EOF or a quit command
    pub async fn run(
        &mut self,
        mut input: impl BufRead,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<()> {
        writeln!(err, "\nInteractive mode. Commands: /tts, /save [file], /quit")?;
        write!(err, "> ")?;
        err.flush()?;

        // Raw bytes: a line that is not valid UTF-8 is still a question
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);

            match parse_line(&line) {
                ReplCommand::Empty => {}
                ReplCommand::Quit => return Ok(()),
                ReplCommand::Tts => self.speak_last(err).await?,
                ReplCommand::Save(file) => self.save(file.as_deref(), err)?,
                ReplCommand::Help => writeln!(err, "{}", HELP_TEXT)?,
                ReplCommand::Ask { question, speak } => {
                    self.ask(&question, speak, out, err).await?
                }
            }

            write!(err, "> ")?;
            err.flush()?;
        }

        Ok(())
    }

    async fn ask(
        &mut self,
        question: &str,
        speak: bool,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<()> {
        let prompt = build_follow_up_prompt(&self.last_response, question);

        match self.describer.describe(&prompt, Some(&self.image)).await {
            Ok(answer) => {
                self.last_response = answer;
                self.deliver(speak, out, err).await
            }
            Err(e) => {
                tracing::debug!("Follow-up failed: {}", e);
                writeln!(err, "Error: {}", e)?;
                Ok(())
            }
        }
    }

    async fn deliver(&self, speak: bool, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
        if speak {
            self.speak_last(err).await
        } else {
            writeln!(out, "{}", self.last_response)?;
            Ok(())
        }
    }

    async fn speak_last(&self, err: &mut dyn Write) -> Result<()> {
        match self.speaker.speak(&self.last_response).await {
            Ok(PlaybackOutcome::Played { .. }) => {}
            Ok(PlaybackOutcome::Saved(path)) => {
                writeln!(err, "No audio player found. Saved MP3 to {}", path.display())?
            }
            Err(e) => writeln!(err, "TTS error: {}", e)?,
        }
        Ok(())
    }

    fn save(&self, file: Option<&str>, err: &mut dyn Write) -> Result<()> {
        let path = match (file, &self.output_file) {
            (Some(f), _) => Path::new(f).to_path_buf(),
            (None, Some(default)) => default.clone(),
            (None, None) => {
                writeln!(err, "Error saving: no file given")?;
                return Ok(());
            }
        };

        match std::fs::write(&path, &self.last_response) {
            Ok(()) => writeln!(err, "Saved to {}", path.display())?,
            Err(e) => writeln!(err, "Error saving: {}", e)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use std::io::Cursor;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Answers with a numbered reply and records every prompt
    #[derive(Default)]
    struct ScriptedModel {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Describer for ScriptedModel {
        async fn describe(&self, prompt: &str, image: Option<&ImageInput>) -> Result<String> {
            assert!(image.is_some(), "every request carries the image");
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            if self.fail {
                return Err(Error::EmptyResponse);
            }
            Ok(format!("answer {}", prompts.len()))
        }
    }

    #[derive(Default)]
    struct RecordingSpeaker {
        spoken: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Speaker for RecordingSpeaker {
        async fn speak(&self, text: &str) -> Result<PlaybackOutcome> {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(PlaybackOutcome::Played { player: "mpv" })
        }
    }

    struct FailingSpeaker;

    #[async_trait]
    impl Speaker for FailingSpeaker {
        async fn speak(&self, _text: &str) -> Result<PlaybackOutcome> {
            Err(Error::Credentials("no credentials".to_string()))
        }
    }

    fn image() -> ImageInput {
        ImageInput::new("image/png", vec![1, 2, 3])
    }

    fn text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("   "), ReplCommand::Empty);
        assert_eq!(parse_line("/quit"), ReplCommand::Quit);
        assert_eq!(parse_line("/q"), ReplCommand::Quit);
        assert_eq!(parse_line(" /exit "), ReplCommand::Quit);
        assert_eq!(parse_line("/tts"), ReplCommand::Tts);
        assert_eq!(parse_line("/help"), ReplCommand::Help);
        assert_eq!(parse_line("/?"), ReplCommand::Help);
    }

    #[test]
    fn test_parse_save() {
        assert_eq!(parse_line("/save"), ReplCommand::Save(None));
        assert_eq!(
            parse_line("/save  notes.txt "),
            ReplCommand::Save(Some("notes.txt".to_string()))
        );
    }

    #[test]
    fn test_parse_question_with_speak_suffix() {
        assert_eq!(
            parse_line("what color is it? /tts"),
            ReplCommand::Ask {
                question: "what color is it?".to_string(),
                speak: true
            }
        );
        assert_eq!(
            parse_line("how many clusters?"),
            ReplCommand::Ask {
                question: "how many clusters?".to_string(),
                speak: false
            }
        );
    }

    #[tokio::test]
    async fn test_initial_description_printed_and_saved() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("description.txt");
        let model = ScriptedModel::default();
        let speaker = RecordingSpeaker::default();
        let mut session = Session::new(&model, &speaker, image(), Some(output.clone()));

        let (mut out, mut err) = (Vec::new(), Vec::new());
        session
            .describe_initial("describe it", false, &mut out, &mut err)
            .await
            .unwrap();

        assert_eq!(text(out), "answer 1\n");
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "answer 1");
        assert!(speaker.spoken.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_initial_description_spoken_not_printed() {
        let model = ScriptedModel::default();
        let speaker = RecordingSpeaker::default();
        let mut session = Session::new(&model, &speaker, image(), None);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        session
            .describe_initial("describe it", true, &mut out, &mut err)
            .await
            .unwrap();

        assert!(out.is_empty());
        assert_eq!(speaker.spoken.lock().unwrap().as_slice(), &["answer 1".to_string()]);
    }

    #[tokio::test]
    async fn test_initial_model_failure_propagates() {
        let model = ScriptedModel {
            fail: true,
            ..Default::default()
        };
        let speaker = RecordingSpeaker::default();
        let mut session = Session::new(&model, &speaker, image(), None);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let result = session.describe_initial("p", false, &mut out, &mut err).await;

        assert!(matches!(result, Err(Error::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_tts_failure_reported_not_fatal() {
        let model = ScriptedModel::default();
        let mut session = Session::new(&model, &FailingSpeaker, image(), None);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        session.describe_initial("p", true, &mut out, &mut err).await.unwrap();

        assert!(text(err).contains("TTS error: Credentials error: no credentials"));
    }

    #[tokio::test]
    async fn test_follow_up_uses_previous_answer() {
        let model = ScriptedModel::default();
        let speaker = RecordingSpeaker::default();
        let mut session = Session::new(&model, &speaker, image(), None);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        session.describe_initial("p", false, &mut out, &mut err).await.unwrap();

        let input = Cursor::new("which is biggest?\n/quit\nnever asked\n");
        session.run(input, &mut out, &mut err).await.unwrap();

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].ends_with("Previous description: answer 1 User question: which is biggest?"));
        assert_eq!(text(out), "answer 1\nanswer 2\n");
        assert_eq!(session.last_response(), "answer 2");
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_session() {
        let model = ScriptedModel::default();
        let speaker = RecordingSpeaker::default();
        let mut session = Session::new(&model, &speaker, image(), None);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let input = Cursor::new(&b"caf\xe9?\nsecond question\n"[..]);
        session.run(input, &mut out, &mut err).await.unwrap();

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].ends_with("User question: caf\u{FFFD}?"));
        assert!(prompts[1].ends_with("User question: second question"));
        assert_eq!(text(out), "answer 1\nanswer 2\n");
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_read() {
        let model = ScriptedModel::default();
        let speaker = RecordingSpeaker::default();
        let mut session = Session::new(&model, &speaker, image(), None);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        session
            .run(Cursor::new("only question"), &mut out, &mut err)
            .await
            .unwrap();

        assert!(model.prompts.lock().unwrap()[0].ends_with("User question: only question"));
    }

    #[tokio::test]
    async fn test_spoken_follow_up_not_printed() {
        let model = ScriptedModel::default();
        let speaker = RecordingSpeaker::default();
        let mut session = Session::new(&model, &speaker, image(), None);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let input = Cursor::new("what color is it? /tts\n");
        session.run(input, &mut out, &mut err).await.unwrap();

        assert!(out.is_empty());
        assert!(model.prompts.lock().unwrap()[0].ends_with("User question: what color is it?"));
        assert_eq!(speaker.spoken.lock().unwrap().as_slice(), &["answer 1".to_string()]);
    }

    #[tokio::test]
    async fn test_follow_up_error_keeps_session_alive() {
        let model = ScriptedModel {
            fail: true,
            ..Default::default()
        };
        let speaker = RecordingSpeaker::default();
        let mut session = Session::new(&model, &speaker, image(), None);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let input = Cursor::new("first?\nsecond?\n");
        session.run(input, &mut out, &mut err).await.unwrap();

        assert_eq!(model.prompts.lock().unwrap().len(), 2);
        assert_eq!(text(err).matches("Error: no response generated").count(), 2);
    }

    #[tokio::test]
    async fn test_save_to_named_and_default_file() {
        let dir = TempDir::new().unwrap();
        let default = dir.path().join("description.txt");
        let named = dir.path().join("notes.txt");
        let model = ScriptedModel::default();
        let speaker = RecordingSpeaker::default();
        let mut session = Session::new(&model, &speaker, image(), Some(default.clone()));

        let (mut out, mut err) = (Vec::new(), Vec::new());
        session.describe_initial("p", false, &mut out, &mut err).await.unwrap();
        std::fs::remove_file(&default).unwrap();

        let input = Cursor::new(format!("/save {}\n/save\n", named.display()));
        session.run(input, &mut out, &mut err).await.unwrap();

        assert_eq!(std::fs::read_to_string(&named).unwrap(), "answer 1");
        assert_eq!(std::fs::read_to_string(&default).unwrap(), "answer 1");
        assert!(text(err).contains(&format!("Saved to {}", named.display())));
    }

    #[tokio::test]
    async fn test_tts_command_speaks_last_response() {
        let model = ScriptedModel::default();
        let speaker = RecordingSpeaker::default();
        let mut session = Session::new(&model, &speaker, image(), None);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        session.describe_initial("p", false, &mut out, &mut err).await.unwrap();
        session
            .run(Cursor::new("/tts\n/help\n"), &mut out, &mut err)
            .await
            .unwrap();

        assert_eq!(speaker.spoken.lock().unwrap().as_slice(), &["answer 1".to_string()]);
        assert!(text(err).contains("<question> /tts"));
    }
}
