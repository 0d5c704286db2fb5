//! A terminal host for interactive sessions with Wednesday.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use wednesday::core::conversation::Role;
use wednesday::core::media;
use wednesday::core::{
    Exchange, Orchestrator, OrchestratorBuilder, Outcome, Session, Upload,
    UserInput,
};
use wednesday::{Config, FirestoreCaseStore, GoogleTranslateSpeech};
use wednesday_gemini_model::{GeminiConfigBuilder, GeminiProvider};

const BAR_CHAR: &str = "▎";

const HELP: &str = "\
Type an inquiry and press enter. Commands:
  /upload <path>  attach a png or jpeg as evidence (no path detaches it)
  /agent <id>     change the agent name used for downloads and records
  /download       save the case file
  /audio          save the last spoken answer as mp3
  /clear          clear the history
  /status         show the session status
  /quit           leave";

enum Command<'a> {
    Help,
    Quit,
    Clear,
    Status,
    Download,
    Audio,
    Agent(&'a str),
    Upload(&'a str),
    Unknown(&'a str),
    Inquiry(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Some(Command::Inquiry(line));
        };
        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, arg)| (name, arg.trim()));
        Some(match name {
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "clear" => Command::Clear,
            "status" => Command::Status,
            "download" => Command::Download,
            "audio" => Command::Audio,
            "agent" => Command::Agent(arg),
            "upload" => Command::Upload(arg),
            _ => Command::Unknown(name),
        })
    }
}

/// State of the host that lives outside the session, like a file picker
/// that keeps showing the last chosen file.
struct Host {
    orchestrator: Orchestrator,
    session: Session,
    uploaded: Option<Upload>,
    database_online: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err}", "⚠️".bright_red());
            return ExitCode::FAILURE;
        }
    };
    debug!("starting with {config:?}");

    let mut gemini_config = GeminiConfigBuilder::with_api_key(&config.api_key);
    if let Some(model) = &config.model {
        gemini_config = gemini_config.with_model(model);
    }
    let gemini_config = gemini_config.build();
    let model_name = gemini_config.model().to_owned();

    let mut builder =
        OrchestratorBuilder::with_model_provider(GeminiProvider::new(gemini_config))
            .with_speech(GoogleTranslateSpeech::new());
    let database_online = config.project_id.is_some();
    if let Some(project_id) = &config.project_id {
        let store = match &config.access_token {
            Some(token) => FirestoreCaseStore::with_access_token(project_id, token),
            None => FirestoreCaseStore::with_api_key(project_id, &config.api_key),
        };
        builder = builder.with_case_store(store);
    }

    let mut host = Host {
        orchestrator: builder.build(),
        session: Session::new(&config.agent_id),
        uploaded: None,
        database_online,
    };

    println!("{}", "Wednesday: Voice & Vision".bold());
    println!("Powered by {model_name} | Vision • Voice • Search");
    host.print_status();
    println!("Type /help for commands.\n");

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut lines).await else {
            break;
        };
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match command {
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Clear => {
                host.session.clear_history();
                println!("🧹 History cleared.");
            }
            Command::Status => host.print_status(),
            Command::Download => host.download().await,
            Command::Audio => host.save_audio().await,
            Command::Agent("") => {
                println!("Agent: {}", host.session.agent_id());
            }
            Command::Agent(agent_id) => {
                host.session.set_agent_id(agent_id);
                println!("Agent is now {agent_id}.");
            }
            Command::Upload("") => {
                host.uploaded = None;
                println!("Evidence detached.");
            }
            Command::Upload(path) => {
                if host.attach(path).await {
                    // A new file is processed right away, like a fresh pick
                    // in a file uploader.
                    host.submit(UserInput::default()).await;
                }
            }
            Command::Unknown(name) => {
                println!("Unknown command /{name}. Type /help for commands.");
            }
            Command::Inquiry(text) => host.submit(UserInput::typed(text)).await,
        }
    }

    ExitCode::SUCCESS
}

impl Host {
    async fn submit(&mut self, input: UserInput) {
        let input = match &self.uploaded {
            Some(upload) => input.with_upload(upload.clone()),
            None => input,
        };
        if !self.session.should_process(&input) {
            println!("This evidence has already been analyzed.");
            return;
        }

        let progress_bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {wide_msg}") {
            progress_bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        progress_bar.set_message("🔎 Analyzing...");
        progress_bar.enable_steady_tick(Duration::from_millis(100));

        let outcome = self.orchestrator.process(&mut self.session, input).await;
        progress_bar.finish_and_clear();

        match outcome {
            Outcome::Skipped => {}
            Outcome::InvalidUpload(err) => {
                println!("{} {err}", "⚠️  Unreadable evidence:".bright_yellow());
            }
            Outcome::Exchanged(exchange) => self.print_exchange(&exchange),
        }
    }

    fn print_exchange(&self, exchange: &Exchange) {
        let turns = self.session.turns();
        if let Some(user_turn) = turns.len().checked_sub(2).map(|idx| &turns[idx]) {
            debug_assert_eq!(user_turn.role(), Role::User);
            let bar = BAR_CHAR.bright_green();
            if let Some(image) = user_turn.image() {
                println!("{bar}🖼️  {}", evidence_label(image));
            }
            println!("{bar}🕵️ {}", user_turn.text().unwrap_or_default());
        }
        if let Some(err) = &exchange.upload_error {
            println!("{} {err}", "⚠️  Unreadable evidence:".bright_yellow());
        }

        println!(
            "{}🦇 {}",
            BAR_CHAR.bright_cyan(),
            exchange.reply.bright_white()
        );
        if let Some(audio) = &exchange.audio {
            println!(
                "{}🔊 {} KiB of audio ready, /audio to save it",
                BAR_CHAR.bright_cyan(),
                audio.len().div_ceil(1024)
            );
        }
        if let Some(err) = &exchange.speech_error {
            println!("{} {err}", "Audio Error:".bright_red());
        }
        println!();
    }

    async fn attach(&mut self, path: &str) -> bool {
        let path = Path::new(path);
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            println!("Not a file: {}", path.display());
            return false;
        };
        if !media::is_supported_upload(name) {
            println!(
                "Only {} files are accepted.",
                media::SUPPORTED_EXTENSIONS.join(", ")
            );
            return false;
        }
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                self.uploaded = Some(Upload::new(name, bytes));
                true
            }
            Err(err) => {
                println!("Cannot read {}: {err}", path.display());
                false
            }
        }
    }

    async fn download(&self) {
        let Some(transcript) = self.session.export_transcript() else {
            println!("Nothing to download yet.");
            return;
        };
        let file_name = self.session.transcript_file_name();
        match tokio::fs::write(&file_name, transcript).await {
            Ok(()) => println!("📂 Case file saved to {file_name}."),
            Err(err) => println!("Cannot write {file_name}: {err}"),
        }
    }

    async fn save_audio(&self) {
        let Some(audio) = self.session.conversation().last_audio() else {
            println!("No spoken answer yet.");
            return;
        };
        let file_name = format!("{}_last_answer.mp3", self.session.agent_id());
        match tokio::fs::write(&file_name, audio).await {
            Ok(()) => println!("🔊 Answer saved to {file_name}."),
            Err(err) => println!("Cannot write {file_name}: {err}"),
        }
    }

    fn print_status(&self) {
        if self.database_online {
            println!("{}", "✅ Database Online".bright_green());
        } else {
            println!("{}", "❌ Database Offline".bright_red());
            println!("   Reason: GOOGLE_CLOUD_PROJECT env var is missing.");
        }
        println!("Agent: {}", self.session.agent_id());
        println!("Turns: {}", self.session.turns().len());
        if let Some(upload) = &self.uploaded {
            println!("Evidence: {}", upload.name());
        }
    }
}

/// Describes a stored evidence image by its decoded size.
fn evidence_label(image: &str) -> String {
    match media::decode_base64(image) {
        Ok(bytes) => format!(
            "[evidence attached, {} KiB png]",
            bytes.len().div_ceil(1024)
        ),
        Err(err) => {
            warn!("stored evidence is not valid base64: {err}");
            "[evidence attached, unreadable]".to_owned()
        }
    }
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    match lines.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
