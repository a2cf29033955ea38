mod cli;
mod config;
mod core;
mod error;
mod logging;
mod tui;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::core::{
    ChatSession, Completer, DisplayContent, Failure, OpenAiCompletionClient, StyledLine,
    Transcript, TranscriptSession, YouTubeTranscriptSource, emphasize, summarize,
};
use crate::error::Result;
use crate::tui::{App, EventHandler, Tui, init as tui_init, restore as tui_restore, ui};
use clap::Parser;
use crossterm::style::Stylize;
use std::io::Write;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

const CHAT_QUIT: &str = "/quit";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_options(&cli.options);

    let in_tui = matches!(cli.command, None | Some(Commands::Tui));
    logging::init(config.log_file.as_deref(), !in_tui)?;

    match cli.command {
        Some(Commands::Get {
            video,
            json,
            timestamps,
        }) => {
            run_cli_get(&config, &video, json, timestamps).await?;
        }
        Some(Commands::Summarize { video, html }) => {
            run_cli_summarize(&config, &video, html).await?;
        }
        Some(Commands::Chat { video, no_summary }) => {
            run_cli_chat(&config, &video, no_summary).await?;
        }
        Some(Commands::Tui) | None => {
            run_tui(config).await?;
        }
    }

    Ok(())
}

fn completer(config: &Config) -> Result<Completer<OpenAiCompletionClient>> {
    let completion = config.completion()?;
    let client = OpenAiCompletionClient::new(&completion);
    Ok(Completer::new(client, completion.model, config.timeout))
}

async fn download(config: &Config, video: &str) -> Result<Transcript> {
    let source = YouTubeTranscriptSource::new()?;
    let session = TranscriptSession::new(source, config.languages.clone(), config.timeout);
    Ok(session.download(video).await?)
}

async fn run_cli_get(config: &Config, video: &str, json: bool, timestamps: bool) -> Result<()> {
    let transcript = download(config, video).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&transcript)?);
    } else if timestamps {
        for line in transcript.timestamped_lines() {
            println!("{line}");
        }
    } else {
        println!("{}", transcript.text());
    }

    Ok(())
}

async fn run_cli_summarize(config: &Config, video: &str, html: bool) -> Result<()> {
    let completer = completer(config)?;
    let transcript = download(config, video).await?;
    let summary = summarize(&completer, &transcript.text()).await?;

    if html {
        println!("{}", summary.to_html());
    } else {
        print_styled(&summary.lines());
    }

    Ok(())
}

async fn run_cli_chat(config: &Config, video: &str, no_summary: bool) -> Result<()> {
    let completer = completer(config)?;
    let transcript = download(config, video).await?;

    let content = if no_summary {
        DisplayContent::Transcript(transcript)
    } else {
        let summary = summarize(&completer, &transcript.text()).await?;
        print_styled(&summary.lines());
        DisplayContent::Summary(summary)
    };

    let mut session = ChatSession::open(content.plain_text())?;
    println!();
    println!("Ask about the video ({CHAT_QUIT} or Ctrl+D to leave)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "You:".bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let line = line.trim();
        if line == CHAT_QUIT {
            break;
        }

        match session.send_message(&completer, line).await {
            Ok(reply) => print_reply(&reply),
            Err(Failure::EmptyInput(_)) => continue,
            Err(failure) => eprintln!("{} {failure}", "Error:".red().bold()),
        }
    }

    Ok(())
}

fn print_styled(lines: &[StyledLine]) {
    for line in lines {
        for fragment in line {
            if fragment.bold {
                print!("{}", fragment.text.as_str().bold());
            } else {
                print!("{}", fragment.text);
            }
        }
        println!();
    }
}

fn print_reply(reply: &str) {
    let width = crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(80);
    let options = textwrap::Options::new(width.max(20)).subsequent_indent("    ");

    let plain: Vec<String> = emphasize(reply)
        .iter()
        .map(|line| line.iter().map(|f| f.text.as_str()).collect())
        .collect();

    for (i, line) in plain.iter().enumerate() {
        let text = if i == 0 {
            format!("AI: {line}")
        } else {
            format!("    {line}")
        };
        for wrapped in textwrap::wrap(&text, &options) {
            println!("{wrapped}");
        }
    }
}

async fn run_tui(config: Config) -> Result<()> {
    let source = YouTubeTranscriptSource::new()?;
    let transcripts = TranscriptSession::new(source, config.languages.clone(), config.timeout);
    let completer = completer(&config).map_err(|e| e.to_string());
    if let Err(reason) = &completer {
        tracing::warn!(%reason, "Summaries and chat are unavailable");
    }

    let mut app = App::new(transcripts, completer, config.theme);

    let mut terminal = tui_init()?;
    let result = event_loop(&mut terminal, &mut app);
    tui_restore()?;
    result
}

fn event_loop(
    terminal: &mut Tui,
    app: &mut App<YouTubeTranscriptSource, OpenAiCompletionClient>,
) -> Result<()> {
    let event_handler = EventHandler::new();

    loop {
        terminal.draw(|f| {
            ui::draw(f, app);
        })?;

        let event = event_handler.next_event()?;
        app.handle_event(event)?;

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
