//! Interactive terminal front end for the chat widget.
//!
//! Each line typed is posted to the chat server's `/api/chat` endpoint and the reply is printed
//! with `**bold**` rendered as bold text.
//!
//! # Usage
//!
//! ```bash
//! # Talk to the default server (http://127.0.0.1:3000/)
//! chatwidget-chat
//!
//! # Talk to another server, with a shorter timeout
//! chatwidget-chat --base-url https://chat.example.com/ --timeout-secs 10
//!
//! # Disable colors and keep an HTML copy of the conversation
//! chatwidget-chat --no-color --html-transcript chat.html
//! ```
//!
//! Diagnostics go to stderr only when `RUST_LOG` is set (e.g. `RUST_LOG=chatwidget=debug`).
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/open`, `/close` - Show or hide the widget
//! - `/server <url>` - Talk to a different server, keeping the transcript
//! - `/timeout <seconds>` - Change the request timeout
//! - `/html <file>` - Write the transcript as HTML now
//! - `/stats` - Show session statistics
//! - `/config` - Show the current configuration
//! - `/quit` - Exit the application

use std::path::Path;
use std::time::Duration;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use chatwidget::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, HtmlRenderer, PlainTextRenderer, Renderer,
    WidgetState, help_text, parse_command,
};
use chatwidget::observability::diagnostics_filter;
use chatwidget::{ChatClient, Error};

/// Main entry point for the chatwidget-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(diagnostics_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("chatwidget-chat [OPTIONS]");
    let mut config = ChatConfig::from(args);

    let mut session = ChatSession::from_config(&config)?;
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut widget = WidgetState::new();
    let mut rl = DefaultEditor::new()?;

    println!("Chat widget (server: {})", session.transport().base_url());
    println!("Type /help for commands, /quit to exit\n");
    widget.open(&mut renderer);

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Open => {
                            widget.open(&mut renderer);
                            renderer.print_info("Chat opened.");
                        }
                        ChatCommand::Close => {
                            widget.close(&mut renderer);
                            renderer.print_info("Chat closed. Type /open to show it again.");
                        }
                        ChatCommand::BaseUrl(url) => {
                            let candidate = config.clone().with_base_url(url.clone());
                            match candidate.client() {
                                Ok(client) => {
                                    session.set_transport(client);
                                    config = candidate;
                                    renderer.print_info(&format!("Server changed to: {}", url));
                                }
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                        }
                        ChatCommand::Timeout(secs) => {
                            let candidate = config.clone().with_timeout(Duration::from_secs(secs));
                            match candidate.client() {
                                Ok(client) => {
                                    session.set_transport(client);
                                    config = candidate;
                                    renderer.print_info(&format!("Timeout set to {secs}s"));
                                }
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                        }
                        ChatCommand::SaveHtml(path) => {
                            match write_html_transcript(&session, &path) {
                                Ok(_) => renderer
                                    .print_info(&format!("Transcript written to {}", path)),
                                Err(err) => renderer
                                    .print_error(&format!("Failed to write transcript: {}", err)),
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session, &widget);
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&config);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the server if the widget is open
                session.submit_if_open(&widget, line, &mut renderer).await;
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    if let Some(path) = config.html_transcript.as_deref()
        && let Err(err) = write_html_transcript(&session, path)
    {
        renderer.print_error(&format!("Failed to write transcript: {}", err));
    }

    Ok(())
}

fn write_html_transcript(
    session: &ChatSession<ChatClient>,
    path: impl AsRef<Path>,
) -> Result<(), Error> {
    let html = HtmlRenderer::from_transcript(session.transcript()).to_html();
    std::fs::write(path.as_ref(), html)
        .map_err(|err| Error::io("failed to write HTML transcript", err))
}

fn print_stats(session: &ChatSession<ChatClient>, widget: &WidgetState) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Widget: {}", if widget.is_open() { "open" } else { "closed" });
    println!("      State: {}", stats.state);
    println!("      Messages: {}", stats.message_count);
    println!("      Submissions: {}", stats.submissions);
    println!("      Replies: {}", stats.replies);
    println!("      Transport failures: {}", stats.transport_failures);
    println!("      Empty results: {}", stats.empty_results);
}

fn print_config(config: &ChatConfig) {
    println!("    Current Configuration:");
    println!("      Server: {}", config.base_url);
    println!("      Endpoint: {}", config.endpoint);
    println!("      Timeout: {}s", config.timeout.as_secs());
    println!(
        "      Color: {}",
        if config.use_color { "enabled" } else { "disabled" }
    );
    match config.html_transcript {
        Some(ref path) => println!("      HTML transcript: {}", path.display()),
        None => println!("      HTML transcript: (disabled)"),
    }
}
