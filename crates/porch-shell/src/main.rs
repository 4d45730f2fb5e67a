//! Terminal shell for exercising the Porch widget end to end.
//!
//! Drives the widget engine the way an embedded page would: reads
//! visitor input, sends it through the webhook backend, and plays the
//! typewriter reveal on a tokio interval, with ctrl-c tearing the
//! reveal down cleanly.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use porch_core::config::{WidgetConfig, WidgetOverrides};
use porch_core::typing::{TickOutcome, sanitize_line};
use porch_core::widget::ChatWidget;
use porch_webhook::WebhookClient;

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/start".to_string(),
                "/quick".to_string(),
                "/links".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Loads widget config, merging JSON overrides from the file named by
/// `PORCH_CONFIG` (if set) under the defaults.
fn load_config() -> Result<WidgetConfig> {
    let base = WidgetConfig::default();
    let Ok(path) = std::env::var("PORCH_CONFIG") else {
        return Ok(base);
    };
    let content = std::fs::read_to_string(&path)?;
    let overrides: WidgetOverrides = serde_json::from_str(&content)?;
    tracing::info!(%path, "loaded widget config overrides");
    Ok(overrides.apply(base))
}

/// Arms a ctrl-c listener that cancels the given token once.
fn spawn_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
}

/// Prints a finalized bot message with its CTA buttons.
fn print_finished(widget: &ChatWidget<WebhookClient>, id: Uuid) {
    if let Some(message) = widget.transcript().get(id) {
        for line in message.text.lines() {
            println!("{}", sanitize_line(line).bright_blue());
        }
    }
    if let Some(links) = widget.cta_links(id) {
        for link in links {
            println!(
                "  {} {}",
                format!("[{}]", link.label).bright_yellow().bold(),
                link.url.bright_black()
            );
        }
    }
}

/// Prints the transcript's latest bot message, if any.
///
/// Covers replies that never start a reveal, like the fixed apology
/// appended when the webhook call fails.
fn print_latest_reply(widget: &ChatWidget<WebhookClient>) {
    if let Some(message) = widget.transcript().last().filter(|m| m.is_bot()) {
        for line in message.text.lines() {
            println!("{}", line.bright_blue());
        }
    }
}

/// Plays the typewriter reveal, printing the sanitized visible text per
/// tick and the final message (with CTA buttons) once it completes.
///
/// Ctrl-c skips the reveal: the message finalizes losslessly and prints
/// in full. Returns true when that happened, so the caller can re-arm
/// the token.
async fn play_reveal(
    widget: &mut ChatWidget<WebhookClient>,
    cancel: &CancellationToken,
) -> Result<bool> {
    let mut interval = tokio::time::interval(widget.typing_interval());
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                write!(stdout, "\r\x1b[2K")?;
                if let Some(id) = widget.skip_reveal()? {
                    print_finished(widget, id);
                }
                return Ok(true);
            }
            _ = interval.tick() => {
                match widget.tick()? {
                    TickOutcome::Idle => return Ok(false),
                    TickOutcome::Revealed => {
                        // One coalesced scroll per frame; a terminal
                        // always tails, so just redraw the last line.
                        let _ = widget.take_scroll();
                        if let Some(message) = widget.transcript().last() {
                            let line = message.text.lines().last().unwrap_or("");
                            write!(stdout, "\r\x1b[2K{}", sanitize_line(line).bright_blue())?;
                            stdout.flush()?;
                        }
                    }
                    TickOutcome::Finished(id) => {
                        write!(stdout, "\r\x1b[2K")?;
                        print_finished(widget, id);
                        return Ok(false);
                    }
                }
            }
        }
    }
}

fn print_quick_replies(widget: &ChatWidget<WebhookClient>) {
    if widget.quick_replies().is_empty() {
        println!("{}", "No quick replies configured.".bright_black());
        return;
    }
    for (index, reply) in widget.quick_replies().iter().enumerate() {
        println!(
            "  {} {}",
            format!("/quick {index}").bright_cyan(),
            reply.label
        );
    }
}

/// The main entry point for the Porch terminal shell.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config()?;
    let client = WebhookClient::try_from_env()?;
    let mut widget = ChatWidget::new(config, client);

    // Ctrl-c skips an in-flight reveal instead of killing the shell.
    let mut cancel = CancellationToken::new();
    spawn_ctrl_c(cancel.clone());

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Porch chat shell ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message to chat, '/quick' for shortcuts, or 'quit' to exit.".bright_black()
    );
    println!();

    widget.set_open(true);
    widget.start_conversation();
    if let Some(welcome) = widget.transcript().last() {
        println!("{}", welcome.text.bright_blue());
    }
    let _ = widget.take_scroll();

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if trimmed == "/start" {
                    widget.start_conversation();
                    continue;
                }
                if trimmed == "/links" {
                    // CTA links of the latest finalized bot message.
                    let links = widget
                        .transcript()
                        .messages()
                        .iter()
                        .rev()
                        .find(|m| m.is_bot())
                        .map(|m| (m.id, m.links.clone()));
                    match links {
                        Some((_, links)) if !links.is_empty() => {
                            for link in links {
                                println!("  {} {}", format!("[{}]", link.label).bright_yellow(), link.url);
                            }
                        }
                        _ => println!("{}", "No links in the latest reply.".bright_black()),
                    }
                    continue;
                }
                if trimmed == "/quick" {
                    print_quick_replies(&widget);
                    continue;
                }
                if let Some(index) = trimmed.strip_prefix("/quick ") {
                    match index.trim().parse::<usize>() {
                        Ok(index) => {
                            println!("{}", format!("> {}", trimmed).green());
                            if widget.send_quick_reply(index).await? {
                                if !widget.is_typing() {
                                    print_latest_reply(&widget);
                                } else if play_reveal(&mut widget, &cancel).await? {
                                    cancel = CancellationToken::new();
                                    spawn_ctrl_c(cancel.clone());
                                }
                            } else {
                                println!("{}", "No such quick reply.".bright_black());
                            }
                        }
                        Err(_) => println!("{}", "Usage: /quick <number>".bright_black()),
                    }
                    continue;
                }

                println!("{}", format!("> {}", trimmed).green());

                if widget.send(trimmed).await? {
                    if !widget.is_typing() {
                        // Failure apology, or a reply too empty to reveal.
                        print_latest_reply(&widget);
                    } else if play_reveal(&mut widget, &cancel).await? {
                        // Re-arm so the next reveal can be skipped too.
                        cancel = CancellationToken::new();
                        spawn_ctrl_c(cancel.clone());
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Input error: {err}").red());
                break;
            }
        }
    }

    widget.shutdown();
    Ok(())
}
