//! Assistant command implementations
//!
//! One-shot questions (`--query`) and an interactive line-editor session.
//! Either way the conversation goes through a `QuerySession`, so failures
//! show up as assistant replies rather than command errors.

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::{Config as RlConfig, DefaultEditor};
use tracing::debug;
use vantage_core::{AnswerClient, AnswerService, Config, Message, QuerySession, Sender};

use super::print_json;

/// Answering client for this run; `--mock` wins over the config
pub fn answer_client(config: &Config, mock: bool) -> Result<AnswerClient> {
    if mock {
        return Ok(AnswerClient::mock());
    }
    AnswerClient::from_config(config).context("Failed to create answering client")
}

pub async fn cmd_ask_once(config: &Config, query: &str, mock: bool, json: bool) -> Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("Query must not be empty");
    }

    let client = answer_client(config, mock)?;
    let mut session = QuerySession::from_config(&config.assistant);
    let reply = session
        .ask(&client, query)
        .await
        .map(|m| m.text.clone())
        .unwrap_or_default();

    if json {
        return print_json(&session.messages());
    }
    println!("{}", reply);
    Ok(())
}

pub async fn cmd_ask_interactive(config: &Config, mock: bool) -> Result<()> {
    let client = answer_client(config, mock)?;
    let mut session = QuerySession::from_config(&config.assistant);

    println!();
    println!("💬 CMDB Assistant ({})", client.name());
    println!("   Type a question, /history to replay, /quit to leave.");
    if !client.health_check().await {
        println!("   ⚠️  Answering service is not reachable; replies may fail.");
    }
    println!();
    for message in session.messages() {
        println!("{}", format_message(message));
    }

    let rl_config = RlConfig::builder().auto_add_history(true).build();
    let mut rl = DefaultEditor::with_config(rl_config)?;

    loop {
        match rl.readline("you ❯ ") {
            Ok(line) => {
                let input = line.trim();
                match input {
                    "" => continue,
                    "/quit" | "/exit" => break,
                    "/history" => {
                        for message in session.messages() {
                            println!("{}", format_message(message));
                        }
                        continue;
                    }
                    _ => {}
                }
                if let Some(reply) = ask_and_format(&mut session, &client, input).await {
                    println!("{}", reply);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    debug!(messages = session.messages().len(), "Assistant session ended");
    println!("Goodbye!");
    Ok(())
}

/// Run one exchange and format the assistant reply, if one was produced
pub async fn ask_and_format<S>(session: &mut QuerySession, service: &S, text: &str) -> Option<String>
where
    S: AnswerService + ?Sized,
{
    session.ask(service, text).await.map(format_message)
}

pub fn format_message(message: &Message) -> String {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Assistant => "🤖",
    };
    format!(
        "[{}] {} {}",
        message.timestamp.format("%H:%M"),
        who,
        message.text
    )
}
