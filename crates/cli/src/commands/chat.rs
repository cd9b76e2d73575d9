use std::io::{self, BufRead};

use anyhow::Result;
use reportlens_core::Config;
use reportlens_rag::QueryEngine;
use tokio::sync::mpsc;
use tracing::debug;

use super::open_engine;
use crate::terminal::Terminal;

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Exit,
    Clear,
    Examples,
    Help,
    Empty,
    Question(&'a str),
}

impl<'a> ReplCommand<'a> {
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "exit" | "quit" | "q" => Self::Exit,
            "clear" => Self::Clear,
            "examples" => Self::Examples,
            "help" => Self::Help,
            "" => Self::Empty,
            _ => Self::Question(trimmed),
        }
    }
}

pub async fn run(config: &Config, terminal: &Terminal) -> Result<()> {
    let mut engine = open_engine(config, terminal)?;
    let companies = config.data.companies.clone();
    let provider = config.llm.provider.clone();

    terminal.print_banner(&companies, &provider, engine.model())?;
    terminal.print_success(&format!(
        "\nReady! Ask me anything about {}.",
        companies.join(", ")
    ))?;
    terminal.print_warn("Type 'examples' to see sample questions or 'help' for more info.")?;

    let mut lines = spawn_stdin_reader();
    loop {
        terminal.print_prompt()?;
        let line = tokio::select! {
            line = lines.recv() => line,
            _ = tokio::signal::ctrl_c() => {
                terminal.print_warn("\n\nInterrupted. Type 'exit' to quit or continue asking questions.")?;
                continue;
            }
        };
        // EOF on stdin ends the session like `exit`.
        let Some(line) = line else {
            terminal.print_line("")?;
            break;
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Exit => break,
            ReplCommand::Clear => {
                engine.clear_history();
                terminal.print_banner(&companies, &provider, engine.model())?;
                terminal.print_success(" Conversation history cleared")?;
            }
            ReplCommand::Examples => terminal.print_examples()?,
            ReplCommand::Help => terminal.print_help(&companies)?,
            ReplCommand::Empty => {}
            ReplCommand::Question(question) => ask(&mut engine, terminal, question).await?,
        }
    }

    terminal.print_warn("\nThank you for using ReportLens. Goodbye!")?;
    Ok(())
}

/// Run one question. Ctrl+C abandons it and returns to the prompt.
async fn ask(engine: &mut QueryEngine, terminal: &Terminal, question: &str) -> Result<()> {
    let spinner = terminal.start_spinner("Searching and analyzing...")?;
    let outcome = tokio::select! {
        result = engine.query(question) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    spinner.stop();

    match outcome {
        Some(result) if result.success => {
            let sources = engine.format_sources(&result.source_documents);
            terminal.print_answer(&result.answer, &sources)
        }
        Some(result) => terminal.print_error(&result.answer),
        None => {
            debug!("query abandoned");
            terminal.print_warn("\nInterrupted. Type 'exit' to quit or continue asking questions.")
        }
    }
}

/// Read stdin lines on a dedicated thread so the prompt can race Ctrl+C.
/// The channel closes at end of input.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}
