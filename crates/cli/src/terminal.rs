use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use reportlens_rag::join_companies;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const PROMPT: Color = Color::Cyan;
    const HEADER: Color = Color::Cyan;
    const ANSWER_LABEL: Color = Color::Green;
    const ANSWER_TEXT: Color = Color::White;
    const SOURCES: Color = Color::Cyan;
    const SUCCESS: Color = Color::Green;
    const WARN: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
}

const RULE_WIDTH: usize = 70;

/// Grouped sample questions shown by the `examples` command.
pub const EXAMPLE_QUESTIONS: &[(&str, &[&str])] = &[
    (
        "Simple Queries",
        &[
            "What was BMW's total revenue in 2023?",
            "How much revenue did Tesla generate in 2023?",
            "What was Ford's revenue for the year 2020?",
        ],
    ),
    (
        "Comparison Queries",
        &[
            "Between Tesla and Ford, which company achieved higher profits in 2022?",
            "Compare BMW and Tesla revenue in 2023",
            "Which company had better profitability in 2022?",
        ],
    ),
    (
        "Trend & Summary Queries",
        &[
            "What were the growth trends for BMW from 2020 to 2023?",
            "Provide a summary of revenue for all companies over the past three years",
            "How has Tesla's profit changed from 2022 to 2023?",
        ],
    ),
    (
        "Qualitative Queries",
        &[
            "What key economic factors influenced Ford's performance in 2021?",
            "Which Tesla product is currently in development?",
            "What are BMW's strategic priorities for 2023?",
        ],
    ),
];

/// Manages terminal output and line prompts.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    fn colored(&self, color: Color, text: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, SetForegroundColor(color), Print(text), ResetColor)?;
        stdout.flush()?;
        Ok(())
    }

    /// A titled block between two rules.
    pub fn print_heading(&self, title: &str) -> Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        self.colored(Colors::HEADER, &format!("\n{rule}\n{title}\n{rule}\n"))
    }

    pub fn print_rule(&self) -> Result<()> {
        self.colored(Colors::HEADER, &format!("{}\n", "=".repeat(RULE_WIDTH)))
    }

    /// Clear the screen and print the chat header with its command list.
    pub fn print_banner(&self, companies: &[String], provider: &str, model: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

        let rule = "=".repeat(RULE_WIDTH);
        self.colored(
            Colors::HEADER,
            &format!(
                "{rule}\n  REPORTLENS\n  Query {} Annual Reports\n{rule}\n",
                join_companies(companies)
            ),
        )?;
        self.colored(Colors::DIM, &format!("Provider: {provider} | Model: {model}\n\n"))?;
        self.colored(
            Colors::WARN,
            "Commands:\n  \
             - Type your question and press Enter\n  \
             - 'exit', 'quit', or 'q' to close\n  \
             - 'clear' to clear conversation history\n  \
             - 'examples' to see example questions\n  \
             - 'help' for more information\n",
        )?;
        self.print_rule()
    }

    pub fn print_examples(&self) -> Result<()> {
        self.print_heading("EXAMPLE QUESTIONS")?;
        for (category, questions) in EXAMPLE_QUESTIONS {
            self.colored(Colors::SUCCESS, &format!("\n{category}:\n"))?;
            for (i, question) in questions.iter().enumerate() {
                println!("  {}. {}", i + 1, question);
            }
        }
        println!();
        self.print_rule()
    }

    pub fn print_help(&self, companies: &[String]) -> Result<()> {
        self.print_heading("HELP & TIPS")?;
        self.colored(Colors::SUCCESS, "\nHow to use:\n")?;
        println!("  - Ask questions in natural language");
        println!("  - Be specific about company names and years");
        println!("  - You can ask follow-up questions based on previous answers");

        self.colored(Colors::SUCCESS, "\nSupported companies:\n")?;
        for company in companies {
            println!("  - {company}");
        }

        self.colored(Colors::SUCCESS, "\nTypes of questions you can ask:\n")?;
        println!("  - Financial metrics (revenue, profit, EBITDA, etc.)");
        println!("  - Comparisons between companies or years");
        println!("  - Trends and growth analysis");
        println!("  - Qualitative information (strategies, risks, products)");

        self.colored(Colors::SUCCESS, "\nTips for best results:\n")?;
        println!("  - Mention specific years when asking about financial data");
        println!("  - Use company names ({}) clearly", companies.join(", "));
        println!("  - For comparisons, specify both companies and the year");
        println!("  - Ask one question at a time for clearer answers");

        self.colored(
            Colors::WARN,
            "\nNote: Answers are based solely on the annual reports provided.\n\n",
        )?;
        self.print_rule()
    }

    pub fn print_question(&self, label: &str, question: &str) -> Result<()> {
        self.colored(Colors::HEADER, &format!("{label}: "))?;
        self.colored(Colors::ANSWER_TEXT, &format!("{question}\n"))
    }

    /// Print an answer followed by its formatted sources.
    pub fn print_answer(&self, answer: &str, sources: &str) -> Result<()> {
        self.colored(Colors::ANSWER_LABEL, "\nAnswer:\n")?;
        self.colored(Colors::ANSWER_TEXT, &format!("{answer}\n"))?;
        self.colored(Colors::SOURCES, &format!("{sources}\n"))
    }

    /// Print the chat prompt without a newline.
    pub fn print_prompt(&self) -> Result<()> {
        self.colored(Colors::PROMPT, "\nYou: ")
    }

    /// Ask a yes/no question. Anything but `y`/`yes` is a no.
    pub fn confirm(&self, question: &str) -> Result<bool> {
        self.colored(Colors::WARN, &format!("\n{question} (y/N): "))?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let answer = input.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    /// Show a spinner after `message`. Returns a handle to stop it.
    pub fn start_spinner(&self, message: &str) -> Result<SpinnerHandle> {
        self.colored(Colors::WARN, &format!("{message} "))?;

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = std::thread::spawn(move || {
            let frames = ['|', '/', '-', '\\'];
            let mut i = 0;
            while running_clone.load(Ordering::SeqCst) {
                let mut stdout = io::stdout();
                execute!(stdout, Print(frames[i % frames.len()]), Print("\u{8}")).ok();
                stdout.flush().ok();
                i += 1;
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
            let mut stdout = io::stdout();
            execute!(stdout, Print(" \n")).ok();
            stdout.flush().ok();
        });

        Ok(SpinnerHandle {
            running,
            thread: Some(handle),
        })
    }

    /// Print a plain line in the default color.
    pub fn print_line(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Print(text), Print("\n"))?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_success(&self, msg: &str) -> Result<()> {
        self.colored(Colors::SUCCESS, &format!("{msg}\n"))
    }

    pub fn print_warn(&self, msg: &str) -> Result<()> {
        self.colored(Colors::WARN, &format!("{msg}\n"))
    }

    /// Print an error message.
    pub fn print_error(&self, msg: &str) -> Result<()> {
        self.colored(Colors::ERROR, &format!("Error: {msg}\n"))
    }

    /// Print an info message.
    pub fn print_info(&self, msg: &str) -> Result<()> {
        self.colored(Colors::DIM, &format!("{msg}\n"))
    }
}

/// Handle to a running spinner. Drop or call stop() to terminate it.
pub struct SpinnerHandle {
    running: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SpinnerHandle {
    /// Stop the spinner and wait until its line is finished.
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            thread.join().ok();
        }
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        self.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_questions_grouped() {
        assert_eq!(EXAMPLE_QUESTIONS.len(), 4);
        assert!(EXAMPLE_QUESTIONS.iter().all(|(_, qs)| qs.len() == 3));
    }

    #[test]
    fn test_print_line() {
        let term = Terminal::new();
        assert!(term.print_line("Total chunks: 0").is_ok());
    }

    #[test]
    fn test_spinner_stops_on_drop() {
        let term = Terminal::new();
        let spinner = term.start_spinner("working").unwrap();
        let running = spinner.running.clone();
        drop(spinner);
        assert!(!running.load(Ordering::SeqCst));
    }
}
