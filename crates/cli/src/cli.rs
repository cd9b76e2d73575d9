use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use reportlens_core::Config;

/// Question answering over company annual reports.
///
/// `setup` builds the vector index from the PDFs under the data directory;
/// `chat` and `test-queries` answer questions against it.
#[derive(Parser, Debug)]
#[command(name = "reportlens", about = "Question answering over company annual reports")]
pub struct CliArgs {
    /// Root holding one PDF directory per company (overrides DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory the index is persisted in (overrides INDEX_DIR)
    #[arg(long, global = true)]
    pub index_dir: Option<PathBuf>,

    /// LLM provider: openai or ollama (overrides LLM_PROVIDER)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Chat model for the selected provider
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Verify the environment, extract and chunk the reports, build the index
    Setup {
        /// Recreate an existing index without asking
        #[arg(long, short)]
        yes: bool,
    },
    /// Interactive question answering (default)
    Chat,
    /// Run the fixed question set or the follow-up demo
    TestQueries {
        #[arg(long, value_enum, default_value_t = QueryMode::Test)]
        mode: QueryMode,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Every sample question, with a summary
    Test,
    /// Three questions showing follow-up context
    Demo,
}

impl CliArgs {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }

    /// Apply command-line overrides on top of the environment config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.data.raw_dir = dir.clone();
        }
        if let Some(dir) = &self.index_dir {
            config.data.index_dir = dir.clone();
        }
        if let Some(provider) = &self.provider {
            config.llm.provider = provider.to_lowercase();
        }
        if let Some(model) = &self.model {
            match config.llm.provider.as_str() {
                "ollama" => config.ollama.model = model.clone(),
                _ => config.llm.openai_model = model.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("reportlens").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_chat() {
        assert_eq!(parse(&[]).command(), Command::Chat);
    }

    #[test]
    fn parses_subcommands() {
        assert_eq!(parse(&["setup", "--yes"]).command(), Command::Setup { yes: true });
        assert_eq!(
            parse(&["test-queries"]).command(),
            Command::TestQueries { mode: QueryMode::Test }
        );
        assert_eq!(
            parse(&["test-queries", "--mode", "demo"]).command(),
            Command::TestQueries { mode: QueryMode::Demo }
        );
        assert!(CliArgs::try_parse_from(["reportlens", "test-queries", "--mode", "bogus"]).is_err());
    }

    #[test]
    fn global_options_after_subcommand() {
        let args = parse(&["chat", "--data-dir", "/tmp/reports", "--provider", "Ollama"]);
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/reports")));
        assert_eq!(args.provider.as_deref(), Some("Ollama"));
    }

    #[test]
    fn overrides_apply_to_selected_provider() {
        let mut config = Config::for_profile("REPORTLENS_TEST_UNUSED");
        config.llm.provider = "openai".into();

        let args = parse(&["--provider", "ollama", "--model", "mistral", "--index-dir", "idx"]);
        args.apply(&mut config);
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.ollama.model, "mistral");
        assert_eq!(config.data.index_dir, PathBuf::from("idx"));

        let args = parse(&["--provider", "openai", "--model", "gpt-4o-mini"]);
        args.apply(&mut config);
        assert_eq!(config.llm.openai_model, "gpt-4o-mini");
        assert_eq!(config.ollama.model, "mistral");
    }
}
