//! コマンドライン引数

use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
};

/// `studium-site` の引数
#[derive(Debug, Parser)]
#[command(name = "studium-site")]
#[command(version)]
#[command(about = "Render the Studium multilingual site from its page fragments and dictionaries")]
pub(crate) struct Cli {
    /// Site root containing `.studium.json` and the `languages/` directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub(crate) root: PathBuf,

    /// Explicit configuration file (overrides `<root>/.studium.json`)
    #[arg(long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub(crate) log_file: Option<PathBuf>,

    /// 実行するコマンド
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// サブコマンド
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Render one page as a full HTML document to stdout
    Render {
        /// Page identifier (default: home)
        #[arg(value_name = "PAGE")]
        page: Option<String>,

        /// Switch to this language first and remember it
        #[arg(short, long, value_name = "CODE")]
        lang: Option<String>,
    },

    /// Show or change the remembered language
    Language {
        /// 操作
        #[command(subcommand)]
        action: LanguageAction,
    },

    /// List page identifiers
    Pages,

    /// Render every page for every language into a directory
    Build {
        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,

        /// Languages to build (default: all configured languages)
        #[arg(short, long, value_name = "CODE")]
        lang: Vec<String>,
    },
}

/// `language` の操作
#[derive(Debug, Subcommand)]
pub(crate) enum LanguageAction {
    /// Print the remembered language (or the default)
    Get,
    /// Remember a language
    Set {
        /// Language code, e.g. `sk`
        #[arg(value_name = "CODE")]
        code: String,
    },
}
