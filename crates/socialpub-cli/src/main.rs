use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use socialpub_cli::OutputFormat;
use socialpub_cli::commands::{self, AuthArgs, BrowserArgs, PostArgs};
use socialpub_rednote::site::CREATOR_HOST;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "socialpub")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Publish posts to social platforms by driving a real Chrome browser",
    long_about = "socialpub logs in to a platform's creator site with exported cookies or a \
                  persistent Chrome profile, then fills in and submits a post the way a \
                  person would."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and publish a post
    Publish {
        #[command(flatten)]
        post: PostArgs,

        #[command(flatten)]
        auth: AuthArgs,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Log in only, to check that credentials still work
    Login {
        /// Target platform (rednote, xiaohongshu, xhs)
        #[arg(long, default_value = "rednote")]
        platform: String,

        #[command(flatten)]
        auth: AuthArgs,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Show which cookies from an exported file would be injected
    Cookies {
        /// Path to the cookie export (JSON list or {"cookies": [...]})
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Host the session will be on
        #[arg(long, default_value = CREATOR_HOST)]
        host: String,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for socialpub.

SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    bash:  socialpub completion --shell bash >> ~/.bashrc
    zsh:   socialpub completion --shell zsh > ~/.zfunc/_socialpub
           (add `fpath+=~/.zfunc` to ~/.zshrc before compinit)
    fish:  socialpub completion --shell fish > ~/.config/fish/completions/socialpub.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Publish {
            post,
            auth,
            browser,
        } => commands::publish::execute(&post, &auth, &browser, cli.format),
        Commands::Login {
            platform,
            auth,
            browser,
        } => commands::login::execute(&platform, &auth, &browser, cli.format),
        Commands::Cookies { file, host } => commands::cookies::execute(&file, &host, cli.format),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("socialpub=debug,chromiumoxide=warn")
    } else {
        EnvFilter::new("socialpub=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
