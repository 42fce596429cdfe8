//! siteseo CLI
//!
//! Generates sitemaps, feeds and robots.txt for the marketing site and
//! notifies search engines through IndexNow.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for siteseo.
#[derive(Parser)]
#[command(
    name = "siteseo",
    version,
    about = "SEO artifact generator and IndexNow notifier"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "siteseo.json")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Generate sitemaps, feeds and robots.txt
    Build {
        /// Content directory holding blog-posts.json and site.json
        #[arg(long, default_value = "content")]
        content: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "public")]
        output: PathBuf,
    },
    /// Check that every generated artifact is present
    Validate {
        /// Content directory used for taxonomy checks
        #[arg(long, default_value = "content")]
        content: PathBuf,
        /// Output directory to inspect
        #[arg(short, long, default_value = "public")]
        output: PathBuf,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Notify IndexNow engines about changed URLs
    Ping {
        /// URLs or site-relative paths
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Serve the IndexNow HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
        /// Output directory for the key file and changed-URL list
        #[arg(short, long, default_value = "public")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    siteseo::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { content, output } => {
            siteseo::cmd::build::run(&cli.config, &content, &output)?;
        }
        Commands::Validate {
            content,
            output,
            strict,
        } => {
            siteseo::cmd::validate::run(&cli.config, &content, &output, strict)?;
        }
        Commands::Ping { urls } => {
            siteseo::cmd::ping::run(&cli.config, &urls).await?;
        }
        Commands::Serve { port, output } => {
            siteseo::cmd::serve::run(&cli.config, &output, port).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["siteseo", "build", "--output", "dist"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, PathBuf::from("siteseo.json"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build { content, output } => {
                assert_eq!(content, PathBuf::from("content"));
                assert_eq!(output, PathBuf::from("dist"));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_validate_command_parsing() {
        let args = ["siteseo", "validate", "--strict"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Validate { output, strict, .. } => {
                assert_eq!(output, PathBuf::from("public"));
                assert!(strict);
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_ping_command_parsing() {
        let args = ["siteseo", "ping", "/blog/a", "https://example.com/about"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Ping { urls } => {
                assert_eq!(urls, vec!["/blog/a", "https://example.com/about"]);
            }
            _ => panic!("Expected Ping command"),
        }
    }

    #[test]
    fn test_cli_ping_requires_urls() {
        assert!(Cli::try_parse_from(["siteseo", "ping"]).is_err());
    }

    #[test]
    fn test_cli_serve_command_parsing() {
        let args = ["siteseo", "serve", "--port", "8080"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Serve { port, output } => {
                assert_eq!(port, 8080);
                assert_eq!(output, PathBuf::from("public"));
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["siteseo", "-vvv", "build"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let args = ["siteseo", "--config", "site.json", "build"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.config, PathBuf::from("site.json"));
    }
}
