//! Command line surface

use std::ffi::OsString;
use std::future::Future;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::debug;

use crate::provider::SignedUrlProvider;
use crate::report;
use crate::types::CliError;

const EXAMPLES: &str = "Examples:
  presigned-url logo.png
  presigned-url products/item-001.jpg
  presigned-url --list";

/// Generate a time-limited signed download URL for an object in S3
#[derive(Debug, Parser)]
#[command(name = "presigned-url", version)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Object name under the configured prefix (e.g. logo.png)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// List the objects available under the configured prefix
    #[arg(long, conflicts_with = "name")]
    pub list: bool,

    /// Override the default URL lifetime, in seconds
    #[arg(
        long,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..),
        conflicts_with = "list"
    )]
    pub expires_in: Option<u64>,

    /// Print JSON instead of the human-readable report
    #[arg(long)]
    pub json: bool,
}

/// What the invocation asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign a URL for one object
    Generate {
        /// Logical object name
        name: String,
        /// Per-invocation lifetime override
        expires_in: Option<u64>,
    },
    /// List the available objects
    List,
}

impl Cli {
    /// Resolves the parsed flags into a command, or `None` when nothing was asked
    #[must_use]
    pub fn resolve(&self) -> Option<Command> {
        if self.list {
            return Some(Command::List);
        }
        self.name.clone().map(|name| Command::Generate {
            name,
            expires_in: self.expires_in,
        })
    }

    /// Usage text printed when the tool is run without arguments
    #[must_use]
    pub fn usage() -> String {
        <Self as CommandFactory>::command().render_help().to_string()
    }
}

/// What an invocation printed and how it ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Text for stdout
    pub stdout: String,
    /// Text for stderr
    pub stderr: String,
    /// Process exit status
    pub code: u8,
}

impl Outcome {
    const fn success(stdout: String) -> Self {
        Self {
            stdout,
            stderr: String::new(),
            code: 0,
        }
    }

    /// Exit code to hand back to the OS
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code)
    }
}

/// Parses `args`, connects with `connect` and runs the requested command
///
/// `connect` is only called once the arguments name a command, so usage
/// errors never touch the configuration or the backend.
pub async fn run<I, T, F, Fut>(args: I, connect: F) -> Outcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(SignedUrlProvider, String), CliError>>,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version also arrive here, on stdout
        Err(e) if e.use_stderr() => {
            return Outcome {
                stdout: String::new(),
                stderr: e.render().to_string(),
                code: 1,
            }
        }
        Err(e) => return Outcome::success(e.render().to_string()),
    };

    let Some(command) = cli.resolve() else {
        return Outcome {
            stdout: Cli::usage(),
            stderr: String::new(),
            code: 1,
        };
    };

    let result = match connect().await {
        Ok((provider, bucket_name)) => execute(&provider, &bucket_name, command, cli.json).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(output) => Outcome::success(output),
        Err(e) => {
            debug!("Command failed: {e:?}");
            Outcome {
                stdout: String::new(),
                stderr: e.report(),
                code: e.exit_code(),
            }
        }
    }
}

/// Runs `command` against `provider` and returns the text to print
///
/// # Errors
///
/// Returns `CliError::Provider` when URL generation fails
/// Returns `CliError::Unexpected` when the JSON output cannot be produced
pub async fn execute(
    provider: &SignedUrlProvider,
    bucket_name: &str,
    command: Command,
    json: bool,
) -> Result<String, CliError> {
    debug!("Executing {command:?}");

    match command {
        Command::List => {
            let names = provider.list_available_objects().await;
            if json {
                Ok(report::json(&names).map_err(anyhow::Error::from)?)
            } else {
                Ok(report::object_list(bucket_name, &names))
            }
        }
        Command::Generate { name, expires_in } => {
            let result = provider.generate_signed_url(&name, expires_in).await?;
            if json {
                Ok(report::json(&result).map_err(anyhow::Error::from)?)
            } else {
                Ok(report::signed_url(&result))
            }
        }
    }
}
