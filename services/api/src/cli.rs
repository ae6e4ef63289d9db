use crate::commands::{run_application_command, run_posting_command, ApplicationCommand, PostingCommand};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hiring_review::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hiring Review",
    about = "Review job postings and applications from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk through a full review cycle against seeded in-memory data
    Demo(DemoArgs),
    /// Inspect or change postings on the configured backend
    Posting {
        #[command(flatten)]
        backend: BackendArgs,
        #[command(subcommand)]
        command: PostingCommand,
    },
    /// Decide applications on the configured backend
    Application {
        #[command(flatten)]
        backend: BackendArgs,
        #[command(subcommand)]
        command: ApplicationCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) backend: BackendArgs,
    /// Serve seeded in-memory data instead of calling the backend
    #[arg(long)]
    pub(crate) in_memory: bool,
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct BackendArgs {
    /// Override HIRING_BACKEND_URL
    #[arg(long)]
    pub(crate) backend_url: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args).await,
        Command::Posting { backend, command } => run_posting_command(backend, command).await,
        Command::Application { backend, command } => {
            run_application_command(backend, command).await
        }
    }
}
