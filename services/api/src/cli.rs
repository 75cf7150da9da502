use crate::demo::{run_demo, run_guest_check, DemoArgs, GuestCheckArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use wedding_rsvp::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Wedding RSVP Service",
    about = "Run and exercise the wedding RSVP service from the command line",
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
    /// Inspect the guest list
    Guests {
        #[command(subcommand)]
        command: GuestCommand,
    },
    /// Run an end-to-end demo of the admission flow
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum GuestCommand {
    /// Check a name against the guest list
    Check(GuestCheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Guests {
            command: GuestCommand::Check(args),
        } => run_guest_check(args),
        Command::Demo(args) => run_demo(args),
    }
}
