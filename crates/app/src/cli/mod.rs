use clap::{Parser, Subcommand};

mod account;
mod session;

#[derive(Debug, Parser)]
#[command(name = "agora-app", about = "Agora CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Account(account::AccountCommand),
    Session(session::SessionCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Account(command) => account::run(command).await,
            Commands::Session(command) => session::run(command).await,
        }
    }
}
