use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fwdgate")]
#[command(author, version, about = "Telegram forwarding bot gated behind owner approval", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot
    Run {
        /// Receive updates through the webhook server instead of long polling
        #[arg(long)]
        webhook: bool,
    },

    /// List access requests waiting for the owner's decision
    Pending,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
