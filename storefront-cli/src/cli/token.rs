use anyhow::{Context as _, bail};
use clap::{Args, Subcommand};

use super::Context;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    /// Save a bearer token in the session directory
    Set { token: String },
    /// Remove the saved token
    Clear,
}

pub(crate) fn run(ctx: &Context, command: TokenCommand) -> anyhow::Result<()> {
    let file = ctx.session().token_file();
    match command.command {
        TokenSubcommand::Set { token } => {
            if token.trim().is_empty() {
                bail!("token must not be blank");
            }
            file.save(&token)
                .with_context(|| format!("failed to write {}", file.path().display()))?;
            println!("token saved to {}", file.path().display());
        }
        TokenSubcommand::Clear => {
            file.delete()
                .with_context(|| format!("failed to remove {}", file.path().display()))?;
            println!("token cleared");
        }
    }
    Ok(())
}
