mod connect;
mod generate;
mod models;
mod providers;
mod update;

use crate::{Ctx, Result};

#[derive(Debug, clap::Subcommand)]
pub(crate) enum Commands {
    /// Generate a new document.
    #[command(visible_alias = "g")]
    Generate(generate::Generate),

    /// Revise an existing document.
    #[command(visible_alias = "u")]
    Update(update::Update),

    /// Store the router connection of a user.
    Connect(connect::Connect),

    /// List the providers available to a user.
    Providers(providers::Providers),

    /// List the models available to a user.
    Models(models::Models),
}

impl Commands {
    pub(crate) async fn run(self, ctx: &Ctx) -> Result<()> {
        match self {
            Commands::Generate(args) => args.run(ctx).await,
            Commands::Update(args) => args.run(ctx).await,
            Commands::Connect(args) => args.run(ctx).await,
            Commands::Providers(args) => args.run(ctx).await,
            Commands::Models(args) => args.run(ctx).await,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Commands::Generate(_) => "generate",
            Commands::Update(_) => "update",
            Commands::Connect(_) => "connect",
            Commands::Providers(_) => "providers",
            Commands::Models(_) => "models",
        }
    }
}
