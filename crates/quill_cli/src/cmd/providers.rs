use crate::{Ctx, Result, ctx::print_json};

#[derive(Debug, clap::Args)]
pub(crate) struct Providers {}

impl Providers {
    pub(crate) async fn run(self, ctx: &Ctx) -> Result<()> {
        let providers = ctx.resolver()?.list_providers(&ctx.session).await?;

        for provider in &providers {
            print_json(provider)?;
        }

        Ok(())
    }
}
