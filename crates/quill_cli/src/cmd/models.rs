use quill_model::ProviderId;

use crate::{Ctx, Result, ctx::print_json};

#[derive(Debug, clap::Args)]
pub(crate) struct Models {
    /// Only list the models of this provider.
    #[arg(short, long)]
    provider: Option<ProviderId>,
}

impl Models {
    pub(crate) async fn run(self, ctx: &Ctx) -> Result<()> {
        let models = ctx
            .resolver()?
            .list_models(&ctx.session, self.provider.as_ref())
            .await?;

        for model in &models {
            print_json(model)?;
        }

        Ok(())
    }
}
