use quill_artifact::{DocumentKind, GenerationRequest};

use crate::{Ctx, Result};

#[derive(Debug, clap::Args)]
pub(crate) struct Generate {
    /// The kind of document to generate.
    #[arg(short, long, default_value = "text")]
    kind: DocumentKind,

    /// The model to generate with, as `<provider>/<model>`.
    ///
    /// Defaults to the configured model.
    #[arg(short, long)]
    model: Option<String>,

    /// What the document is about.
    title: String,
}

impl Generate {
    pub(crate) async fn run(self, ctx: &Ctx) -> Result<()> {
        let model = ctx.model(self.model.as_deref()).await?;
        let request = GenerationRequest::create(self.kind, self.title, model);

        ctx.generate(request).await
    }
}
