use std::{fs, io};

use camino::Utf8PathBuf;
use quill_artifact::{DocumentKind, GenerationRequest};
use tracing::trace;

use crate::{Ctx, Result};

#[derive(Debug, clap::Args)]
pub(crate) struct Update {
    /// The kind of document to revise.
    #[arg(short, long, default_value = "text")]
    kind: DocumentKind,

    /// The model to generate with, as `<provider>/<model>`.
    ///
    /// Defaults to the configured model.
    #[arg(short, long)]
    model: Option<String>,

    /// File holding the current document, or `-` to read it from stdin.
    #[arg(short, long)]
    file: Utf8PathBuf,

    /// The change to make.
    description: String,
}

impl Update {
    pub(crate) async fn run(self, ctx: &Ctx) -> Result<()> {
        let existing_content = if self.file == "-" {
            io::read_to_string(io::stdin())?
        } else {
            trace!(path = %self.file, "Reading existing document.");
            fs::read_to_string(&self.file)?
        };

        let model = ctx.model(self.model.as_deref()).await?;
        let request =
            GenerationRequest::update(self.kind, existing_content, self.description, model);

        ctx.generate(request).await
    }
}
