use std::{
    io::{self, Write as _},
    sync::Arc,
};

use quill_artifact::{GenerationRequest, JsonLinesSink, generate_with_cancellation};
use quill_config::AppConfig;
use quill_llm::{ModelHandle, ModelResolver, resolve_model_handle, resolver_for};
use quill_model::{Session, UserId};
use quill_storage::FileConnectionStore;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{Globals, Result, error::Error};

/// Context for a single CLI command.
pub(crate) struct Ctx {
    pub(crate) config: AppConfig,

    /// The identity commands act on behalf of.
    pub(crate) session: Session,

    pub(crate) store: Arc<FileConnectionStore>,
}

impl Ctx {
    pub(crate) fn new(globals: &Globals, config: AppConfig) -> Result<Self> {
        let store = FileConnectionStore::new(config.storage.connections.clone())?;
        let session = globals
            .user
            .clone()
            .map_or_else(Session::anonymous, Session::for_user);

        Ok(Self {
            config,
            session,
            store: Arc::new(store),
        })
    }

    /// The user of the session, required by commands that manage connections.
    pub(crate) fn user(&self) -> Result<&UserId> {
        self.session.user_id().ok_or(Error::MissingUser)
    }

    /// Build the resolver for the configured mode.
    pub(crate) fn resolver(&self) -> Result<Arc<dyn ModelResolver>> {
        resolver_for(&self.config, self.store.clone()).map_err(Into::into)
    }

    /// Resolve `model`, or the configured default model.
    pub(crate) async fn model(&self, model: Option<&str>) -> Result<ModelHandle> {
        let default = self.config.generation.default_model.to_string();
        let model = model.unwrap_or(&default);

        let resolver = self.resolver()?;
        resolve_model_handle(resolver.as_ref(), &self.session, model)
            .await
            .map_err(Into::into)
    }

    /// Run `request`, streaming events to stdout as JSON lines, followed by
    /// the final draft.
    ///
    /// Ctrl-C cancels the generation.
    pub(crate) async fn generate(&self, request: GenerationRequest) -> Result<()> {
        let request = request.with_smooth_delay(self.config.generation.smooth_delay());
        let sink = JsonLinesSink::new(io::stdout());

        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received interrupt, cancelling generation.");
                cancel.cancel();
            }
        });

        let draft = generate_with_cancellation(request, &sink, token).await?;

        debug!(len = draft.len(), "Generation finished.");
        print_json(&serde_json::json!({ "type": "finish", "content": draft }))
    }
}

/// Write `value` to stdout as a single JSON line.
pub(crate) fn print_json(value: &impl Serialize) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;

    Ok(())
}
