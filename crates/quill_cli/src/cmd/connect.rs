use quill_model::ConnectionId;
use quill_storage::ConnectionStore as _;
use tracing::info;

use crate::{Ctx, Result, ctx::print_json};

#[derive(Debug, clap::Args)]
pub(crate) struct Connect {
    /// The connection ID issued by the router's connect flow.
    connection: String,
}

impl Connect {
    pub(crate) async fn run(self, ctx: &Ctx) -> Result<()> {
        let user = ctx.user()?;
        let connection = ConnectionId::new(self.connection);

        ctx.store
            .set_connection_id(user, connection.clone())
            .await?;
        info!(%user, %connection, "Stored connection.");

        print_json(&serde_json::json!({
            "user": user,
            "connection": connection,
        }))
    }
}
