use clap::Parser;
use muse_client::ResourcePersistence as _;

use crate::commands::{Executor, ResourceArgs, report};

#[derive(Parser, Debug)]
pub struct DeleteCmd {
    #[command(flatten)]
    resource: ResourceArgs,
    #[arg(long, help = "Confirm deletion")]
    yes: bool,
}

impl Executor for DeleteCmd {
    async fn run(self) -> anyhow::Result<()> {
        if !self.yes {
            anyhow::bail!("Deletion of {} {} needs --yes", self.resource.kind, self.resource.id);
        }
        let session = self.resource.session().await?;
        let service = session.resources(self.resource.kind);
        service
            .delete(&self.resource.resource_id())
            .await
            .map_err(|e| report(&session, e.into()))?;
        println!("{}", session.text("notices.deleted"));
        Ok(())
    }
}
