use clap::Parser;
use muse_client::Paginator;
use muse_content::resource::ResourceId;
use muse_types::{ResourceKind, config::BackendConfig};

use crate::commands::{Executor, report};

#[derive(Parser, Debug)]
pub struct ListCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(long, value_enum, help = "Type of resources to list")]
    kind: ResourceKind,
    #[arg(long, help = "Only resources belonging to this parent")]
    parent: Option<String>,
    #[arg(long, help = "Filter by name")]
    search: Option<String>,
    #[arg(long, default_value_t = 1, help = "Page to show, starting at 1")]
    page: usize,
}

impl Executor for ListCmd {
    async fn run(self) -> anyhow::Result<()> {
        let session = muse_app::AppSession::start(&self.backend).await?;
        let service = session.resources(self.kind);
        let mut query = session.list_query();
        if let Some(parent) = self.parent {
            query = query.parent(ResourceId::new(parent));
        }
        if let Some(search) = self.search {
            query = query.search(search);
        }

        let mut paginator = Paginator::new(&service, query);
        let mut page = paginator
            .first()
            .await
            .map_err(|e| report(&session, e.into()))?;
        while paginator.current_page().unwrap_or(0) + 1 < self.page {
            if !paginator.has_next() {
                anyhow::bail!("Page {} does not exist", self.page);
            }
            page = paginator
                .next()
                .await
                .map_err(|e| report(&session, e.into()))?;
        }

        for item in &page.items {
            let languages = item
                .languages
                .iter()
                .map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join(",");
            println!("{}\t{}\t{}", item.id, item.name, languages);
        }
        if paginator.has_next() {
            println!("-- more on page {} --", paginator.current_page().unwrap_or(0) + 2);
        }
        Ok(())
    }
}
