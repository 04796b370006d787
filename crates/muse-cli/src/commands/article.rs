use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use muse_types::LanguageCode;
use tracing::{info, warn};

use crate::commands::{Executor, ResourceArgs, entry_for, save_form};

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["text", "file", "clear"])))]
pub struct SetArticleCmd {
    #[command(flatten)]
    resource: ResourceArgs,
    #[arg(long, help = "Language code, e.g. pl-PL")]
    language: LanguageCode,
    #[arg(long, help = "Article text")]
    text: Option<String>,
    #[arg(long, help = "Read article text from file")]
    file: Option<PathBuf>,
    #[arg(long, help = "Remove the article")]
    clear: bool,
}

impl Executor for SetArticleCmd {
    async fn run(self) -> anyhow::Result<()> {
        let text = match (self.text, self.file) {
            (Some(text), _) => text,
            (None, Some(file)) => tokio::fs::read_to_string(&file).await?,
            (None, None) => String::new(),
        };
        let (session, service, mut form) = self.resource.open().await?;
        let id = entry_for(&form, self.language)?;
        let editor = form.open_article(id)?;
        editor.set_text(text);
        let counter = editor.counter();
        if counter.is_over() {
            warn!(
                "Article has {} characters, recommended maximum is {}",
                counter.count, counter.limit
            );
        } else {
            info!(
                "Article has {} characters, {} left",
                counter.count,
                counter.remaining()
            );
        }
        form.commit_editor()?;
        save_form(&session, &service, &mut form).await
    }
}
