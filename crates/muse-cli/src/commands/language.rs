use clap::Parser;
use muse_types::LanguageCode;

use crate::commands::{Executor, ResourceArgs, entry_for, report, save_form};

#[derive(Parser, Debug)]
pub struct AddLanguageCmd {
    #[command(flatten)]
    resource: ResourceArgs,
    #[arg(long, help = "Language code, e.g. pl-PL")]
    language: LanguageCode,
    #[arg(long, help = "Title in this language")]
    title: String,
    #[arg(long, help = "Subtitle in this language")]
    subtitle: String,
}

impl Executor for AddLanguageCmd {
    async fn run(self) -> anyhow::Result<()> {
        let (session, service, mut form) = self.resource.open().await?;
        if !session.languages().contains(&self.language) {
            anyhow::bail!("Language {} is not enabled for this customer", self.language);
        }

        let id = form
            .add_language(self.language)
            .map_err(|e| report(&session, e))?;
        form.update_text(id, self.title, self.subtitle)?;
        save_form(&session, &service, &mut form).await
    }
}

#[derive(Parser, Debug)]
pub struct RemoveLanguageCmd {
    #[command(flatten)]
    resource: ResourceArgs,
    #[arg(long, help = "Language code, e.g. pl-PL")]
    language: LanguageCode,
    #[arg(long, help = "Confirm removal")]
    yes: bool,
}

impl Executor for RemoveLanguageCmd {
    async fn run(self) -> anyhow::Result<()> {
        let (session, service, mut form) = self.resource.open().await?;
        let id = entry_for(&form, self.language)?;
        let pending = form.request_removal(id)?;
        if !self.yes {
            println!(
                "{}",
                muse_app::messages::format_text(
                    session.locale(),
                    "prompts.remove_language",
                    &[("language", pending.language().as_str())]
                )
            );
            anyhow::bail!("Removal not confirmed, use --yes");
        }
        form.confirm_removal(pending)?;
        save_form(&session, &service, &mut form).await
    }
}
