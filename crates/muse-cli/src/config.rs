use clap::{Parser, Subcommand};

use crate::commands::{
    article::SetArticleCmd,
    audio::PreviewAudioCmd,
    delete::DeleteCmd,
    image::UploadImageCmd,
    language::{AddLanguageCmd, RemoveLanguageCmd},
    list::ListCmd,
    save::SaveCmd,
    show::ShowCmd,
};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "Manage muse.cloud institutions, exhibitions, exhibits and their language content."
)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    List(ListCmd),
    Show(ShowCmd),
    Delete(DeleteCmd),
    AddLanguage(AddLanguageCmd),
    RemoveLanguage(RemoveLanguageCmd),
    SetArticle(SetArticleCmd),
    PreviewAudio(PreviewAudioCmd),
    UploadImage(UploadImageCmd),
    Save(SaveCmd),
}

impl crate::commands::Executor for Command {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            Command::List(cmd) => cmd.run().await,
            Command::Show(cmd) => cmd.run().await,
            Command::Delete(cmd) => cmd.run().await,
            Command::AddLanguage(cmd) => cmd.run().await,
            Command::RemoveLanguage(cmd) => cmd.run().await,
            Command::SetArticle(cmd) => cmd.run().await,
            Command::PreviewAudio(cmd) => cmd.run().await,
            Command::UploadImage(cmd) => cmd.run().await,
            Command::Save(cmd) => cmd.run().await,
        }
    }
}
