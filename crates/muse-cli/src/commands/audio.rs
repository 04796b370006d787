use std::path::PathBuf;

use clap::Parser;
use muse_content::audio::{PlaybackState, PreviewOutcome};
use muse_types::{LanguageCode, Voice};
use tracing::warn;

use crate::commands::{Executor, ResourceArgs, entry_for, report, save_form};

#[derive(Parser, Debug)]
pub struct PreviewAudioCmd {
    #[command(flatten)]
    resource: ResourceArgs,
    #[arg(long, help = "Language code, e.g. pl-PL")]
    language: LanguageCode,
    #[arg(long, help = "New audio script, stored script is previewed if not given")]
    markup: Option<String>,
    #[arg(long, conflicts_with = "markup", help = "Read audio script from file")]
    file: Option<PathBuf>,
    #[arg(long, help = "Voice used for synthesis, defaults to the language voice")]
    voice: Option<Voice>,
    #[arg(long, help = "Store the script in the resource after preview")]
    save: bool,
}

impl Executor for PreviewAudioCmd {
    async fn run(self) -> anyhow::Result<()> {
        let markup = match (self.markup, self.file) {
            (Some(markup), _) => Some(markup),
            (None, Some(file)) => Some(tokio::fs::read_to_string(&file).await?),
            (None, None) => None,
        };
        let (session, service, mut form) = self.resource.open().await?;
        let id = entry_for(&form, self.language)?;
        let editor = form.open_audio(id)?;
        if let Some(markup) = markup {
            editor.set_markup(markup);
        }
        if let Some(voice) = self.voice {
            editor.set_voice(voice);
        }
        if let Err(e) = editor.check() {
            warn!("Audio script is not well formed: {e}");
        }
        let counter = editor.counter();
        if counter.is_over() {
            warn!(
                "Audio script has {} audible characters, recommended maximum is {}",
                counter.count, counter.limit
            );
        }

        let audio = session.audio();
        match form
            .preview_audio(&audio)
            .await
            .map_err(|e| report(&session, e))?
        {
            PreviewOutcome::Ready => {}
            PreviewOutcome::Stale => anyhow::bail!("Preview was superseded"),
            PreviewOutcome::Failed(e) => anyhow::bail!("Preview failed: {e}"),
        }
        if let Some(editor) = form.audio_editor() {
            if let PlaybackState::Ready(url) = editor.state() {
                println!("{}", url.url);
                if let Some(expires) = url.expires_at {
                    println!("expires at {expires}");
                }
            }
        }

        if self.save {
            form.commit_editor()?;
            save_form(&session, &service, &mut form).await
        } else {
            form.close_editor();
            Ok(())
        }
    }
}
