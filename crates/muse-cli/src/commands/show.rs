use clap::Parser;
use muse_content::{audio::AUDIO_MARKUP_LIMIT, markup, validation::TabIndicator};

use crate::commands::{Executor, ResourceArgs};

#[derive(Parser, Debug)]
pub struct ShowCmd {
    #[command(flatten)]
    resource: ResourceArgs,
    #[arg(long, help = "Also validate the resource and mark languages with errors")]
    validate: bool,
}

impl Executor for ShowCmd {
    async fn run(self) -> anyhow::Result<()> {
        let (session, _service, mut form) = self.resource.open().await?;
        println!(
            "{} {} (version {})",
            form.kind(),
            form.name(),
            form.version().unwrap_or_default()
        );
        if let Some(parent) = form.parent_id() {
            println!("parent: {parent}");
        }
        for image in form.images() {
            println!("image: {image}");
        }
        if self.validate {
            for error in form.validate().iter() {
                println!("! {}: {}", error.path, error.message);
            }
        }

        let limit = form.kind().article_limit();
        for (tab, entry) in form.tabs().iter().zip(form.entries().iter()) {
            let marker = match tab.indicator {
                TabIndicator::Flag(language) => language.to_string(),
                TabIndicator::Error => format!("{} (!)", tab.language),
            };
            println!("[{marker}] {} / {}", entry.title, entry.subtitle);
            if let Some(article) = &entry.article {
                println!("  article: {}/{limit} chars", article.chars().count());
            }
            if let Some(audio) = &entry.audio {
                println!(
                    "  audio: {}/{AUDIO_MARKUP_LIMIT} chars, voice {}{}",
                    markup::visible_len(&audio.markup),
                    audio.voice,
                    if audio.asset_key.is_some() { ", rendered" } else { "" }
                );
            }
        }

        let addable = form.addable_languages(&session.languages());
        if !addable.is_empty() {
            let names: Vec<&str> = addable.iter().map(|l| l.as_str()).collect();
            println!("can add: {}", names.join(", "));
        }
        Ok(())
    }
}
