use std::path::PathBuf;

use clap::Parser;
use muse_app::{AppSession, ResourceFormController};
use muse_content::resource::{ResourceDraft, ResourceId};
use muse_types::{ResourceKind, config::BackendConfig};

use crate::commands::{Executor, report, save_form};

/// Applies a JSON draft, creating the resource when no id is given
#[derive(Parser, Debug)]
pub struct SaveCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(long, value_enum, help = "Type of the resource")]
    kind: ResourceKind,
    #[arg(long, help = "Id of the resource to update, new resource is created if omitted")]
    id: Option<String>,
    #[arg(short, long, help = "JSON file with name, parentId, images and languages")]
    file: PathBuf,
}

impl Executor for SaveCmd {
    async fn run(self) -> anyhow::Result<()> {
        let data = tokio::fs::read(&self.file).await?;
        let draft: ResourceDraft = serde_json::from_slice(&data)?;
        let session = AppSession::start(&self.backend).await?;
        let service = session.resources(self.kind);
        let mut form = match self.id {
            Some(id) => ResourceFormController::load(&service, &ResourceId::new(id))
                .await
                .map_err(|e| report(&session, e))?,
            None => ResourceFormController::new(self.kind, None),
        };
        apply_draft(&mut form, draft).map_err(|e| report(&session, e))?;
        save_form(&session, &service, &mut form).await
    }
}

/// Replaces form values with the draft, language content goes through the editors
fn apply_draft(form: &mut ResourceFormController, draft: ResourceDraft) -> muse_app::Result<()> {
    form.set_name(draft.name);
    if draft.parent_id.is_some() {
        form.set_parent(draft.parent_id);
    }
    for image in form.images().to_vec() {
        form.remove_image(&image);
    }
    for image in draft.images {
        form.add_image(image);
    }

    let stale: Vec<_> = form
        .entries()
        .iter()
        .filter(|e| !draft.languages.iter().any(|l| l.language_code == e.language()))
        .map(|e| e.id())
        .collect();
    for id in stale {
        let pending = form.request_removal(id)?;
        form.confirm_removal(pending)?;
    }

    for content in draft.languages {
        let id = match form.entries().find_language(content.language_code) {
            Some(entry) => entry.id(),
            None => form.add_language(content.language_code)?,
        };
        form.update_text(id, content.title, content.subtitle)?;

        form.open_article(id)?
            .set_text(content.article.unwrap_or_default());
        form.commit_editor()?;

        let editor = form.open_audio(id)?;
        match content.audio {
            Some(audio) => {
                editor.set_markup(audio.markup);
                editor.set_voice(audio.voice);
            }
            None => editor.set_markup(""),
        }
        form.commit_editor()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use muse_content::resource::{LanguageContent, Resource};
    use muse_types::LanguageCode;

    use super::*;

    #[test]
    fn test_apply_draft() {
        let resource: Resource = serde_json::from_value(serde_json::json!({
            "id": "ex-1",
            "version": 2,
            "name": "Old",
            "parentId": "exh-1",
            "languages": [
                {
                    "languageCode": "pl-PL",
                    "title": "Tytuł",
                    "subtitle": "Pod",
                    "audio": {
                        "assetKey": "audio/pl.mp3",
                        "markup": "Witaj",
                        "voice": "pl-PL-Wavenet-A"
                    }
                },
                {"languageCode": "de-DE", "title": "Titel", "subtitle": "Unter"}
            ]
        }))
        .unwrap();
        let mut form = ResourceFormController::from_resource(ResourceKind::Exhibit, resource);
        let draft = ResourceDraft {
            name: "New".into(),
            parent_id: None,
            images: vec![],
            version: None,
            languages: vec![
                LanguageContent {
                    language_code: LanguageCode::EnGb,
                    title: "Title".into(),
                    subtitle: "Sub".into(),
                    article: Some("Article".into()),
                    audio: None,
                },
                LanguageContent {
                    language_code: LanguageCode::PlPl,
                    title: "Tytuł 2".into(),
                    subtitle: "Pod".into(),
                    article: None,
                    audio: Some(muse_content::AudioContent::new(
                        "Witaj",
                        LanguageCode::PlPl.default_voice(),
                    )),
                },
            ],
        };
        apply_draft(&mut form, draft).unwrap();

        assert_eq!(form.name(), "New");
        assert_eq!(form.parent_id().map(|p| p.as_ref()), Some("exh-1"));
        assert_eq!(
            form.entries().languages(),
            vec![LanguageCode::PlPl, LanguageCode::EnGb]
        );
        let pl = form.entries().find_language(LanguageCode::PlPl).unwrap();
        assert_eq!(pl.title, "Tytuł 2");
        assert!(pl.audio.as_ref().unwrap().asset_key.is_some());
        let en = form.entries().find_language(LanguageCode::EnGb).unwrap();
        assert_eq!(en.article.as_deref(), Some("Article"));
        assert!(en.audio.is_none());
        assert_eq!(form.version(), Some(2));
    }
}
