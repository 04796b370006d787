use anyhow::anyhow;
use clap::Args;
use muse_app::{AppError, AppSession, ResourceFormController, SubmitOutcome};
use muse_client::ResourceService;
use muse_content::{EntryId, resource::ResourceId};
use muse_types::{LanguageCode, ResourceKind, config::BackendConfig};

pub mod article;
pub mod audio;
pub mod delete;
pub mod image;
pub mod language;
pub mod list;
pub mod save;
pub mod show;

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self) -> anyhow::Result<()>;
}

/// Existing resource addressed by kind and id
#[derive(Args, Debug)]
pub struct ResourceArgs {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(long, value_enum, help = "Type of the resource")]
    pub kind: ResourceKind,
    #[arg(long, help = "Id of the resource")]
    pub id: String,
}

impl ResourceArgs {
    pub fn resource_id(&self) -> ResourceId {
        ResourceId::new(self.id.as_str())
    }

    pub async fn session(&self) -> anyhow::Result<AppSession> {
        Ok(AppSession::start(&self.backend).await?)
    }

    /// Starts session and loads the resource into a form
    pub async fn open(
        &self,
    ) -> anyhow::Result<(AppSession, ResourceService, ResourceFormController)> {
        let session = self.session().await?;
        let service = session.resources(self.kind);
        let form = ResourceFormController::load(&service, &self.resource_id())
            .await
            .map_err(|e| report(&session, e))?;
        Ok((session, service, form))
    }
}

/// Prints localized error and converts it for the exit status
pub fn report(session: &AppSession, error: AppError) -> anyhow::Error {
    eprintln!("{}", session.message(&error));
    if let AppError::Validation(errors) = &error {
        for e in errors.iter() {
            eprintln!("  {}: {}", e.path, e.message);
        }
    }
    anyhow!(error)
}

pub fn entry_for(form: &ResourceFormController, language: LanguageCode) -> anyhow::Result<EntryId> {
    form.entries()
        .find_language(language)
        .map(|e| e.id())
        .ok_or_else(|| anyhow!("Language {language} is not configured"))
}

pub async fn save_form(
    session: &AppSession,
    service: &ResourceService,
    form: &mut ResourceFormController,
) -> anyhow::Result<()> {
    match form.submit(service).await {
        Ok(SubmitOutcome::Saved(id)) => {
            println!("{} ({} {id})", session.text("notices.saved"), form.kind());
            Ok(())
        }
        Ok(SubmitOutcome::Discarded) => {
            println!("{}", session.text("notices.discarded"));
            Ok(())
        }
        Err(e) => Err(report(session, e)),
    }
}
