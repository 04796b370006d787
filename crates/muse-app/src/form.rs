use muse_client::{ClientError, ResourcePersistence};
use muse_content::{
    ContentError, EntryId, LanguageContentStore, LanguageEntries, PendingRemoval, TabSelection,
    article::ArticleEditor,
    asset::AssetKey,
    audio::{AudioEditor, AudioPreviewSource, PreviewOutcome},
    resource::{Resource, ResourceDraft, ResourceId, hydrate_entries},
    validation::{FormErrors, Tab, tab_indicators},
};
use muse_types::{LanguageCode, ResourceKind};
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};

/// The one modal editor that may be open over the form
#[derive(Debug, Clone)]
pub enum ActiveEditor {
    Article(ArticleEditor),
    Audio(AudioEditor),
}

impl ActiveEditor {
    pub fn entry(&self) -> EntryId {
        match self {
            ActiveEditor::Article(editor) => editor.entry(),
            ActiveEditor::Audio(editor) => editor.entry(),
        }
    }
}

/// Save request captured from the form, tagged with the form generation
#[derive(Debug, Clone)]
pub struct Submission {
    generation: u64,
    id: Option<ResourceId>,
    draft: ResourceDraft,
}

impl Submission {
    pub fn draft(&self) -> &ResourceDraft {
        &self.draft
    }

    /// Creates a new resource or updates the existing one
    pub async fn execute<P: ResourcePersistence>(
        &self,
        service: &P,
    ) -> Result<Resource, ClientError> {
        match &self.id {
            Some(id) => service.update(id, &self.draft).await,
            None => service.create(&self.draft).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved(ResourceId),
    /// Form was closed or submitted again before the result arrived
    Discarded,
}

/// Form session of one institution, exhibition or exhibit.
///
/// Owns the language entries and their tab selection for the whole life of the form.
/// Validation errors are recomputed from current values whenever they are shown, so
/// indicators follow entries when some are added or removed.
#[derive(Debug)]
pub struct ResourceFormController {
    kind: ResourceKind,
    id: Option<ResourceId>,
    version: Option<i64>,
    name: String,
    parent_id: Option<ResourceId>,
    images: Vec<AssetKey>,
    entries: LanguageEntries,
    tabs: TabSelection,
    editor: Option<ActiveEditor>,
    show_errors: bool,
    language_error: Option<ContentError>,
    loaded: Option<Resource>,
    generation: u64,
    pending: Option<u64>,
}

impl ResourceFormController {
    pub fn new(kind: ResourceKind, parent_id: Option<ResourceId>) -> Self {
        ResourceFormController {
            kind,
            id: None,
            version: None,
            name: String::new(),
            parent_id,
            images: Vec::new(),
            entries: LanguageEntries::new(),
            tabs: TabSelection::NoEntries,
            editor: None,
            show_errors: false,
            language_error: None,
            loaded: None,
            generation: 0,
            pending: None,
        }
    }

    pub fn from_resource(kind: ResourceKind, resource: Resource) -> Self {
        let mut form = Self::new(kind, None);
        form.apply(resource);
        form
    }

    pub async fn load<P: ResourcePersistence>(service: &P, id: &ResourceId) -> Result<Self> {
        let resource = service.get(id).await?;
        debug!(
            "Loaded {} {} with {} languages",
            service.kind(),
            id,
            resource.languages.len()
        );
        Ok(Self::from_resource(service.kind(), resource))
    }

    fn apply(&mut self, resource: Resource) {
        self.id = Some(resource.id.clone());
        self.version = Some(resource.version);
        self.name = resource.name.clone();
        self.parent_id = resource.parent_id.clone();
        self.images = resource.images.clone();
        self.entries = hydrate_entries(&resource.languages);
        self.tabs = TabSelection::initial(&self.entries);
        self.editor = None;
        self.show_errors = false;
        self.language_error = None;
        self.loaded = Some(resource);
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn version(&self) -> Option<i64> {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn parent_id(&self) -> Option<&ResourceId> {
        self.parent_id.as_ref()
    }

    pub fn set_parent(&mut self, parent_id: Option<ResourceId>) {
        self.parent_id = parent_id;
    }

    pub fn images(&self) -> &[AssetKey] {
        &self.images
    }

    pub fn add_image(&mut self, key: AssetKey) -> bool {
        if self.images.contains(&key) {
            false
        } else {
            self.images.push(key);
            true
        }
    }

    pub fn remove_image(&mut self, key: &AssetKey) -> bool {
        let before = self.images.len();
        self.images.retain(|k| k != key);
        before != self.images.len()
    }

    pub fn entries(&self) -> &LanguageEntries {
        &self.entries
    }

    pub fn selection(&self) -> TabSelection {
        self.tabs
    }

    fn store(&mut self) -> LanguageContentStore<'_> {
        LanguageContentStore::new(&mut self.entries, &mut self.tabs)
    }

    /// Explicit tab click
    pub fn select(&mut self, id: EntryId) -> bool {
        self.store().select(id)
    }

    pub fn update_text(
        &mut self,
        id: EntryId,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Result<()> {
        Ok(self.store().update_text(id, title, subtitle)?)
    }

    /// Adds a blank entry, a duplicate is kept as an inline error of the language picker
    pub fn add_language(&mut self, language: LanguageCode) -> Result<EntryId> {
        match self.store().add_entry(language) {
            Ok(id) => {
                self.language_error = None;
                Ok(id)
            }
            Err(e) => {
                self.language_error = Some(e.clone());
                Err(e.into())
            }
        }
    }

    pub fn language_error(&self) -> Option<&ContentError> {
        self.language_error.as_ref()
    }

    pub fn addable_languages(&self, offered: &[LanguageCode]) -> Vec<LanguageCode> {
        self.entries.addable_languages(offered)
    }

    pub fn request_removal(&mut self, id: EntryId) -> Result<PendingRemoval> {
        Ok(self.store().request_removal(id)?)
    }

    /// Removes the entry, an editor open over it is discarded
    pub fn confirm_removal(&mut self, pending: PendingRemoval) -> Result<()> {
        if self.editor.as_ref().is_some_and(|e| e.entry() == pending.id()) {
            debug!("Closing editor of removed entry {}", pending.id());
            self.editor = None;
        }
        self.store().confirm_removal(pending)?;
        Ok(())
    }

    pub fn editor(&self) -> Option<&ActiveEditor> {
        self.editor.as_ref()
    }

    pub fn article_editor(&mut self) -> Option<&mut ArticleEditor> {
        match &mut self.editor {
            Some(ActiveEditor::Article(editor)) => Some(editor),
            _ => None,
        }
    }

    pub fn audio_editor(&mut self) -> Option<&mut AudioEditor> {
        match &mut self.editor {
            Some(ActiveEditor::Audio(editor)) => Some(editor),
            _ => None,
        }
    }

    fn ensure_no_editor(&self) -> Result<()> {
        match &self.editor {
            Some(open) => {
                debug!("Editor already open for entry {}", open.entry());
                Err(AppError::EditorOpen)
            }
            None => Ok(()),
        }
    }

    pub fn open_article(&mut self, id: EntryId) -> Result<&mut ArticleEditor> {
        self.ensure_no_editor()?;
        let editor = ArticleEditor::open(self.entries.entry(id)?, self.kind);
        self.editor = Some(ActiveEditor::Article(editor));
        self.article_editor().ok_or(AppError::NoEditor)
    }

    pub fn open_audio(&mut self, id: EntryId) -> Result<&mut AudioEditor> {
        self.ensure_no_editor()?;
        let editor = AudioEditor::open(self.entries.entry(id)?);
        self.editor = Some(ActiveEditor::Audio(editor));
        self.audio_editor().ok_or(AppError::NoEditor)
    }

    /// Previews the script of the open audio editor
    pub async fn preview_audio<S: AudioPreviewSource>(
        &mut self,
        source: &S,
    ) -> Result<PreviewOutcome> {
        let editor = self.audio_editor().ok_or(AppError::NoEditor)?;
        Ok(editor.preview(source).await?)
    }

    /// Writes the open editor back into its entry and closes it.
    ///
    /// The editor stays open when its entry is gone, so the edits are not lost.
    pub fn commit_editor(&mut self) -> Result<()> {
        let open = self.editor.as_ref().ok_or(AppError::NoEditor)?;
        self.entries.entry(open.entry())?;
        let editor = self.editor.take().ok_or(AppError::NoEditor)?;
        let mut store = LanguageContentStore::new(&mut self.entries, &mut self.tabs);
        match editor {
            ActiveEditor::Article(editor) => editor.save(&mut store)?,
            ActiveEditor::Audio(editor) => editor.save(&mut store)?,
        }
        Ok(())
    }

    /// Closes the open editor without saving
    pub fn close_editor(&mut self) {
        if let Some(editor) = self.editor.take() {
            debug!("Discarding editor of entry {}", editor.entry());
        }
    }

    pub fn draft(&self) -> ResourceDraft {
        ResourceDraft::from_entries(
            self.name.clone(),
            self.parent_id.clone(),
            self.images.clone(),
            self.version,
            &self.entries,
        )
    }

    fn check(&self) -> FormErrors {
        match self.draft().check(self.kind) {
            Ok(()) => FormErrors::new(),
            Err(errors) => errors,
        }
    }

    /// Validates the whole form and keeps errors visible from now on
    pub fn validate(&mut self) -> FormErrors {
        self.show_errors = true;
        self.check()
    }

    /// Errors of current values, empty until the form was validated
    pub fn errors(&self) -> FormErrors {
        if self.show_errors {
            self.check()
        } else {
            FormErrors::new()
        }
    }

    pub fn tabs(&self) -> Vec<Tab> {
        tab_indicators(&self.entries, &self.tabs, &self.errors())
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    /// Validates and captures the form for saving
    pub fn prepare_submission(&mut self) -> Result<Submission> {
        self.ensure_no_editor()?;
        let errors = self.validate();
        if !errors.is_empty() {
            debug!("Submission blocked by {} validation errors", errors.len());
            return Err(AppError::Validation(errors));
        }
        self.generation += 1;
        self.pending = Some(self.generation);
        Ok(Submission {
            generation: self.generation,
            id: self.id.clone(),
            draft: self.draft(),
        })
    }

    /// Applies result of a submission.
    ///
    /// A saved resource replaces form state, failures keep it untouched so the user can retry.
    pub fn finish_submission(
        &mut self,
        submission: Submission,
        result: Result<Resource, ClientError>,
    ) -> Result<SubmitOutcome> {
        if self.pending != Some(submission.generation) {
            warn!(
                "Discarding result of submission {}, form is at {}",
                submission.generation, self.generation
            );
            return Ok(SubmitOutcome::Discarded);
        }
        self.pending = None;
        let resource = result?;
        let id = resource.id.clone();
        info!("Saved {} {} version {}", self.kind, id, resource.version);
        self.apply(resource);
        Ok(SubmitOutcome::Saved(id))
    }

    pub async fn submit<P: ResourcePersistence>(&mut self, service: &P) -> Result<SubmitOutcome> {
        let submission = self.prepare_submission()?;
        let result = submission.execute(service).await;
        self.finish_submission(submission, result)
    }

    /// Rehydrates the form from the last loaded resource or from defaults
    pub fn reset(&mut self) {
        match self.loaded.take() {
            Some(resource) => self.apply(resource),
            None => {
                self.name.clear();
                self.images.clear();
                self.entries = LanguageEntries::new();
                self.tabs = TabSelection::NoEntries;
                self.editor = None;
                self.show_errors = false;
                self.language_error = None;
            }
        }
    }

    /// Form is going away, nothing in flight may touch it afterwards
    pub fn close(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.editor = None;
        self.entries = LanguageEntries::new();
        self.tabs = TabSelection::NoEntries;
    }
}
