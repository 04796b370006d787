use std::fmt::Display;

use muse_types::{LanguageCode, Voice};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::{
    article::CharCount,
    asset::{AssetKey, AssetUrl, StoreNamespace},
    entry::{AudioContent, EntryId, LanguageEntry},
    error::{ContentError, Result},
    markup::{self, MarkupError},
    store::LanguageContentStore,
};

/// Advisory budget of audible characters in a script
pub const AUDIO_MARKUP_LIMIT: usize = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    pub markup: String,
    pub voice: Voice,
    pub language_code: LanguageCode,
}

/// Backend side of audio previews
pub trait AudioPreviewSource {
    type Error: Display;

    /// Renders `request` into a temporary asset
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AssetKey, Self::Error>;

    async fn asset_url(
        &self,
        namespace: StoreNamespace,
        key: &AssetKey,
    ) -> Result<AssetUrl, Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    /// No rendered asset for the current markup
    Idle,
    Loading {
        version: u64,
    },
    Ready(AssetUrl),
    Playing(AssetUrl),
    Paused(AssetUrl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewPlan {
    /// Stored render matches the live markup, only its URL is needed
    Reuse(AssetKey),
    Synthesize(SynthesisRequest),
}

/// In-flight preview, tagged with the markup version it was requested for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTicket {
    version: u64,
    plan: PreviewPlan,
}

impl PreviewTicket {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn plan(&self) -> &PreviewPlan {
        &self.plan
    }

    /// Performs backend calls of the preview, does not touch the editor
    pub async fn resolve<S: AudioPreviewSource>(&self, source: &S) -> Result<AssetUrl, String> {
        match &self.plan {
            PreviewPlan::Reuse(key) => source
                .asset_url(StoreNamespace::Permanent, key)
                .await
                .map_err(|e| e.to_string()),
            PreviewPlan::Synthesize(request) => {
                let key = source
                    .synthesize(request)
                    .await
                    .map_err(|e| e.to_string())?;
                debug!("Synthesized preview {key} for {}", request.language_code);
                source
                    .asset_url(StoreNamespace::Temporary, &key)
                    .await
                    .map_err(|e| e.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    Ready,
    /// Markup changed while the request was in flight, result dropped
    Stale,
    Failed(String),
}

/// Modal editor of one entry's audio script with preview playback
#[derive(Debug, Clone)]
pub struct AudioEditor {
    entry: EntryId,
    language: LanguageCode,
    stored: Option<AudioContent>,
    markup: String,
    voice: Voice,
    version: u64,
    state: PlaybackState,
    last_error: Option<String>,
}

impl AudioEditor {
    pub fn open(entry: &LanguageEntry) -> Self {
        let stored = entry.audio.clone();
        let (markup, voice) = match &stored {
            Some(audio) => (audio.markup.clone(), audio.voice.clone()),
            None => (String::new(), entry.language().default_voice()),
        };
        AudioEditor {
            entry: entry.id(),
            language: entry.language(),
            stored,
            markup,
            voice,
            version: 0,
            state: PlaybackState::Idle,
            last_error: None,
        }
    }

    pub fn entry(&self) -> EntryId {
        self.entry
    }

    pub fn language(&self) -> LanguageCode {
        self.language
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Markup as shown in the editing surface
    pub fn display_markup(&self) -> String {
        markup::escape_for_display(&self.markup)
    }

    pub fn set_display_markup(&mut self, shown: &str) {
        self.set_markup(markup::unescape_display(shown))
    }

    pub fn set_markup(&mut self, markup: impl Into<String>) {
        let markup = markup.into();
        if markup != self.markup {
            self.markup = markup;
            self.invalidate();
        }
    }

    pub fn set_voice(&mut self, voice: Voice) {
        if voice != self.voice {
            self.voice = voice;
            self.invalidate();
        }
    }

    fn invalidate(&mut self) {
        self.version += 1;
        if self.state != PlaybackState::Idle {
            debug!("Audio preview invalidated by edit, version {}", self.version);
        }
        self.state = PlaybackState::Idle;
    }

    pub fn counter(&self) -> CharCount {
        CharCount {
            count: markup::visible_len(&self.markup),
            limit: AUDIO_MARKUP_LIMIT,
        }
    }

    pub fn check(&self) -> Result<(), MarkupError> {
        markup::check_markup(&self.markup)
    }

    /// Starts a preview of the live markup
    pub fn begin_preview(&mut self) -> Result<PreviewTicket> {
        if self.markup.trim().is_empty() {
            return Err(ContentError::EmptyMarkup);
        }
        let plan = match self
            .stored
            .as_ref()
            .and_then(|s| s.reusable_for(&self.markup, &self.voice))
        {
            Some(key) => PreviewPlan::Reuse(key.clone()),
            None => PreviewPlan::Synthesize(SynthesisRequest {
                markup: self.markup.clone(),
                voice: self.voice.clone(),
                language_code: self.language,
            }),
        };
        self.last_error = None;
        self.state = PlaybackState::Loading {
            version: self.version,
        };
        Ok(PreviewTicket {
            version: self.version,
            plan,
        })
    }

    /// Applies result of a preview request unless a newer edit or request superseded it
    pub fn finish_preview(
        &mut self,
        ticket: &PreviewTicket,
        result: Result<AssetUrl, String>,
    ) -> PreviewOutcome {
        match self.state {
            PlaybackState::Loading { version } if version == ticket.version => {}
            _ => {
                debug!(
                    "Discarding stale preview result for version {}, current {}",
                    ticket.version, self.version
                );
                return PreviewOutcome::Stale;
            }
        }
        match result {
            Ok(url) => {
                self.state = PlaybackState::Ready(url);
                PreviewOutcome::Ready
            }
            Err(e) => {
                warn!("Audio preview failed: {e}");
                self.state = PlaybackState::Idle;
                self.last_error = Some(e.clone());
                PreviewOutcome::Failed(e)
            }
        }
    }

    pub async fn preview<S: AudioPreviewSource>(&mut self, source: &S) -> Result<PreviewOutcome> {
        let ticket = self.begin_preview()?;
        let result = ticket.resolve(source).await;
        Ok(self.finish_preview(&ticket, result))
    }

    pub fn play(&mut self) -> Result<&AssetUrl> {
        match &self.state {
            PlaybackState::Ready(url) | PlaybackState::Paused(url) => {
                let url = url.clone();
                if url.is_expired(OffsetDateTime::now_utc()) {
                    debug!("Preview URL expired, preview needs to be resolved again");
                    self.state = PlaybackState::Idle;
                    return Err(ContentError::NotReady);
                }
                self.state = PlaybackState::Playing(url);
            }
            PlaybackState::Playing(_) => {}
            _ => return Err(ContentError::NotReady),
        }
        self.playing_url()
    }

    fn playing_url(&self) -> Result<&AssetUrl> {
        match &self.state {
            PlaybackState::Playing(url) => Ok(url),
            _ => Err(ContentError::NotReady),
        }
    }

    pub fn pause(&mut self) {
        if let PlaybackState::Playing(url) = &self.state {
            self.state = PlaybackState::Paused(url.clone());
        }
    }

    /// Stop button or end of the track
    pub fn stop(&mut self) {
        if let PlaybackState::Playing(url) | PlaybackState::Paused(url) = &self.state {
            self.state = PlaybackState::Ready(url.clone());
        }
    }

    /// Value that a save would commit.
    ///
    /// Unchanged audio keeps its stored asset key, edited audio goes without one so the
    /// backend renders it on the next resource save.
    pub fn value(&self) -> Option<AudioContent> {
        if self.markup.trim().is_empty() {
            return None;
        }
        match &self.stored {
            Some(stored) if stored.markup == self.markup && stored.voice == self.voice => {
                Some(stored.clone())
            }
            _ => Some(AudioContent::new(self.markup.clone(), self.voice.clone())),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.value() != self.stored
    }

    pub fn save(self, store: &mut LanguageContentStore<'_>) -> Result<()> {
        let value = self.value();
        let entry = store.entry_mut(self.entry)?;
        entry.audio = value;
        Ok(())
    }
}
