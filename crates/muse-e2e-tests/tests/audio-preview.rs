use muse_app::{AppSession, ResourceFormController, SubmitOutcome};
use muse_content::audio::{PlaybackState, PreviewOutcome};
use muse_e2e_tests::{launch_backend, test_config};
use muse_types::{LanguageCode, ResourceKind};
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_audio_preview() {
    let (base_url, backend) = launch_backend().await.unwrap();
    let session = AppSession::start(&test_config(&base_url)).await.unwrap();
    let audio = session.audio();
    let service = session.resources(ResourceKind::Exhibit);

    let mut form = ResourceFormController::new(ResourceKind::Exhibit, Some("exhibition-1".into()));
    form.set_name("Dama z gronostajem");
    let pl = form.add_language(LanguageCode::PlPl).unwrap();
    form.update_text(pl, "Dama z gronostajem", "Leonardo da Vinci").unwrap();

    let editor = form.open_audio(pl).unwrap();
    assert_eq!(editor.voice(), &LanguageCode::PlPl.default_voice());
    editor.set_markup("Portret <break/> Cecylii Gallerani");
    assert_eq!(editor.counter().count, 26);
    let outcome = form.preview_audio(&audio).await.unwrap();
    assert_eq!(outcome, PreviewOutcome::Ready);
    assert_eq!(backend.synthesized().len(), 1);
    assert!(backend.asset_fetches()[0].starts_with("temporary/preview/"));

    let editor = form.audio_editor().unwrap();
    let url = editor.play().unwrap().url.clone();
    assert!(url.path().starts_with("/files/temporary/preview/"));
    editor.pause();
    assert!(matches!(editor.state(), PlaybackState::Paused(_)));
    editor.stop();
    assert!(matches!(editor.state(), PlaybackState::Ready(_)));
    form.commit_editor().unwrap();

    let SubmitOutcome::Saved(id) = form.submit(&service).await.unwrap() else {
        panic!("submission discarded");
    };
    let stored = backend.stored(ResourceKind::Exhibit, id.as_ref()).unwrap();
    let key = stored.languages[0].audio.as_ref().unwrap().asset_key.clone().unwrap();
    assert!(backend.has_asset(&format!("permanent/{key}")));

    // stored render is played without new synthesis
    let pl = form.entries().find_language(LanguageCode::PlPl).unwrap().id();
    form.open_audio(pl).unwrap();
    form.preview_audio(&audio).await.unwrap();
    assert_eq!(backend.synthesized().len(), 1);
    assert_eq!(backend.asset_fetches().last().unwrap(), &format!("permanent/{key}"));

    let editor = form.audio_editor().unwrap();
    editor.set_markup("Portret Cecylii Gallerani");
    assert_eq!(editor.state(), &PlaybackState::Idle);
    form.preview_audio(&audio).await.unwrap();
    let synthesized = backend.synthesized();
    assert_eq!(synthesized.len(), 2);
    assert_eq!(
        synthesized[1],
        ("pl-PL".to_string(), "Portret Cecylii Gallerani".to_string())
    );
}

#[tokio::test]
#[traced_test]
async fn test_failed_preview() {
    let (base_url, backend) = launch_backend().await.unwrap();
    let session = AppSession::start(&test_config(&base_url)).await.unwrap();
    let audio = session.audio();

    let mut form = ResourceFormController::new(ResourceKind::Institution, None);
    let en = form.add_language(LanguageCode::EnGb).unwrap();
    form.open_audio(en).unwrap().set_markup("Welcome <fail/>");
    let outcome = form.preview_audio(&audio).await.unwrap();
    assert!(matches!(outcome, PreviewOutcome::Failed(_)));
    assert!(logs_contain("Audio preview failed"));

    let editor = form.audio_editor().unwrap();
    assert_eq!(editor.state(), &PlaybackState::Idle);
    assert!(editor.last_error().is_some());
    assert!(editor.play().is_err());
    assert!(backend.synthesized().is_empty());

    editor.set_markup("Welcome");
    assert_eq!(form.preview_audio(&audio).await.unwrap(), PreviewOutcome::Ready);
    assert!(form.audio_editor().unwrap().last_error().is_none());
}
