//! Gallery Session Integration Tests
//!
//! Drive a full session against a mock Gemini endpoint and a mock image
//! host, with favorites and downloads on a temporary filesystem.

use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::json;
use wallsf1::{
    AspectRatio, DownloadExporter, ExportOutcome, FavoritesStore, GalleryItem, GalleryTab,
    GenerationError, ImageRef, JsonFileStorage, LinkOpener, LocalFile, Session, WallsConfig,
    WallsError,
};
use wallsf1_genai::{GeminiProvider, GenerationConfig};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-2.5-flash-image:generateContent";
const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 16, b'J', b'F', b'I', b'F'];

#[derive(Default)]
struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    fn opened(&self) -> Vec<String> {
        self.opened.lock().expect("lock").clone()
    }
}

impl LinkOpener for RecordingOpener {
    fn open(&self, locator: &str) -> Result<(), String> {
        self.opened.lock().expect("lock").push(locator.to_owned());
        Ok(())
    }
}

struct Fixture {
    _tmp: tempfile::TempDir,
    storage_path: std::path::PathBuf,
    download_dir: std::path::PathBuf,
    opener: Arc<RecordingOpener>,
}

impl Fixture {
    fn new() -> Self {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        Self {
            storage_path: tmp.path().join("data").join("storage.json"),
            download_dir: tmp.path().join("downloads"),
            opener: Arc::new(RecordingOpener::default()),
            _tmp: tmp,
        }
    }

    fn favorites(&self) -> FavoritesStore {
        FavoritesStore::new(Arc::new(JsonFileStorage::new(&self.storage_path)))
    }

    fn exporter(&self) -> DownloadExporter {
        DownloadExporter::new(&self.download_dir).with_opener(self.opener.clone())
    }

    fn session(&self, config: GenerationConfig) -> Session<GeminiProvider> {
        let provider = GeminiProvider::new(config).expect("provider");
        Session::new(provider, self.favorites(), self.exporter())
    }
}

fn keyed_config(server: &MockServer) -> GenerationConfig {
    GenerationConfig::default()
        .with_api_key("test-gemini-key")
        .with_base_url(server.uri())
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_generate_then_download_embedded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [
                {"text": "here you go"},
                {"inlineData": {"mimeType": "image/png", "data": BASE64.encode(PNG_BYTES)}}
            ]}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fixture = Fixture::new();
    let mut session = fixture.session(keyed_config(&mock_server));
    session.set_tab(GalleryTab::Generate);

    let id = session
        .generate("sunset over mountains", AspectRatio::Landscape16x9)
        .await
        .expect("generate")
        .id()
        .to_owned();

    assert_eq!(session.tab(), GalleryTab::Explore);
    assert_eq!(session.draft_prompt(), "sunset over mountains");
    let first = session.visible_items()[0];
    assert_eq!(first.id(), id);
    assert!(first.is_generated());
    let embedded = first.image().as_embedded().expect("embedded");
    assert_eq!(embedded.data(), PNG_BYTES);

    match session.export(&id).await.expect("export") {
        ExportOutcome::Saved(path) => {
            assert!(path.to_string_lossy().contains("ai-masterpiece"));
            assert_eq!(std::fs::read(path).expect("read"), PNG_BYTES);
        }
        other => panic!("expected Saved, got {other:?}"),
    }
    assert!(fixture.opener.opened().is_empty());
}

#[tokio::test]
async fn test_missing_credential_makes_no_request() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let fixture = Fixture::new();
    let mut session = fixture.session(GenerationConfig::default().with_base_url(mock_server.uri()));

    let err = session
        .generate("anything", AspectRatio::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WallsError::Generation(GenerationError::Configuration(_))
    ));
    assert!(session.last_error().is_some());
    assert_eq!(session.gallery().len(), 8);

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty(), "no request may be sent without a key");
}

#[tokio::test]
async fn test_empty_candidates_leave_gallery_untouched() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": []}}]
        })))
        .mount(&mock_server)
        .await;

    let fixture = Fixture::new();
    let mut session = fixture.session(keyed_config(&mock_server));

    let err = session
        .generate("nothing", AspectRatio::Square)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WallsError::Generation(GenerationError::EmptyResponse(_))
    ));
    assert_eq!(
        session.last_error(),
        Some("Failed to generate wallpaper. Please try again.")
    );
    assert!(session.generated().is_empty());
    assert!(!session.is_generating());
}

// ────────────────────────────────────────────────────────────────────────────
// Favorites
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_favorites_survive_restart() {
    let mock_server = MockServer::start().await;
    let fixture = Fixture::new();

    {
        let mut session = fixture.session(keyed_config(&mock_server));
        assert!(session.toggle_favorite("2"));
        assert!(session.toggle_favorite("7"));
        assert!(!session.toggle_favorite("2"));
    }

    let mut session = fixture.session(keyed_config(&mock_server));
    assert!(session.is_saved("7"));
    assert!(!session.is_saved("2"));

    session.set_tab(GalleryTab::Saved);
    let saved: Vec<&str> = session.visible_items().iter().map(|i| i.id()).collect();
    assert_eq!(saved, vec!["7"]);

    let raw = std::fs::read_to_string(&fixture.storage_path).expect("read");
    let stored: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(stored["wallsf1_saved"], r#"["7"]"#);
}

// ────────────────────────────────────────────────────────────────────────────
// Upload
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_from_disk_then_download() {
    let mock_server = MockServer::start().await;
    let fixture = Fixture::new();
    let mut session = fixture.session(keyed_config(&mock_server));

    let source = fixture.download_dir.with_file_name("neon-city_skyline.jpg");
    std::fs::write(&source, JPEG_BYTES).expect("write");

    let id = session
        .upload(LocalFile::from_path(&source), None)
        .await
        .expect("upload")
        .map(|item| item.id().to_owned())
        .expect("image accepted");

    let item = session.gallery().get(&id).expect("present");
    assert_eq!(item.title(), "Neon City Skyline");
    assert_eq!(item.author(), Some("You (Uploaded)"));
    assert_eq!(
        item.image().as_embedded().map(|e| e.mime_type()),
        Some("image/jpeg")
    );

    match session.export(&id).await.expect("export") {
        ExportOutcome::Saved(path) => {
            assert!(path.ends_with("WallsF1-neon-city-skyline.png"));
        }
        other => panic!("expected Saved, got {other:?}"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Remote Export
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_remote_export_streams_to_id_named_file() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/seed/red7/800/1200"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fixture = Fixture::new();
    let item = GalleryItem::new(
        "7",
        ImageRef::remote(format!("{}/seed/red7/800/1200", mock_server.uri())),
        "Crimson Tide",
    );

    match fixture.exporter().export(&item).await {
        ExportOutcome::Saved(path) => {
            assert!(path.ends_with("WallsF1-7.jpg"));
            assert_eq!(std::fs::read(&path).expect("read"), JPEG_BYTES);
        }
        other => panic!("expected Saved, got {other:?}"),
    }

    let leftovers: Vec<_> = std::fs::read_dir(&fixture.download_dir)
        .expect("read_dir")
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_remote_export_failure_opens_original_url() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fixture = Fixture::new();
    let url = format!("{}/seed/blue8/800/1200", mock_server.uri());
    let item = GalleryItem::new("8", ImageRef::remote(url.clone()), "Azure Glitch");

    let outcome = fixture.exporter().export(&item).await;
    assert_eq!(outcome, ExportOutcome::OpenedInBrowser);
    assert_eq!(fixture.opener.opened(), vec![url]);
    assert!(!fixture.download_dir.join("WallsF1-8.jpg").exists());
}

// ────────────────────────────────────────────────────────────────────────────
// Configuration Wiring
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_session_from_config_uses_configured_paths() {
    let fixture = Fixture::new();
    let mut config = WallsConfig::default();
    config.storage.path = Some(fixture.storage_path.clone());
    config.storage.favorites_key = "custom_saved".to_owned();
    config.export.download_dir = Some(fixture.download_dir.clone());
    config.generation.default_aspect_ratio = AspectRatio::Landscape4x3;

    let mut session = Session::from_config(&config).expect("session");
    assert_eq!(session.draft_ratio(), AspectRatio::Landscape4x3);
    assert!(session.toggle_favorite("1"));

    let raw = std::fs::read_to_string(&fixture.storage_path).expect("read");
    assert!(raw.contains("custom_saved"));
}
