//! Saving a gallery item's image to the user's download directory.
//!
//! Embedded items are written directly; remote items are fetched first.
//! Export never fails outright: when saving is not possible the image is
//! handed to a [`LinkOpener`] so the user can save it manually. Remote items
//! open their URL; embedded items open a copy in the scratch directory.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread::JoinHandle;

use tokio::io::AsyncWriteExt;

use crate::gallery::GalleryItem;
use crate::gallery::ImageRef;

/// Default file name prefix for exported images.
pub const DEFAULT_FILENAME_PREFIX: &str = "WallsF1";

/// Suffix of the transient file a download streams into.
const PARTIAL_SUFFIX: &str = ".part";

/// What happened to an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The image was written to this path.
    Saved(PathBuf),
    /// Saving failed; the image was opened externally instead.
    OpenedInBrowser,
    /// Saving and the external fallback both failed.
    Failed(String),
}

/// Opens a URL or local path outside the process.
pub trait LinkOpener: Send + Sync {
    /// Open `locator`: a URL, a file path, or as a last resort a data URI.
    fn open(&self, locator: &str) -> Result<(), String>;
}

/// Opens links with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, locator: &str) -> Result<(), String> {
        let (program, args): (&str, &[&str]) = if cfg!(target_os = "macos") {
            ("open", &[])
        } else if cfg!(target_os = "windows") {
            ("cmd", &["/C", "start", ""])
        } else {
            ("xdg-open", &[])
        };

        let mut command = Command::new(program);
        command.args(args).arg(locator);
        spawn_reaped(command).map(|_| ())
    }
}

/// Spawn `command` with null stdio and wait for it on a background thread,
/// so the child never lingers as a zombie.
fn spawn_reaped(mut command: Command) -> Result<JoinHandle<Option<ExitStatus>>, String> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("failed to run {program}: {e}"))?;

    Ok(std::thread::spawn(move || match child.wait() {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::debug!(program = %program, error = %e, "could not reap opener");
            None
        }
    }))
}

#[derive(Debug, thiserror::Error)]
enum SaveError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes gallery images to a download directory.
#[derive(Clone)]
pub struct DownloadExporter {
    client: reqwest::Client,
    download_dir: PathBuf,
    prefix: String,
    scratch_dir: PathBuf,
    opener: Arc<dyn LinkOpener>,
}

impl std::fmt::Debug for DownloadExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadExporter")
            .field("download_dir", &self.download_dir)
            .field("prefix", &self.prefix)
            .field("scratch_dir", &self.scratch_dir)
            .finish_non_exhaustive()
    }
}

impl DownloadExporter {
    /// Exporter writing into `download_dir` with the system link opener.
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            download_dir: download_dir.into(),
            prefix: DEFAULT_FILENAME_PREFIX.to_owned(),
            scratch_dir: std::env::temp_dir().join("wallsf1"),
            opener: Arc::new(SystemOpener),
        }
    }

    /// Replace the file name prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replace the directory embedded images are copied to before being
    /// opened externally.
    #[must_use]
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Replace the fallback link opener.
    #[must_use]
    pub fn with_opener(mut self, opener: Arc<dyn LinkOpener>) -> Self {
        self.opener = opener;
        self
    }

    /// Replace the HTTP client used for remote fetches.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Directory exports are written to.
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// File name an item is exported under.
    ///
    /// Embedded images are named after their title, remote ones after
    /// their id.
    pub fn file_name_for(&self, item: &GalleryItem) -> String {
        match item.image() {
            ImageRef::Embedded(_) => format!("{}-{}.png", self.prefix, slug(item.title())),
            ImageRef::Remote(_) => format!("{}-{}.jpg", self.prefix, sanitize(item.id())),
        }
    }

    /// Save `item`'s image, falling back to opening it externally.
    pub async fn export(&self, item: &GalleryItem) -> ExportOutcome {
        let file_name = self.file_name_for(item);
        let target = self.download_dir.join(&file_name);

        let saved = match item.image() {
            ImageRef::Embedded(image) => write_via_partial(&target, image.data()).await,
            ImageRef::Remote(url) => self.fetch_to(url, &target).await,
        };

        match saved {
            Ok(()) => {
                tracing::info!(id = item.id(), path = %target.display(), "wallpaper exported");
                ExportOutcome::Saved(target)
            }
            Err(e) => {
                tracing::warn!(id = item.id(), error = %e, "export failed, opening externally");
                let locator = self.fallback_locator(item, &file_name).await;
                match self.opener.open(&locator) {
                    Ok(()) => ExportOutcome::OpenedInBrowser,
                    Err(open_err) => {
                        tracing::warn!(id = item.id(), error = %open_err, "external open failed");
                        ExportOutcome::Failed(format!("{e}; {open_err}"))
                    }
                }
            }
        }
    }

    // Embedded bytes go through a scratch file; a data URI is only used when
    // that write fails too, since long ones exceed argv limits.
    async fn fallback_locator(&self, item: &GalleryItem, file_name: &str) -> String {
        match item.image() {
            ImageRef::Remote(url) => url.clone(),
            ImageRef::Embedded(image) => {
                let scratch = self.scratch_dir.join(file_name);
                match write_via_partial(&scratch, image.data()).await {
                    Ok(()) => scratch.to_string_lossy().into_owned(),
                    Err(e) => {
                        tracing::warn!(id = item.id(), error = %e, "scratch copy failed");
                        image.to_data_uri()
                    }
                }
            }
        }
    }

    async fn fetch_to(&self, url: &str, target: &Path) -> Result<(), SaveError> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SaveError::Status(status.as_u16()));
        }

        tokio::fs::create_dir_all(&self.download_dir).await?;
        let partial = partial_path(target);
        let streamed = async {
            let mut file = tokio::fs::File::create(&partial).await?;
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk).await?;
            }
            file.sync_all().await?;
            tokio::fs::rename(&partial, target).await?;
            Ok::<(), SaveError>(())
        }
        .await;

        if streamed.is_err() {
            let _ = tokio::fs::remove_file(&partial).await;
        }
        streamed
    }
}

async fn write_via_partial(target: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let partial = partial_path(target);
    let written = async {
        let mut file = tokio::fs::File::create(&partial).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        tokio::fs::rename(&partial, target).await
    }
    .await;

    if written.is_err() {
        let _ = tokio::fs::remove_file(&partial).await;
    }
    Ok(written?)
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Collapse whitespace runs to `-` and lower-case.
pub fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            in_space = false;
            out.extend(c.to_lowercase());
        }
    }
    sanitize(&out)
}

// Path separators would escape the download directory.
fn sanitize(name: &str) -> String {
    name.replace(['/', '\\'], "-")
}
