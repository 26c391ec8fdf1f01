//! File materialization resource.
use std::io;
use std::path::Path;

use base64::Engine as _;

use super::fetch::Fetcher;
use super::helpers::fs;
use super::{Applicable, ResourceChange};
use crate::error::{FetchError, FileError};
use crate::metadata::{Encoding, FileBody, FileDirective};

/// Writes one [`FileDirective`] to disk.
///
/// Missing parent directories are created first. Inline `content` is written
/// owner-only; downloaded files get the default creation mode. An explicit
/// `mode` is applied last in either case.
pub struct FileResource<'a> {
    directive: &'a FileDirective,
    fetcher: &'a dyn Fetcher,
}

impl<'a> FileResource<'a> {
    /// Create a resource for `directive`, downloading through `fetcher`.
    #[must_use]
    pub fn new(directive: &'a FileDirective, fetcher: &'a dyn Fetcher) -> Self {
        Self { directive, fetcher }
    }

    fn path(&self) -> &Path {
        &self.directive.path
    }

    fn create_parent(&self) -> Result<(), FileError> {
        fs::ensure_parent_dir(self.path())
            .map(|_| ())
            .map_err(|source| FileError::CreateDir {
                path: self.path().to_path_buf(),
                dir: self
                    .path()
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default(),
                source,
            })
    }

    fn write_private(&self, bytes: &[u8]) -> Result<(), FileError> {
        self.create_parent()?;
        fs::write_private(self.path(), bytes).map_err(|source| FileError::Write {
            path: self.path().to_path_buf(),
            source,
        })
    }

    fn decode(&self, text: &str, encoding: Encoding) -> Result<Vec<u8>, FileError> {
        match encoding {
            Encoding::Plain => Ok(text.as_bytes().to_vec()),
            Encoding::Base64 => base64::engine::general_purpose::STANDARD
                .decode(text.trim())
                .map_err(|source| FileError::Decode {
                    path: self.path().to_path_buf(),
                    source,
                }),
        }
    }

    /// The request is made before anything touches the disk, and a body
    /// that breaks off mid-stream removes the partial file, so a failed
    /// download leaves nothing behind.
    fn download(&self, url: &str) -> Result<(), FileError> {
        let fetch_error = |source: FetchError| FileError::Fetch {
            path: self.path().to_path_buf(),
            url: url.to_string(),
            source,
        };

        let mut body = self.fetcher.open(url).map_err(fetch_error)?;
        self.create_parent()?;
        let mut file = fs::create_default(self.path()).map_err(|source| FileError::Write {
            path: self.path().to_path_buf(),
            source,
        })?;
        if let Err(e) = io::copy(&mut body, &mut file) {
            drop(file);
            fs::discard(self.path()).ok();
            return Err(fetch_error(FetchError::Body(e)));
        }
        Ok(())
    }

    fn apply_mode(&self) -> Result<(), FileError> {
        let Some(mode) = self.directive.mode else {
            return Ok(());
        };
        fs::set_mode(self.path(), mode).map_err(|source| FileError::Permissions {
            path: self.path().to_path_buf(),
            mode,
            source,
        })
    }
}

impl std::fmt::Debug for FileResource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileResource")
            .field("directive", &self.directive)
            .field("fetcher", &"<dyn Fetcher>")
            .finish()
    }
}

impl Applicable for FileResource<'_> {
    type Error = FileError;

    fn description(&self) -> String {
        self.path().display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange, FileError> {
        match &self.directive.body {
            FileBody::Text { text, encoding } => {
                let bytes = self.decode(text, *encoding)?;
                self.write_private(&bytes)?;
            }
            FileBody::Structured(content) => {
                let bytes =
                    serde_json::to_vec(content).map_err(|source| FileError::Serialize {
                        path: self.path().to_path_buf(),
                        source,
                    })?;
                self.write_private(&bytes)?;
            }
            FileBody::Remote { url } => self.download(url)?,
            FileBody::Unsupported { found } => {
                return Ok(ResourceChange::Skipped {
                    reason: format!("unsupported content type: {found}"),
                });
            }
            FileBody::Missing => {
                return Ok(ResourceChange::Skipped {
                    reason: "neither content nor source given".to_string(),
                });
            }
        }
        self.apply_mode()?;
        Ok(ResourceChange::Applied)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resources::fetch::MockFetcher;
    use std::path::PathBuf;

    fn text(path: PathBuf, body: &str) -> FileDirective {
        FileDirective {
            path,
            body: FileBody::Text {
                text: body.to_string(),
                encoding: Encoding::Plain,
            },
            mode: None,
        }
    }

    /// Yields nothing but an error, like a connection reset mid-body.
    struct BrokenStream;

    impl io::Read for BrokenStream {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "peer disconnected",
            ))
        }
    }

    fn no_network() -> MockFetcher {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_open().never();
        fetcher
    }

    #[test]
    fn description_is_the_path() {
        let directive = text(PathBuf::from("/etc/motd"), "");
        let fetcher = no_network();
        assert_eq!(
            FileResource::new(&directive, &fetcher).description(),
            "/etc/motd"
        );
    }

    #[test]
    fn text_content_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motd");
        let directive = text(path.clone(), "welcome\n");
        let fetcher = no_network();
        let change = FileResource::new(&directive, &fetcher).apply().unwrap();
        assert_eq!(change, ResourceChange::Applied);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "welcome\n");
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("c.conf");
        let directive = text(path.clone(), "x");
        let fetcher = no_network();
        FileResource::new(&directive, &fetcher).apply().unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "x");
    }

    #[cfg(unix)]
    #[test]
    fn inline_content_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret");
        let directive = text(path.clone(), "token");
        let fetcher = no_network();
        FileResource::new(&directive, &fetcher).apply().unwrap();
        let mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn explicit_mode_is_applied_after_write() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.sh");
        let mut directive = text(path.clone(), "#!/bin/sh\n");
        directive.mode = Some(0o755);
        let fetcher = no_network();
        FileResource::new(&directive, &fetcher).apply().unwrap();
        let mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn structured_content_is_serialized_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        let content = serde_json::json!({"port": 8080, "name": "web"});
        let directive = FileDirective {
            path: path.clone(),
            body: FileBody::Structured(content.as_object().unwrap().clone()),
            mode: None,
        };
        let fetcher = no_network();
        FileResource::new(&directive, &fetcher).apply().unwrap();
        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(written, content);
    }

    #[test]
    fn base64_content_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin");
        let directive = FileDirective {
            path: path.clone(),
            body: FileBody::Text {
                text: "AAEC/w==".to_string(),
                encoding: Encoding::Base64,
            },
            mode: None,
        };
        let fetcher = no_network();
        FileResource::new(&directive, &fetcher).apply().unwrap();
        assert_eq!(std::fs::read(path).unwrap(), vec![0, 1, 2, 255]);
    }

    #[test]
    fn invalid_base64_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin");
        let directive = FileDirective {
            path: path.clone(),
            body: FileBody::Text {
                text: "not base64!".to_string(),
                encoding: Encoding::Base64,
            },
            mode: None,
        };
        let fetcher = no_network();
        let err = FileResource::new(&directive, &fetcher).apply().unwrap_err();
        assert!(matches!(err, FileError::Decode { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn remote_source_is_streamed_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dl").join("app.tar");
        let directive = FileDirective {
            path: path.clone(),
            body: FileBody::Remote {
                url: "http://example.invalid/app.tar".to_string(),
            },
            mode: None,
        };
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_open()
            .withf(|url| url == "http://example.invalid/app.tar")
            .times(1)
            .returning(|_| {
                let body: Box<dyn io::Read> = Box::new(io::Cursor::new(b"payload".to_vec()));
                Ok(body)
            });
        FileResource::new(&directive, &fetcher).apply().unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"payload");
    }

    #[test]
    fn failed_download_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("app.tar");
        let directive = FileDirective {
            path: path.clone(),
            body: FileBody::Remote {
                url: "http://example.invalid/missing".to_string(),
            },
            mode: None,
        };
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_open()
            .returning(|_| Err(FetchError::Request("http status: 404".to_string())));
        let err = FileResource::new(&directive, &fetcher).apply().unwrap_err();
        assert!(matches!(err, FileError::Fetch { .. }));
        assert!(err.to_string().contains("404"));
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn interrupted_download_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.tar");
        let directive = FileDirective {
            path: path.clone(),
            body: FileBody::Remote {
                url: "http://example.invalid/app.tar".to_string(),
            },
            mode: None,
        };
        let mut fetcher = MockFetcher::new();
        fetcher.expect_open().returning(|_| {
            let body: Box<dyn io::Read> =
                Box::new(io::Read::chain(io::Cursor::new(b"hello".to_vec()), BrokenStream));
            Ok(body)
        });
        let err = FileResource::new(&directive, &fetcher).apply().unwrap_err();
        assert!(
            matches!(
                err,
                FileError::Fetch {
                    source: FetchError::Body(_),
                    ..
                }
            ),
            "{err}"
        );
        assert!(!path.exists());
    }

    #[test]
    fn unsupported_content_is_skipped() {
        let directive = FileDirective {
            path: PathBuf::from("/nonexistent/never-written"),
            body: FileBody::Unsupported { found: "array" },
            mode: None,
        };
        let fetcher = no_network();
        let change = FileResource::new(&directive, &fetcher).apply().unwrap();
        assert_eq!(
            change,
            ResourceChange::Skipped {
                reason: "unsupported content type: array".to_string()
            }
        );
    }

    #[test]
    fn missing_body_is_skipped() {
        let directive = FileDirective {
            path: PathBuf::from("/nonexistent/never-written"),
            body: FileBody::Missing,
            mode: None,
        };
        let fetcher = no_network();
        let change = FileResource::new(&directive, &fetcher).apply().unwrap();
        assert!(matches!(change, ResourceChange::Skipped { .. }));
    }

    #[test]
    fn unwritable_parent_is_create_dir_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let directive = text(blocker.join("child"), "x");
        let fetcher = no_network();
        let err = FileResource::new(&directive, &fetcher).apply().unwrap_err();
        assert!(matches!(err, FileError::CreateDir { .. }), "{err}");
    }
}
