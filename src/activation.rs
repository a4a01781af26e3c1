//! Opening activated results
//!
//! Resolving local copies of server files and launching viewers belong to
//! the host application; this module only decides what to ask for.

use crate::config::SyncFolder;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

/// What activating a result row should open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Open in the external browser
    OpenUrl(Url),
    /// Prefer a local copy of the file's folder, falling back to the browser
    OpenFile { folder: String, url: Url },
}

/// Finds local copies of server folders
pub trait LocalFileResolver: Send + Sync {
    /// Local paths matching a server folder path, best match first
    fn find_local_files(&self, folder: &str) -> Vec<PathBuf>;
}

/// Launches viewers for activated results
pub trait ResourceOpener: Send + Sync {
    fn open_url(&self, url: &Url) -> io::Result<()>;

    fn open_local(&self, path: &Path) -> io::Result<()>;
}

/// Server folder of a file result, decoded from the `dir` and `scrollto`
/// query parameters of its resource URL
pub fn file_folder(url: &Url) -> Option<String> {
    let mut dir = None;
    let mut file_name = None;
    for (key, value) in query_params(url) {
        match key.as_str() {
            "dir" => dir = Some(value),
            "scrollto" => file_name = Some(value),
            _ => {}
        }
    }

    let (dir, file_name) = (dir?, file_name?);
    if dir.is_empty() || file_name.is_empty() {
        return None;
    }

    let relative_path = format!("{}/{}", dir.trim_end_matches('/'), file_name);
    let folder = match relative_path.rsplit_once('/') {
        Some((folder, _)) if !folder.is_empty() => folder.to_string(),
        _ => "/".to_string(),
    };
    Some(folder)
}

/// Percent-decoded query pairs; `+` stays literal
fn query_params(url: &Url) -> Vec<(String, String)> {
    let Some(query) = url.query() else {
        return Vec::new();
    };

    query
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = urlencoding::decode(key).ok()?;
            let value = urlencoding::decode(value).ok()?;
            Some((key.into_owned(), value.into_owned()))
        })
        .collect()
}

/// Carry out an activation
pub fn perform(activation: &Activation, resolver: &dyn LocalFileResolver, opener: &dyn ResourceOpener) {
    let url = match activation {
        Activation::OpenFile { folder, url } => {
            if let Some(local) = resolver.find_local_files(folder).first() {
                debug!("Opening local folder {}", local.display());
                match opener.open_local(local) {
                    Ok(()) => return,
                    Err(e) => warn!("Failed to open {}: {}", local.display(), e),
                }
            }
            url
        }
        Activation::OpenUrl(url) => url,
    };

    if let Err(e) = opener.open_url(url) {
        warn!("Failed to open {}: {}", url, e);
    }
}

/// Resolves server folders against configured sync folders
#[derive(Debug, Clone, Default)]
pub struct SyncFolderResolver {
    folders: Vec<SyncFolder>,
}

impl SyncFolderResolver {
    pub fn new(folders: Vec<SyncFolder>) -> Self {
        Self { folders }
    }

    fn local_path(sync_folder: &SyncFolder, folder: &str) -> Option<PathBuf> {
        let remote = sync_folder.remote_path.trim_end_matches('/');
        let rest = folder.strip_prefix(remote)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }

        let rest = rest.trim_start_matches('/');
        if rest.is_empty() {
            Some(sync_folder.local_path.clone())
        } else {
            Some(sync_folder.local_path.join(rest))
        }
    }
}

impl LocalFileResolver for SyncFolderResolver {
    fn find_local_files(&self, folder: &str) -> Vec<PathBuf> {
        self.folders
            .iter()
            .filter_map(|sync_folder| Self::local_path(sync_folder, folder))
            .filter(|path| path.exists())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<String>>,
        fail_local: bool,
    }

    impl ResourceOpener for RecordingOpener {
        fn open_url(&self, url: &Url) -> io::Result<()> {
            self.opened.lock().unwrap().push(format!("url:{}", url));
            Ok(())
        }

        fn open_local(&self, path: &Path) -> io::Result<()> {
            if self.fail_local {
                return Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
            }
            self.opened.lock().unwrap().push(format!("local:{}", path.display()));
            Ok(())
        }
    }

    struct FixedResolver(Vec<PathBuf>);

    impl LocalFileResolver for FixedResolver {
        fn find_local_files(&self, _folder: &str) -> Vec<PathBuf> {
            self.0.clone()
        }
    }

    #[test]
    fn test_file_folder_decoding() {
        let url = Url::parse(
            "https://cloud.example.com/apps/files/?dir=/Documents/Work%20Items&scrollto=plan%20v2.pdf",
        )
        .unwrap();
        assert_eq!(file_folder(&url).as_deref(), Some("/Documents/Work Items"));

        let root = Url::parse("https://cloud.example.com/apps/files/?dir=/&scrollto=a.txt").unwrap();
        assert_eq!(file_folder(&root).as_deref(), Some("/"));

        let missing = Url::parse("https://cloud.example.com/apps/files/?dir=/Documents").unwrap();
        assert_eq!(file_folder(&missing), None);
    }

    #[test]
    fn test_file_folder_keeps_plus_sign() {
        let url = Url::parse(
            "https://cloud.example.com/apps/files/?dir=/A+B&scrollto=c%2Bd.txt&fileid=9",
        )
        .unwrap();
        assert_eq!(file_folder(&url).as_deref(), Some("/A+B"));
    }

    #[test]
    fn test_perform_prefers_local_copy() {
        let url = Url::parse("https://cloud.example.com/f/1").unwrap();
        let activation = Activation::OpenFile {
            folder: "/Documents".to_string(),
            url,
        };
        let opener = RecordingOpener::default();

        perform(&activation, &FixedResolver(vec![PathBuf::from("/sync/Documents")]), &opener);

        assert_eq!(*opener.opened.lock().unwrap(), vec!["local:/sync/Documents"]);
    }

    #[test]
    fn test_perform_falls_back_to_browser() {
        let url = Url::parse("https://cloud.example.com/f/1").unwrap();
        let activation = Activation::OpenFile {
            folder: "/Documents".to_string(),
            url,
        };

        let opener = RecordingOpener::default();
        perform(&activation, &FixedResolver(vec![]), &opener);
        assert_eq!(*opener.opened.lock().unwrap(), vec!["url:https://cloud.example.com/f/1"]);

        let failing = RecordingOpener {
            fail_local: true,
            ..Default::default()
        };
        perform(&activation, &FixedResolver(vec![PathBuf::from("/sync")]), &failing);
        assert_eq!(*failing.opened.lock().unwrap(), vec!["url:https://cloud.example.com/f/1"]);
    }

    #[test]
    fn test_sync_folder_mapping() {
        let sync_folder = SyncFolder {
            remote_path: "/Documents".to_string(),
            local_path: PathBuf::from("/home/alice/Docs"),
        };

        assert_eq!(
            SyncFolderResolver::local_path(&sync_folder, "/Documents/Work"),
            Some(PathBuf::from("/home/alice/Docs/Work"))
        );
        assert_eq!(
            SyncFolderResolver::local_path(&sync_folder, "/Documents"),
            Some(PathBuf::from("/home/alice/Docs"))
        );
        assert_eq!(SyncFolderResolver::local_path(&sync_folder, "/DocumentsOld"), None);
        assert_eq!(SyncFolderResolver::local_path(&sync_folder, "/Photos"), None);
    }

    #[test]
    fn test_sync_folder_resolver_checks_existence() {
        let dir = std::env::temp_dir();
        let resolver = SyncFolderResolver::new(vec![SyncFolder {
            remote_path: "/".to_string(),
            local_path: dir.clone(),
        }]);

        assert_eq!(resolver.find_local_files("/"), vec![dir]);
        assert!(resolver
            .find_local_files("/surely-not-a-real-folder-4c1f")
            .is_empty());
    }
}
