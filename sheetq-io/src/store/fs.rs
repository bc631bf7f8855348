//! Filesystem-backed object store
//!
//! Objects live at `<root>/<container>/<key>`. Gzip bodies are recognized by their magic bytes
//! and reported with `content-encoding: gzip`, the way an object store reports objects uploaded
//! with that encoding.

use super::{ObjectStore, StoreError, StoredObject};
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::{Component, Path, PathBuf};

/// Object store rooted at a local directory
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path of an object, or `None` when the container/key escape the root
    pub fn object_path(&self, container: &str, key: &str) -> Option<PathBuf> {
        let relative = Path::new(container).join(key.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        (!escapes).then(|| self.root.join(relative))
    }
}

impl ObjectStore for FsObjectStore {
    fn get_object(&self, container: &str, key: &str) -> Result<StoredObject, StoreError> {
        let path = self
            .object_path(container, key)
            .ok_or_else(|| StoreError::access_denied(key))?;

        let mut file = File::open(&path).map_err(|e| map_io_error(key, &e))?;
        let metadata = file.metadata().map_err(|e| map_io_error(key, &e))?;
        // a directory in place of the object reads as absent
        if metadata.is_dir() {
            return Err(StoreError::no_such_key(key));
        }
        let mut body = Vec::with_capacity(metadata.len() as usize);
        file.read_to_end(&mut body).map_err(|e| map_io_error(key, &e))?;

        let mut object = StoredObject::new(body);
        object.last_modified = metadata.modified().ok();
        if is_gzip(&object.body) {
            object.content_encoding = Some("gzip".to_string());
        }
        object.content_type = content_type_for(key).map(str::to_string);
        Ok(object)
    }
}

fn map_io_error(key: &str, err: &io::Error) -> StoreError {
    match err.kind() {
        ErrorKind::NotFound => StoreError::no_such_key(key),
        ErrorKind::PermissionDenied => StoreError::access_denied(key),
        _ => StoreError::new(Some("InternalError"), None, err.to_string()),
    }
}

/// Check if data is gzip compressed (magic bytes check)
#[inline]
pub fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

fn content_type_for(key: &str) -> Option<&'static str> {
    let ext = Path::new(key).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "json" => Some("application/json"),
        "md" => Some("text/markdown"),
        "html" => Some("text/html"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_rejects_traversal() {
        let store = FsObjectStore::new("/srv/store");
        assert_eq!(
            store.object_path("bucket", "/abc/live/index.json"),
            Some(PathBuf::from("/srv/store/bucket/abc/live/index.json"))
        );
        assert!(store.object_path("bucket", "../other/secret.json").is_none());
        assert!(store.object_path("..", "x.json").is_none());
    }

    #[test]
    fn reads_body_and_modification_time_from_one_handle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bucket/abc")).unwrap();
        std::fs::write(dir.path().join("bucket/abc/data.json"), b"{\"data\":[]}").unwrap();
        let store = FsObjectStore::new(dir.path());

        let object = store.get_object("bucket", "abc/data.json").unwrap();
        assert_eq!(object.body, "{\"data\":[]}");
        assert!(object.last_modified.is_some());
        assert_eq!(object.content_encoding, None);

        let err = store.get_object("bucket", "abc").unwrap_err();
        assert_eq!(err.code.as_deref(), Some("NoSuchKey"));
        let err = store.get_object("bucket", "abc/none.json").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn gzip_magic() {
        assert!(is_gzip(&[0x1f, 0x8b, 0x08]));
        assert!(!is_gzip(b"{}"));
        assert!(!is_gzip(&[0x1f]));
    }

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type_for("a/b/index.json"), Some("application/json"));
        assert_eq!(content_type_for("a/b/INDEX.JSON"), Some("application/json"));
        assert_eq!(content_type_for("a/b/blob"), None);
    }
}
