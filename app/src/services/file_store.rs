// storefront/src/services/file_store.rs

//! `KeyValueStore` backed by one JSON file per key under a data directory.
//! `cart/alice` lives at `<root>/cart/alice.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use checkout::KeyValueStore;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
  root: PathBuf,
}

fn encode_segment(segment: &str) -> String {
  let mut out = String::with_capacity(segment.len());
  for byte in segment.bytes() {
    match byte {
      b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'@' => out.push(byte as char),
      other => out.push_str(&format!("%{other:02X}")),
    }
  }
  out
}

impl JsonFileStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
    let segments: Vec<String> = key.split('/').filter(|s| !s.is_empty()).map(encode_segment).collect();
    let Some((file, dirs)) = segments.split_last() else {
      anyhow::bail!("empty storage key");
    };
    let mut path = self.root.clone();
    path.extend(dirs);
    path.push(format!("{file}.json"));
    Ok(path)
  }
}

impl KeyValueStore for JsonFileStore {
  fn load(&self, key: &str) -> anyhow::Result<Option<Value>> {
    let path = self.path_for(key)?;
    let raw = match fs::read_to_string(&path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    let value = serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(value))
  }

  /// Writes to a sibling temp file and renames it over the target, so a
  /// crash never leaves a half-written document behind.
  fn save(&self, key: &str, value: &Value) -> anyhow::Result<()> {
    let path = self.path_for(key)?;
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    let body = serde_json::to_vec_pretty(value).context("encoding document")?;
    fs::write(&tmp, body).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;
    debug!(%key, path = %path.display(), "Document saved.");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn missing_key_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    assert_eq!(store.load("cart/nobody").unwrap(), None);
  }

  #[test]
  fn saved_documents_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let doc = json!([{"id": 1, "title": "Lamp", "price": 1000, "image": "", "quantity": 1}]);

    store.save("cart/alice", &doc).unwrap();
    assert!(dir.path().join("cart").join("alice.json").exists());
    assert!(!dir.path().join("cart").join("alice.json.tmp").exists());

    let reopened = JsonFileStore::new(dir.path());
    assert_eq!(reopened.load("cart/alice").unwrap(), Some(doc));
  }

  #[test]
  fn keys_cannot_escape_the_root() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    store.save("orders/../../etc", &json!([])).unwrap();

    let path = store.path_for("orders/../../etc").unwrap();
    assert!(path.starts_with(dir.path()));
    assert_eq!(path.file_name().unwrap(), "etc.json");
    assert!(store.path_for("").is_err());
  }

  #[test]
  fn corrupt_documents_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("cart")).unwrap();
    std::fs::write(dir.path().join("cart").join("bob.json"), "{not json").unwrap();
    let store = JsonFileStore::new(dir.path());
    assert!(store.load("cart/bob").is_err());
  }
}
