use std::path::Path;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::errors::{Result, StageError};

/// Reads a model file and the external buffers it references, relative to
/// the model's directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileAssetReader {
    root_path: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileAssetReader {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_dir() {
            path.to_path_buf()
        } else {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root_path.join(uri);
        Ok(tokio::fs::read(&path).await?)
    }
}

/// Browser fetch of a model URL.
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let js_err = |e: wasm_bindgen::JsValue| StageError::Web(format!("{e:?}"));

    let window = web_sys::window().ok_or_else(|| StageError::Web("no window".into()))?;
    let init = web_sys::RequestInit::new();
    init.set_method("GET");
    init.set_mode(web_sys::RequestMode::Cors);
    let request = web_sys::Request::new_with_str_and_init(url, &init).map_err(js_err)?;

    let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !response.ok() {
        return Err(StageError::Web(format!("HTTP {} for {url}", response.status())));
    }

    let buffer = JsFuture::from(response.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Decodes a `data:[<mime>];base64,<payload>` URI. Returns `None` if `uri`
/// is not a data URI.
pub fn decode_data_uri(uri: &str) -> Option<Result<Vec<u8>>> {
    let rest = uri.strip_prefix("data:")?;
    let Some((header, payload)) = rest.split_once(',') else {
        return Some(Err(StageError::Gltf("malformed data URI".into())));
    };
    if !header.ends_with(";base64") {
        return Some(Err(StageError::Gltf(format!(
            "unsupported data URI encoding '{header}'"
        ))));
    }
    Some(STANDARD.decode(payload).map_err(StageError::from))
}

/// Last path or URL segment of `source`, used as the model's display name.
#[must_use]
pub fn source_filename(source: &str) -> &str {
    if source.starts_with("http://") || source.starts_with("https://") {
        source
            .split(['?', '#'])
            .next()
            .and_then(|s| s.rsplit('/').next())
            .filter(|s| !s.is_empty())
            .unwrap_or(source)
    } else {
        Path::new(source)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(source)
    }
}
