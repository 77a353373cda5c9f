use std::sync::Arc;

use bevy::tasks::BoxedFuture;

use crate::engine::assets::site_config::SiteConfig;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("i/o error probing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("request for {path} failed: {message}")]
    Request { path: String, message: String },
    #[error("unexpected status {status} probing {path}")]
    Status { path: String, status: u16 },
}

/// Lightweight existence check for a resource key. Must not fetch the payload.
pub trait ResourceProbe: Send + Sync + 'static {
    fn exists<'a>(&'a self, path: &'a str) -> BoxedFuture<'a, Result<bool, ProbeError>>;
}

/// Native probe: file metadata under the asset root.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileProbe {
    root: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileProbe {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ResourceProbe for FileProbe {
    fn exists<'a>(&'a self, path: &'a str) -> BoxedFuture<'a, Result<bool, ProbeError>> {
        Box::pin(async move {
            match std::fs::metadata(self.root.join(path)) {
                Ok(metadata) => Ok(metadata.is_file()),
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(source) => Err(ProbeError::Io {
                    path: path.to_string(),
                    source,
                }),
            }
        })
    }
}

/// Web probe: HTTP HEAD against the served asset folder.
#[cfg(target_arch = "wasm32")]
pub struct HttpProbe {
    base_url: String,
}

#[cfg(target_arch = "wasm32")]
impl HttpProbe {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ResourceProbe for HttpProbe {
    fn exists<'a>(&'a self, path: &'a str) -> BoxedFuture<'a, Result<bool, ProbeError>> {
        use wasm_bindgen::{JsCast, JsValue};
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Request, RequestInit, Response};

        Box::pin(async move {
            let request_error = |error: JsValue| ProbeError::Request {
                path: path.to_string(),
                message: format!("{:?}", error),
            };

            let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
            let init = RequestInit::new();
            init.set_method("HEAD");
            let request = Request::new_with_str_and_init(&url, &init).map_err(request_error)?;

            let window = web_sys::window().ok_or_else(|| ProbeError::Request {
                path: path.to_string(),
                message: "window object not available".to_string(),
            })?;
            let response = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(request_error)?;
            let response: Response = response.dyn_into().map_err(request_error)?;

            match response.status() {
                200..=299 => Ok(true),
                404 | 410 => Ok(false),
                status => Err(ProbeError::Status {
                    path: path.to_string(),
                    status,
                }),
            }
        })
    }
}

/// Probe matching the build target.
pub fn platform_probe(config: &SiteConfig) -> Arc<dyn ResourceProbe> {
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(HttpProbe::new(config.asset_root.clone()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // Resolve the same way Bevy's file reader does so probes and loads agree.
        let base = bevy::asset::io::file::FileAssetReader::get_base_path();
        Arc::new(FileProbe::new(base.join(&config.asset_root)))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use bevy::tasks::block_on;

    #[test]
    fn test_file_probe_reports_presence_without_error() {
        let root = std::env::temp_dir().join(format!("geo-vision-probe-{}", std::process::id()));
        std::fs::create_dir_all(root.join("site")).unwrap();
        std::fs::write(root.join("site/satellite.png"), b"png").unwrap();

        let probe = FileProbe::new(&root);
        assert!(block_on(probe.exists("site/satellite.png")).unwrap());
        assert!(!block_on(probe.exists("site/ore_body.glb")).unwrap());
        assert!(!block_on(probe.exists("site")).unwrap());

        std::fs::remove_dir_all(root).ok();
    }
}
