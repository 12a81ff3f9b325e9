use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while setting up or feeding the viewer and the grid
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error("WebGPU is unavailable: {0}")]
    Gpu(String),

    #[error("DOM error: {0}")]
    Dom(String),
}

impl ViewerError {
    /// Wrap a JavaScript exception raised by a DOM call
    pub fn dom(value: impl Into<JsValue>) -> Self {
        ViewerError::Dom(js_message(&value.into()))
    }

    pub fn fetch(url: &str, value: JsValue) -> Self {
        ViewerError::Fetch {
            url: url.to_string(),
            message: js_message(&value),
        }
    }
}

impl From<ViewerError> for JsValue {
    fn from(err: ViewerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_error_message() {
        let err: ViewerError = serde_json::from_str::<crate::tour_types::TourData>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("invalid payload:"));
    }

    #[test]
    fn gpu_error_message() {
        let err = ViewerError::Gpu("no adapter".to_string());
        assert_eq!(err.to_string(), "WebGPU is unavailable: no adapter");
    }
}
