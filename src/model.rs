use crate::error::OpError;
use crate::image::RenderedLogo;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Resolved runtime configuration, built once from CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub user_agent: String,
    /// How long a shown error message stays visible.
    pub error_timeout: Duration,
    pub save_dir: PathBuf,
    pub auto_save: bool,
}

/// Style presets understood by the reference backend. The empty key means "no preset".
pub const STYLE_PRESETS: &[(&str, &str)] = &[
    ("", "No preset"),
    ("minimalist", "Minimalist"),
    ("modern", "Modern"),
    ("geometric", "Geometric"),
    ("vintage", "Vintage"),
    ("tech", "Tech"),
    ("corporate", "Corporate"),
    ("creative", "Creative"),
    ("elegant", "Elegant"),
];

/// Human label for a style key, falling back to the key itself for custom styles.
pub fn style_label(key: &str) -> &str {
    STYLE_PRESETS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or(key)
}

/// Opaque seed issued by the backend. Whatever JSON value arrives is echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(pub serde_json::Value);

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<i64> for Seed {
    fn from(v: i64) -> Self {
        Seed(serde_json::Value::from(v))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub company_name: String,
    pub style: String,
    pub custom_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineRequest {
    pub original_prompt: String,
    pub refinement: String,
    /// Serialized as `null` when no image has been generated since the last reset.
    pub seed: Option<Seed>,
}

/// Success body shared by `/generate` and `/refine`. Unknown fields (e.g. `success`) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResponse {
    pub prompt: String,
    pub seed: Seed,
    pub image: String,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// A backend call issued by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    Generate(GenerateRequest),
    Refine(RefineRequest),
}

impl ApiRequest {
    pub fn operation(&self) -> Operation {
        match self {
            ApiRequest::Generate(_) => Operation::Generate,
            ApiRequest::Refine(_) => Operation::Refine,
        }
    }
}

/// The two network-backed operations. Each one owns a trigger control in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Generate,
    Refine,
}

impl Operation {
    pub fn endpoint(self) -> &'static str {
        match self {
            Operation::Generate => "generate",
            Operation::Refine => "refine",
        }
    }

    /// Message shown when the backend fails without saying why.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Generate => "Logo generation failed",
            Operation::Refine => "Logo refinement failed",
        }
    }
}

/// A successful response with its image already decoded.
#[derive(Debug, Clone)]
pub struct Generation {
    pub prompt: String,
    pub seed: Seed,
    pub logo: RenderedLogo,
}

/// Events posted by the request controller back to the presentation layer.
#[derive(Debug)]
pub enum ControllerEvent {
    Settled {
        op: Operation,
        // Box to keep the event small; a Generation carries the decoded image.
        outcome: Result<Box<Generation>, OpError>,
    },
    ErrorTimerElapsed,
}
