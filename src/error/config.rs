use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML config '{path}': {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .yaml, .yml, or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have a .yaml, .yml, or .json extension.")]
    MissingExtension,
    #[error("Unknown locator root in {field} path '{path}'. Use body.<key> or headers.<name>.")]
    UnknownLocatorRoot { field: &'static str, path: String },
    #[error("Picker path '{path}' must be rooted at body.")]
    PickerMustTargetBody { path: String },
    #[error("Locator path '{path}' has no keys after its root.")]
    EmptyLocatorKeys { path: String },
    #[error("Invalid test.url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("test.body is not valid JSON: {source}")]
    BodyTemplateNotJson {
        #[source]
        source: serde_json::Error,
    },
    #[error("test.body must be a JSON object.")]
    BodyTemplateNotObject,
    #[error("run.iterations must be >= 1.")]
    IterationsMustBePositive,
    #[error("run.durationSeconds must be >= 1.")]
    DurationMustBePositive,
    #[error("Output type 'text' requires a path.")]
    TextOutputMissingPath,
    #[error("Failed to write starter config '{path}': {source}")]
    WriteTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config must be loaded and validated before the run starts.")]
    NotLoaded,
}
