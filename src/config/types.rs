use std::collections::BTreeMap;

use serde::Deserialize;

/// Raw test configuration as decoded from a YAML or JSON file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub server: ServerMode,
    pub test: TestSection,
    pub run: RunSection,
    #[serde(default)]
    pub receiver: ReceiverSection,
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
}

/// How the receiver is exposed to the tested service.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    #[default]
    Local,
    Ngrok,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSection {
    #[serde(default)]
    pub name: String,
    pub url: String,
    /// JSON object template for the outbound request body.
    pub body: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub injectors: InjectorsSection,
    pub pickers: PickersSection,
    /// Wait budget in seconds; absent or zero falls back to the default.
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectorsSection {
    pub correlation_id_injector: LocatorConfig,
    pub reply_path_injector: LocatorConfig,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickersSection {
    pub correlation_picker: LocatorConfig,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LocatorConfig {
    pub path: String,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSection {
    pub iterations: u64,
    pub duration_seconds: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReceiverSection {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ReceiverSection {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

const fn default_port() -> u16 {
    super::DEFAULT_RECEIVER_PORT
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "type")]
    pub kind: OutputKind,
    pub path: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[default]
    Stdout,
    Text,
}
