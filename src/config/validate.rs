use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{Map, Value};
use url::Url;

use crate::error::{AppError, AppResult, ConfigError};
use crate::locator::{Locator, RootKind};

use super::types::{InputConfig, OutputConfig, OutputKind, ServerMode};

/// Fully validated run settings with all derived values resolved.
///
/// Building a plan is the fail-fast gate: every locator, URL, and numeric
/// bound is checked here, before any network activity.
#[derive(Debug, Clone)]
pub struct TestPlan {
    pub name: String,
    pub server: ServerMode,
    pub target_url: Url,
    pub body_template: Map<String, Value>,
    pub headers: BTreeMap<String, String>,
    pub correlation_injector: Locator,
    pub reply_path_injector: Locator,
    pub correlation_picker: Locator,
    pub timeout: Duration,
    pub iterations: u64,
    pub run_duration: Duration,
    /// Fixed delay between dispatches: duration * 1000 / iterations ms.
    pub pacing_gap: Duration,
    pub receiver_port: u16,
    pub outputs: Vec<OutputConfig>,
}

/// Validates a raw config and resolves it into a [`TestPlan`].
///
/// # Errors
///
/// Returns a [`ConfigError`] for unknown locator roots, a picker not rooted
/// at the body, an unparseable target URL, a non-object body template,
/// zero iterations or duration, or a text output without a path.
pub fn validate_config(config: &InputConfig) -> AppResult<TestPlan> {
    let correlation_injector = checked_locator(
        "injectors.correlationIdInjector",
        &config.test.injectors.correlation_id_injector.path,
    )?;
    let reply_path_injector = checked_locator(
        "injectors.replyPathInjector",
        &config.test.injectors.reply_path_injector.path,
    )?;
    let correlation_picker = checked_locator(
        "pickers.correlationPicker",
        &config.test.pickers.correlation_picker.path,
    )?;
    if correlation_picker.root_kind() != RootKind::Body {
        return Err(AppError::config(ConfigError::PickerMustTargetBody {
            path: config.test.pickers.correlation_picker.path.clone(),
        }));
    }

    let target_url = Url::parse(&config.test.url).map_err(|err| {
        AppError::config(ConfigError::InvalidUrl {
            url: config.test.url.clone(),
            source: err,
        })
    })?;

    let body_template = parse_body_template(&config.test.body)?;

    if config.run.iterations == 0 {
        return Err(AppError::config(ConfigError::IterationsMustBePositive));
    }
    if config.run.duration_seconds == 0 {
        return Err(AppError::config(ConfigError::DurationMustBePositive));
    }

    let mut outputs = config.outputs.clone();
    if outputs.is_empty() {
        outputs.push(OutputConfig::default());
    }
    for output in &outputs {
        if output.kind == OutputKind::Text && output.path.is_none() {
            return Err(AppError::config(ConfigError::TextOutputMissingPath));
        }
    }

    // Absent or zero timeout falls back to the documented default.
    let timeout_secs = match config.test.timeout {
        None | Some(0) => super::DEFAULT_TIMEOUT_SECS,
        Some(secs) => secs,
    };

    let gap_ms = config
        .run
        .duration_seconds
        .saturating_mul(1000)
        .checked_div(config.run.iterations)
        .unwrap_or(0);

    Ok(TestPlan {
        name: config.test.name.clone(),
        server: config.server,
        target_url,
        body_template,
        headers: config.test.headers.clone(),
        correlation_injector,
        reply_path_injector,
        correlation_picker,
        timeout: Duration::from_secs(timeout_secs),
        iterations: config.run.iterations,
        run_duration: Duration::from_secs(config.run.duration_seconds),
        pacing_gap: Duration::from_millis(gap_ms),
        receiver_port: config.receiver.port,
        outputs,
    })
}

fn checked_locator(field: &'static str, path: &str) -> AppResult<Locator> {
    let locator = Locator::parse(path);
    if locator.root_kind() == RootKind::Unknown {
        return Err(AppError::config(ConfigError::UnknownLocatorRoot {
            field,
            path: path.to_owned(),
        }));
    }
    if locator.key_path().is_empty() {
        return Err(AppError::config(ConfigError::EmptyLocatorKeys {
            path: path.to_owned(),
        }));
    }
    Ok(locator)
}

fn parse_body_template(body: &str) -> AppResult<Map<String, Value>> {
    let template = if body.trim().is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_str(body).map_err(|err| {
            AppError::config(ConfigError::BodyTemplateNotJson { source: err })
        })?
    };
    match template {
        Value::Object(map) => Ok(map),
        Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Array(_) => Err(AppError::config(ConfigError::BodyTemplateNotObject)),
    }
}
