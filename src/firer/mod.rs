//! Paced request dispatch.
//!
//! The firer mints one correlation id per iteration, records its start
//! timestamp, injects the id and the published reply URL into the templated
//! request, and spawns the POST as an independent task. The pacing sleep
//! gates the loop, not the in-flight requests, so overlapping requests are
//! expected when the target is slower than the pacing gap.


use std::sync::Arc;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::TestPlan;
use crate::error::{AppError, AppResult, FirerError};
use crate::locator::RootKind;
use crate::tracker::Tracker;

/// Dispatches exactly `plan.iterations` requests, evenly spaced over the
/// run duration, each as a fire-and-forget task in the returned join set.
///
/// The caller keeps the set so remaining tasks can be abandoned at
/// shutdown; losing a request is tolerated and surfaces as a timeout.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built or a configured
/// static header is invalid. Transport failures of individual requests are
/// logged, never returned.
pub async fn fire_requests(
    plan: &TestPlan,
    tracker: &Arc<Tracker>,
    reply_url: &str,
) -> AppResult<JoinSet<()>> {
    let client = Client::builder()
        .timeout(plan.timeout)
        .build()
        .map_err(|err| AppError::firer(FirerError::BuildClient { source: err }))?;

    let mut static_headers = build_static_headers(&plan.headers)?;

    // The reply destination is the same for every request; a header-rooted
    // injector can be applied once up front.
    if plan.reply_path_injector.root_kind() == RootKind::Header {
        insert_header(
            &mut static_headers,
            &plan.reply_path_injector.header_name(),
            reply_url,
        )?;
    }
    let correlation_header = match plan.correlation_injector.root_kind() {
        RootKind::Header => Some(parse_header_name(&plan.correlation_injector.header_name())?),
        RootKind::Body | RootKind::Unknown => None,
    };

    info!(
        iterations = plan.iterations,
        gap = ?plan.pacing_gap,
        target = %plan.target_url,
        "firing requests"
    );

    let mut in_flight = JoinSet::new();
    for iteration in 0..plan.iterations {
        let correlation_id = Uuid::new_v4().to_string();
        tracker.record_start(&correlation_id, Instant::now());

        let body = build_body(plan, &correlation_id, reply_url);
        let mut headers = static_headers.clone();
        if let Some(name) = correlation_header.as_ref() {
            match HeaderValue::from_str(&correlation_id) {
                Ok(value) => {
                    headers.insert(name.clone(), value);
                }
                Err(_invalid) => warn!(
                    correlation_id = %correlation_id,
                    "correlation id is not a valid header value; skipping header"
                ),
            }
        }

        let client = client.clone();
        let url = plan.target_url.clone();
        in_flight.spawn(async move {
            let result = client
                .post(url)
                .headers(headers)
                .json(&Value::Object(body))
                .send()
                .await;
            match result {
                // Non-2xx statuses are the target's business; the callback
                // decides whether the request completes.
                Ok(response) => debug!(
                    correlation_id = %correlation_id,
                    status = response.status().as_u16(),
                    "request dispatched"
                ),
                Err(err) => warn!(
                    correlation_id = %correlation_id,
                    error = %err,
                    "request failed; no callback will arrive for this id"
                ),
            }
        });

        if iteration.saturating_add(1) < plan.iterations {
            tokio::time::sleep(plan.pacing_gap).await;
        }
    }

    info!(fired = plan.iterations, "all requests dispatched");
    Ok(in_flight)
}

fn build_body(plan: &TestPlan, correlation_id: &str, reply_url: &str) -> Map<String, Value> {
    let mut body = plan.body_template.clone();
    if plan.correlation_injector.root_kind() == RootKind::Body {
        plan.correlation_injector
            .set(&mut body, Value::String(correlation_id.to_owned()));
    }
    if plan.reply_path_injector.root_kind() == RootKind::Body {
        plan.reply_path_injector
            .set(&mut body, Value::String(reply_url.to_owned()));
    }
    body
}

fn build_static_headers(
    headers: &std::collections::BTreeMap<String, String>,
) -> AppResult<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        insert_header(&mut map, name, value)?;
    }
    Ok(map)
}

fn insert_header(map: &mut HeaderMap, name: &str, value: &str) -> AppResult<()> {
    let header_name = parse_header_name(name)?;
    let header_value = HeaderValue::from_str(value).map_err(|_invalid| {
        AppError::firer(FirerError::InvalidHeaderValue {
            name: name.to_owned(),
        })
    })?;
    map.insert(header_name, header_value);
    Ok(())
}

fn parse_header_name(name: &str) -> AppResult<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_invalid| {
        AppError::firer(FirerError::InvalidHeaderName {
            name: name.to_owned(),
        })
    })
}
