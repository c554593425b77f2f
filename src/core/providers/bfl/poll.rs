//! Poll loop for asynchronous BFL jobs
//!
//! Repeats status queries against a job handle until a terminal outcome.
//! Three budgets run independently and the first to trigger wins: the
//! call-level timeout on each poll request, the cumulative wall-clock
//! deadline, and the task-not-found retry bound.

use std::time::Instant;

use reqwest::StatusCode;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::core::providers::unified_provider::ProviderError;

use super::config::FluxConfig;
use super::provider::{PROVIDER, transport_error};
use super::types::{JobHandle, PollResponse, ReadyResult};

/// Poll until the job reaches a terminal state.
///
/// Iterations are strictly sequential; every response body is fully consumed
/// before the next request is issued. The deadline is checked once per
/// iteration before blocking on the next poll.
pub(crate) async fn poll_for_result(
    client: &reqwest::Client,
    config: &FluxConfig,
    api_key: &str,
    handle: JobHandle,
) -> Result<ReadyResult, ProviderError> {
    let url = config.poll_url(&handle)?;
    let policy = config.poll;
    let start = Instant::now();
    let mut not_found_count: u32 = 0;

    info!(url = %url, "FLUX polling started");

    loop {
        if start.elapsed() > policy.deadline {
            error!(elapsed_secs = start.elapsed().as_secs(), "FLUX polling timed out");
            return Err(ProviderError::poll_timeout(
                PROVIDER,
                start.elapsed().as_secs(),
            ));
        }

        let response = client
            .get(url.clone())
            .header("x-key", api_key)
            .header("Accept", config.endpoint.accept)
            .timeout(config.request_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let raw = response.text().await.map_err(transport_error)?;

        if status == StatusCode::OK {
            let payload: PollResponse = serde_json::from_str(&raw).map_err(|e| {
                ProviderError::response_parsing(PROVIDER, format!("Invalid poll response: {e}"))
            })?;

            match payload.status.as_str() {
                "Ready" => {
                    let result = payload.result.ok_or_else(|| {
                        ProviderError::response_parsing(
                            PROVIDER,
                            "Ready status without a result object",
                        )
                    })?;
                    let sample_url = result.sample.ok_or_else(|| {
                        ProviderError::response_parsing(
                            PROVIDER,
                            "Ready result without a sample URL",
                        )
                    })?;
                    return Ok(ReadyResult {
                        sample_url,
                        revised_prompt: result.prompt,
                    });
                }
                "Content Moderated" => {
                    warn!("FLUX request rejected by content moderation");
                    return Err(ProviderError::content_filtered(
                        PROVIDER,
                        "Request rejected by upstream content moderation",
                    ));
                }
                "Task not found" => {
                    task_not_found(&mut not_found_count, policy.max_not_found, None)?;
                    sleep(policy.interval).await;
                }
                "Pending" => {
                    info!("FLUX poll status: Pending, sleeping before retry");
                    sleep(policy.interval).await;
                }
                other => {
                    return Err(ProviderError::response_parsing(
                        PROVIDER,
                        format!("Unexpected poll status '{other}': {raw}"),
                    ));
                }
            }
        } else if status == StatusCode::ACCEPTED {
            // Not yet materialized upstream; costs no retry budget
            sleep(policy.interval).await;
        } else {
            // Some deployments report a vanished task as a non-200
            let vanished = serde_json::from_str::<PollResponse>(&raw)
                .map(|p| p.status == "Task not found")
                .unwrap_or(false);
            if vanished {
                task_not_found(&mut not_found_count, policy.max_not_found, Some(status))?;
                sleep(policy.interval).await;
                continue;
            }

            error!(status = status.as_u16(), body = %raw, "FLUX poll failed");
            return Err(ProviderError::api_error(
                PROVIDER,
                status.as_u16(),
                format!("Unexpected poll response: {raw}"),
            ));
        }
    }
}

/// Bump the dedicated not-found counter, failing terminally past the bound.
fn task_not_found(
    count: &mut u32,
    max: u32,
    http_status: Option<StatusCode>,
) -> Result<(), ProviderError> {
    *count += 1;
    if *count > max {
        error!(retries = max, "FLUX task not found, giving up");
        return Err(ProviderError::task_not_found(PROVIDER, max));
    }
    match http_status {
        Some(status) => info!(
            attempt = *count,
            max, status = status.as_u16(),
            "FLUX poll status: Task not found (non-200), sleeping before retry"
        ),
        None => info!(
            attempt = *count,
            max, "FLUX poll status: Task not found, sleeping before retry"
        ),
    }
    Ok(())
}
