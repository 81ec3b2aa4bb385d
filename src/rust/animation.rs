use std::time::Duration;

use serde_json::Value;

/// Lottie animation shown above the form.
pub const DEFAULT_ANIMATION_URL: &str =
    "https://lottie.host/1f7a329e-10a1-4b1a-963a-2310b8307c22/Vv8jO9m2Ut.json";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches a Lottie animation as JSON.
///
/// Any failure (network error, non-200 status, body that is not JSON) yields
/// `None`; the page simply renders without the animation.
pub async fn fetch_animation(url: &str) -> Option<Value> {
    let client = match reqwest::Client::builder().timeout(FETCH_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            log::warn!("Could not create HTTP client for animation: {}", e);
            return None;
        }
    };

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            log::warn!("Animation request to {} failed: {}", url, e);
            return None;
        }
    };

    if response.status() != reqwest::StatusCode::OK {
        log::warn!("Animation request to {} returned {}", url, response.status());
        return None;
    }

    match response.json::<Value>().await {
        Ok(animation) => {
            log::info!("Animation loaded from {}", url);
            Some(animation)
        }
        Err(e) => {
            log::warn!("Animation from {} is not valid JSON: {}", url, e);
            None
        }
    }
}
