//! Prometheus metrics exposition
//!
//! The library crates emit their counters through `common::telemetry`:
//!
//! - `mal_api_requests_total` (counter): labels `endpoint`, `status`
//! - `mal_token_refresh_total` (counter): label `outcome`
//! - `mal_field_rejections_total` (counter): unlabelled
//!
//! A one-shot CLI has no scrape endpoint, so `--print-metrics` renders the
//! text exposition to stderr before exit.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Write the current exposition text to stderr.
pub fn print(handle: &PrometheusHandle) {
    eprint!("{}", handle.render());
}

#[cfg(test)]
mod tests {
    use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

    /// Isolated recorder/handle pair. Only one global recorder can exist per
    /// process and install_recorder() fails on a second call.
    fn isolated_recorder() -> (PrometheusRecorder, PrometheusHandle) {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        (recorder, handle)
    }

    #[test]
    fn library_counters_render_with_labels() {
        let (recorder, handle) = isolated_recorder();
        let _guard = metrics::set_default_local_recorder(&recorder);

        common::telemetry::record_request("anime_list", 200);
        common::telemetry::record_request("anime_list", 200);
        common::telemetry::record_refresh("success");
        common::telemetry::record_field_rejection();
        common::telemetry::record_field_rejection();

        let output = handle.render();
        assert!(output.contains("mal_api_requests_total"), "got:\n{output}");
        assert!(output.contains("endpoint=\"anime_list\""), "got:\n{output}");
        assert!(output.contains("status=\"200\""), "got:\n{output}");
        assert!(output.contains("mal_token_refresh_total{outcome=\"success\"} 1"), "got:\n{output}");
        assert!(output.contains("mal_field_rejections_total 2"), "got:\n{output}");
        assert!(!output.contains("field="), "rejections must not be labelled by name:\n{output}");
    }

    #[test]
    fn empty_recorder_renders_nothing() {
        let (_recorder, handle) = isolated_recorder();
        assert!(handle.render().trim().is_empty());
    }
}
