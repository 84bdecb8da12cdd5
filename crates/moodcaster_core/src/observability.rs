//! Tracing subscriber and optional OpenTelemetry metrics initialization.

#[cfg(feature = "metrics")]
use opentelemetry::{KeyValue, global};
#[cfg(feature = "metrics")]
use opentelemetry_sdk::{
    Resource,
    metrics::{PeriodicReader, SdkMeterProvider},
};
#[cfg(feature = "metrics")]
use opentelemetry_stdout::MetricExporter as StdoutExporter;
#[cfg(feature = "metrics")]
use std::time::Duration;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. When `json` is
/// true events are emitted as JSON lines.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(json: bool) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let result = if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };
    result.map_err(|e| format!("Failed to install tracing subscriber: {}", e))
}

/// Initialize OpenTelemetry metrics with a stdout exporter.
///
/// When the `metrics` feature is disabled, this function returns `Ok(())` immediately.
#[instrument(skip_all, fields(service_name))]
pub fn init_observability(
    service_name: &'static str,
    export_interval_secs: u64,
) -> Result<(), String> {
    #[cfg(not(feature = "metrics"))]
    {
        let _ = export_interval_secs;
        info!(
            service_name = service_name,
            "Metrics feature disabled - skipping metrics initialization"
        );
        Ok(())
    }

    #[cfg(feature = "metrics")]
    {
        info!(
            service_name = service_name,
            export_interval_secs = export_interval_secs,
            "Initializing OpenTelemetry metrics"
        );

        let resource = Resource::builder_empty()
            .with_attributes([KeyValue::new("service.name", service_name)])
            .build();

        let reader = PeriodicReader::builder(StdoutExporter::default())
            .with_interval(Duration::from_secs(export_interval_secs))
            .build();

        let meter_provider = SdkMeterProvider::builder()
            .with_resource(resource)
            .with_reader(reader)
            .build();
        debug!("Built meter provider");

        global::set_meter_provider(meter_provider);
        info!(service_name = service_name, "Meter provider registered globally");
        Ok(())
    }
}

/// Shutdown metrics provider gracefully.
#[instrument]
pub fn shutdown_observability() {
    info!("Shutting down observability");
    // Meter provider shutdown happens on drop
    debug!("Observability shutdown complete");
}
