//! OpenTelemetry instruments for the generation endpoint.
//!
//! Available with the `metrics` feature.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use tracing::debug;

/// Counters and latency histogram for `POST /api/generate`.
#[derive(Clone)]
pub struct GenerationMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Requests that produced a 200 response
    pub generations: Counter<u64>,
    /// Responses served from fallback templates
    pub fallbacks: Counter<u64>,
    /// Requests rejected with an error status
    pub rejections: Counter<u64>,
    /// Time spent producing a response, in seconds
    pub duration: Histogram<f64>,
}

impl GenerationMetrics {
    /// Create new generation metrics.
    pub fn new() -> Self {
        debug!("Getting global meter for moodcaster_generation");
        let meter = global::meter("moodcaster_generation");

        Self {
            _meter: meter.clone(),
            generations: meter
                .u64_counter("generation.requests")
                .with_description("Successful generation responses")
                .build(),
            fallbacks: meter
                .u64_counter("generation.fallbacks")
                .with_description("Responses served from fallback templates")
                .build(),
            rejections: meter
                .u64_counter("generation.rejections")
                .with_description("Requests rejected with an error status")
                .build(),
            duration: meter
                .f64_histogram("generation.duration")
                .with_unit("seconds")
                .with_description("Generation latency")
                .build(),
        }
    }

    /// Record a served response.
    pub fn record_served(&self, category: &str, fallback: bool, duration_secs: f64) {
        let labels = &[
            KeyValue::new("category", category.to_string()),
            KeyValue::new("fallback", fallback),
        ];
        self.generations.add(1, labels);
        if fallback {
            self.fallbacks.add(1, labels);
        }
        self.duration.record(duration_secs, labels);
    }

    /// Record a rejected request.
    pub fn record_rejection(&self, status: u16) {
        self.rejections
            .add(1, &[KeyValue::new("status", i64::from(status))]);
    }
}

impl Default for GenerationMetrics {
    fn default() -> Self {
        Self::new()
    }
}
