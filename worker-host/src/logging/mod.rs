use std::sync::OnceLock;

use opentelemetry::global;
use opentelemetry::trace::{TraceContextExt as _, TracerProvider as _};
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::SERVICE_VERSION;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt as _;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

pub fn get_current_activity_id() -> Option<String> {
    // Get the current `tracing` span
    let span = Span::current();

    // Get OpenTelemetry context from the tracing span
    let otel_ctx = span.context();
    let otel_span = otel_ctx.span();

    // Extract SpanContext which holds the trace_id
    let span_ctx = otel_span.span_context();

    if span_ctx.is_valid() {
        Some(span_ctx.trace_id().to_string())
    } else {
        None
    }
}

fn init_tracer(level: &str, otel_stdout: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // Span export is opt-in; it prints every iteration span to stdout
    let telemetry = otel_stdout.then(|| {
        let resource = Resource::builder()
            .with_service_name(env!("CARGO_PKG_NAME"))
            .with_attribute(KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")))
            .build();

        let sdk_provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .with_resource(resource)
            .build();

        let tracer = sdk_provider.tracer(env!("CARGO_PKG_NAME"));
        global::set_tracer_provider(sdk_provider.clone());
        let _ = TRACER_PROVIDER.set(sdk_provider);

        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    let result = Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
        )
        .with(telemetry)
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }
}

pub fn init(level: &str, otel_stdout: bool) {
    static INITIALIZED: OnceLock<()> = OnceLock::new();

    INITIALIZED.get_or_init(|| init_tracer(level, otel_stdout));
}

/// Flushes any spans still buffered in the OpenTelemetry pipeline.
pub fn shutdown() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Failed to shut down tracer provider: {}", e);
        }
    }
}
