/// Initializes the tracing/logging infrastructure for the demo binary.
///
/// The library itself only emits events; installing a subscriber is left to
/// the application.
///
/// # Environment Variables
///
/// Set `RUST_LOG` to control log verbosity:
/// - `RUST_LOG=info` - Saves, creations and deletions
/// - `RUST_LOG=debug` - Every domain operation with its span
/// - `RUST_LOG=trace` - Individual backend writes as well
/// - `RUST_LOG=ntt::storage=trace` - Backend detail only
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
