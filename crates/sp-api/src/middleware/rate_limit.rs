//! Per-route rate limiting.
//!
//! The AI proxy endpoints each cost an upstream model call, so they get a
//! tight per-client budget. Keys are extracted from forwarding headers when
//! present, falling back to the peer address.

/// AI proxy: requests per second per client.
pub const AI_RATE_PER_SECOND: u64 = 2;
/// AI proxy: burst size per client.
pub const AI_BURST_SIZE: u32 = 5;

/// Build a `GovernorLayer` with the given rate and burst. A macro rather
/// than a function so call sites never have to spell out the layer's
/// generic parameters.
#[macro_export]
macro_rules! make_rate_limit_layer {
    ($per_second:expr, $burst:expr) => {{
        let config = tower_governor::governor::GovernorConfigBuilder::default()
            .key_extractor(tower_governor::key_extractor::SmartIpKeyExtractor)
            .per_second($per_second)
            .burst_size($burst)
            .use_headers()
            .finish()
            .expect("failed to build rate limiter configuration");
        tower_governor::GovernorLayer::new(config)
    }};
}
