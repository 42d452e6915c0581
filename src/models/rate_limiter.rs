use serde::{Deserialize, Serialize};

/// Defines an IO rate limiter with independent bytes/s and ops/s limits.
/// Limits are defined by configuring each of the _bandwidth_ and _ops_ token buckets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RateLimiter {
    /// Token bucket with bytes as tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<TokenBucket>,

    /// Token bucket with operations as tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops: Option<TokenBucket>,
}

impl RateLimiter {
    pub fn new(bandwidth: TokenBucket, ops: TokenBucket) -> Self {
        Self {
            bandwidth: Some(bandwidth),
            ops: Some(ops),
        }
    }
}

/// Defines a token bucket with a maximum capacity (size), an initial burst size
/// (one_time_burst) and an interval for refilling purposes (refill_time).
/// The refill-rate is derived from size and refill_time, and it is the constant
/// rate at which the tokens replenish. The refill process only starts happening after
/// the initial burst budget is consumed.
/// Consumption from the token bucket is unbounded in speed which allows for bursts
/// bound in size by the amount of tokens available.
/// Once the token bucket is empty, consumption speed is bound by the refill_rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TokenBucket {
    /// The initial size of a token bucket.
    /// Minimum: 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_time_burst: Option<u64>,

    /// The amount of milliseconds it takes for the bucket to refill.
    /// Required: true
    pub refill_time: u64,

    /// The total number of tokens this bucket can hold.
    /// Required: true
    pub size: u64,
}
