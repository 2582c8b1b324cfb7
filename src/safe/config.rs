//! Retry and boundary configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How the delay grows between retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Backoff {
    /// Every retry waits `delay`.
    #[default]
    Constant,
    /// Retry `i` waits `delay * i`.
    Linear,
    /// Retry `i` waits `delay * 2^(i - 1)`.
    Exponential,
}

impl Backoff {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Backoff::Constant => "constant",
            Backoff::Linear => "linear",
            Backoff::Exponential => "exponential",
        }
    }
}

impl fmt::Display for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown backoff name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBackoffError {
    input: String,
}

impl fmt::Display for ParseBackoffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown backoff '{}' (expected constant, linear or exponential)",
            self.input
        )
    }
}

impl std::error::Error for ParseBackoffError {}

impl FromStr for Backoff {
    type Err = ParseBackoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "constant" => Ok(Backoff::Constant),
            "linear" => Ok(Backoff::Linear),
            "exponential" => Ok(Backoff::Exponential),
            _ => Err(ParseBackoffError {
                input: s.to_string(),
            }),
        }
    }
}

/// Retry schedule for the safe boundary.
///
/// A config is pure data: it describes how many extra attempts to make and how
/// long to wait before each one, and never runs anything itself.
///
/// `times` counts retries, not attempts: `times = 2` means at most three
/// invocations of the wrapped operation. Delays use saturating arithmetic and
/// carry no jitter.
///
/// # Examples
///
/// ```rust
/// use breakwater::{Backoff, RetryConfig};
/// use std::time::Duration;
///
/// let config = RetryConfig::exponential(Duration::from_millis(100)).with_times(3);
///
/// assert_eq!(config.backoff(), Backoff::Exponential);
/// assert_eq!(
///     config.delays().collect::<Vec<_>>(),
///     vec![
///         Duration::from_millis(100),
///         Duration::from_millis(200),
///         Duration::from_millis(400),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryConfig {
    times: u32,
    #[cfg_attr(feature = "serde", serde(rename = "delay_ms", with = "millis"))]
    delay: Duration,
    backoff: Backoff,
}

impl RetryConfig {
    /// No retries: the operation runs exactly once.
    pub fn none() -> Self {
        Self::default()
    }

    /// Constant delay between retries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use breakwater::RetryConfig;
    /// use std::time::Duration;
    ///
    /// let config = RetryConfig::constant(Duration::from_millis(500)).with_times(2);
    ///
    /// assert_eq!(config.delay_for_retry(1), Some(Duration::from_millis(500)));
    /// assert_eq!(config.delay_for_retry(2), Some(Duration::from_millis(500)));
    /// assert_eq!(config.delay_for_retry(3), None);
    /// ```
    pub fn constant(delay: Duration) -> Self {
        Self {
            times: 0,
            delay,
            backoff: Backoff::Constant,
        }
    }

    /// Linearly increasing delay: `delay`, `2 * delay`, `3 * delay`, ...
    pub fn linear(delay: Duration) -> Self {
        Self {
            times: 0,
            delay,
            backoff: Backoff::Linear,
        }
    }

    /// Doubling delay: `delay`, `2 * delay`, `4 * delay`, ...
    pub fn exponential(delay: Duration) -> Self {
        Self {
            times: 0,
            delay,
            backoff: Backoff::Exponential,
        }
    }

    /// Build from raw parts, with the base delay in milliseconds.
    pub fn from_millis(times: u32, delay_ms: u64, backoff: Backoff) -> Self {
        Self {
            times,
            delay: Duration::from_millis(delay_ms),
            backoff,
        }
    }

    /// Set the number of retries after the first attempt.
    pub fn with_times(mut self, times: u32) -> Self {
        self.times = times;
        self
    }

    /// Set the base delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the backoff strategy.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Number of retries after the first attempt.
    pub fn times(&self) -> u32 {
        self.times
    }

    /// Base delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Backoff strategy.
    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Upper bound on invocations of the wrapped operation.
    pub fn max_attempts(&self) -> u64 {
        u64::from(self.times) + 1
    }

    /// Delay before retry `retry` (1-indexed).
    ///
    /// Returns `None` for `retry == 0` and once `retry` exceeds `times`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use breakwater::RetryConfig;
    /// use std::time::Duration;
    ///
    /// let config = RetryConfig::linear(Duration::from_millis(100)).with_times(3);
    ///
    /// assert_eq!(config.delay_for_retry(0), None);
    /// assert_eq!(config.delay_for_retry(1), Some(Duration::from_millis(100)));
    /// assert_eq!(config.delay_for_retry(2), Some(Duration::from_millis(200)));
    /// assert_eq!(config.delay_for_retry(3), Some(Duration::from_millis(300)));
    /// assert_eq!(config.delay_for_retry(4), None);
    /// ```
    pub fn delay_for_retry(&self, retry: u32) -> Option<Duration> {
        if retry == 0 || retry > self.times {
            return None;
        }

        let delay = match self.backoff {
            Backoff::Constant => self.delay,
            Backoff::Linear => self.delay.saturating_mul(retry),
            Backoff::Exponential => doubled(self.delay, retry - 1),
        };

        Some(delay)
    }

    /// The full delay schedule, one entry per retry.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let config = *self;
        (1..=config.times).filter_map(move |retry| config.delay_for_retry(retry))
    }

    /// Sum of all delays, i.e. the minimum time spent backing off when every
    /// attempt fails.
    pub fn total_delay(&self) -> Duration {
        self.delays().fold(Duration::ZERO, Duration::saturating_add)
    }
}

/// `delay * 2^exponent`, clamped to `Duration::MAX`.
fn doubled(delay: Duration, exponent: u32) -> Duration {
    if delay.is_zero() {
        return Duration::ZERO;
    }

    let scaled = 1u128
        .checked_shl(exponent)
        .and_then(|factor| delay.as_nanos().checked_mul(factor));

    match scaled {
        Some(nanos) => {
            let secs = nanos / 1_000_000_000;
            let subsec = (nanos % 1_000_000_000) as u32;
            u64::try_from(secs)
                .map(|secs| Duration::new(secs, subsec))
                .unwrap_or(Duration::MAX)
        }
        None => Duration::MAX,
    }
}

#[cfg(feature = "serde")]
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Configuration for one call of the safe boundary.
///
/// Anything convertible into a `SafeConfig` can be passed where one is
/// expected, including a bare [`RetryConfig`].
///
/// ```rust
/// use breakwater::{RetryConfig, SafeConfig};
/// use std::time::Duration;
///
/// let retry = RetryConfig::constant(Duration::from_millis(10)).with_times(2);
///
/// assert_eq!(SafeConfig::default().retry(), None);
/// assert_eq!(SafeConfig::from(retry), SafeConfig::new().with_retry(retry));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SafeConfig {
    retry: Option<RetryConfig>,
}

impl SafeConfig {
    /// A config that runs the operation once.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retry according to `retry`.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// The configured retry schedule, if any.
    pub fn retry(&self) -> Option<RetryConfig> {
        self.retry
    }

    pub(crate) fn schedule(&self) -> RetryConfig {
        self.retry.unwrap_or_default()
    }
}

impl From<RetryConfig> for SafeConfig {
    fn from(retry: RetryConfig) -> Self {
        SafeConfig::new().with_retry(retry)
    }
}

/// An operation paired with a mapper for its terminal failure.
///
/// Used with [`safe_with`](crate::safe_with) and
/// [`safe_async_with`](crate::safe_async_with). `catch` receives the
/// [`Fault`](crate::Fault) of the last attempt and returns the error value
/// placed in the `Err` channel.
pub struct SafeOptions<T, C> {
    /// The fallible operation.
    pub try_: T,
    /// Maps the terminal failure into the error value.
    pub catch: C,
}

impl<T, C> SafeOptions<T, C> {
    /// Pair an operation with its failure mapper.
    pub fn new(try_: T, catch: C) -> Self {
        SafeOptions { try_, catch }
    }
}

impl<T, C> fmt::Debug for SafeOptions<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeOptions").finish_non_exhaustive()
    }
}
