use std::time::Duration;

/// Base URL of the Telegram Bot API front-end.
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Pending marker: its presence anywhere in a round text overrides any
/// completion marker.
pub(crate) const PENDING_MARKER: char = '⏰';

/// Completion markers: a round result is final when one is present (and the
/// pending marker is not).
pub(crate) const FINAL_MARKERS: [char; 2] = ['✅', '🔰'];

/// Prefix of every outbound prediction message.
pub(crate) const PREDICTION_PREFIX: &str = "📲";

/// Ceiling on tracked round numbers before the rolling trim runs.
pub const PREDICTED_ROUNDS_CAP: usize = 500;

/// How many of the numerically smallest round numbers the trim removes.
pub const PREDICTED_ROUNDS_TRIM: usize = 250;

/// Ceiling on verification fingerprints before the set is dropped outright.
pub const VERIFIED_FINGERPRINTS_CAP: usize = 500;

/// Length of the text prefix in a verification fingerprint, in characters.
pub const FINGERPRINT_CHARS: usize = 80;

/// Interval between periodic full-state resets.
pub const PERIODIC_RESET_INTERVAL: Duration = Duration::from_secs(2 * 60 * 60);

/// Daily reset wall-clock time, in the feed's timezone.
pub(crate) const DAILY_RESET_HOUR: u32 = 0;
pub(crate) const DAILY_RESET_MINUTE: u32 = 59;

/// Fixed UTC offset of the feed's timezone (WAT, UTC+1), in hours.
pub(crate) const FEED_TZ_OFFSET_HOURS: i32 = 1;
