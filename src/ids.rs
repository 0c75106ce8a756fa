//! Record identifier generation.
//!
//! Identifiers are UUID v4 values drawn from the operating system's secure
//! random source. When that source reports an error, a clock-and-counter
//! identifier prefixed with `id-` is produced instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, SmallRng};
use rand::{Rng, RngCore, SeedableRng};
use tracing::warn;
use uuid::Uuid;

/// Prefix that marks identifiers produced by the fallback strategy.
pub const FALLBACK_PREFIX: &str = "id-";

const FALLBACK_SUFFIX_LEN: usize = 6;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns a new record identifier.
///
/// # Example
///
/// ```
/// use leave_ledger::ids::new_id;
///
/// let a = new_id();
/// let b = new_id();
/// assert_ne!(a, b);
/// ```
pub fn new_id() -> String {
    new_id_from(&mut OsRng)
}

/// Returns a new identifier using `rng` as the secure random source.
///
/// Falls back to [`fallback_id`] when `rng` fails to fill the UUID bytes.
pub fn new_id_from<R: RngCore + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    match rng.try_fill_bytes(&mut bytes) {
        Ok(()) => uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .hyphenated()
            .to_string(),
        Err(err) => {
            warn!(error = %err, "secure random source unavailable; using fallback identifier");
            fallback_id()
        }
    }
}

/// Builds an identifier from the clock, a process-wide counter and a
/// clock-seeded random suffix: `id-<millis>-<counter>-<suffix>`, base36.
pub fn fallback_id() -> String {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let counter = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    let seed = (elapsed.as_nanos() as u64) ^ counter.rotate_left(32);
    let mut rng = SmallRng::seed_from_u64(seed);
    let suffix: String = (0..FALLBACK_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!(
        "{}{}-{}-{}",
        FALLBACK_PREFIX,
        to_base36(elapsed.as_millis() as u64),
        to_base36(counter),
        suffix
    )
}

/// Returns true when `id` has the shape of a primary (UUID v4) identifier.
pub fn is_primary_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok_and(|uuid| uuid.get_version_num() == 4)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
