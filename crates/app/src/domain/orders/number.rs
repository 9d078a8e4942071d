//! Order numbers: `ORD-<last 8 digits of epoch millis>-<4 random digits>`.

use jiff::Timestamp;
use rand::Rng;

pub(crate) const ORDER_NUMBER_PREFIX: &str = "ORD";

/// Attempts made before giving up on a unique number.
pub(crate) const MAX_ORDER_NUMBER_ATTEMPTS: usize = 5;

pub(crate) fn generate_order_number<R: Rng + ?Sized>(now: Timestamp, rng: &mut R) -> String {
    let millis = now.as_millisecond().rem_euclid(100_000_000);
    let suffix: u16 = rng.gen_range(0..10_000);

    format!("{ORDER_NUMBER_PREFIX}-{millis:08}-{suffix:04}")
}
