//! One-time confirmation code generation.
//!
//! Codes are uniform random numeric strings, zero-padded to full width.
//! Width is a deployment choice (4 digit demo grade up to 9); the config
//! layer validates it, this module clamps as a backstop.

use rand::Rng;

/// Narrowest permitted OTP, demo grade.
pub const MIN_OTP_DIGITS: u8 = 4;
/// Widest permitted OTP (largest power of ten that fits `u32`).
pub const MAX_OTP_DIGITS: u8 = 9;
/// Default width when the deployment does not choose one.
pub const DEFAULT_OTP_DIGITS: u8 = 6;

/// Generate a random code of exactly `digits` decimal digits, zero-padded.
///
/// Out-of-range widths are clamped to the permitted window; callers are
/// expected to have validated first.
pub fn generate_otp(digits: u8) -> String {
    debug_assert!(
        (MIN_OTP_DIGITS..=MAX_OTP_DIGITS).contains(&digits),
        "otp width {digits} outside {MIN_OTP_DIGITS}..={MAX_OTP_DIGITS}"
    );
    let digits = digits.clamp(MIN_OTP_DIGITS, MAX_OTP_DIGITS);

    let span = 10u32.pow(u32::from(digits));
    let n = rand::thread_rng().gen_range(0..span);
    format!("{n:0width$}", width = usize::from(digits))
}
