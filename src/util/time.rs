use failure::{bail, Error};
use std::time::Duration;

/// Highest frame rate the stimulus display (an SLM) can follow.
pub const MAX_FPS: f64 = 60.0;

/// Longest wait accepted for a timeout, one day.
pub const MAX_TIMEOUT_SECS: f64 = 86_400.0;

/// Converts seconds specified as a float to a duration.
///
/// Accuracy is microseconds, anything below is truncated. Negative,
/// `NaN`, infinite and values too large for a `Duration` are errors.
pub fn to_duration(secs: f64) -> Result<Duration, Error> {
    if !secs.is_finite() {
        bail!(
            "Duration must be a finite, non-NaN number, instead got: {}",
            secs
        )
    } else if secs < 0.0 {
        bail!("Duration may not be negative: {}", secs)
    } else if secs.trunc() > std::u64::MAX as f64 {
        bail!("Duration is too high, numeric overflow: {}", secs)
    }

    let whole = secs.trunc();
    // always below one million, cannot overflow
    let micros = ((secs - whole) * 1_000_000.0) as u32;

    Ok(Duration::new(whole as u64, micros * 1_000))
}

/// Like `to_duration`, but also rejects waits longer than
/// `MAX_TIMEOUT_SECS`, so a deadline computed from now cannot overflow.
pub fn to_timeout(secs: f64) -> Result<Duration, Error> {
    let timeout = to_duration(secs)?;
    if secs > MAX_TIMEOUT_SECS {
        bail!(
            "Timeout of {} seconds exceeds the maximum of {} seconds",
            secs,
            MAX_TIMEOUT_SECS
        )
    }

    Ok(timeout)
}

/// Tick period for the given frame rate, rounded up to whole
/// milliseconds so the display is never driven faster than requested.
pub fn period_for_fps(fps: f64) -> Result<Duration, Error> {
    if !fps.is_finite() || fps <= 0.0 {
        bail!("Frame rate must be a positive number, instead got: {}", fps)
    } else if fps > MAX_FPS {
        bail!(
            "Frame rate {} exceeds the maximum of {} the display supports",
            fps,
            MAX_FPS
        )
    }

    Ok(Duration::from_millis((1000.0 / fps).ceil() as u64))
}
