//! Time-based zoom easing driven by the caller's frame clock.
//!
//! The animation is a plain state machine: the host schedules frames and
//! calls [`ZoomAnimation::value_at`] / [`ZoomAnimation::finished_at`] with its
//! own timestamp. Nothing here touches timers.

#[cfg(test)]
#[path = "animation_test.rs"]
mod animation_test;

/// Zoom animation state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ZoomAnimation {
    #[default]
    Idle,
    Animating {
        start_zoom: f64,
        target_zoom: f64,
        start_ms: f64,
        duration_ms: f64,
    },
}

impl ZoomAnimation {
    /// Begin easing from `start_zoom` to `target_zoom` at `now_ms`.
    ///
    /// A non-positive or non-finite duration produces an animation that is
    /// finished as soon as it is sampled.
    #[must_use]
    pub fn start(start_zoom: f64, target_zoom: f64, now_ms: f64, duration_ms: f64) -> Self {
        let duration_ms = if duration_ms.is_finite() && duration_ms > 0.0 { duration_ms } else { 0.0 };
        Self::Animating { start_zoom, target_zoom, start_ms: now_ms, duration_ms }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Animating { .. })
    }

    /// Target of the running animation.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        match self {
            Self::Idle => None,
            Self::Animating { target_zoom, .. } => Some(*target_zoom),
        }
    }

    /// Progress in `[0, 1]` at `now_ms`; `None` when idle.
    #[must_use]
    pub fn progress_at(&self, now_ms: f64) -> Option<f64> {
        match self {
            Self::Idle => None,
            Self::Animating { start_ms, duration_ms, .. } => {
                if *duration_ms <= 0.0 {
                    return Some(1.0);
                }
                let t = (now_ms - start_ms) / duration_ms;
                Some(if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 })
            }
        }
    }

    /// Interpolated zoom at `now_ms`; exactly the target once the duration has elapsed.
    #[must_use]
    pub fn value_at(&self, now_ms: f64) -> Option<f64> {
        let Self::Animating { start_zoom, target_zoom, .. } = *self else {
            return None;
        };
        let t = self.progress_at(now_ms)?;
        if t >= 1.0 {
            return Some(target_zoom);
        }
        let eased = ease_out_cubic(t);
        let z = start_zoom + (target_zoom - start_zoom) * eased;
        // Keep the intermediate value between the endpoints.
        let (lo, hi) = if start_zoom <= target_zoom { (start_zoom, target_zoom) } else { (target_zoom, start_zoom) };
        Some(z.clamp(lo, hi))
    }

    #[must_use]
    pub fn finished_at(&self, now_ms: f64) -> bool {
        self.progress_at(now_ms).is_none_or(|t| t >= 1.0)
    }
}

/// Monotone ease-out: fast start, gentle landing, `f(0) = 0`, `f(1) = 1`.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
