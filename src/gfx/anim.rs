pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Maps `t` from the window `[from, from + span]` onto `[0, 1]`.
///
/// Used for the staggered "starts at 70% of the phase" style reveals.
pub fn stage(t: f32, from: f32, span: f32) -> f32 {
    ((t - from) / span.max(f32::EPSILON)).clamp(0.0, 1.0)
}

/// Wall-clock progress over a fixed duration.
///
/// The start timestamp is captured once; later updates never move the
/// clock backwards.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    pub start_time: f32,
    pub duration: f32,
    pub current_time: f32,
}

impl AnimationClock {
    pub fn new(duration: f32) -> Self {
        Self {
            start_time: 0.0,
            duration,
            current_time: 0.0,
        }
    }

    pub fn start(&mut self, now: f32) {
        self.start_time = now;
        self.current_time = now;
    }

    pub fn update(&mut self, now: f32) {
        self.current_time = self.current_time.max(now);
    }

    pub fn elapsed(&self) -> f32 {
        self.current_time - self.start_time
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed() / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }
}
