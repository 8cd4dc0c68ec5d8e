use std::fmt;
use thiserror::Error;

/// Smallest interval width used as a denominator; keeps a zero-width phase
/// from dividing by zero.
pub const MIN_SPAN: f32 = 1e-6;

const BOUNDARY_TOLERANCE: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Centre particles gather, halo grows.
    Initial,
    /// Particles fly outwards, data streams appear.
    Expansion,
    /// Charts form and the story line runs.
    Charts,
    FadeOut,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initial => "initial",
            Phase::Expansion => "expansion",
            Phase::Charts => "charts",
            Phase::FadeOut => "fade-out",
        };
        f.write_str(name)
    }
}

/// Half-open interval `[start, end)` of normalized animation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpan {
    pub phase: Phase,
    pub start: f32,
    pub end: f32,
}

impl PhaseSpan {
    pub const fn new(phase: Phase, start: f32, end: f32) -> Self {
        Self { phase, start, end }
    }

    /// Progress within this span, clamped to `[0, 1]`.
    pub fn progress(&self, overall: f32) -> f32 {
        let width = (self.end - self.start).max(MIN_SPAN);
        ((overall - self.start) / width).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PhaseError {
    #[error("phase table is empty")]
    Empty,
    #[error("phase table must start at 0, starts at {0}")]
    BadStart(f32),
    #[error("phase table must end at 1, ends at {0}")]
    BadEnd(f32),
    #[error("{phase} starts at {start} but the previous phase ends at {previous_end}")]
    NotContiguous {
        phase: Phase,
        start: f32,
        previous_end: f32,
    },
    #[error("{phase} has a negative span [{start}, {end})")]
    Reversed { phase: Phase, start: f32, end: f32 },
}

/// Ordered, contiguous partition of `[0, 1]` into phases.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTable {
    spans: Vec<PhaseSpan>,
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self {
            spans: vec![
                PhaseSpan::new(Phase::Initial, 0.0, 0.2),
                PhaseSpan::new(Phase::Expansion, 0.2, 0.5),
                PhaseSpan::new(Phase::Charts, 0.5, 0.9),
                PhaseSpan::new(Phase::FadeOut, 0.9, 1.0),
            ],
        }
    }
}

impl PhaseTable {
    pub fn new(spans: Vec<PhaseSpan>) -> Result<Self, PhaseError> {
        let first = spans.first().ok_or(PhaseError::Empty)?;
        if first.start.abs() > BOUNDARY_TOLERANCE {
            return Err(PhaseError::BadStart(first.start));
        }

        let mut previous_end = first.start;
        for span in &spans {
            if (span.start - previous_end).abs() > BOUNDARY_TOLERANCE {
                return Err(PhaseError::NotContiguous {
                    phase: span.phase,
                    start: span.start,
                    previous_end,
                });
            }
            if span.end < span.start {
                return Err(PhaseError::Reversed {
                    phase: span.phase,
                    start: span.start,
                    end: span.end,
                });
            }
            previous_end = span.end;
        }

        if (previous_end - 1.0).abs() > BOUNDARY_TOLERANCE {
            return Err(PhaseError::BadEnd(previous_end));
        }

        Ok(Self { spans })
    }

    /// Builds a table from the three boundaries between the four phases.
    pub fn from_boundaries(boundaries: [f32; 3]) -> Result<Self, PhaseError> {
        let [a, b, c] = boundaries;
        Self::new(vec![
            PhaseSpan::new(Phase::Initial, 0.0, a),
            PhaseSpan::new(Phase::Expansion, a, b),
            PhaseSpan::new(Phase::Charts, b, c),
            PhaseSpan::new(Phase::FadeOut, c, 1.0),
        ])
    }

    pub fn spans(&self) -> &[PhaseSpan] {
        &self.spans
    }

    /// First span whose end is strictly greater than `progress`, or the last
    /// span once progress has reached the end.
    pub fn select(&self, progress: f32) -> &PhaseSpan {
        self.spans
            .iter()
            .find(|span| span.end > progress)
            .unwrap_or_else(|| &self.spans[self.spans.len() - 1])
    }

    /// Active phase plus its intra-phase progress.
    pub fn resolve(&self, progress: f32) -> (Phase, f32) {
        let span = self.select(progress);
        (span.phase, span.progress(progress))
    }
}
