use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct StoryStage {
    pub text: &'static str,
    /// Phase progress at which the stage becomes current.
    pub time: f32,
}

pub const STORY_STAGES: [StoryStage; 6] = [
    StoryStage { text: "Loading data...", time: 0.1 },
    StoryStage { text: "Starting multi-file analysis...", time: 0.25 },
    StoryStage { text: "Preparing AI analysis engine...", time: 0.4 },
    StoryStage { text: "Building sales trend model...", time: 0.55 },
    StoryStage { text: "Activating data detective mode...", time: 0.7 },
    StoryStage { text: "All analysis systems ready!", time: 0.85 },
];

/// Last stage whose time is at or before `progress`, `None` before the first.
pub fn current_stage(stages: &[StoryStage], progress: f32) -> Option<&StoryStage> {
    stages.iter().rev().find(|stage| progress >= stage.time)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greeting {
    Morning,
    Afternoon,
    Evening,
}

impl Greeting {
    pub fn for_hour(hour: u8) -> Self {
        match hour {
            5..=11 => Greeting::Morning,
            12..=17 => Greeting::Afternoon,
            _ => Greeting::Evening,
        }
    }

    pub fn now() -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self::for_hour(now.hour())
    }

    pub fn text(self) -> &'static str {
        match self {
            Greeting::Morning => "Good morning",
            Greeting::Afternoon => "Good afternoon",
            Greeting::Evening => "Good evening",
        }
    }
}
