#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    LocatingAnchor,
    ExtractingMeasurements,
    WritingReport,
    Done,
}

impl Stage {
    pub fn message(&self) -> &'static str {
        match self {
            Self::LocatingAnchor => "Reading AutoZ log",
            Self::ExtractingMeasurements => "Reading ALL log",
            Self::WritingReport => "Writing report",
            Self::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkerStatus {
    pub progress: f32,
    pub stage: Stage,
}

impl WorkerStatus {
    pub fn new(progress: f32, stage: Stage) -> Self {
        Self { progress, stage }
    }
}
