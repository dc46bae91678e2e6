use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Applied,
    Skipped(String),
}

#[derive(Debug, Clone)]
pub struct StageTiming {
    pub name: &'static str,
    pub duration: Duration,
    pub outcome: StageOutcome,
}

/// Per-stage record of one pipeline run, in execution order.
#[derive(Debug, Default)]
pub struct RunTimings {
    stages: Vec<StageTiming>,
    stage_map: HashMap<&'static str, Duration>,
}

impl RunTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stage(&mut self, name: &'static str, duration: Duration, outcome: StageOutcome) {
        self.stages.push(StageTiming {
            name,
            duration,
            outcome,
        });
        *self.stage_map.entry(name).or_insert(Duration::ZERO) += duration;
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    pub fn get_stage(&self, name: &str) -> Option<Duration> {
        self.stage_map.get(name).copied()
    }

    pub fn stages(&self) -> &[StageTiming] {
        &self.stages
    }

    pub fn applied(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages
            .iter()
            .filter(|s| s.outcome == StageOutcome::Applied)
            .map(|s| s.name)
    }

    pub fn summary(&self) -> String {
        let total = self.total_duration();
        let mut out = String::new();
        let _ = writeln!(out, "Effect pipeline timing summary:");
        let _ = writeln!(out, "{:-<60}", "");
        for stage in &self.stages {
            let percentage = if total.as_secs_f64() > 0.0 {
                (stage.duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            let marker = match &stage.outcome {
                StageOutcome::Applied => "",
                StageOutcome::Skipped(_) => " (skipped)",
            };
            let _ = writeln!(
                out,
                "{:<30} {:>12.3}ms ({:>5.1}%){}",
                stage.name,
                stage.duration.as_secs_f64() * 1000.0,
                percentage,
                marker
            );
        }
        let _ = writeln!(out, "{:-<60}", "");
        let _ = write!(out, "{:<30} {:>12.3}ms", "Total", total.as_secs_f64() * 1000.0);
        out
    }
}

pub struct Timer {
    start: Instant,
    name: &'static str,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    pub fn stop(self) -> (&'static str, Duration) {
        (self.name, self.start.elapsed())
    }
}
