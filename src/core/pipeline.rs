//! Scripted "processing" sequence
//!
//! Every step is a status message followed by a fixed sleep. Nothing is
//! fetched or converted; the result comes from [`synthesize`].

use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::core::events::EventSink;
use crate::core::synth::synthesize;
use crate::error::{Result, TikdlError};
use crate::types::{PipelineEvent, PipelineStep, QualityOption, ResultRecord, StepConfig};

/// Built-in steps: (message, delay in ms)
const DEFAULT_STEPS: [(&str, u64); 5] = [
    ("🔍 Checking URL...", 800),
    ("📱 Fetching video information...", 1000),
    ("🎬 Processing video...", 1200),
    ("🚫 Removing watermark...", 900),
    ("⬇️ Preparing download link...", 600),
];

/// Fixed, ordered list of steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<PipelineStep>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS
                .iter()
                .map(|(message, ms)| PipelineStep::new(*message, Duration::from_millis(*ms)))
                .collect(),
        }
    }
}

impl Pipeline {
    /// Custom step list. Must be non-empty, and every step must wait.
    pub fn new(steps: Vec<PipelineStep>) -> Result<Self> {
        if steps.is_empty() {
            return Err(TikdlError::InvalidConfig("pipeline needs at least one step".into()));
        }
        if let Some(step) = steps.iter().find(|s| s.delay.is_zero()) {
            return Err(TikdlError::InvalidConfig(format!(
                "step '{}' has a zero delay",
                step.message
            )));
        }
        Ok(Self { steps })
    }

    /// Pipeline from config, or the built-in one when the config has no steps
    pub fn from_config(steps: Option<&[StepConfig]>) -> Result<Self> {
        match steps {
            None => Ok(Self::default()),
            Some(steps) => Self::new(
                steps
                    .iter()
                    .map(|s| {
                        PipelineStep::new(s.message.clone(), Duration::from_millis(s.delay_ms))
                    })
                    .collect(),
            ),
        }
    }

    /// Same messages, every delay divided by `factor` (never below 1ms)
    pub fn scaled(&self, factor: u32) -> Self {
        let factor = factor.max(1);
        Self {
            steps: self
                .steps
                .iter()
                .map(|s| {
                    PipelineStep::new(
                        s.message.clone(),
                        (s.delay / factor).max(Duration::from_millis(1)),
                    )
                })
                .collect(),
        }
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.delay).sum()
    }

    /// Walk every step in order, then build the preview record.
    ///
    /// There is no cancellation: dropping the future stops observation, but a
    /// run that is polled to the end always visits every step.
    pub async fn run(
        &self,
        url: &str,
        quality: QualityOption,
        sink: &dyn EventSink,
    ) -> ResultRecord {
        let total = self.steps.len();

        for (index, step) in self.steps.iter().enumerate() {
            debug!(step = index + 1, total, message = %step.message, "pipeline step");
            sink.emit(PipelineEvent::Status {
                index,
                total,
                message: step.message.clone(),
            });
            sleep(step.delay).await;
        }

        synthesize(url, quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tokio::time::Instant;

    const URL: &str = "https://www.tiktok.com/@user1/video/1234567890123456789";

    #[test]
    fn test_default_pipeline() {
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.steps().len(), 5);
        assert_eq!(pipeline.total_duration(), Duration::from_millis(4500));
        assert!(pipeline.steps().iter().all(|s| !s.delay.is_zero()));
    }

    #[test]
    fn test_new_rejects_bad_steps() {
        assert!(matches!(Pipeline::new(vec![]), Err(TikdlError::InvalidConfig(_))));
        let zero = vec![PipelineStep::new("a", Duration::ZERO)];
        assert!(matches!(Pipeline::new(zero), Err(TikdlError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_config() {
        assert_eq!(Pipeline::from_config(None).unwrap(), Pipeline::default());
        let steps = vec![StepConfig {
            message: "one".into(),
            delay_ms: 5,
        }];
        let pipeline = Pipeline::from_config(Some(steps.as_slice())).unwrap();
        assert_eq!(pipeline.steps(), &[PipelineStep::new("one", Duration::from_millis(5))]);
    }

    #[test]
    fn test_scaled_keeps_delays_nonzero() {
        let pipeline = Pipeline::new(vec![
            PipelineStep::new("a", Duration::from_millis(1000)),
            PipelineStep::new("b", Duration::from_millis(3)),
        ])
        .unwrap();
        let fast = pipeline.scaled(10);
        assert_eq!(fast.steps()[0].delay, Duration::from_millis(100));
        assert_eq!(fast.steps()[1].delay, Duration::from_millis(1));
        assert_eq!(pipeline.scaled(0), pipeline);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_emits_steps_in_order() {
        let pipeline = Pipeline::default();
        let seen = RefCell::new(Vec::new());
        let sink = |event: PipelineEvent| seen.borrow_mut().push(event);

        let record = pipeline.run(URL, QualityOption::Mp3, &sink).await;

        let messages: Vec<String> = seen
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, event)| match event {
                PipelineEvent::Status { index, total, message } => {
                    assert_eq!(*index, i);
                    assert_eq!(*total, 5);
                    message.clone()
                }
                other => panic!("unexpected event: {:?}", other),
            })
            .collect();
        let expected: Vec<String> = DEFAULT_STEPS.iter().map(|(m, _)| m.to_string()).collect();
        assert_eq!(messages, expected);
        assert_eq!(record.quality_info, QualityOption::Mp3.info());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_between_steps() {
        let pipeline = Pipeline::default();
        let start = Instant::now();
        let stamps = RefCell::new(Vec::new());
        let sink = |_: PipelineEvent| stamps.borrow_mut().push(start.elapsed());

        pipeline.run(URL, QualityOption::Hd, &sink).await;

        let stamps = stamps.borrow();
        assert_eq!(stamps.len(), 5);
        for (stamp, expected_ms) in stamps.iter().zip([0u64, 800, 1800, 3000, 3900]) {
            let expected = Duration::from_millis(expected_ms);
            assert!(*stamp >= expected, "{:?} < {:?}", stamp, expected);
            assert!(*stamp < expected + Duration::from_millis(10));
        }
        assert!(start.elapsed() >= Duration::from_millis(4500));
    }
}
