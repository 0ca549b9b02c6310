//! Run orchestration
//!
//! A [`Session`] holds what the page keeps between clicks: the selected
//! quality and the single in-flight [`RunState`]. It checks input, refuses a
//! second run while one is going, and always clears the run when it ends.
//!
//! State lives in `Cell`/`RefCell`; a session is driven from one task.

use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info, warn};

use crate::core::events::EventSink;
use crate::core::pipeline::Pipeline;
use crate::core::validator::{check_input, classify_url};
use crate::error::{Result, TikdlError};
use crate::types::{ErrorCategory, PipelineEvent, QualityOption, ResultRecord, RunState};

const FAILURE_MESSAGE: &str = "💥 Something went wrong while downloading. Please try again.";

/// Clears the current run when dropped, on every exit path.
struct RunGuard<'a> {
    slot: &'a RefCell<Option<RunState>>,
}

impl<'a> RunGuard<'a> {
    fn start(slot: &'a RefCell<Option<RunState>>, state: RunState) -> Self {
        *slot.borrow_mut() = Some(state);
        Self { slot }
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.slot.borrow_mut().take();
    }
}

pub struct Session {
    pipeline: Pipeline,
    quality: Cell<QualityOption>,
    current: RefCell<Option<RunState>>,
}

impl Session {
    pub fn new(pipeline: Pipeline, quality: QualityOption) -> Self {
        Self {
            pipeline,
            quality: Cell::new(quality),
            current: RefCell::new(None),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn quality(&self) -> QualityOption {
        self.quality.get()
    }

    /// Change the quality used by the next run. Returns the feedback label.
    pub fn select_quality(&self, quality: QualityOption) -> &'static str {
        debug!(quality = %quality, "quality selected");
        self.quality.set(quality);
        quality.selected_label()
    }

    pub fn is_processing(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Snapshot of the in-flight run, if any
    pub fn current_run(&self) -> Option<RunState> {
        self.current.borrow().clone()
    }

    /// Validate `raw` and run the pipeline with the selected quality.
    ///
    /// Returns `Ok(None)` without doing anything when a run is already in
    /// progress. Input problems are reported to `sink` as `Rejected` and
    /// returned as errors; no step runs in that case.
    pub async fn submit(&self, raw: &str, sink: &dyn EventSink) -> Result<Option<ResultRecord>> {
        if self.is_processing() {
            debug!("run already in progress, ignoring submit");
            return Ok(None);
        }

        let url = match check_input(raw) {
            Ok(url) => url,
            Err(err) => {
                let category = match err {
                    TikdlError::EmptyInput => ErrorCategory::EmptyInput,
                    _ => ErrorCategory::InvalidFormat,
                };
                warn!(?category, "input rejected");
                sink.emit(PipelineEvent::Rejected {
                    category,
                    message: err.to_string(),
                });
                return Err(err);
            }
        };

        let quality = self.quality.get();
        let _guard = RunGuard::start(
            &self.current,
            RunState {
                submitted_url: url.to_string(),
                quality,
                started_at: Utc::now(),
            },
        );
        info!(url, shape = ?classify_url(url), quality = %quality, "run started");

        let run = async {
            let record = self.pipeline.run(url, quality, sink).await;
            sink.emit(PipelineEvent::Completed(record.clone()));
            record
        };

        match AssertUnwindSafe(run).catch_unwind().await {
            Ok(record) => {
                let elapsed_ms = self.current_run().map(|run| run.elapsed().num_milliseconds());
                info!(video_id = %record.video_id, ?elapsed_ms, "run finished");
                Ok(Some(record))
            }
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                error!(detail = %detail, "run failed");
                sink.emit(PipelineEvent::Failed {
                    message: FAILURE_MESSAGE.into(),
                });
                Err(TikdlError::UnexpectedFailure(detail))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::NullSink;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};
    use tokio_test::{assert_err, assert_ok};

    const URL: &str = "https://www.tiktok.com/@user1/video/1234567890123456789";

    fn session() -> Session {
        Session::new(Pipeline::default(), QualityOption::Hd)
    }

    fn status_messages(events: &[PipelineEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::Status { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_never_starts() {
        let session = session();
        let events = RefCell::new(Vec::new());
        let sink = |e: PipelineEvent| events.borrow_mut().push(e);

        let err = assert_err!(session.submit("   ", &sink).await);
        assert!(matches!(err, TikdlError::EmptyInput));
        assert!(!session.is_processing());

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            PipelineEvent::Rejected {
                category: ErrorCategory::EmptyInput,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_input_never_starts() {
        let session = session();
        let events = RefCell::new(Vec::new());
        let sink = |e: PipelineEvent| events.borrow_mut().push(e);

        let err = assert_err!(session.submit("not a url", &sink).await);
        assert!(matches!(err, TikdlError::InvalidFormat));
        assert!(status_messages(&events.borrow()).is_empty());
        assert!(matches!(
            events.borrow()[0],
            PipelineEvent::Rejected {
                category: ErrorCategory::InvalidFormat,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_audio_only_run() {
        let session = session();
        assert_eq!(session.select_quality(QualityOption::Mp3), "🎵 Audio Only Selected");

        let events = RefCell::new(Vec::new());
        let sink = |e: PipelineEvent| events.borrow_mut().push(e);
        let record = assert_ok!(session.submit(URL, &sink).await).unwrap();

        assert_eq!(record.quality_info, QualityOption::Mp3.info());
        assert!(!session.is_processing());

        let events = events.borrow();
        let expected: Vec<String> = session
            .pipeline()
            .steps()
            .iter()
            .map(|s| s.message.clone())
            .collect();
        assert_eq!(status_messages(&events), expected);
        assert_eq!(events.last(), Some(&PipelineEvent::Completed(record)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_while_running_is_ignored() {
        let session = session();
        let events = RefCell::new(Vec::new());
        let sink = |e: PipelineEvent| events.borrow_mut().push(e);

        let (first, second) = tokio::join!(session.submit(URL, &sink), async {
            sleep(Duration::from_millis(100)).await;
            assert!(session.is_processing());
            let run = session.current_run().unwrap();
            assert_eq!(run.submitted_url, URL);
            assert_eq!(run.quality, QualityOption::Hd);
            let second = session.submit("https://vt.tiktok.com/ABC123xyz/", &sink).await;
            assert!(session.is_processing());
            second
        });

        assert!(assert_ok!(first).is_some());
        assert!(assert_ok!(second).is_none());
        assert!(!session.is_processing());
        assert!(session.current_run().is_none());

        let events = events.borrow();
        assert_eq!(status_messages(&events).len(), 5);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, PipelineEvent::Completed(_)))
                .count(),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_quality_change_mid_run_applies_to_next_run() {
        let session = session();

        let (first, _) = tokio::join!(session.submit(URL, &NullSink), async {
            sleep(Duration::from_millis(100)).await;
            session.select_quality(QualityOption::Sd);
        });
        assert_eq!(first.unwrap().unwrap().quality, QualityOption::Hd);

        let second = session.submit(URL, &NullSink).await.unwrap().unwrap();
        assert_eq!(second.quality, QualityOption::Sd);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_sink_is_contained() {
        let session = session();
        let failed = Cell::new(false);
        let sink = |e: PipelineEvent| match e {
            PipelineEvent::Status { index: 2, .. } => panic!("renderer exploded"),
            PipelineEvent::Failed { .. } => failed.set(true),
            _ => {}
        };

        let err = assert_err!(session.submit(URL, &sink).await);
        match err {
            TikdlError::UnexpectedFailure(detail) => assert_eq!(detail, "renderer exploded"),
            other => panic!("expected UnexpectedFailure, got {:?}", other),
        }
        assert!(failed.get());
        assert!(!session.is_processing());

        assert_ok!(session.submit(URL, &NullSink).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_run_clears_state() {
        let session = session();

        let result = timeout(Duration::from_millis(100), session.submit(URL, &NullSink)).await;
        assert!(result.is_err());
        assert!(!session.is_processing());

        assert!(assert_ok!(session.submit(URL, &NullSink).await).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_channel_sink_receives_events_in_order() {
        let session = session();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let record = session.submit(URL, &tx).await.unwrap().unwrap();
        drop(tx);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(events.len(), 6);
        for (i, event) in events[..5].iter().enumerate() {
            assert!(matches!(event, PipelineEvent::Status { index, .. } if *index == i));
        }
        assert_eq!(events[5], PipelineEvent::Completed(record));
    }
}
