//! Single-threaded driver for one transcoding job.

use crate::config::JobConfig;
use crate::resolver::JobConfigResolver;
use recode_core::{Error, JobError, Result};
use recode_codec::{AudioSpec, EncoderParams, MediaBackend, StreamKind};
use recode_pipeline::{
    AudioPipeline, CancelToken, InterleaveScheduler, TimestampMapper, VideoPipeline,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Listener half of the job's capability pair. The runner calls
/// exactly one terminal method per run; cancellations surface through
/// `on_fail` with the `Cancelled` kind.
pub trait ProgressSink: Send {
    /// At most once per scheduler burst, with progress in `[0, 1)`.
    /// A final call with exactly `1.0` precedes `on_success`.
    fn on_progress(&self, progress: f64);

    fn on_success(&self);

    fn on_fail(&self, error: &JobError);
}

/// Lifecycle of one job. Transitions are one-shot and monotone except
/// the explicit `Failed → Prepared` retry performed by the queue.
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Prepared,
    Running,
    Succeeded,
    Failed(JobError),
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Succeeded | JobState::Failed(_) | JobState::Cancelled
        )
    }
}

/// Progress stays strictly below 1.0 until the success event fires.
const PROGRESS_CEILING: f64 = 0.999;

/// Drives one input file through resolve → open → pipeline → close.
pub struct JobRunner {
    backend: Arc<dyn MediaBackend>,
    input: PathBuf,
    config: JobConfig,
}

impl JobRunner {
    pub fn new(backend: Arc<dyn MediaBackend>, input: impl Into<PathBuf>, config: JobConfig) -> Self {
        Self {
            backend,
            input: input.into(),
            config,
        }
    }

    pub fn input(&self) -> &PathBuf {
        &self.input
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Run the job to a terminal state, reporting through `sink`.
    pub fn run(&self, cancel: &CancelToken, sink: &dyn ProgressSink) -> JobState {
        info!(input = %self.input.display(), output = %self.config.output_path.display(), "job starting");
        match self.execute(cancel, sink) {
            Ok(()) => {
                sink.on_progress(1.0);
                sink.on_success();
                info!(input = %self.input.display(), "job succeeded");
                JobState::Succeeded
            }
            Err(err) if err.is_cancelled() => {
                let job_err = JobError::from(&err);
                sink.on_fail(&job_err);
                info!(input = %self.input.display(), "job cancelled");
                JobState::Cancelled
            }
            Err(err) => {
                let job_err = JobError::from(&err);
                sink.on_fail(&job_err);
                warn!(input = %self.input.display(), error = %err, "job failed");
                JobState::Failed(job_err)
            }
        }
    }

    fn execute(&self, cancel: &CancelToken, sink: &dyn ProgressSink) -> Result<()> {
        // The container is opened once; packets fan out to the
        // per-stream pipelines by index.
        let mut reader = self.backend.open_reader(&self.input)?;

        let video_desc = reader
            .best_stream(StreamKind::Video)
            .and_then(|i| reader.streams().iter().find(|s| s.index == i).cloned());
        let audio_desc = reader
            .best_stream(StreamKind::Audio)
            .and_then(|i| reader.streams().iter().find(|s| s.index == i).cloned());

        let resolver = JobConfigResolver::new(*self.backend.capabilities());
        let resolved = resolver.resolve(&self.config, video_desc.as_ref(), audio_desc.as_ref())?;

        let mut writer = self
            .backend
            .open_writer(&resolved.output_path, resolved.container)?;

        let video_pipeline = match (&resolved.video, &video_desc) {
            (Some(v), Some(desc)) => {
                let params = EncoderParams::video(
                    v.codec,
                    v.width,
                    v.height,
                    v.pixel_format,
                    v.fps,
                    v.crf,
                    resolved.encode_threads,
                );
                let (out_index, actual_tb) = writer.add_stream(&params, params.time_base())?;
                let decoder = self
                    .backend
                    .open_video_decoder(desc, resolved.decode_threads)?;
                let encoder = self.backend.open_video_encoder(&params)?;
                Some(VideoPipeline::new(
                    self.backend.clone(),
                    decoder,
                    encoder,
                    TimestampMapper::new(out_index, actual_tb),
                    desc.index,
                    v.width,
                    v.height,
                    v.pixel_format,
                    v.fps,
                    desc.duration_seconds,
                ))
            }
            _ => None,
        };

        let audio_pipeline = match (&resolved.audio, &audio_desc) {
            (Some(a), Some(desc)) => {
                let info = desc.audio.as_ref().ok_or_else(|| {
                    Error::ConfigInvalid("audio stream descriptor carries no audio info".into())
                })?;
                let params = EncoderParams::audio(
                    a.codec,
                    a.sample_rate,
                    a.sample_format,
                    a.channel_layout,
                );
                let (out_index, actual_tb) = writer.add_stream(&params, params.time_base())?;
                let decoder = self
                    .backend
                    .open_audio_decoder(desc, resolved.decode_threads)?;
                let encoder = self.backend.open_audio_encoder(&params)?;
                let resampler = self.backend.open_resampler(
                    AudioSpec::from(info),
                    AudioSpec::new(a.sample_rate, a.sample_format, a.channel_layout),
                )?;
                Some(AudioPipeline::new(
                    decoder,
                    resampler,
                    encoder,
                    TimestampMapper::new(out_index, actual_tb),
                    desc.index,
                    a.sample_rate,
                    desc.duration_seconds,
                ))
            }
            _ => None,
        };

        writer.write_header()?;

        let mut scheduler = InterleaveScheduler::new(video_pipeline, audio_pipeline);
        let run = scheduler.run(reader.as_mut(), writer.as_mut(), cancel, |progress| {
            sink.on_progress(progress.min(PROGRESS_CEILING));
        });

        // The header went out, so close the container whatever happened:
        // a partial file that parses beats a truncated one.
        match run {
            Ok(()) => writer.write_trailer(),
            Err(err) => {
                if let Err(trailer_err) = writer.write_trailer() {
                    warn!(error = %trailer_err, "trailer write failed after error");
                }
                Err(err)
            }
        }
    }
}
