//! Interleaved advancement of one job's pipelines.
//!
//! The input container is opened once and its packets are fanned out
//! to the stream pipelines by index. Streams advance together in
//! half-second bursts of media time: within a burst the scheduler keeps
//! reading until every live pipeline has produced output past the burst
//! limit, so neither decoder nor resampler ever buffers more than about
//! half a second ahead of the other stream. Between bursts it checks
//! the cancel token, reports progress once, and yields briefly.

use crate::cancel::CancelToken;
use crate::stream::{AudioPipeline, VideoPipeline};
use recode_core::{Error, Packet, Result};
use recode_codec::{Reader, Writer};
use std::time::Duration;
use tracing::{debug, info, trace};

/// Media seconds each burst advances the job by.
pub const BURST_SECONDS: f64 = 0.5;

/// Pause between bursts to smooth CPU use across parallel jobs.
const INTER_BURST_PAUSE: Duration = Duration::from_millis(5);

/// Drives all pipelines of one job to completion.
pub struct InterleaveScheduler {
    video: Option<VideoPipeline>,
    audio: Option<AudioPipeline>,
    video_input_done: bool,
    audio_input_done: bool,
    bursts: u64,
}

impl InterleaveScheduler {
    /// At least one pipeline must be present.
    pub fn new(video: Option<VideoPipeline>, audio: Option<AudioPipeline>) -> Self {
        let video_input_done = video.is_none();
        let audio_input_done = audio.is_none();
        Self {
            video,
            audio,
            video_input_done,
            audio_input_done,
            bursts: 0,
        }
    }

    /// Weighted completion across streams, held inside `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let video = self.video.as_ref().map(|v| v.progress()).unwrap_or(0.0);
        let audio = self.audio.as_ref().map(|a| a.progress()).unwrap_or(0.0);
        video.max(audio).min(1.0)
    }

    pub fn bursts(&self) -> u64 {
        self.bursts
    }

    /// Run to completion. `on_burst` fires at most once per burst with
    /// the current progress. Returns `Error::Cancelled` as soon as the
    /// token is observed set; the caller still closes the writer.
    pub fn run(
        &mut self,
        reader: &mut dyn Reader,
        writer: &mut dyn Writer,
        cancel: &CancelToken,
        mut on_burst: impl FnMut(f64),
    ) -> Result<()> {
        let mut limit = 0.0;
        loop {
            limit += BURST_SECONDS;
            let exhausted = self.advance_until(limit, reader, writer)?;
            self.bursts += 1;

            if cancel.is_cancelled() {
                info!(bursts = self.bursts, "cancel observed between bursts");
                return Err(Error::Cancelled);
            }
            on_burst(self.progress());

            if exhausted {
                break;
            }
            std::thread::sleep(INTER_BURST_PAUSE);
        }

        debug!(bursts = self.bursts, "input exhausted, flushing pipelines");
        self.flush_all(writer, cancel)?;
        info!(bursts = self.bursts, "scheduler finished");
        Ok(())
    }

    /// Read and route packets until every live pipeline has passed
    /// `limit` seconds of produced media, or input ends. Returns true
    /// once no pipeline will accept further input.
    fn advance_until(
        &mut self,
        limit: f64,
        reader: &mut dyn Reader,
        writer: &mut dyn Writer,
    ) -> Result<bool> {
        loop {
            let video_wants = !self.video_input_done
                && self
                    .video
                    .as_ref()
                    .is_some_and(|v| v.media_time() <= limit);
            let audio_wants = !self.audio_input_done
                && self
                    .audio
                    .as_ref()
                    .is_some_and(|a| a.media_time() <= limit);

            if !video_wants && !audio_wants {
                return Ok(self.video_input_done && self.audio_input_done);
            }

            match reader.read_packet()? {
                Some(packet) => self.route_packet(packet, writer)?,
                None => {
                    debug!("input container reached end of stream");
                    self.video_input_done = true;
                    self.audio_input_done = true;
                    return Ok(true);
                }
            }
        }
    }

    /// Hand a packet to the pipeline that owns its stream and mux
    /// whatever comes out the far end.
    fn route_packet(&mut self, packet: Packet, writer: &mut dyn Writer) -> Result<()> {
        if let Some(video) = self.video.as_mut() {
            if !self.video_input_done && packet.stream_index == video.input_index() {
                let ready = video.push_packet(&packet)?;
                write_all(writer, ready)?;
                if video.grid_complete() {
                    debug!("video output grid complete, ignoring further video input");
                    self.video_input_done = true;
                }
                return Ok(());
            }
        }
        if let Some(audio) = self.audio.as_mut() {
            if !self.audio_input_done && packet.stream_index == audio.input_index() {
                let ready = audio.push_packet(&packet)?;
                write_all(writer, ready)?;
                return Ok(());
            }
        }
        trace!(
            stream_index = packet.stream_index,
            "dropping packet for unmapped stream"
        );
        Ok(())
    }

    /// The end-of-stream protocol: drain decoder, resampler and encoder
    /// of each pipeline in order, checking for cancellation between
    /// steps.
    fn flush_all(&mut self, writer: &mut dyn Writer, cancel: &CancelToken) -> Result<()> {
        if let Some(video) = self.video.as_mut() {
            loop {
                if cancel.is_cancelled() {
                    return Err(Error::Cancelled);
                }
                match video.flush_step()? {
                    Some(ready) => write_all(writer, ready)?,
                    None => break,
                }
            }
        }
        if let Some(audio) = self.audio.as_mut() {
            loop {
                if cancel.is_cancelled() {
                    return Err(Error::Cancelled);
                }
                match audio.flush_step()? {
                    Some(ready) => write_all(writer, ready)?,
                    None => break,
                }
            }
        }
        Ok(())
    }
}

fn write_all(writer: &mut dyn Writer, packets: Vec<Packet>) -> Result<()> {
    for packet in packets {
        writer.write_packet(packet)?;
    }
    Ok(())
}
