//! Synthetic media backend for job-level tests.
//!
//! One backend instance describes one input file: a 30 fps H.264-like
//! video stream and a 48 kHz stereo audio stream (either can be turned
//! off). Decoders map packets to frames one-to-one, the resampler
//! converts by sample counting, and writers record every packet into a
//! shared registry the tests inspect after the run.

use recode_core::{
    AudioCodec, ChannelLayout, ContainerFormat, Frame, Packet, PixelFormat, Result, Sample,
    SampleFormat, TimeBase, Timestamp, VideoCodec,
};
use recode_codec::{
    AudioDecoder, AudioEncoder, AudioSpec, CapabilityTable, CodecPoll, EncoderParams,
    MediaBackend, Reader, Resampler, StreamDescriptor, StreamKind, VideoDecoder, VideoEncoder,
    Writer,
};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const VIDEO_STREAM: usize = 0;
pub const AUDIO_STREAM: usize = 1;
pub const AUDIO_BLOCK: usize = 1024;
pub const IN_SAMPLE_RATE: u32 = 48000;

/// Shape of the synthetic input file every reader of a backend sees.
#[derive(Debug, Clone)]
pub struct InputSpec {
    pub duration: f64,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub has_video: bool,
    pub has_audio: bool,
    /// Artificial per-packet read latency, to stretch job runtime.
    pub read_delay: Option<Duration>,
}

impl Default for InputSpec {
    fn default() -> Self {
        Self {
            duration: 10.0,
            fps: 30.0,
            width: 1920,
            height: 1080,
            has_video: true,
            has_audio: true,
            read_delay: None,
        }
    }
}

/// What one mock writer saw, kept alive in the backend registry after
/// the job closes it.
#[derive(Debug, Default)]
pub struct OutputFile {
    pub container: Option<ContainerFormat>,
    pub stream_params: Vec<EncoderParams>,
    pub granted: Vec<TimeBase>,
    /// Per stream: (pts, dts, duration) of every written packet.
    pub packets: Vec<Vec<(i64, i64, i64)>>,
    pub header_written: bool,
    pub trailer_written: bool,
}

impl OutputFile {
    pub fn dts_values(&self, stream: usize) -> Vec<i64> {
        self.packets[stream].iter().map(|(_, d, _)| *d).collect()
    }

    pub fn sample_total(&self, stream: usize) -> i64 {
        self.packets[stream].iter().map(|(_, _, d)| d).sum()
    }

    /// Largest pts on a stream, in seconds of the granted time base.
    pub fn max_pts_seconds(&self, stream: usize) -> f64 {
        self.packets[stream]
            .iter()
            .map(|(p, _, _)| self.granted[stream].to_seconds(*p))
            .fold(0.0, f64::max)
    }
}

pub struct MockBackend {
    pub input: InputSpec,
    pub outputs: Mutex<HashMap<PathBuf, Arc<Mutex<OutputFile>>>>,
    pub writers_opened: AtomicUsize,
    capabilities: CapabilityTable,
}

impl MockBackend {
    pub fn new(input: InputSpec) -> Arc<Self> {
        Arc::new(Self {
            input,
            outputs: Mutex::new(HashMap::new()),
            writers_opened: AtomicUsize::new(0),
            capabilities: CapabilityTable,
        })
    }

    pub fn output(&self, path: impl AsRef<Path>) -> Arc<Mutex<OutputFile>> {
        self.outputs
            .lock()
            .unwrap()
            .get(path.as_ref())
            .expect("no output written at path")
            .clone()
    }

    fn descriptors(&self) -> Vec<StreamDescriptor> {
        let mut streams = Vec::new();
        if self.input.has_video {
            streams.push(StreamDescriptor {
                index: VIDEO_STREAM,
                kind: StreamKind::Video,
                time_base: TimeBase::MPEG,
                duration_seconds: self.input.duration,
                video: Some(recode_codec::VideoStreamInfo {
                    codec: VideoCodec::H264,
                    width: self.input.width,
                    height: self.input.height,
                    pixel_format: PixelFormat::Yuv420p,
                    frame_rate: self.input.fps,
                }),
                audio: None,
                extradata: None,
            });
        }
        if self.input.has_audio {
            streams.push(StreamDescriptor {
                index: AUDIO_STREAM,
                kind: StreamKind::Audio,
                time_base: TimeBase::per_sample(IN_SAMPLE_RATE),
                duration_seconds: self.input.duration,
                video: None,
                audio: Some(recode_codec::AudioStreamInfo {
                    codec: AudioCodec::Aac,
                    sample_rate: IN_SAMPLE_RATE,
                    sample_format: SampleFormat::F32p,
                    channel_layout: ChannelLayout::Stereo,
                }),
                extradata: None,
            });
        }
        streams
    }
}

impl MediaBackend for MockBackend {
    fn open_reader(&self, _path: &Path) -> Result<Box<dyn Reader>> {
        Ok(Box::new(MockReader::new(&self.input, self.descriptors())))
    }

    fn open_writer(&self, path: &Path, format: ContainerFormat) -> Result<Box<dyn Writer>> {
        self.writers_opened.fetch_add(1, Ordering::SeqCst);
        let file = Arc::new(Mutex::new(OutputFile {
            container: Some(format),
            ..Default::default()
        }));
        self.outputs
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), file.clone());
        Ok(Box::new(MockWriter { file }))
    }

    fn open_video_decoder(
        &self,
        _stream: &StreamDescriptor,
        _threads: u32,
    ) -> Result<Box<dyn VideoDecoder>> {
        Ok(Box::new(MockVideoDecoder {
            input: (self.input.width, self.input.height),
            queue: VecDeque::new(),
            draining: false,
        }))
    }

    fn open_audio_decoder(
        &self,
        _stream: &StreamDescriptor,
        _threads: u32,
    ) -> Result<Box<dyn AudioDecoder>> {
        Ok(Box::new(MockAudioDecoder {
            queue: VecDeque::new(),
            draining: false,
        }))
    }

    fn open_video_encoder(&self, params: &EncoderParams) -> Result<Box<dyn VideoEncoder>> {
        Ok(Box::new(MockVideoEncoder {
            time_base: params.time_base(),
            queue: VecDeque::new(),
            draining: false,
        }))
    }

    fn open_audio_encoder(&self, params: &EncoderParams) -> Result<Box<dyn AudioEncoder>> {
        Ok(Box::new(MockAudioEncoder {
            time_base: params.time_base(),
            queue: VecDeque::new(),
            draining: false,
        }))
    }

    fn open_resampler(&self, src: AudioSpec, dst: AudioSpec) -> Result<Box<dyn Resampler>> {
        Ok(Box::new(MockResampler {
            in_rate: src.sample_rate as u64,
            out_rate: dst.sample_rate as u64,
            out_spec: dst,
            in_total: 0,
            out_taken: 0,
            ended: false,
        }))
    }

    fn scale_frame(
        &self,
        frame: &Frame,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<Frame> {
        let mut scaled = Frame::new(width, height, format);
        scaled.pts = frame.pts;
        Ok(scaled)
    }

    fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }
}

struct MockReader {
    packets: VecDeque<Packet>,
    streams: Vec<StreamDescriptor>,
    delay: Option<Duration>,
}

impl MockReader {
    fn new(input: &InputSpec, streams: Vec<StreamDescriptor>) -> Self {
        let mut timed: Vec<(f64, Packet)> = Vec::new();

        if input.has_video {
            let tb = TimeBase::MPEG;
            let frames = (input.duration * input.fps).round() as u64;
            for i in 0..frames {
                let seconds = i as f64 / input.fps;
                let ticks = tb.from_seconds(seconds);
                let mut pkt = Packet::new(vec![0u8; 128]).with_stream_index(VIDEO_STREAM);
                pkt.pts = Timestamp::new(ticks, tb);
                pkt.dts = Timestamp::new(ticks, tb);
                pkt.duration = tb.from_seconds(1.0 / input.fps);
                timed.push((seconds, pkt));
            }
        }
        if input.has_audio {
            let tb = TimeBase::per_sample(IN_SAMPLE_RATE);
            let total = (input.duration * IN_SAMPLE_RATE as f64).round() as u64;
            let mut produced = 0u64;
            while produced < total {
                let n = AUDIO_BLOCK.min((total - produced) as usize);
                let seconds = produced as f64 / IN_SAMPLE_RATE as f64;
                let mut pkt = Packet::new(vec![0u8; n]).with_stream_index(AUDIO_STREAM);
                pkt.pts = Timestamp::new(produced as i64, tb);
                pkt.dts = Timestamp::new(produced as i64, tb);
                pkt.duration = n as i64;
                timed.push((seconds, pkt));
                produced += n as u64;
            }
        }
        timed.sort_by(|a, b| a.0.total_cmp(&b.0));

        Self {
            packets: timed.into_iter().map(|(_, p)| p).collect(),
            streams,
            delay: input.read_delay,
        }
    }
}

impl Reader for MockReader {
    fn streams(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    fn read_packet(&mut self) -> Result<Option<Packet>> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        Ok(self.packets.pop_front())
    }

    fn seek(&mut self, _stream_index: usize, _pts: i64) -> Result<()> {
        Ok(())
    }
}

struct MockWriter {
    file: Arc<Mutex<OutputFile>>,
}

impl Writer for MockWriter {
    fn add_stream(&mut self, params: &EncoderParams, requested: TimeBase) -> Result<(usize, TimeBase)> {
        let mut file = self.file.lock().unwrap();
        file.stream_params.push(params.clone());
        file.granted.push(requested);
        file.packets.push(Vec::new());
        Ok((file.stream_params.len() - 1, requested))
    }

    fn time_base(&self, stream_index: usize) -> TimeBase {
        self.file.lock().unwrap().granted[stream_index]
    }

    fn write_header(&mut self) -> Result<()> {
        self.file.lock().unwrap().header_written = true;
        Ok(())
    }

    fn write_packet(&mut self, packet: Packet) -> Result<()> {
        let mut file = self.file.lock().unwrap();
        assert!(file.header_written, "packet before header");
        assert!(!file.trailer_written, "packet after trailer");
        file.packets[packet.stream_index].push((
            packet.pts.value,
            packet.dts.value,
            packet.duration,
        ));
        Ok(())
    }

    fn write_trailer(&mut self) -> Result<()> {
        self.file.lock().unwrap().trailer_written = true;
        Ok(())
    }
}

struct MockVideoDecoder {
    input: (u32, u32),
    queue: VecDeque<Frame>,
    draining: bool,
}

impl VideoDecoder for MockVideoDecoder {
    fn send_packet(&mut self, packet: Option<&Packet>) -> Result<()> {
        match packet {
            Some(pkt) => {
                let mut frame = Frame::new(self.input.0, self.input.1, PixelFormat::Yuv420p);
                frame.pts = pkt.pts;
                self.queue.push_back(frame);
            }
            None => self.draining = true,
        }
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<CodecPoll<Frame>> {
        match self.queue.pop_front() {
            Some(frame) => Ok(CodecPoll::Ready(frame)),
            None if self.draining => Ok(CodecPoll::EndOfStream),
            None => Ok(CodecPoll::NeedsMore),
        }
    }
}

struct MockAudioDecoder {
    queue: VecDeque<Sample>,
    draining: bool,
}

impl AudioDecoder for MockAudioDecoder {
    fn send_packet(&mut self, packet: Option<&Packet>) -> Result<()> {
        match packet {
            Some(pkt) => {
                let mut block = Sample::new(
                    pkt.size(),
                    SampleFormat::F32p,
                    ChannelLayout::Stereo,
                    IN_SAMPLE_RATE,
                );
                block.pts = pkt.pts;
                self.queue.push_back(block);
            }
            None => self.draining = true,
        }
        Ok(())
    }

    fn receive_block(&mut self) -> Result<CodecPoll<Sample>> {
        match self.queue.pop_front() {
            Some(block) => Ok(CodecPoll::Ready(block)),
            None if self.draining => Ok(CodecPoll::EndOfStream),
            None => Ok(CodecPoll::NeedsMore),
        }
    }
}

struct MockVideoEncoder {
    time_base: TimeBase,
    queue: VecDeque<Packet>,
    draining: bool,
}

impl VideoEncoder for MockVideoEncoder {
    fn time_base(&self) -> TimeBase {
        self.time_base
    }

    fn send_frame(&mut self, frame: Option<&Frame>) -> Result<()> {
        match frame {
            Some(frame) => {
                let mut pkt = Packet::new(vec![0u8; 64]);
                pkt.pts = frame.pts;
                pkt.dts = frame.pts;
                self.queue.push_back(pkt);
            }
            None => self.draining = true,
        }
        Ok(())
    }

    fn receive_packet(&mut self) -> Result<CodecPoll<Packet>> {
        match self.queue.pop_front() {
            Some(pkt) => Ok(CodecPoll::Ready(pkt)),
            None if self.draining => Ok(CodecPoll::EndOfStream),
            None => Ok(CodecPoll::NeedsMore),
        }
    }
}

struct MockAudioEncoder {
    time_base: TimeBase,
    queue: VecDeque<Packet>,
    draining: bool,
}

impl AudioEncoder for MockAudioEncoder {
    fn time_base(&self) -> TimeBase {
        self.time_base
    }

    fn frame_size(&self) -> usize {
        AUDIO_BLOCK
    }

    fn send_block(&mut self, block: Option<&Sample>) -> Result<()> {
        match block {
            Some(block) => {
                let mut pkt = Packet::new(vec![0u8; 32]);
                pkt.pts = block.pts;
                pkt.dts = block.pts;
                pkt.duration = block.num_samples() as i64;
                self.queue.push_back(pkt);
            }
            None => self.draining = true,
        }
        Ok(())
    }

    fn receive_packet(&mut self) -> Result<CodecPoll<Packet>> {
        match self.queue.pop_front() {
            Some(pkt) => Ok(CodecPoll::Ready(pkt)),
            None if self.draining => Ok(CodecPoll::EndOfStream),
            None => Ok(CodecPoll::NeedsMore),
        }
    }
}

struct MockResampler {
    in_rate: u64,
    out_rate: u64,
    out_spec: AudioSpec,
    in_total: u64,
    out_taken: u64,
    ended: bool,
}

impl MockResampler {
    fn available(&self) -> u64 {
        self.in_total * self.out_rate / self.in_rate - self.out_taken
    }

    fn take(&mut self, n: usize) -> Sample {
        self.out_taken += n as u64;
        Sample::new(
            n,
            self.out_spec.sample_format,
            self.out_spec.channel_layout,
            self.out_spec.sample_rate,
        )
    }
}

impl Resampler for MockResampler {
    fn push(&mut self, block: Option<&Sample>) -> Result<()> {
        match block {
            Some(block) => self.in_total += block.num_samples() as u64,
            None => self.ended = true,
        }
        Ok(())
    }

    fn pull_exact(&mut self, num_samples: usize) -> Result<CodecPoll<Sample>> {
        if self.available() >= num_samples as u64 {
            Ok(CodecPoll::Ready(self.take(num_samples)))
        } else if self.ended {
            Ok(CodecPoll::EndOfStream)
        } else {
            Ok(CodecPoll::NeedsMore)
        }
    }

    fn pull_remainder(&mut self) -> Result<Option<Sample>> {
        let left = self.available() as usize;
        if left > 0 {
            Ok(Some(self.take(left)))
        } else {
            Ok(None)
        }
    }
}
