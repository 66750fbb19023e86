//! Compressed media packets.

use crate::time::{TimeBase, Timestamp};
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Packet property flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PacketFlags: u32 {
        /// The packet contains a keyframe.
        const KEYFRAME = 0x0001;
        /// The payload is known to be corrupted.
        const CORRUPT = 0x0002;
        /// The packet should be dropped rather than decoded.
        const DISCARD = 0x0004;
    }
}

/// One compressed unit of a stream.
///
/// Packets own their payload and are move-only within a pipeline: each
/// packet is consumed by exactly one stage. `duration` counts ticks of
/// the same time base as `dts`.
pub struct Packet {
    data: Vec<u8>,
    /// Presentation timestamp. May be absent on undecodable-order
    /// containers.
    pub pts: Timestamp,
    /// Decode timestamp.
    pub dts: Timestamp,
    /// Duration in ticks of the packet's time base.
    pub duration: i64,
    /// Index of the stream this packet belongs to.
    pub stream_index: usize,
    pub flags: PacketFlags,
    side_data: Vec<SideData>,
}

impl Packet {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            pts: Timestamp::none(),
            dts: Timestamp::none(),
            duration: 0,
            stream_index: 0,
            flags: PacketFlags::empty(),
            side_data: Vec::new(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_keyframe(&self) -> bool {
        self.flags.contains(PacketFlags::KEYFRAME)
    }

    pub fn set_keyframe(&mut self, keyframe: bool) {
        self.flags.set(PacketFlags::KEYFRAME, keyframe);
    }

    /// Rescale pts, dts and duration into `target` in place, rounding
    /// half to even.
    pub fn rescale(&mut self, target: TimeBase) {
        let src = if self.dts.is_some() {
            self.dts.time_base
        } else {
            self.pts.time_base
        };
        self.pts = self.pts.rescale(target);
        self.dts = self.dts.rescale(target);
        self.duration = src.convert_rounded(self.duration, target);
    }

    pub fn with_timestamps(mut self, pts: Timestamp, dts: Timestamp) -> Self {
        self.pts = pts;
        self.dts = dts;
        self
    }

    pub fn with_stream_index(mut self, index: usize) -> Self {
        self.stream_index = index;
        self
    }

    pub fn add_side_data(&mut self, data: SideData) {
        self.side_data.push(data);
    }

    pub fn side_data(&self, kind: SideDataKind) -> Option<&SideData> {
        self.side_data.iter().find(|sd| sd.kind == kind)
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("size", &self.size())
            .field("pts", &self.pts)
            .field("dts", &self.dts)
            .field("stream_index", &self.stream_index)
            .field("flags", &self.flags)
            .finish()
    }
}

/// Kinds of side data a container may attach to a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideDataKind {
    /// Codec parameter sets (SPS/PPS and friends).
    ParameterSets,
    /// Display rotation/flip matrix.
    DisplayMatrix,
    /// Samples to skip for gapless audio.
    SkipSamples,
    Other(u32),
}

/// Opaque side data blob carried alongside the payload.
#[derive(Debug, Clone)]
pub struct SideData {
    pub kind: SideDataKind,
    pub data: Vec<u8>,
}

impl SideData {
    pub fn new(kind: SideDataKind, data: Vec<u8>) -> Self {
        Self { kind, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_keyframe_flag() {
        let mut packet = Packet::new(vec![0u8; 16]);
        assert!(!packet.is_keyframe());
        packet.set_keyframe(true);
        assert!(packet.is_keyframe());
        packet.set_keyframe(false);
        assert!(!packet.is_keyframe());
    }

    #[test]
    fn test_packet_rescale() {
        let ms = TimeBase::MILLIS;
        let mut packet = Packet::new(Vec::new()).with_timestamps(
            Timestamp::new(500, ms),
            Timestamp::new(460, ms),
        );
        packet.duration = 40;
        packet.rescale(TimeBase::MPEG);
        assert_eq!(packet.pts.value, 45000);
        assert_eq!(packet.dts.value, 41400);
        assert_eq!(packet.duration, 3600);
    }

    #[test]
    fn test_packet_rescale_absent_pts() {
        let mut packet = Packet::new(Vec::new());
        packet.dts = Timestamp::new(10, TimeBase::MILLIS);
        packet.rescale(TimeBase::MPEG);
        assert!(!packet.pts.is_some());
        assert_eq!(packet.dts.value, 900);
    }

    #[test]
    fn test_side_data_lookup() {
        let mut packet = Packet::new(Vec::new());
        packet.add_side_data(SideData::new(SideDataKind::SkipSamples, vec![1, 2]));
        assert!(packet.side_data(SideDataKind::SkipSamples).is_some());
        assert!(packet.side_data(SideDataKind::DisplayMatrix).is_none());
    }
}
