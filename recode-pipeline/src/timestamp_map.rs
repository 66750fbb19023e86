//! Rebasing encoder output onto the muxer's clock.

use recode_core::{Packet, TimeBase};
use tracing::warn;

/// Finalises every encoded packet of one pipeline before muxing:
/// stamps the output stream index, rescales timestamps from the
/// encoder's time base into the writer's, and repairs the two invariant
/// violations rescale rounding can introduce (non-monotone dts, pts
/// behind dts).
#[derive(Debug)]
pub struct TimestampMapper {
    output_index: usize,
    writer_time_base: TimeBase,
    last_dts: Option<i64>,
    dts_warned: bool,
}

impl TimestampMapper {
    /// `writer_time_base` must be the base the muxer actually granted
    /// for this stream, not the one the encoder requested.
    pub fn new(output_index: usize, writer_time_base: TimeBase) -> Self {
        Self {
            output_index,
            writer_time_base,
            last_dts: None,
            dts_warned: false,
        }
    }

    pub fn output_index(&self) -> usize {
        self.output_index
    }

    /// Make `packet` muxer-ready in place.
    pub fn finalize(&mut self, packet: &mut Packet) {
        packet.stream_index = self.output_index;
        packet.rescale(self.writer_time_base);

        if packet.dts.is_some() {
            if let Some(last) = self.last_dts {
                if packet.dts.value <= last {
                    if !self.dts_warned {
                        warn!(
                            stream = self.output_index,
                            dts = packet.dts.value,
                            last,
                            "non-monotone dts after rescale, bumping"
                        );
                        self.dts_warned = true;
                    }
                    packet.dts.value = last + 1;
                }
            }
            self.last_dts = Some(packet.dts.value);
        }

        // Rescale rounding can push the first packet of a B-frame group
        // to pts < dts; the muxer rejects that ordering.
        if packet.pts.is_some() && packet.dts.is_some() && packet.pts.value < packet.dts.value {
            packet.pts.value = packet.dts.value;
        }
    }
}
