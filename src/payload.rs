use crate::boxes::FourCC;
use crate::util::format_duration;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Decoded contents of a box.
///
/// `Opaque` covers unknown tags and boxes whose decoder failed; `Container`
/// covers boxes whose payload is only children.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    #[default]
    Opaque,
    Container,
    MediaData(MediaData),
    Ftyp(Ftyp),
    Mvhd(Mvhd),
    Tkhd(Tkhd),
    Mdhd(Mdhd),
    Hdlr(Hdlr),
    Vmhd(Vmhd),
    Smhd(Smhd),
    Hmhd(Hmhd),
    Dref(Dref),
    Url(DataEntryUrl),
    Stsd(Stsd),
    VideoEntry(VisualSampleEntry),
    AudioEntry(AudioSampleEntry),
    Stts(TimeToSample),
    Ctts(CompositionOffsets),
    Stsz(SampleSizes),
    Stsc(SampleToChunk),
    Stco(ChunkOffsets),
    Co64(ChunkOffsets),
    Stss(SyncSamples),
}

impl Payload {
    /// Display-only projection of the decoded fields. Never fails.
    pub fn detail(&self) -> String {
        match self {
            Payload::Opaque | Payload::Container => String::new(),
            Payload::MediaData(b) => b.to_string(),
            Payload::Ftyp(b) => b.to_string(),
            Payload::Mvhd(b) => b.to_string(),
            Payload::Tkhd(b) => b.to_string(),
            Payload::Mdhd(b) => b.to_string(),
            Payload::Hdlr(b) => b.to_string(),
            Payload::Vmhd(b) => b.to_string(),
            Payload::Smhd(b) => b.to_string(),
            Payload::Hmhd(b) => b.to_string(),
            Payload::Dref(b) => b.to_string(),
            Payload::Url(b) => b.to_string(),
            Payload::Stsd(b) => b.to_string(),
            Payload::VideoEntry(b) => b.to_string(),
            Payload::AudioEntry(b) => b.to_string(),
            Payload::Stts(b) => b.to_string(),
            Payload::Ctts(b) => b.to_string(),
            Payload::Stsz(b) => b.to_string(),
            Payload::Stsc(b) => b.to_string(),
            Payload::Stco(b) | Payload::Co64(b) => b.to_string(),
            Payload::Stss(b) => b.to_string(),
        }
    }
}

/// Version and flags word that starts every FullBox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FullBox {
    pub version: u8,
    pub flags: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MediaData {
    pub data_offset: u64,
    pub data_len: u64,
}

impl Display for MediaData {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "data: {} bytes at {}", self.data_len, self.data_offset)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Ftyp {
    pub major_brand: FourCC,
    pub minor_version: u32,
    pub compatible_brands: Vec<FourCC>,
}

impl Display for Ftyp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let brands: Vec<String> = self.compatible_brands.iter().map(|b| b.to_string()).collect();
        write!(
            f,
            "major brand: {}, minor version: {}, compatible brands: {}",
            self.major_brand,
            self.minor_version,
            brands.join(" ")
        )
    }
}

// Movie header
#[derive(Debug, Clone, Default, Serialize)]
pub struct Mvhd {
    pub full: FullBox,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    pub rate: f64,
    pub volume: f64,
    pub next_track_id: u32,
}

impl Display for Mvhd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "creation_time: {}, modification_time: {}, timescale: {}, duration: {}",
            self.creation_time, self.modification_time, self.timescale, self.duration
        )?;
        if let Some(d) = format_duration(self.duration, self.timescale) {
            write!(f, ", {}", d)?;
        }
        write!(
            f,
            ", rate: {}, volume: {}, next track id: {}",
            self.rate, self.volume, self.next_track_id
        )
    }
}

// Track header
#[derive(Debug, Clone, Default, Serialize)]
pub struct Tkhd {
    pub full: FullBox,
    pub creation_time: u64,
    pub modification_time: u64,
    pub track_id: u32,
    pub duration: u64,
    pub layer: i16,
    pub alternate_group: i16,
    pub volume: f64,
    pub width: f64,
    pub height: f64,
}

impl Display for Tkhd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "create: {}, modify: {}, id: {}, duration: {}, layer: {}, alternate: {}, volume: {}, width x height: {} x {}",
            self.creation_time,
            self.modification_time,
            self.track_id,
            self.duration,
            self.layer,
            self.alternate_group,
            self.volume,
            self.width,
            self.height
        )
    }
}

// Media header
#[derive(Debug, Clone, Default, Serialize)]
pub struct Mdhd {
    pub full: FullBox,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    pub language: String,
    /// Set when the packed code is a legacy Macintosh language number.
    pub mac_language: Option<&'static str>,
}

impl Display for Mdhd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "create: {}, modify: {}, timescale: {}, duration: {}",
            self.creation_time, self.modification_time, self.timescale, self.duration
        )?;
        if let Some(d) = format_duration(self.duration, self.timescale) {
            write!(f, ", {}", d)?;
        }
        write!(f, ", lang: {}", self.language)?;
        if let Some(name) = self.mac_language {
            write!(f, " (mac: {})", name)?;
        }
        Ok(())
    }
}

// Handler reference
#[derive(Debug, Clone, Default, Serialize)]
pub struct Hdlr {
    pub full: FullBox,
    pub handler_type: FourCC,
    pub name: String,
}

impl Display for Hdlr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "handler type: {}, name: {}", self.handler_type, self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Vmhd {
    pub full: FullBox,
    pub graphics_mode: u16,
    pub opcolor: [u16; 3],
}

impl Display for Vmhd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.opcolor;
        write!(f, "graphics_mode: {}, opcolor: {}, {}, {}", self.graphics_mode, r, g, b)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Smhd {
    pub full: FullBox,
    pub balance: f64,
}

impl Display for Smhd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "balance: {}", self.balance)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Hmhd {
    pub full: FullBox,
    pub max_pdu_size: u16,
    pub avg_pdu_size: u16,
    pub max_bitrate: u32,
    pub avg_bitrate: u32,
}

impl Display for Hmhd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max pdu: {}, avg pdu: {}, max bitrate: {}, avg bitrate: {}",
            self.max_pdu_size, self.avg_pdu_size, self.max_bitrate, self.avg_bitrate
        )
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Dref {
    pub full: FullBox,
    pub entry_count: u32,
}

impl Display for Dref {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "entry count: {}", self.entry_count)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DataEntryUrl {
    pub full: FullBox,
    pub location: Option<String>,
}

impl DataEntryUrl {
    /// Flag 0x1: media data lives in the same file.
    pub fn self_contained(&self) -> bool {
        self.full.flags & 1 != 0
    }
}

impl Display for DataEntryUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "location: {}", self.location.as_deref().unwrap_or("null"))?;
        if self.self_contained() {
            write!(f, " (self-contained)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stsd {
    pub full: FullBox,
    pub entry_count: u32,
}

impl Display for Stsd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "entry: {}", self.entry_count)
    }
}

/// Fields shared by every sample entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SampleEntry {
    pub data_reference_index: u16,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VisualSampleEntry {
    pub base: SampleEntry,
    pub width: u16,
    pub height: u16,
    pub horiz_resolution: f64,
    pub vert_resolution: f64,
    pub frame_count: u16,
    pub compressor_name: String,
    pub depth: u16,
}

impl Display for VisualSampleEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data ref: {}, width: {}, height: {}, horiz res: {}, vert res: {}, frame count: {}",
            self.base.data_reference_index,
            self.width,
            self.height,
            self.horiz_resolution,
            self.vert_resolution,
            self.frame_count
        )?;
        if !self.compressor_name.is_empty() {
            write!(f, ", compressor name: {}", self.compressor_name)?;
        }
        write!(f, ", depth: {}", self.depth)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AudioSampleEntry {
    pub base: SampleEntry,
    pub channel_count: u16,
    pub sample_size: u16,
    pub sample_rate: f64,
}

impl Display for AudioSampleEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data ref: {}, channels: {}, sample size: {}, sample rate: {}",
            self.base.data_reference_index, self.channel_count, self.sample_size, self.sample_rate
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SttsEntry {
    pub sample_count: u32,
    pub sample_delta: u32,
}

/// Decoding time-to-sample table.
///
/// `timescale` is taken from the enclosing media header when the box is
/// decoded, or 1 when there is none.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimeToSample {
    pub full: FullBox,
    pub entry_count: u32,
    pub entries: Vec<SttsEntry>,
    pub timescale: u32,
}

impl TimeToSample {
    /// Sum of all sample durations, in timescale units.
    pub fn total_duration(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| e.sample_count as u64 * e.sample_delta as u64)
            .sum()
    }
}

impl Display for TimeToSample {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "entry: {}", self.entry_count)?;
        for e in &self.entries {
            write!(
                f,
                "\n*** sample count: {} -> delta: {}, timescale: {}",
                e.sample_count, e.sample_delta, self.timescale
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CttsEntry {
    pub sample_count: u32,
    pub sample_offset: i64, // signed in version 1
}

/// Composition time offsets.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompositionOffsets {
    pub full: FullBox,
    pub entry_count: u32,
    pub entries: Vec<CttsEntry>,
    pub timescale: u32,
}

impl Display for CompositionOffsets {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "entry: {}", self.entry_count)?;
        for e in &self.entries {
            write!(
                f,
                "\n*** sample count: {} -> sample offset: {}, timescale: {}",
                e.sample_count, e.sample_offset, self.timescale
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SampleSizes {
    pub full: FullBox,
    pub sample_size: u32,
    pub sample_count: u32,
    pub entry_size: Vec<u32>, // empty unless sample_size == 0
}

impl SampleSizes {
    /// Size of the 1-based sample `n`.
    pub fn size_of(&self, n: u32) -> Option<u32> {
        if n == 0 || n > self.sample_count {
            return None;
        }
        if self.sample_size != 0 {
            return Some(self.sample_size);
        }
        self.entry_size.get(n as usize - 1).copied()
    }
}

impl Display for SampleSizes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "sample size: {}, count: {}", self.sample_size, self.sample_count)?;
        for n in &self.entry_size {
            write!(f, "\nentry size: {}", n)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StscEntry {
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    pub sample_description_index: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SampleToChunk {
    pub full: FullBox,
    pub entry_count: u32,
    pub entries: Vec<StscEntry>,
}

impl Display for SampleToChunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "entry count: {}", self.entry_count)?;
        for (i, e) in self.entries.iter().enumerate() {
            write!(
                f,
                "\nentry {}, first chunk: {}, samples per chunk: {}, sample description index: {}",
                i, e.first_chunk, e.samples_per_chunk, e.sample_description_index
            )?;
        }
        Ok(())
    }
}

/// Chunk offsets from either `stco` (32-bit) or `co64` (64-bit).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChunkOffsets {
    pub full: FullBox,
    pub entry_count: u32,
    pub chunk_offsets: Vec<u64>,
}

impl Display for ChunkOffsets {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "entry count: {}", self.entry_count)?;
        for (i, off) in self.chunk_offsets.iter().enumerate() {
            write!(f, "\nentry {}, offset {}", i, off)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncSamples {
    pub full: FullBox,
    pub entry_count: u32,
    pub sample_numbers: Vec<u32>,
}

impl SyncSamples {
    /// Whether 1-based `sample` is listed. The table is not assumed sorted.
    pub fn is_sync(&self, sample: u32) -> bool {
        self.sample_numbers.contains(&sample)
    }
}

impl Display for SyncSamples {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "entry count: {}", self.entry_count)?;
        for (i, n) in self.sample_numbers.iter().enumerate() {
            write!(f, "\nsync sample, entry {}, sample: {}", i, n)?;
        }
        Ok(())
    }
}
