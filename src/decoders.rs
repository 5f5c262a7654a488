use crate::boxes::BoxHeader;
use crate::context::DecodeContext;
use crate::cursor::ByteCursor;
use crate::mac_lang;
use crate::parser::Result;
use crate::payload::*;
use crate::registry::{BoxDecoder, Nesting};
use crate::util::{c_string, fixed_16_16, fixed_8_8, fixed_8_8_signed, lang_from_u16};
use log::{debug, warn};

// ---------- Helpers ----------

/// Fill a `Default` value field by field. A failed read stops the box but
/// keeps whatever was decoded before it; the remaining fields stay zero.
fn lenient<T: Default>(hdr: &BoxHeader, fill: impl FnOnce(&mut T) -> Result<()>) -> T {
    let mut out = T::default();
    if let Err(e) = fill(&mut out) {
        debug!("{} at {:#x}: partial decode ({})", hdr.typ, hdr.start, e);
    }
    out
}

/// Version (top 8 bits) and flags (low 24 bits).
pub fn read_full_box(r: &mut ByteCursor) -> Result<FullBox> {
    let word = r.read_u32()?;
    Ok(FullBox {
        version: (word >> 24) as u8,
        flags: word & 0x00FF_FFFF,
    })
}

/// 64-bit field in version 1 boxes, 32-bit otherwise.
fn read_versioned(r: &mut ByteCursor, full: FullBox) -> Result<u64> {
    if full.version == 1 {
        r.read_u64()
    } else {
        r.read_u32().map(u64::from)
    }
}

/// Read `count` fixed-size entries into `out`, keeping what was read on failure.
fn read_table<T>(
    r: &mut ByteCursor,
    count: u32,
    entry_len: u64,
    out: &mut Vec<T>,
    mut read: impl FnMut(&mut ByteCursor) -> Result<T>,
) -> Result<()> {
    // entry counts are untrusted; never reserve more than the box can hold
    let fits = r.remaining() / entry_len;
    out.reserve(u64::from(count).min(fits) as usize);
    for _ in 0..count {
        out.push(read(r)?);
    }
    Ok(())
}

// ---------- Structural ----------

pub struct OpaqueDecoder;

impl BoxDecoder for OpaqueDecoder {
    fn decode(&self, _r: &mut ByteCursor, _hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Opaque)
    }
}

/// Payload is nothing but child boxes.
pub struct ContainerDecoder;

impl BoxDecoder for ContainerDecoder {
    fn decode(&self, _r: &mut ByteCursor, _hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Container)
    }

    fn nesting(&self) -> Nesting {
        Nesting::Boxes
    }
}

/// Raw media is never read; only its extent is recorded.
pub struct MdatDecoder;

impl BoxDecoder for MdatDecoder {
    fn decode(&self, _r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::MediaData(MediaData {
            data_offset: hdr.payload_start(),
            data_len: hdr.size - hdr.header_size,
        }))
    }
}

// ---------- File level ----------

// ftyp: major + minor + compatible brands
pub struct FtypDecoder;

impl BoxDecoder for FtypDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Ftyp(lenient(hdr, |b: &mut Ftyp| {
            b.major_brand = r.read_fourcc()?;
            b.minor_version = r.read_u32()?;
            // trailing bytes short of a full brand are dropped
            let n = r.remaining() / 4;
            read_table(r, n as u32, 4, &mut b.compatible_brands, |r| r.read_fourcc())
        })))
    }
}

// ---------- Headers ----------

// mvhd: movie timing, rate, volume
pub struct MvhdDecoder;

impl BoxDecoder for MvhdDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Mvhd(lenient(hdr, |b: &mut Mvhd| {
            b.full = read_full_box(r)?;
            b.creation_time = read_versioned(r, b.full)?;
            b.modification_time = read_versioned(r, b.full)?;
            b.timescale = r.read_u32()?;
            b.duration = read_versioned(r, b.full)?;
            b.rate = fixed_16_16(r.read_u32()?);
            b.volume = fixed_8_8(r.read_u16()?);
            // reserved(10) + matrix(36) + pre_defined(24)
            r.skip(10 + 36 + 24)?;
            b.next_track_id = r.read_u32()?;
            Ok(())
        })))
    }
}

// tkhd: track id, duration, layer, volume, width, height
pub struct TkhdDecoder;

impl BoxDecoder for TkhdDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Tkhd(lenient(hdr, |b: &mut Tkhd| {
            b.full = read_full_box(r)?;
            b.creation_time = read_versioned(r, b.full)?;
            b.modification_time = read_versioned(r, b.full)?;
            b.track_id = r.read_u32()?;
            r.read_u32()?; // reserved
            b.duration = read_versioned(r, b.full)?;
            r.read_u64()?; // reserved
            b.layer = r.read_i16()?;
            b.alternate_group = r.read_i16()?;
            b.volume = fixed_8_8(r.read_u16()?);
            // reserved(2) + matrix(36)
            r.skip(2 + 36)?;
            b.width = fixed_16_16(r.read_u32()?);
            b.height = fixed_16_16(r.read_u32()?);
            Ok(())
        })))
    }
}

// mdhd: timescale, duration, language
pub struct MdhdDecoder;

impl BoxDecoder for MdhdDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Mdhd(lenient(hdr, |b: &mut Mdhd| {
            b.full = read_full_box(r)?;
            b.creation_time = read_versioned(r, b.full)?;
            b.modification_time = read_versioned(r, b.full)?;
            b.timescale = r.read_u32()?;
            b.duration = read_versioned(r, b.full)?;
            let code = r.read_u16()?;
            b.language = lang_from_u16(code);
            if code < 0x400 {
                b.mac_language = mac_lang::name(code);
            }
            Ok(())
        })))
    }
}

// hdlr: handler type + name
pub struct HdlrDecoder;

impl BoxDecoder for HdlrDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Hdlr(lenient(hdr, |b: &mut Hdlr| {
            b.full = read_full_box(r)?;
            r.read_u32()?; // pre_defined
            b.handler_type = r.read_fourcc()?;
            r.read_u32()?;
            r.read_u64()?;
            let rest = r.remaining() as usize;
            b.name = c_string(&r.read_bytes(rest)?);
            Ok(())
        })))
    }
}

pub struct VmhdDecoder;

impl BoxDecoder for VmhdDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Vmhd(lenient(hdr, |b: &mut Vmhd| {
            b.full = read_full_box(r)?;
            b.graphics_mode = r.read_u16()?;
            for c in b.opcolor.iter_mut() {
                *c = r.read_u16()?;
            }
            Ok(())
        })))
    }
}

pub struct SmhdDecoder;

impl BoxDecoder for SmhdDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Smhd(lenient(hdr, |b: &mut Smhd| {
            b.full = read_full_box(r)?;
            b.balance = fixed_8_8_signed(r.read_i16()?);
            Ok(())
        })))
    }
}

pub struct HmhdDecoder;

impl BoxDecoder for HmhdDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Hmhd(lenient(hdr, |b: &mut Hmhd| {
            b.full = read_full_box(r)?;
            b.max_pdu_size = r.read_u16()?;
            b.avg_pdu_size = r.read_u16()?;
            b.max_bitrate = r.read_u32()?;
            b.avg_bitrate = r.read_u32()?;
            Ok(())
        })))
    }
}

// ---------- Data references ----------

// dref: entry count, then data entry boxes as children
pub struct DrefDecoder;

impl BoxDecoder for DrefDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Dref(lenient(hdr, |b: &mut Dref| {
            b.full = read_full_box(r)?;
            b.entry_count = r.read_u32()?;
            Ok(())
        })))
    }

    fn nesting(&self) -> Nesting {
        Nesting::Boxes
    }
}

pub struct UrlDecoder;

impl BoxDecoder for UrlDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Url(lenient(hdr, |b: &mut DataEntryUrl| {
            b.full = read_full_box(r)?;
            let rest = r.remaining() as usize;
            if rest > 0 {
                b.location = Some(c_string(&r.read_bytes(rest)?));
            }
            Ok(())
        })))
    }
}

// ---------- Sample description ----------

// stsd: entry count, then sample entries shaped by the media handler
pub struct StsdDecoder;

impl BoxDecoder for StsdDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Stsd(lenient(hdr, |b: &mut Stsd| {
            b.full = read_full_box(r)?;
            b.entry_count = r.read_u32()?;
            Ok(())
        })))
    }

    fn nesting(&self) -> Nesting {
        Nesting::SampleEntries
    }
}

fn read_sample_entry(r: &mut ByteCursor) -> Result<SampleEntry> {
    r.skip(6)?; // reserved
    Ok(SampleEntry {
        data_reference_index: r.read_u16()?,
    })
}

pub struct VisualSampleEntryDecoder;

impl BoxDecoder for VisualSampleEntryDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::VideoEntry(lenient(hdr, |b: &mut VisualSampleEntry| {
            b.base = read_sample_entry(r)?;
            // pre_defined(2) + reserved(2) + pre_defined(12)
            r.skip(2 + 2 + 12)?;
            b.width = r.read_u16()?;
            b.height = r.read_u16()?;
            b.horiz_resolution = fixed_16_16(r.read_u32()?);
            b.vert_resolution = fixed_16_16(r.read_u32()?);
            r.read_u32()?; // reserved
            b.frame_count = r.read_u16()?;
            // Pascal string in a fixed 32-byte field
            let len = r.read_u8()? as usize;
            let buf: [u8; 31] = r.read_array()?;
            b.compressor_name = String::from_utf8_lossy(&buf[..len.min(31)]).into_owned();
            b.depth = r.read_u16()?;
            Ok(())
        })))
    }
}

pub struct AudioSampleEntryDecoder;

impl BoxDecoder for AudioSampleEntryDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::AudioEntry(lenient(hdr, |b: &mut AudioSampleEntry| {
            b.base = read_sample_entry(r)?;
            r.read_u64()?; // reserved
            b.channel_count = r.read_u16()?;
            b.sample_size = r.read_u16()?;
            r.read_u32()?; // pre_defined + reserved
            b.sample_rate = fixed_16_16(r.read_u32()?);
            Ok(())
        })))
    }
}

// ---------- Sample table ----------

// stts: time-to-sample
pub struct SttsDecoder;

impl BoxDecoder for SttsDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, ctx: &DecodeContext) -> Result<Payload> {
        let mut stts = lenient(hdr, |b: &mut TimeToSample| {
            b.full = read_full_box(r)?;
            b.entry_count = r.read_u32()?;
            read_table(r, b.entry_count, 8, &mut b.entries, |r| {
                Ok(SttsEntry {
                    sample_count: r.read_u32()?,
                    sample_delta: r.read_u32()?,
                })
            })
        });
        stts.timescale = ctx.media_timescale();

        let last = stts.entries.len().saturating_sub(1);
        if let Some(i) = stts.entries[..last].iter().position(|e| e.sample_delta == 0) {
            warn!("stts at {:#x}: zero sample delta in entry {} of {}", hdr.start, i, stts.entries.len());
        }
        Ok(Payload::Stts(stts))
    }
}

// ctts: composition time to sample
pub struct CttsDecoder;

impl BoxDecoder for CttsDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, ctx: &DecodeContext) -> Result<Payload> {
        let mut ctts = lenient(hdr, |b: &mut CompositionOffsets| {
            b.full = read_full_box(r)?;
            b.entry_count = r.read_u32()?;
            let signed = b.full.version == 1;
            read_table(r, b.entry_count, 8, &mut b.entries, |r| {
                let sample_count = r.read_u32()?;
                let sample_offset = if signed {
                    i64::from(r.read_i32()?)
                } else {
                    i64::from(r.read_u32()?)
                };
                Ok(CttsEntry {
                    sample_count,
                    sample_offset,
                })
            })
        });
        ctts.timescale = ctx.media_timescale();
        Ok(Payload::Ctts(ctts))
    }
}

// stsz: sample sizes
pub struct StszDecoder;

impl BoxDecoder for StszDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Stsz(lenient(hdr, |b: &mut SampleSizes| {
            b.full = read_full_box(r)?;
            b.sample_size = r.read_u32()?;
            b.sample_count = r.read_u32()?;
            // If sample_size is 0, each sample has its own size
            if b.sample_size == 0 {
                read_table(r, b.sample_count, 4, &mut b.entry_size, |r| r.read_u32())?;
            }
            Ok(())
        })))
    }
}

// stsc: sample-to-chunk
pub struct StscDecoder;

impl BoxDecoder for StscDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Stsc(lenient(hdr, |b: &mut SampleToChunk| {
            b.full = read_full_box(r)?;
            b.entry_count = r.read_u32()?;
            read_table(r, b.entry_count, 12, &mut b.entries, |r| {
                Ok(StscEntry {
                    first_chunk: r.read_u32()?,
                    samples_per_chunk: r.read_u32()?,
                    sample_description_index: r.read_u32()?,
                })
            })
        })))
    }
}

// stco: 32-bit chunk offsets
pub struct StcoDecoder;

impl BoxDecoder for StcoDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Stco(lenient(hdr, |b: &mut ChunkOffsets| {
            b.full = read_full_box(r)?;
            b.entry_count = r.read_u32()?;
            read_table(r, b.entry_count, 4, &mut b.chunk_offsets, |r| {
                r.read_u32().map(u64::from)
            })
        })))
    }
}

// co64: 64-bit chunk offsets
pub struct Co64Decoder;

impl BoxDecoder for Co64Decoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Co64(lenient(hdr, |b: &mut ChunkOffsets| {
            b.full = read_full_box(r)?;
            b.entry_count = r.read_u32()?;
            read_table(r, b.entry_count, 8, &mut b.chunk_offsets, |r| r.read_u64())
        })))
    }
}

// stss: sync sample table
pub struct StssDecoder;

impl BoxDecoder for StssDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        Ok(Payload::Stss(lenient(hdr, |b: &mut SyncSamples| {
            b.full = read_full_box(r)?;
            b.entry_count = r.read_u32()?;
            read_table(r, b.entry_count, 4, &mut b.sample_numbers, |r| r.read_u32())
        })))
    }
}
