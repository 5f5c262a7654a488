#![allow(dead_code)]

/// Plain box: 32-bit size + type + payload.
pub fn bx(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(8 + payload.len() as u32).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

/// FullBox: header + version/flags word + payload.
pub fn full(typ: &[u8; 4], version: u8, flags: u32, payload: &[u8]) -> Vec<u8> {
    let mut p = (((version as u32) << 24) | (flags & 0x00FF_FFFF)).to_be_bytes().to_vec();
    p.extend_from_slice(payload);
    bx(typ, &p)
}

/// Container box holding the concatenated children.
pub fn container(typ: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    bx(typ, &children.concat())
}

pub fn u32s(vals: &[u32]) -> Vec<u8> {
    vals.iter().flat_map(|v| v.to_be_bytes()).collect()
}

/// [ftyp] with major "isom", minor 512, one compatible brand "isom".
pub fn ftyp() -> Vec<u8> {
    let mut p = Vec::new();
    p.extend_from_slice(b"isom");
    p.extend_from_slice(&512u32.to_be_bytes());
    p.extend_from_slice(b"isom");
    bx(b"ftyp", &p)
}

/// Version 0 mdhd with the given timescale and duration, language "und".
pub fn mdhd(timescale: u32, duration: u32) -> Vec<u8> {
    let mut p = u32s(&[0, 0, timescale, duration]);
    p.extend_from_slice(&0x55C4u16.to_be_bytes()); // "und"
    p.extend_from_slice(&0u16.to_be_bytes());
    full(b"mdhd", 0, 0, &p)
}

pub fn hdlr(handler: &[u8; 4], name: &str) -> Vec<u8> {
    let mut p = 0u32.to_be_bytes().to_vec();
    p.extend_from_slice(handler);
    p.extend_from_slice(&[0u8; 12]);
    p.extend_from_slice(name.as_bytes());
    p.push(0);
    full(b"hdlr", 0, 0, &p)
}

pub fn stts(entries: &[(u32, u32)]) -> Vec<u8> {
    let mut p = u32s(&[entries.len() as u32]);
    for (count, delta) in entries {
        p.extend_from_slice(&u32s(&[*count, *delta]));
    }
    full(b"stts", 0, 0, &p)
}

/// Visual sample entry of the given codec with width/height and a compressor name.
pub fn video_entry(codec: &[u8; 4], width: u16, height: u16, compressor: &str) -> Vec<u8> {
    let mut p = vec![0u8; 6];
    p.extend_from_slice(&1u16.to_be_bytes()); // data_reference_index
    p.extend_from_slice(&[0u8; 16]);
    p.extend_from_slice(&width.to_be_bytes());
    p.extend_from_slice(&height.to_be_bytes());
    p.extend_from_slice(&0x0048_0000u32.to_be_bytes()); // 72 dpi
    p.extend_from_slice(&0x0048_0000u32.to_be_bytes());
    p.extend_from_slice(&0u32.to_be_bytes());
    p.extend_from_slice(&1u16.to_be_bytes()); // frame_count
    let mut name = [0u8; 32];
    name[0] = compressor.len() as u8;
    name[1..1 + compressor.len()].copy_from_slice(compressor.as_bytes());
    p.extend_from_slice(&name);
    p.extend_from_slice(&0x0018u16.to_be_bytes()); // depth
    p.extend_from_slice(&0xFFFFu16.to_be_bytes()); // pre_defined
    bx(codec, &p)
}

pub fn audio_entry(codec: &[u8; 4], channels: u16, sample_size: u16, rate: u32) -> Vec<u8> {
    let mut p = vec![0u8; 6];
    p.extend_from_slice(&1u16.to_be_bytes());
    p.extend_from_slice(&[0u8; 8]);
    p.extend_from_slice(&channels.to_be_bytes());
    p.extend_from_slice(&sample_size.to_be_bytes());
    p.extend_from_slice(&0u32.to_be_bytes());
    p.extend_from_slice(&(rate << 16).to_be_bytes());
    bx(codec, &p)
}

pub fn stsd(entries: &[Vec<u8>]) -> Vec<u8> {
    let mut p = u32s(&[entries.len() as u32]);
    p.extend_from_slice(&entries.concat());
    full(b"stsd", 0, 0, &p)
}

/// moov > trak > mdia > (mdhd, hdlr, minf > stbl > [stbl children])
pub fn movie(timescale: u32, handler: &[u8; 4], stbl_children: &[Vec<u8>]) -> Vec<u8> {
    let stbl = container(b"stbl", stbl_children);
    let minf = container(b"minf", &[stbl]);
    let mdia = container(b"mdia", &[mdhd(timescale, 0), hdlr(handler, "handler"), minf]);
    let trak = container(b"trak", &[mdia]);
    container(b"moov", &[trak])
}
