mod common;

use common::*;
use mp4walk::boxes::{BoxHeader, BoxRef, FourCC};
use mp4walk::context::DecodeContext;
use mp4walk::cursor::ByteCursor;
use mp4walk::parser::{MAX_DEPTH, ParseError, Result, parse, parse_file, parse_with};
use mp4walk::payload::Payload;
use mp4walk::registry::{BoxDecoder, default_registry};
use std::fs::File;
use std::io::Write;

fn parse_bytes(data: Vec<u8>) -> Vec<BoxRef> {
    parse(&mut ByteCursor::from_bytes(data))
}

fn types(boxes: &[BoxRef]) -> Vec<String> {
    boxes.iter().map(|b| b.type_str()).collect()
}

/// Every child lies inside its parent, recursively.
fn assert_within(b: &BoxRef) {
    for c in b.children() {
        assert!(c.offset() >= b.hdr.payload_start(), "{} starts before its parent payload", c.typ());
        assert!(c.hdr.end() <= b.hdr.end(), "{} ends past its parent", c.typ());
        assert_within(c);
    }
}

#[test]
fn single_ftyp_file() {
    let roots = parse_bytes(ftyp());
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].typ(), FourCC(*b"ftyp"));
    assert_eq!(roots[0].offset(), 0);
    assert_eq!(roots[0].size(), 24);

    let detail = roots[0].detail();
    assert!(detail.contains("major brand: isom"), "{detail}");
    assert!(detail.contains("minor version: 512"), "{detail}");
    assert!(detail.contains("compatible brands: isom"), "{detail}");
}

#[test]
fn empty_input_has_no_roots() {
    assert!(parse_bytes(Vec::new()).is_empty());
}

#[test]
fn stts_uses_enclosing_media_timescale() {
    let roots = parse_bytes(movie(90000, b"vide", &[stts(&[(10, 3000)])]));
    let stts = roots[0]
        .find_path(&["trak", "mdia", "minf", "stbl", "stts"])
        .expect("stts");
    match &stts.payload {
        Payload::Stts(t) => {
            assert_eq!(t.timescale, 90000);
            assert_eq!(t.entries.len(), 1);
        }
        other => panic!("expected stts, got {:?}", other),
    }
    assert!(stts.detail().contains("timescale: 90000"));
}

#[test]
fn stts_outside_media_defaults_to_timescale_1() {
    let roots = parse_bytes(container(b"stbl", &[stts(&[(1, 1)])]));
    match &roots[0].children()[0].payload {
        Payload::Stts(t) => assert_eq!(t.timescale, 1),
        other => panic!("expected stts, got {:?}", other),
    }
}

#[test]
fn ctts_uses_enclosing_media_timescale() {
    let ctts = full(b"ctts", 0, 0, &u32s(&[1, 5, 1024]));
    let roots = parse_bytes(movie(44100, b"soun", &[ctts]));
    let ctts = roots[0].find_path(&["trak", "mdia", "minf", "stbl", "ctts"]).unwrap();
    match &ctts.payload {
        Payload::Ctts(c) => assert_eq!(c.timescale, 44100),
        other => panic!("expected ctts, got {:?}", other),
    }
}

#[test]
fn video_sample_entries_follow_the_handler() {
    let entry = video_entry(b"avc1", 1920, 1080, "x264");
    let roots = parse_bytes(movie(90000, b"vide", &[stsd(&[entry])]));
    let stsd = roots[0].find_path(&["trak", "mdia", "minf", "stbl", "stsd"]).unwrap();

    match &stsd.payload {
        Payload::Stsd(s) => assert_eq!(s.entry_count, 1),
        other => panic!("expected stsd, got {:?}", other),
    }
    assert_eq!(types(stsd.children()), vec!["avc1"]);
    match &stsd.children()[0].payload {
        Payload::VideoEntry(v) => {
            assert_eq!(v.base.data_reference_index, 1);
            assert_eq!(v.width, 1920);
            assert_eq!(v.height, 1080);
            assert_eq!(v.horiz_resolution, 72.0);
            assert_eq!(v.frame_count, 1);
            assert_eq!(v.compressor_name, "x264");
            assert_eq!(v.depth, 0x18);
        }
        other => panic!("expected visual entry, got {:?}", other),
    }
}

#[test]
fn audio_sample_entries_follow_the_handler() {
    let entry = audio_entry(b"mp4a", 2, 16, 48000);
    let roots = parse_bytes(movie(48000, b"soun", &[stsd(&[entry])]));
    let stsd = roots[0].find_path(&["trak", "mdia", "minf", "stbl", "stsd"]).unwrap();
    match &stsd.children()[0].payload {
        Payload::AudioEntry(a) => {
            assert_eq!(a.channel_count, 2);
            assert_eq!(a.sample_size, 16);
            assert_eq!(a.sample_rate, 48000.0);
        }
        other => panic!("expected audio entry, got {:?}", other),
    }
}

#[test]
fn unknown_handler_keeps_sample_entries_opaque() {
    let entry = bx(b"tx3g", &[0u8; 16]);
    let roots = parse_bytes(movie(1000, b"text", &[stsd(&[entry])]));
    let stsd = roots[0].find_path(&["trak", "mdia", "minf", "stbl", "stsd"]).unwrap();
    assert_eq!(types(stsd.children()), vec!["tx3g"]);
    assert!(matches!(stsd.children()[0].payload, Payload::Opaque));
}

#[test]
fn unknown_box_is_skipped_by_size() {
    let data = [bx(b"zzzz", &[0xFF; 13]), ftyp()].concat();
    let roots = parse_bytes(data);
    assert_eq!(types(&roots), vec!["zzzz", "ftyp"]);
    assert!(matches!(roots[0].payload, Payload::Opaque));
    assert_eq!(roots[1].offset(), 21);
    assert!(matches!(roots[1].payload, Payload::Ftyp(_)));
}

#[test]
fn payload_reads_stay_inside_the_box() {
    // stco claims four offsets but only holds one; the next sibling must not be read as offsets
    let stco = full(b"stco", 0, 0, &u32s(&[4, 100]));
    let data = container(b"stbl", &[stco, stts(&[(7, 9)])]);
    let roots = parse_bytes(data);
    let stbl = &roots[0];
    assert_eq!(types(stbl.children()), vec!["stco", "stts"]);
    match &stbl.children()[0].payload {
        Payload::Stco(c) => assert_eq!(c.chunk_offsets, vec![100]),
        other => panic!("expected stco, got {:?}", other),
    }
    match &stbl.children()[1].payload {
        Payload::Stts(t) => assert_eq!(t.entries[0].sample_count, 7),
        other => panic!("expected stts, got {:?}", other),
    }
}

#[test]
fn child_past_parent_end_stops_that_level_only() {
    // second child declares 64 bytes inside a parent that cannot hold them
    let mut bad = bx(b"free", &[0u8; 4]);
    bad[..4].copy_from_slice(&64u32.to_be_bytes());
    let moov = container(b"moov", &[bx(b"free", &[]), bad]);
    let data = [moov, ftyp()].concat();

    let roots = parse_bytes(data);
    assert_eq!(types(&roots), vec!["moov", "ftyp"]);
    assert_eq!(types(roots[0].children()), vec!["free"]);
}

#[test]
fn truncated_file_keeps_complete_roots() {
    let mut data = ftyp();
    data.extend_from_slice(&100u32.to_be_bytes());
    data.extend_from_slice(b"moov");
    data.extend_from_slice(&[0u8; 10]);

    let roots = parse_bytes(data);
    assert_eq!(types(&roots), vec!["ftyp"]);
}

#[test]
fn size_zero_box_runs_to_end_of_file() {
    let mut mdat = 0u32.to_be_bytes().to_vec();
    mdat.extend_from_slice(b"mdat");
    mdat.extend_from_slice(&[0xAB; 40]);
    let roots = parse_bytes([ftyp(), mdat].concat());

    assert_eq!(types(&roots), vec!["ftyp", "mdat"]);
    assert!(roots[1].hdr.to_end);
    assert_eq!(roots[1].size(), 48);
    match &roots[1].payload {
        Payload::MediaData(m) => {
            assert_eq!(m.data_offset, 32);
            assert_eq!(m.data_len, 40);
        }
        other => panic!("expected mdat, got {:?}", other),
    }
}

#[test]
fn children_lie_within_their_parents() {
    let stbl_children = [
        stsd(&[video_entry(b"avc1", 640, 480, "")]),
        stts(&[(3, 1000)]),
        full(b"stsz", 0, 0, &u32s(&[0, 3, 10, 20, 30])),
        full(b"stco", 0, 0, &u32s(&[1, 48])),
    ];
    let data = [ftyp(), movie(30000, b"vide", &stbl_children)].concat();
    let roots = parse_bytes(data);
    assert_eq!(types(&roots), vec!["ftyp", "moov"]);
    for r in &roots {
        assert_within(r);
    }
    let stbl = roots[1].find_path(&["trak", "mdia", "minf", "stbl"]).unwrap();
    assert_eq!(types(stbl.children()), vec!["stsd", "stts", "stsz", "stco"]);
}

#[test]
fn data_reference_entries_are_children() {
    let dref = full(b"dref", 0, 0, &[u32s(&[1]), full(b"url ", 0, 1, &[])].concat());
    let roots = parse_bytes(container(b"dinf", &[dref]));
    let dref = roots[0].child(FourCC(*b"dref")).unwrap();
    match &dref.payload {
        Payload::Dref(d) => assert_eq!(d.entry_count, 1),
        other => panic!("expected dref, got {:?}", other),
    }
    match &dref.children()[0].payload {
        Payload::Url(u) => assert!(u.self_contained()),
        other => panic!("expected url, got {:?}", other),
    }
}

#[test]
fn mdhd_after_minf_is_not_seen() {
    // mdhd decoded after the sample table: stts falls back to 1
    let minf = container(b"minf", &[container(b"stbl", &[stts(&[(1, 1)])])]);
    let mdia = container(b"mdia", &[minf, mdhd(600, 0)]);
    let roots = parse_bytes(mdia);
    let stts = roots[0].find_path(&["minf", "stbl", "stts"]).unwrap();
    match &stts.payload {
        Payload::Stts(t) => assert_eq!(t.timescale, 1),
        other => panic!("expected stts, got {:?}", other),
    }
}

#[test]
fn parse_file_from_disk() {
    let path = std::env::temp_dir().join("mp4walk_tree_parse_file.mp4");
    let mut f = File::create(&path).expect("create temp file failed");
    f.write_all(&[ftyp(), bx(b"free", &[])].concat()).expect("write temp data failed");
    drop(f);

    let roots = parse_file(&path).expect("parse_file failed");
    assert_eq!(types(&roots), vec!["ftyp", "free"]);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = parse_file("/nonexistent/mp4walk/missing.mp4").unwrap_err();
    assert!(matches!(err, ParseError::Io(_)));
}

#[test]
fn deep_nesting_stops_at_max_depth() {
    // each moov wraps all the ones after it
    let n: u64 = 100_000;
    let mut data = Vec::with_capacity(n as usize * 8);
    for i in 0..n {
        data.extend_from_slice(&(((n - i) * 8) as u32).to_be_bytes());
        data.extend_from_slice(b"moov");
    }
    data.extend_from_slice(&ftyp());
    let first_end = n * 8;

    let roots = parse_bytes(data);
    assert_eq!(types(&roots), vec!["moov", "ftyp"]);
    assert_eq!(roots[1].offset(), first_end);

    let mut levels = 1;
    let mut b = &roots[0];
    while let Some(c) = b.children().first() {
        b = c;
        levels += 1;
    }
    assert_eq!(levels, MAX_DEPTH + 1);
    assert!(matches!(b.payload, Payload::Container));
}

struct FailingDecoder;

impl BoxDecoder for FailingDecoder {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, _ctx: &DecodeContext) -> Result<Payload> {
        r.read_u32()?;
        Err(ParseError::Truncated { offset: hdr.start, needed: 64 })
    }
}

#[test]
fn failing_decoder_is_contained_to_its_box() {
    let reg = default_registry().with_box(b"bad!", FailingDecoder);
    let data = [bx(b"bad!", &[1, 2, 3, 4]), bx(b"free", &[])].concat();
    let roots = parse_with(&mut ByteCursor::from_bytes(data), &reg);

    let found: Vec<(String, u64)> = roots.iter().map(|b| (b.type_str(), b.offset())).collect();
    assert_eq!(found, vec![("bad!".to_string(), 0), ("free".to_string(), 12)]);
    assert!(matches!(roots[0].payload, Payload::Opaque));
    assert!(roots[0].children().is_empty());
}
