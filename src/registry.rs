use crate::boxes::{BoxHeader, BoxKey, FourCC};
use crate::context::DecodeContext;
use crate::cursor::ByteCursor;
use crate::decoders::*;
use crate::parser::Result;
use crate::payload::Payload;
use std::collections::HashMap;

/// What follows a box's own fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    /// Nothing the tree builder should descend into.
    Leaf,
    /// A list of boxes dispatched through the registry.
    Boxes,
    /// Sample entries, dispatched on the enclosing media's handler type.
    SampleEntries,
}

/// Decoder for the payload of one box type.
///
/// The cursor is positioned right after the generic header and cannot read
/// past the end of the box. Whatever is left unread is skipped by the tree
/// builder, or parsed as children when [`BoxDecoder::nesting`] says so.
pub trait BoxDecoder: Send + Sync {
    fn decode(&self, r: &mut ByteCursor, hdr: &BoxHeader, ctx: &DecodeContext) -> Result<Payload>;

    fn nesting(&self) -> Nesting {
        Nesting::Leaf
    }
}

/// Registry of decoders keyed by `BoxKey` (4CC or UUID), plus sample-entry
/// decoders keyed by handler type.
///
/// The registry is immutable once constructed; use [`Registry::with_decoder`]
/// to build it fluently. Lookups never fail: anything unregistered decodes
/// as an opaque leaf.
pub struct Registry {
    map: HashMap<BoxKey, BoxDecoderEntry>,
    sample_entries: HashMap<FourCC, BoxDecoderEntry>,
}

struct BoxDecoderEntry {
    inner: Box<dyn BoxDecoder>,
    name: String,
}

static OPAQUE: OpaqueDecoder = OpaqueDecoder;

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            sample_entries: HashMap::new(),
        }
    }

    /// Return a new registry with the given decoder added.
    ///
    /// `name` is human-readable and used only for debugging / logging.
    pub fn with_decoder(mut self, key: BoxKey, name: &str, dec: Box<dyn BoxDecoder>) -> Self {
        self.map.insert(
            key,
            BoxDecoderEntry {
                inner: dec,
                name: name.to_string(),
            },
        );
        self
    }

    /// Shorthand for [`Registry::with_decoder`] on a plain 4CC, named after the tag.
    pub fn with_box<D: BoxDecoder + 'static>(self, tag: &[u8; 4], dec: D) -> Self {
        let cc = FourCC(*tag);
        self.with_decoder(BoxKey::FourCC(cc), &cc.to_string(), Box::new(dec))
    }

    /// Return a new registry with a sample-entry decoder for `handler` (e.g. `vide`).
    pub fn with_sample_entry(mut self, handler: FourCC, name: &str, dec: Box<dyn BoxDecoder>) -> Self {
        self.sample_entries.insert(
            handler,
            BoxDecoderEntry {
                inner: dec,
                name: name.to_string(),
            },
        );
        self
    }

    pub fn decoder(&self, key: &BoxKey) -> &dyn BoxDecoder {
        match self.map.get(key) {
            Some(e) => e.inner.as_ref(),
            None => &OPAQUE,
        }
    }

    pub fn sample_entry_decoder(&self, handler: FourCC) -> &dyn BoxDecoder {
        match self.sample_entries.get(&handler) {
            Some(e) => e.inner.as_ref(),
            None => &OPAQUE,
        }
    }

    pub fn name(&self, key: &BoxKey) -> Option<&str> {
        self.map.get(key).map(|e| e.name.as_str())
    }

    pub fn contains(&self, key: &BoxKey) -> bool {
        self.map.contains_key(key)
    }

    /// Decode one payload with whatever decoder `key` maps to.
    pub fn decode(
        &self,
        key: &BoxKey,
        r: &mut ByteCursor,
        hdr: &BoxHeader,
        ctx: &DecodeContext,
    ) -> Result<Payload> {
        self.decoder(key).decode(r, hdr, ctx)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------- Default registry ----------

pub fn default_registry() -> Registry {
    Registry::new()
        // containers
        .with_box(b"moov", ContainerDecoder)
        .with_box(b"trak", ContainerDecoder)
        .with_box(b"edts", ContainerDecoder)
        .with_box(b"mdia", ContainerDecoder)
        .with_box(b"minf", ContainerDecoder)
        .with_box(b"dinf", ContainerDecoder)
        .with_box(b"stbl", ContainerDecoder)
        .with_box(b"mvex", ContainerDecoder)
        .with_box(b"moof", ContainerDecoder)
        .with_box(b"traf", ContainerDecoder)
        .with_box(b"mfra", ContainerDecoder)
        // file level
        .with_box(b"ftyp", FtypDecoder)
        .with_box(b"mdat", MdatDecoder)
        // headers
        .with_box(b"mvhd", MvhdDecoder)
        .with_box(b"tkhd", TkhdDecoder)
        .with_box(b"mdhd", MdhdDecoder)
        .with_box(b"hdlr", HdlrDecoder)
        .with_box(b"vmhd", VmhdDecoder)
        .with_box(b"smhd", SmhdDecoder)
        .with_box(b"hmhd", HmhdDecoder)
        // data references
        .with_box(b"dref", DrefDecoder)
        .with_box(b"url ", UrlDecoder)
        // sample table
        .with_box(b"stsd", StsdDecoder)
        .with_box(b"stts", SttsDecoder)
        .with_box(b"ctts", CttsDecoder)
        .with_box(b"stsz", StszDecoder)
        .with_box(b"stsc", StscDecoder)
        .with_box(b"stco", StcoDecoder)
        .with_box(b"co64", Co64Decoder)
        .with_box(b"stss", StssDecoder)
        .with_sample_entry(FourCC::VIDE, "visual sample entry", Box::new(VisualSampleEntryDecoder))
        .with_sample_entry(FourCC::SOUN, "audio sample entry", Box::new(AudioSampleEntryDecoder))
}
