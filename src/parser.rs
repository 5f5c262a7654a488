use crate::boxes::{BoxHeader, BoxRef, FourCC};
use crate::context::DecodeContext;
use crate::cursor::ByteCursor;
use crate::payload::Payload;
use crate::registry::{Nesting, Registry, default_registry};
use log::{debug, trace, warn};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("truncated input at {offset:#x}: needed {needed} bytes")]
    Truncated { offset: u64, needed: u64 },
    #[error("invalid box size {size} at {offset:#x} (header is {header_size} bytes)")]
    InvalidSize { offset: u64, size: u64, header_size: u64 },
    #[error("box at {offset:#x} ends at {end:#x}, past its parent's end {parent_end:#x}")]
    OutOfBounds { offset: u64, end: u64, parent_end: u64 },
    #[error("box at {offset:#x} nested {depth} levels deep, children not parsed")]
    TooDeep { offset: u64, depth: usize },
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Deepest level whose boxes still have their children parsed.
pub const MAX_DEPTH: usize = 64;

/// Read one generic box header ending no later than `parent_end`.
///
/// Returns `Ok(None)` at a clean end of stream (nothing left to read), and
/// `Truncated` if the stream ends part-way through the header.
pub fn read_box_header(r: &mut ByteCursor, parent_end: u64) -> Result<Option<BoxHeader>> {
    let start = r.tell();
    if start >= r.len() {
        return Ok(None);
    }

    let size32 = r.read_u32()?;
    let typ = r.read_fourcc()?;
    let mut size = size32 as u64;

    if size32 == 1 {
        size = r.read_u64()?;
    }

    let mut uuid = None;
    if typ == FourCC::UUID {
        uuid = Some(r.read_array::<16>()?);
    }

    let header_size = match (size32 == 1, typ == FourCC::UUID) {
        (true, true)  => 8 + 8 + 16,
        (true, false) => 8 + 8,
        (false, true) => 8 + 16,
        (false, false)=> 8,
    } as u64;

    // size 0: box extends to the end of its parent
    let to_end = size == 0;
    if to_end {
        size = parent_end.saturating_sub(start);
    }

    if size < header_size {
        return Err(ParseError::InvalidSize { offset: start, size, header_size });
    }
    let end = start.checked_add(size).unwrap_or(u64::MAX);
    if end > parent_end {
        return Err(ParseError::OutOfBounds { offset: start, end, parent_end });
    }

    Ok(Some(BoxHeader { size, typ, uuid, header_size, start, to_end }))
}

/// Which decoders a box list is dispatched through.
#[derive(Debug, Clone, Copy)]
enum Scope {
    Boxes,
    SampleEntries(FourCC),
}

/// Parse boxes from the cursor's position up to `parent_end`, appending them
/// to the innermost frame of `ctx`.
///
/// The list ends at end of stream, at `parent_end`, or at the first header
/// that is truncated or malformed; anything parsed before that is kept.
pub fn parse_children(r: &mut ByteCursor, reg: &Registry, ctx: &mut DecodeContext, parent_end: u64) {
    parse_list(r, reg, ctx, parent_end, Scope::Boxes)
}

fn parse_list(r: &mut ByteCursor, reg: &Registry, ctx: &mut DecodeContext, parent_end: u64, scope: Scope) {
    let outer = r.set_limit(parent_end);
    while r.tell() < parent_end {
        let h = match read_box_header(r, parent_end) {
            Ok(Some(h)) => h,
            Ok(None) => break,
            Err(e) => {
                warn!("stopping box list at depth {}: {}", ctx.depth(), e);
                break;
            }
        };
        trace!("{} at {:#x}, size {}", h.typ, h.start, h.size);

        let box_end = h.end();
        let node = parse_box(r, reg, ctx, h, scope);
        ctx.push(node);

        // Skip to end of box, whatever the decoder consumed
        if let Err(e) = r.seek(box_end) {
            warn!("cannot seek to {:#x}: {}", box_end, e);
            break;
        }
    }
    r.set_limit(outer);
}

fn parse_box(r: &mut ByteCursor, reg: &Registry, ctx: &mut DecodeContext, h: BoxHeader, scope: Scope) -> BoxRef {
    let box_end = h.end();
    let outer = r.set_limit(box_end);

    let dec = match scope {
        Scope::Boxes => reg.decoder(&h.key()),
        Scope::SampleEntries(handler) => reg.sample_entry_decoder(handler),
    };

    let payload = match dec.decode(r, &h, ctx) {
        Ok(p) => p,
        Err(e) => {
            debug!("{} at {:#x}: decoder failed, keeping as opaque ({})", h.typ, h.start, e);
            Payload::Opaque
        }
    };

    let children = match dec.nesting() {
        Nesting::Leaf => Vec::new(),
        _ if ctx.depth() >= MAX_DEPTH => {
            let e = ParseError::TooDeep { offset: h.start, depth: ctx.depth() };
            warn!("{} {}", h.typ, e);
            Vec::new()
        }
        nesting => {
            let scope = match nesting {
                Nesting::SampleEntries => Scope::SampleEntries(ctx.handler_type()),
                _ => Scope::Boxes,
            };
            ctx.enter(h.typ);
            parse_list(r, reg, ctx, box_end, scope);
            ctx.leave()
        }
    };

    r.set_limit(outer);
    BoxRef { hdr: h, payload, children }
}

/// Parse the whole stream with the given registry.
pub fn parse_with(r: &mut ByteCursor, reg: &Registry) -> Vec<BoxRef> {
    let mut ctx = DecodeContext::new();
    let end = r.len();
    parse_children(r, reg, &mut ctx, end);
    ctx.into_roots()
}

/// Parse the whole stream with the default registry.
pub fn parse(r: &mut ByteCursor) -> Vec<BoxRef> {
    parse_with(r, &default_registry())
}

/// Open `path` read-only and parse it. The file is closed before returning.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<BoxRef>> {
    let mut r = ByteCursor::open(path)?;
    Ok(parse(&mut r))
}
