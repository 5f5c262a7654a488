use crate::boxes::{BoxRef, FourCC};
use crate::payload::Payload;

/// One open level of the tree: a container being filled with children.
#[derive(Debug)]
pub struct Frame {
    typ: Option<FourCC>, // None for the file root
    children: Vec<BoxRef>,
}

impl Frame {
    pub fn typ(&self) -> Option<FourCC> {
        self.typ
    }

    /// Children completed so far at this level.
    pub fn children(&self) -> &[BoxRef] {
        &self.children
    }

    pub fn child(&self, typ: FourCC) -> Option<&BoxRef> {
        self.children.iter().find(|c| c.hdr.typ == typ)
    }

    /// Timescale from an `mdhd` child, defaulting to 1.
    pub fn timescale(&self) -> u32 {
        match self.child(FourCC::MDHD).map(|b| &b.payload) {
            Some(Payload::Mdhd(m)) => m.timescale,
            _ => 1,
        }
    }

    /// Handler type from an `hdlr` child, defaulting to `und `.
    pub fn handler_type(&self) -> FourCC {
        match self.child(FourCC::HDLR).map(|b| &b.payload) {
            Some(Payload::Hdlr(h)) => h.handler_type,
            _ => FourCC::UND,
        }
    }
}

/// Path from the file root down to the box currently being decoded.
///
/// The tree builder pushes a frame when it descends into a box with children
/// and pops it when that box is complete, so decoders can look at what their
/// ancestors have decoded so far.
#[derive(Debug)]
pub struct DecodeContext {
    frames: Vec<Frame>,
}

impl DecodeContext {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                typ: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub(crate) fn enter(&mut self, typ: FourCC) {
        self.frames.push(Frame {
            typ: Some(typ),
            children: Vec::new(),
        });
    }

    /// Close the innermost level and hand back its children.
    pub(crate) fn leave(&mut self) -> Vec<BoxRef> {
        if self.frames.len() > 1 {
            self.frames.pop().map(|f| f.children).unwrap_or_default()
        } else {
            Vec::new()
        }
    }

    pub(crate) fn push(&mut self, node: BoxRef) {
        if let Some(top) = self.frames.last_mut() {
            top.children.push(node);
        }
    }

    /// Take the finished root list.
    pub(crate) fn into_roots(mut self) -> Vec<BoxRef> {
        self.frames.truncate(1);
        self.frames.pop().map(|f| f.children).unwrap_or_default()
    }

    /// Nearest enclosing box of the given type.
    pub fn ancestor(&self, typ: FourCC) -> Option<&Frame> {
        self.frames.iter().rev().find(|f| f.typ == Some(typ))
    }

    /// Timescale of the enclosing media, or 1 outside of any `mdia`.
    pub fn media_timescale(&self) -> u32 {
        self.ancestor(FourCC::MDIA).map_or(1, Frame::timescale)
    }

    /// Handler type of the enclosing media, or `und ` outside of any `mdia`.
    pub fn handler_type(&self) -> FourCC {
        self.ancestor(FourCC::MDIA).map_or(FourCC::UND, Frame::handler_type)
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new()
    }
}
