use crate::payload::Payload;
use byteorder::{BigEndian, WriteBytesExt};
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const UUID: FourCC = FourCC(*b"uuid");
    pub const MDIA: FourCC = FourCC(*b"mdia");
    pub const MDHD: FourCC = FourCC(*b"mdhd");
    pub const HDLR: FourCC = FourCC(*b"hdlr");
    pub const VIDE: FourCC = FourCC(*b"vide");
    pub const SOUN: FourCC = FourCC(*b"soun");
    pub const UND: FourCC = FourCC(*b"und ");

    pub fn as_str_lossy(&self) -> String {
        self.0
            .iter()
            .map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("not a four-character code: {0:?}")]
pub struct InvalidFourCC(pub String);

impl FromStr for FourCC {
    type Err = InvalidFourCC;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match *s.as_bytes() {
            [a, b, c, d] => Ok(FourCC([a, b, c, d])),
            _ => Err(InvalidFourCC(s.to_string())),
        }
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl serde::Serialize for FourCC {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.as_str_lossy())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxHeader {
    pub size: u64,          // resolved total size including header
    pub typ: FourCC,        // 4CC or b"uuid"
    pub uuid: Option<[u8; 16]>,
    pub header_size: u64,   // 8, 16, 24 or 32
    pub start: u64,         // file offset of header start
    pub to_end: bool,       // declared size was 0 (box runs to the end of its parent)
}

impl BoxHeader {
    pub fn end(&self) -> u64 {
        self.start + self.size
    }

    pub fn payload_start(&self) -> u64 {
        self.start + self.header_size
    }

    pub fn large(&self) -> bool {
        let uuid_len = if self.uuid.is_some() { 16 } else { 0 };
        self.header_size - uuid_len == 16
    }

    pub fn key(&self) -> BoxKey {
        match self.uuid {
            Some(u) => BoxKey::Uuid(u),
            None => BoxKey::FourCC(self.typ),
        }
    }

    /// Re-encode the header exactly as it was declared.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header_size as usize);
        // writes into a Vec cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut Vec<u8>) -> std::io::Result<()> {
        if self.large() {
            out.write_u32::<BigEndian>(1)?;
        } else if self.to_end {
            out.write_u32::<BigEndian>(0)?;
        } else {
            out.write_u32::<BigEndian>(self.size as u32)?;
        }
        out.extend_from_slice(&self.typ.0);
        if self.large() {
            out.write_u64::<BigEndian>(if self.to_end { 0 } else { self.size })?;
        }
        if let Some(u) = self.uuid {
            out.extend_from_slice(&u);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoxKey {
    FourCC(FourCC),
    Uuid([u8; 16]),
}

/// One decoded box: generic header, typed payload and owned children.
#[derive(Debug, Clone)]
pub struct BoxRef {
    pub hdr: BoxHeader,
    pub payload: Payload,
    pub children: Vec<BoxRef>,
}

impl BoxRef {
    pub fn typ(&self) -> FourCC {
        self.hdr.typ
    }

    pub fn type_str(&self) -> String {
        self.hdr.typ.to_string()
    }

    pub fn offset(&self) -> u64 {
        self.hdr.start
    }

    pub fn size(&self) -> u64 {
        self.hdr.size
    }

    pub fn extended_type(&self) -> Option<[u8; 16]> {
        self.hdr.uuid
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn children(&self) -> &[BoxRef] {
        &self.children
    }

    /// First direct child of the given type.
    pub fn child(&self, typ: FourCC) -> Option<&BoxRef> {
        self.children.iter().find(|c| c.hdr.typ == typ)
    }

    /// Follow a path of types through first matching children, e.g. `["trak", "mdia", "mdhd"]`.
    pub fn find_path(&self, path: &[&str]) -> Option<&BoxRef> {
        path.iter().try_fold(self, |b, name| b.child(name.parse().ok()?))
    }

    pub fn detail(&self) -> String {
        self.payload.detail()
    }
}
