use crate::{
    boxes::BoxRef,
    parser::parse_file,
    payload::Payload,
};
use serde::Serialize;
use std::path::Path;

/// A JSON-serializable representation of a single MP4 box.
///
/// This is designed for use in UIs and for JSON output in tools like `mp4dump`.
#[derive(Serialize)]
pub struct JsonBox<'a> {
    pub offset: u64,
    pub size: u64,
    pub header_size: u64,
    pub payload_offset: u64,
    pub payload_size: u64,

    pub typ: String,
    /// Extended type of `uuid` boxes, hex encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub detail: String,
    pub payload: &'a Payload,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonBox<'a>>,
}

impl<'a> From<&'a BoxRef> for JsonBox<'a> {
    fn from(b: &'a BoxRef) -> Self {
        let hdr = &b.hdr;
        JsonBox {
            offset: hdr.start,
            size: hdr.size,
            header_size: hdr.header_size,
            payload_offset: hdr.payload_start(),
            payload_size: hdr.size - hdr.header_size,
            typ: hdr.typ.to_string(),
            uuid: hdr.uuid.map(hex::encode),
            detail: b.detail(),
            payload: &b.payload,
            children: to_json_tree(&b.children),
        }
    }
}

pub fn to_json_tree(boxes: &[BoxRef]) -> Vec<JsonBox<'_>> {
    boxes.iter().map(JsonBox::from).collect()
}

/// Parse a file and render its box tree as pretty-printed JSON.
pub fn analyze_file(path: impl AsRef<Path>) -> anyhow::Result<String> {
    let boxes = parse_file(path)?;
    Ok(serde_json::to_string_pretty(&to_json_tree(&boxes))?)
}
