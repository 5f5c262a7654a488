pub mod boxes;
pub mod context;
pub mod cursor;
pub mod decoders;
pub mod json_api;
pub mod mac_lang;
pub mod parser;
pub mod payload;
pub mod registry;
pub mod util;

pub use boxes::{BoxHeader, BoxKey, BoxRef, FourCC};
pub use context::DecodeContext;
pub use cursor::ByteCursor;
pub use json_api::{JsonBox, analyze_file, to_json_tree};
pub use parser::{MAX_DEPTH, ParseError, parse, parse_children, parse_file, parse_with, read_box_header};
pub use payload::Payload;
pub use registry::{BoxDecoder, Nesting, Registry, default_registry};
