//! XML input: owned tree and navigation helpers.

mod node;
mod utils;

pub use node::{parse_document, XmlContent, XmlNode};
pub use utils::{child_element_text, find_children, find_descendants, find_descendants_within};
