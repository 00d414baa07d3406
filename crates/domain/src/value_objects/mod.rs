//! Value objects - Immutable objects defined by their attributes

mod id_list;
mod media_path;

pub use id_list::{encode_id_list, parse_id_list};
pub use media_path::{MediaPath, BUNDLED_TAG};
