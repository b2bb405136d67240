pub mod descriptor;
pub mod identifier;
pub mod normalize;

pub use descriptor::{parse_descriptor, parse_direction};
pub use identifier::{column_path, identifier, parse_column_path, parse_identifier};
pub use normalize::{normalize, NormalizeOptions};
