//! Product-authoring logic that runs on the admin side before anything is
//! sent to the server: variant combination generation and payload assembly.

mod assembly;
mod variants;

pub use assembly::*;
pub use variants::*;
