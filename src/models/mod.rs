mod manager;
mod options;
mod product;
mod user;

pub use manager::*;
pub use options::*;
pub use product::*;
pub use user::*;
