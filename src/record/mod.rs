mod error;
mod item;
mod loader;


pub use error::LoadError;
pub use item::{Item, ItemId};
pub use loader::{load_items, parse_items};
