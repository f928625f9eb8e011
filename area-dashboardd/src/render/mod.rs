pub mod card;
pub mod format;
pub mod hash;
pub mod status;

pub use card::render_grid;
