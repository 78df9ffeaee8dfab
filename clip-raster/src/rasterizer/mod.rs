mod depth_buffer;
mod frame;
mod line;
mod scanline;
mod texture;

pub use depth_buffer::*;
pub use frame::*;
pub use line::*;
pub use scanline::*;
pub use texture::*;
