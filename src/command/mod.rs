mod build;
mod emit;
mod flash;
mod normalize;
mod render;
mod validate;

pub use build::build;
pub use emit::emit;
pub use flash::flash;
pub use normalize::normalize;
pub use render::render;
pub use validate::validate;
