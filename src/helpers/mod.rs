mod commands;
mod load_dotenv;

pub use commands::run_idf;
pub use load_dotenv::load_dotenv;

pub mod base_path;
