pub mod errors;

pub use errors::HttpError;
