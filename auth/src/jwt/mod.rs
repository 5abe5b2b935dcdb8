pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use claims::REFRESH_TOKEN_TYPE;
pub use claims::TOKEN_TYPE_CLAIM;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use handler::SigningAlgorithm;
