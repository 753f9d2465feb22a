mod decoded;
mod header;
#[allow(clippy::module_inception)]
mod token;

pub use decoded::{DecodedToken, Verification};
pub use header::Header;
pub use token::{generate_token, Token};
