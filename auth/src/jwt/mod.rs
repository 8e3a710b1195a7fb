pub mod claims;
pub mod errors;
pub mod handler;
pub mod issuer;
pub mod validator;

pub use claims::Access;
pub use claims::AccessClaims;
pub use claims::Claims;
pub use claims::Family;
pub use claims::Refresh;
pub use claims::RefreshClaims;
pub use claims::TokenClaims;
pub use claims::TokenFamily;
pub use errors::TokenError;
pub use handler::JwtHandler;
pub use issuer::SignedToken;
pub use issuer::TokenIssuer;
pub use validator::TokenValidator;
