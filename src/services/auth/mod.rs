pub mod bearer;
pub mod claims;
pub mod credentials;
pub mod error;
pub mod factory;
pub mod identity;
pub mod jwt;
pub mod resolver;
pub mod verifier;

pub use bearer::strip_bearer_prefix;
pub use claims::{ClaimError, ClaimSet, ClaimValue};
pub use credentials::{CredentialsError, IdTokenCredentials};
pub use error::AuthError;
pub use factory::build_identity_resolver;
pub use identity::{ResolvedIdentity, Role};
pub use jwt::JwtClaimsVerifier;
pub use resolver::IdentityResolver;
pub use verifier::{ClaimsVerifier, VerifierError};
