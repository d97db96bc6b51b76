//! Authentication and authorization module

pub mod carrier;
pub mod jwt;
pub mod middleware;
pub mod ownership;
pub mod password;

pub use carrier::{clear_session_cookie, extract_token, session_cookie, SESSION_COOKIE};
pub use jwt::{Claims, JwtService, SharedTokenCodec, TokenCodec, VerificationError, SESSION_TTL_SECS};
pub use middleware::{optional_auth, require_auth, require_role, AuthContext};
pub use ownership::{can_manage, ensure_can_manage, Owned};
pub use password::PasswordHasher;
