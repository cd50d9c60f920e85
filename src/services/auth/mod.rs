pub mod error;
pub mod gate;
pub mod login;
pub mod password;
pub mod principal;
pub mod token;

pub use error::AuthError;
pub use gate::{AuthGate, authorize_or_owner, require};
pub use login::{LoginService, Registration};
pub use password::PasswordHasher;
pub use principal::{Principal, Role};
pub use token::TokenService;
