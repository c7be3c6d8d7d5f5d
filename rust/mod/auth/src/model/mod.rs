mod oauth;
mod principal;
mod request;

pub use oauth::{OAuthUserInfo, ProviderConfig};
pub use principal::{Principal, SessionRecord};
pub use request::{LoginRequest, RegisterRequest};
