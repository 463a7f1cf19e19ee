mod cookie_jar;
mod token_store;

pub use cookie_jar::CookieJar;
pub use token_store::{
    session_dir, CredentialsError, TokenStore, COOKIES_FILE, CREDENTIALS_FILE,
};
