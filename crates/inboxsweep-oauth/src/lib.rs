//! # inboxsweep-oauth
//!
//! `OAuth2` authorization for installed desktop apps talking to Gmail.
//!
//! ## Features
//!
//! - **Client secrets**: parse the `credentials.json` downloaded from the
//!   Google Cloud console
//! - **Authorization Code Flow** with PKCE and a loopback redirect receiver
//! - **Token management**: expiry checking and refresh
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use inboxsweep_oauth::{AuthorizationCodeFlow, ClientSecrets};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let secrets = ClientSecrets::from_file("credentials.json").await?;
//!     let token = AuthorizationCodeFlow::run_local_server(
//!         secrets.oauth_client()?,
//!         |url| println!("Visit: {url}"),
//!         Duration::from_secs(300),
//!     )
//!     .await?;
//!
//!     if token.is_expired() {
//!         let token = secrets.oauth_client()?.refresh_token(&token).await?;
//!         println!("Refreshed, expires at {:?}", token.expires_at);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod flow;
pub mod provider;
pub mod secrets;
pub mod token;

pub use error::{Error, Result};
pub use flow::{AuthorizationCodeFlow, LoopbackReceiver, OAuthClient, PkceChallenge, Redirect};
pub use provider::{GMAIL_MODIFY_SCOPE, Provider};
pub use secrets::ClientSecrets;
pub use token::Token;
