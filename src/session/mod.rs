//! Stateless signed-cookie sessions
//!
//! The session cookie carries the user's [`Identity`] signed with a server
//! secret; validity is purely signature plus age, with no server-side store.

mod codec;
mod cookie;
mod identity;

pub use codec::SessionCodec;
pub use cookie::{CookiePolicy, SESSION_COOKIE, SESSION_MAX_AGE_SECS, STATE_COOKIE};
pub use identity::Identity;
