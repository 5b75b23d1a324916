pub mod error;
pub mod proxy;
pub mod tor;
pub mod util;

pub use error::{Error, Result};
pub use proxy::{Auth, ContextDialer, Dialer, Network, ProxyEndpoint, Socks5Dialer, SystemDialer};
pub use tor::{DialConf, Tor};
pub use util::{invoke, invoke_task, join_with_context, AsyncReadWrite, Conn, Context, ContextError, PROGRAM_VERSION_NAME};
