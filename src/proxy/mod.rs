pub mod context_dialer;
pub mod socks5;
pub mod system_dialer;

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::util::r#type::Conn;

pub use context_dialer::ContextDialer;
pub use socks5::{Auth, Socks5Dialer};
pub use system_dialer::SystemDialer;

/// 本地 socket 监听地址的前缀
pub const UNIX_SOCKET_PREFIX: &str = "unix:";

/// 拨号器
///
/// `dial` 一直运行到连接建立或失败为止，自身不响应取消；
/// 需要取消时用 [`ContextDialer`] 包装。
#[async_trait]
pub trait Dialer: Send + Sync + 'static {
    async fn dial(&self, network: &str, address: &str) -> Result<Conn>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Tcp,
    Unix,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Tcp => "tcp",
            Network::Unix => "unix",
        }
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tcp" | "tcp4" | "tcp6" => Ok(Network::Tcp),
            "unix" => Ok(Network::Unix),
            other => Err(Error::UnsupportedNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SOCKS5 代理的监听位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    pub network: Network,
    pub address: String,
}

impl ProxyEndpoint {
    pub fn new(network: Network, address: impl Into<String>) -> Self {
        Self {
            network,
            address: address.into(),
        }
    }

    pub fn tcp(address: impl Into<String>) -> Self {
        Self::new(Network::Tcp, address)
    }

    /// 解析控制端口返回的监听地址，`unix:` 前缀表示本地 socket
    pub fn from_listener(listener: &str) -> Self {
        match listener.strip_prefix(UNIX_SOCKET_PREFIX) {
            Some(path) => Self::new(Network::Unix, path),
            None => Self::tcp(listener),
        }
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.network, self.address)
    }
}

/// 拆分 `host:port` / `[v6]:port`
pub(crate) fn split_host_port(address: &str) -> Option<(&str, u16)> {
    let (host, port) = if let Some(rest) = address.strip_prefix('[') {
        let (host, port) = rest.split_once("]:")?;
        (host, port)
    } else {
        let (host, port) = address.rsplit_once(':')?;
        if host.contains(':') {
            return None;
        }
        (host, port)
    };
    if host.is_empty() {
        return None;
    }
    Some((host, port.parse().ok()?))
}
