use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio_socks::tcp::Socks5Stream;

use crate::error::{Error, Result};
use crate::proxy::{split_host_port, Dialer, Network, ProxyEndpoint, SystemDialer};
use crate::util::r#type::{Conn, SharedDialer};

/// RFC 1929 用户名/密码，原样转发给代理
#[derive(Clone, PartialEq, Eq)]
pub struct Auth {
    pub user: String,
    pub password: String,
}

impl Auth {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// 经由 SOCKS5 代理建立 CONNECT 隧道的拨号器
///
/// 到代理的连接由 forward 拨号器建立，因此代理可以是 TCP 端口，
/// 也可以是本地 socket。
pub struct Socks5Dialer {
    endpoint: ProxyEndpoint,
    auth: Option<Auth>,
    forward: SharedDialer,
}

impl Socks5Dialer {
    pub fn new(
        endpoint: ProxyEndpoint,
        auth: Option<Auth>,
        forward: Option<SharedDialer>,
    ) -> Result<Self> {
        if endpoint.address.is_empty() {
            return Err(Error::InvalidProxy("empty proxy address".to_string()));
        }
        if endpoint.network == Network::Tcp && split_host_port(&endpoint.address).is_none() {
            return Err(Error::InvalidProxy(format!(
                "malformed proxy address {:?}",
                endpoint.address
            )));
        }
        if let Some(auth) = &auth {
            if auth.user.is_empty() || auth.user.len() > 255 || auth.password.is_empty() || auth.password.len() > 255 {
                return Err(Error::InvalidProxy(
                    "proxy username and password must be 1-255 bytes".to_string(),
                ));
            }
        }

        Ok(Self {
            endpoint,
            auth,
            forward: forward.unwrap_or_else(|| Arc::new(SystemDialer)),
        })
    }

    pub fn endpoint(&self) -> &ProxyEndpoint {
        &self.endpoint
    }

    pub fn auth(&self) -> Option<&Auth> {
        self.auth.as_ref()
    }
}

#[async_trait]
impl Dialer for Socks5Dialer {
    async fn dial(&self, network: &str, address: &str) -> Result<Conn> {
        match network {
            "tcp" | "tcp4" | "tcp6" => {}
            other => return Err(Error::UnsupportedNetwork(other.to_string())),
        }
        let target = split_host_port(address)
            .ok_or_else(|| Error::InvalidTarget(address.to_string()))?;

        let socket = self
            .forward
            .dial(self.endpoint.network.as_str(), &self.endpoint.address)
            .await?;
        log::debug!("[Socks5] Connected to proxy {}, requesting {}", self.endpoint, address);

        let stream = match &self.auth {
            Some(auth) => {
                Socks5Stream::connect_with_password_and_socket(socket, target, &auth.user, &auth.password)
                    .await?
            }
            None => Socks5Stream::connect_with_socket(socket, target).await?,
        };
        log::debug!("[Socks5] Tunnel to {} established", address);
        Ok(Box::new(stream))
    }
}

impl fmt::Debug for Socks5Dialer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Socks5Dialer")
            .field("endpoint", &self.endpoint)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}
