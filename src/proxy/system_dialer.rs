use async_trait::async_trait;
use tokio::net::TcpStream;

#[cfg(unix)]
use tokio::net::UnixStream;

#[cfg(not(unix))]
use crate::error::Error;
use crate::error::Result;
use crate::proxy::{Dialer, Network};
use crate::util::r#type::Conn;

/// 直连拨号器，SOCKS5 未指定 forward 时使用
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDialer;

#[async_trait]
impl Dialer for SystemDialer {
    async fn dial(&self, network: &str, address: &str) -> Result<Conn> {
        match network.parse::<Network>()? {
            Network::Tcp => {
                let stream = TcpStream::connect(address).await?;
                stream.set_nodelay(true)?;
                Ok(Box::new(stream))
            }
            #[cfg(unix)]
            Network::Unix => Ok(Box::new(UnixStream::connect(address).await?)),
            #[cfg(not(unix))]
            Network::Unix => Err(Error::UnsupportedNetwork(network.to_string())),
        }
    }
}
