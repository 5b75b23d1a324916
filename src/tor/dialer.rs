use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::proxy::{Auth, ContextDialer, Network, ProxyEndpoint, Socks5Dialer};
use crate::tor::Tor;
use crate::util::context::Context;
use crate::util::r#type::SharedDialer;

pub const SOCKS_LISTENERS_KEY: &str = "net/listeners/socks";

/// `Tor::dialer` 的配置，缺省值即可直接使用
#[derive(Clone, Default)]
pub struct DialConf {
    /// SOCKS5 代理地址，为空时通过控制端口查询
    pub proxy_address: Option<String>,

    /// 代理网络类型。仅在显式给出地址时生效，缺省为 tcp
    pub proxy_network: Option<Network>,

    /// 代理认证。Tor 的 SOCKS 端口本身无需认证，
    /// 开启 IsolateSOCKSAuth 时可借此隔离电路
    pub proxy_auth: Option<Auth>,

    /// 跳过 enable network 步骤
    pub skip_enable_network: bool,

    /// 连接代理所用的上游拨号器，缺省直连
    pub forward: Option<SharedDialer>,
}

impl DialConf {
    pub fn with_proxy(address: impl Into<String>) -> Self {
        Self {
            proxy_address: Some(address.into()),
            ..Self::default()
        }
    }
}

impl fmt::Debug for DialConf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialConf")
            .field("proxy_address", &self.proxy_address)
            .field("proxy_network", &self.proxy_network)
            .field("proxy_auth", &self.proxy_auth)
            .field("skip_enable_network", &self.skip_enable_network)
            .field("forward", &self.forward.is_some())
            .finish()
    }
}

impl Tor {
    /// 创建经由 Tor SOCKS5 端口的可取消拨号器
    pub async fn dialer(&self, ctx: &Context, conf: &DialConf) -> Result<ContextDialer<Socks5Dialer>> {
        if !conf.skip_enable_network {
            self.enable_network(ctx, true).await?;
        }

        let endpoint = match &conf.proxy_address {
            Some(address) if !address.is_empty() => {
                ProxyEndpoint::new(conf.proxy_network.unwrap_or(Network::Tcp), address.clone())
            }
            _ => self.socks_endpoint(ctx).await?,
        };
        log::info!("[Dialer] Using SOCKS5 proxy {}", endpoint);

        let socks = Socks5Dialer::new(endpoint, conf.proxy_auth.clone(), conf.forward.clone())?;
        Ok(ContextDialer::new(Arc::new(socks)))
    }

    /// 查询 SOCKS 监听地址，要求恰好一条结果
    pub async fn socks_endpoint(&self, ctx: &Context) -> Result<ProxyEndpoint> {
        let info = self
            .request(ctx, |control| control.get_info(SOCKS_LISTENERS_KEY))
            .await?;

        match info.as_slice() {
            [kv] if kv.key == SOCKS_LISTENERS_KEY => Ok(ProxyEndpoint::from_listener(&kv.val)),
            _ => {
                log::warn!("[Dialer] Unexpected {} reply: {:?}", SOCKS_LISTENERS_KEY, info);
                Err(Error::Resolution("unable to resolve proxy address".to_string()))
            }
        }
    }
}
