use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::proxy::Dialer;
use crate::tor::control::Controller;

pub trait AsyncReadWrite: AsyncRead + AsyncWrite + Unpin + Send + Sync + 'static {}

impl<T> AsyncReadWrite for T where T: AsyncRead + AsyncWrite + Unpin + Send + Sync + 'static {}

impl std::fmt::Debug for dyn AsyncReadWrite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Conn")
    }
}

/// 已建立的连接（TCP、本地 socket 或 SOCKS5 隧道）
pub type Conn = Box<dyn AsyncReadWrite>;

/// 事件参数表，如 `PROGRESS=100`
pub type StringMap = HashMap<String, String>;

pub type SharedDialer = Arc<dyn Dialer>;

pub type SharedController = Arc<dyn Controller>;
