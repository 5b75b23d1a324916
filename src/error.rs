use std::io;
use thiserror::Error;

use crate::tor::control::ControlError;
use crate::util::context::ContextError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// 代理地址无法唯一确定
    #[error("{0}")]
    Resolution(String),

    /// 与控制端口之间的请求失败
    #[error("control request failed: {0}")]
    Transport(#[from] ControlError),

    /// 受控进程报告的错误
    #[error("{0}")]
    Remote(String),

    #[error(transparent)]
    Cancelled(#[from] ContextError),

    #[error("invalid proxy configuration: {0}")]
    InvalidProxy(String),

    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("invalid target address {0:?}")]
    InvalidTarget(String),

    #[error("socks5: {0}")]
    Socks(#[from] tokio_socks::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// 区分"调用方放弃"与"操作失败"
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled(_))
    }

    pub fn context_error(&self) -> Option<ContextError> {
        match self {
            Error::Cancelled(reason) => Some(*reason),
            _ => None,
        }
    }
}
