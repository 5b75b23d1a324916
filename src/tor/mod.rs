pub mod control;
pub mod dialer;
pub mod event_wait;
pub mod network;

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::proxy::{ContextDialer, SystemDialer};
use crate::util::context::Context;
use crate::util::r#type::{Conn, SharedController};
use crate::util::routine::invoke;

pub use control::{ControlError, Controller, Event, EventCode, EventStream, KeyVal, Severity, StatusEvent};
pub use dialer::DialConf;
pub use network::bootstrap_progress;

pub const DEFAULT_CONTROL_PORT: u16 = 9051;

/// 受控 Tor 实例的句柄
///
/// 每个实例持有自己的控制连接，所有操作都显式通过实例调用。
#[derive(Clone)]
pub struct Tor {
    control: SharedController,
}

impl Tor {
    pub fn new(control: SharedController) -> Self {
        Self { control }
    }

    pub fn controller(&self) -> &SharedController {
        &self.control
    }

    /// 在阻塞线程上执行一次控制请求，并受 `ctx` 约束
    pub(crate) async fn request<T, F>(&self, ctx: &Context, f: F) -> Result<T>
    where
        F: FnOnce(&dyn Controller) -> std::result::Result<T, ControlError> + Send + 'static,
        T: Send + 'static,
    {
        let control = Arc::clone(&self.control);
        invoke(ctx, move || f(&*control).map_err(Error::from)).await
    }
}

impl fmt::Debug for Tor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tor").finish_non_exhaustive()
    }
}

/// 连接本机控制端口，得到的连接交给控制协议实现使用
pub async fn dial_control_port(ctx: &Context, port: u16) -> Result<Conn> {
    let port = if port == 0 { DEFAULT_CONTROL_PORT } else { port };
    log::debug!("[Control] Connecting to control port {}", port);

    ContextDialer::new(Arc::new(SystemDialer))
        .dial_context(ctx, "tcp", &format!("127.0.0.1:{}", port))
        .await
}
