use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::proxy::Dialer;
use crate::util::context::Context;
use crate::util::r#type::Conn;
use crate::util::routine::invoke_task;

/// 可取消的拨号器
///
/// 每次 `dial_context` 都在独立任务中调用内部拨号器，并与 `ctx` 竞速。
/// `ctx` 先触发时任务继续运行，迟到的连接随结果一起被丢弃。
/// 无内部状态，可 clone 后并发使用。
pub struct ContextDialer<D: Dialer + ?Sized = dyn Dialer> {
    inner: Arc<D>,
}

impl<D: Dialer + ?Sized> ContextDialer<D> {
    pub fn new(inner: Arc<D>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub async fn dial_context(&self, ctx: &Context, network: &str, address: &str) -> Result<Conn> {
        let inner = Arc::clone(&self.inner);
        let network = network.to_string();
        let address = address.to_string();

        invoke_task(ctx, async move { inner.dial(&network, &address).await }).await
    }
}

impl<D: Dialer + ?Sized> Clone for ContextDialer<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<D: Dialer + fmt::Debug + ?Sized> fmt::Debug for ContextDialer<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextDialer").field(&self.inner).finish()
    }
}
