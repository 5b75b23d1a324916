use std::future::Future;
use std::io;
use tokio::task::JoinHandle;

use crate::util::context::{Context, ContextError};

/// 在阻塞线程池上执行一次 `f`，并与 `ctx` 竞速
///
/// `f` 先完成时原样返回其结果；`ctx` 先触发时返回取消原因。
/// 阻塞调用不会被中断，取消后它的结果在完成时直接丢弃
/// （连接之类的资源由 Drop 关闭）。
pub async fn invoke<T, E, F>(ctx: &Context, f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<ContextError> + From<io::Error> + Send + 'static,
{
    join_with_context(ctx, tokio::task::spawn_blocking(f)).await
}

/// 同 [`invoke`]，但操作是运行在独立任务上的 future
pub async fn invoke_task<T, E, Fut>(ctx: &Context, fut: Fut) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: From<ContextError> + From<io::Error> + Send + 'static,
{
    join_with_context(ctx, tokio::spawn(fut)).await
}

/// 等待已启动的任务与 `ctx` 中先完成的一方
///
/// `ctx` 先触发时只 detach 任务，不 abort；任务被运行时终止
/// （不是调用方取消）时返回 io 错误。
pub async fn join_with_context<T, E>(ctx: &Context, mut handle: JoinHandle<Result<T, E>>) -> Result<T, E>
where
    T: Send + 'static,
    E: From<ContextError> + From<io::Error> + Send + 'static,
{
    tokio::select! {
        biased;
        reason = ctx.done() => {
            log::debug!("[Invoker] Context fired ({}), detaching task", reason);
            // 丢弃 JoinHandle 即 detach，后台结果由任务自身释放
            drop(handle);
            Err(reason.into())
        }
        joined = &mut handle => match joined {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                log::warn!("[Invoker] Task aborted: {}", e);
                Err(io::Error::new(io::ErrorKind::Interrupted, format!("task aborted: {}", e)).into())
            }
        },
    }
}
