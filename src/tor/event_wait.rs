use crate::error::Result;
use crate::tor::control::{ControlError, Event, EventCode};
use crate::tor::Tor;
use crate::util::context::Context;

impl Tor {
    /// 订阅 `codes` 类别的事件，逐条交给 `predicate` 判断
    ///
    /// - `Ok(true)`：条件满足，返回该事件
    /// - `Ok(false)`：继续等待
    /// - `Err(e)`：等待失败，返回 `e`
    ///
    /// 类别不在 `codes` 中的事件直接忽略。`ctx` 触发时返回取消错误，
    /// 订阅随之释放，不再消费后续事件。
    pub async fn event_wait<P>(&self, ctx: &Context, codes: &[EventCode], mut predicate: P) -> Result<Event>
    where
        P: FnMut(&Event) -> Result<bool>,
    {
        let subscribe_codes = codes.to_vec();
        let mut events = self
            .request(ctx, move |control| control.subscribe(&subscribe_codes))
            .await?;
        log::debug!("[EventWait] Subscribed to {:?}", codes);

        loop {
            let next = tokio::select! {
                biased;
                reason = ctx.done() => Err(reason),
                next = events.recv() => Ok(next),
            };
            let next = match next {
                Ok(next) => next,
                Err(reason) => {
                    log::debug!("[EventWait] Context fired ({}), releasing subscription", reason);
                    drop(events);
                    return Err(reason.into());
                }
            };

            let event = match next {
                Some(Ok(event)) => event,
                Some(Err(e)) => return Err(e.into()),
                None => return Err(ControlError::Closed.into()),
            };

            if !codes.contains(event.code()) {
                log::trace!("[EventWait] Ignoring {} event", event.code());
                continue;
            }
            if predicate(&event)? {
                return Ok(event);
            }
        }
    }
}
