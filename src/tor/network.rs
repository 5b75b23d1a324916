use crate::error::{Error, Result};
use crate::tor::control::{Event, EventCode, KeyVal, Severity};
use crate::tor::Tor;
use crate::util::context::Context;

pub const DISABLE_NETWORK_KEY: &str = "DisableNetwork";

const BOOTSTRAP_ACTION: &str = "BOOTSTRAP";

impl Tor {
    /// 将 DisableNetwork 置为 0，并按需等待 bootstrap 完成
    ///
    /// DisableNetwork 不是 1 时什么也不做。
    pub async fn enable_network(&self, ctx: &Context, wait: bool) -> Result<()> {
        let vals = self
            .request(ctx, |control| control.get_conf(DISABLE_NETWORK_KEY))
            .await?;
        match vals.first() {
            Some(kv) if kv.key == DISABLE_NETWORK_KEY && kv.val == "1" => {}
            _ => {
                log::debug!("[Network] Network not disabled, nothing to enable");
                return Ok(());
            }
        }

        log::info!("[Network] Enabling network");
        self.request(ctx, |control| {
            control.set_conf(&[KeyVal::new(DISABLE_NETWORK_KEY, "0")])
        })
        .await?;

        if !wait {
            return Ok(());
        }

        log::info!("[Network] Waiting for bootstrap to complete");
        self.event_wait(ctx, &[EventCode::StatusClient], bootstrap_progress)
            .await?;
        log::info!("[Network] Bootstrap complete");
        Ok(())
    }
}

/// bootstrap 进度判断：NOTICE 且 PROGRESS=100 为完成，ERR 为失败
pub fn bootstrap_progress(event: &Event) -> Result<bool> {
    let status = match event.as_status() {
        Some(status) if status.action == BOOTSTRAP_ACTION => status,
        _ => return Ok(false),
    };

    match status.severity {
        Severity::Notice => {
            let progress = status.argument("PROGRESS");
            log::debug!("[Network] Bootstrap progress {}", progress.unwrap_or("?"));
            Ok(progress == Some("100"))
        }
        Severity::Err => Err(Error::Remote(format!(
            "failing bootstrapping, tor warning: {}",
            status.argument("WARNING").unwrap_or_default()
        ))),
        _ => Ok(false),
    }
}
