//! 控制端口协作接口
//!
//! 协议的收发与解析不在本 crate 内，这里只定义核心逻辑依赖的最小接口：
//! 同步的配置读写，以及按事件类别订阅的异步通知流。

use std::fmt;
use std::io;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::util::r#type::StringMap;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Io(#[from] io::Error),

    /// 控制端口返回的非 250 应答
    #[error("{code} {message}")]
    Response { code: u16, message: String },

    #[error("control connection closed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyVal {
    pub key: String,
    pub val: String,
}

impl KeyVal {
    pub fn new(key: impl Into<String>, val: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            val: val.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventCode {
    StatusGeneral,
    StatusClient,
    StatusServer,
    Other(String),
}

impl EventCode {
    pub fn as_str(&self) -> &str {
        match self {
            EventCode::StatusGeneral => "STATUS_GENERAL",
            EventCode::StatusClient => "STATUS_CLIENT",
            EventCode::StatusServer => "STATUS_SERVER",
            EventCode::Other(code) => code,
        }
    }
}

impl From<&str> for EventCode {
    fn from(code: &str) -> Self {
        match code {
            "STATUS_GENERAL" => EventCode::StatusGeneral,
            "STATUS_CLIENT" => EventCode::StatusClient,
            "STATUS_SERVER" => EventCode::StatusServer,
            other => EventCode::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Notice,
    Warn,
    Err,
    Other(String),
}

impl From<&str> for Severity {
    fn from(severity: &str) -> Self {
        match severity {
            "DEBUG" => Severity::Debug,
            "INFO" => Severity::Info,
            "NOTICE" => Severity::Notice,
            "WARN" => Severity::Warn,
            "ERR" => Severity::Err,
            other => Severity::Other(other.to_string()),
        }
    }
}

/// STATUS_* 事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub code: EventCode,
    pub severity: Severity,
    pub action: String,
    pub arguments: StringMap,
}

impl StatusEvent {
    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).map(String::as_str)
    }
}

/// 订阅流中的一条通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Status(StatusEvent),
    Other { code: EventCode, raw: String },
}

impl Event {
    pub fn code(&self) -> &EventCode {
        match self {
            Event::Status(status) => &status.code,
            Event::Other { code, .. } => code,
        }
    }

    pub fn as_status(&self) -> Option<&StatusEvent> {
        match self {
            Event::Status(status) => Some(status),
            Event::Other { .. } => None,
        }
    }
}

/// 控制连接
///
/// 请求/应答是单写者的，同一时刻只应有一个组件发起配置读写；
/// 订阅可以与其它请求并存。
pub trait Controller: Send + Sync + 'static {
    /// GETCONF
    fn get_conf(&self, key: &str) -> Result<Vec<KeyVal>, ControlError>;

    /// GETINFO
    fn get_info(&self, key: &str) -> Result<Vec<KeyVal>, ControlError>;

    /// SETCONF
    fn set_conf(&self, entries: &[KeyVal]) -> Result<(), ControlError>;

    /// 订阅指定类别的事件
    ///
    /// 实现方持有发送端，发现发送端已关闭（`Sender::is_closed`）时应取消订阅，
    /// 不再向该流投递通知。
    fn subscribe(&self, codes: &[EventCode]) -> Result<EventStream, ControlError>;
}

/// 订阅得到的事件流
///
/// drop 即释放订阅：发送端随之关闭，后续通知不会再被读取。
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::Receiver<Result<Event, ControlError>>,
}

impl EventStream {
    pub fn new(rx: mpsc::Receiver<Result<Event, ControlError>>) -> Self {
        Self { rx }
    }

    /// 等待下一条通知；发送端全部关闭后返回 `None`
    pub async fn recv(&mut self) -> Option<Result<Event, ControlError>> {
        self.rx.recv().await
    }

    /// 主动关闭，已在通道中的通知仍可读出
    pub fn close(&mut self) {
        self.rx.close();
    }
}
