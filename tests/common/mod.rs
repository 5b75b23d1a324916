#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::sync::mpsc;

use tordial::tor::{ControlError, Controller, Event, EventCode, EventStream, KeyVal, Severity, StatusEvent};

/// 记录所有调用的 Controller 替身
#[derive(Default)]
pub struct MockController {
    calls: Mutex<Vec<String>>,
    conf: Mutex<HashMap<String, Vec<KeyVal>>>,
    info: Mutex<HashMap<String, Vec<KeyVal>>>,
    fail_set: Mutex<bool>,
    events: Mutex<Option<mpsc::Receiver<Result<Event, ControlError>>>>,
}

impl MockController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conf(self, key: &str, vals: Vec<KeyVal>) -> Self {
        self.conf.lock().unwrap().insert(key.to_string(), vals);
        self
    }

    pub fn with_info(self, key: &str, vals: Vec<KeyVal>) -> Self {
        self.info.lock().unwrap().insert(key.to_string(), vals);
        self
    }

    pub fn network_disabled(self) -> Self {
        self.with_conf("DisableNetwork", vec![KeyVal::new("DisableNetwork", "1")])
    }

    pub fn failing_set(self) -> Self {
        *self.fail_set.lock().unwrap() = true;
        self
    }

    /// 事件源；发送端被 drop 后流结束
    pub fn event_feed(&self) -> EventFeed {
        let (tx, rx) = mpsc::channel(64);
        *self.events.lock().unwrap() = Some(rx);
        EventFeed { tx }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Controller for MockController {
    fn get_conf(&self, key: &str) -> Result<Vec<KeyVal>, ControlError> {
        self.record(format!("get_conf {}", key));
        Ok(self.conf.lock().unwrap().get(key).cloned().unwrap_or_default())
    }

    fn get_info(&self, key: &str) -> Result<Vec<KeyVal>, ControlError> {
        self.record(format!("get_info {}", key));
        Ok(self.info.lock().unwrap().get(key).cloned().unwrap_or_default())
    }

    fn set_conf(&self, entries: &[KeyVal]) -> Result<(), ControlError> {
        let pairs: Vec<String> = entries.iter().map(|kv| format!("{}={}", kv.key, kv.val)).collect();
        self.record(format!("set_conf {}", pairs.join(" ")));
        if *self.fail_set.lock().unwrap() {
            return Err(ControlError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "write failed")));
        }
        Ok(())
    }

    fn subscribe(&self, codes: &[EventCode]) -> Result<EventStream, ControlError> {
        let names: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        self.record(format!("subscribe {}", names.join(" ")));
        match self.events.lock().unwrap().take() {
            Some(rx) => Ok(EventStream::new(rx)),
            None => Err(ControlError::Response {
                code: 552,
                message: "no event feed".to_string(),
            }),
        }
    }
}

/// 订阅的发送端，模拟控制连接上的异步通知
pub struct EventFeed {
    tx: mpsc::Sender<Result<Event, ControlError>>,
}

impl EventFeed {
    /// 投递一条通知；订阅已释放时返回 false
    pub fn push(&self, event: Event) -> bool {
        self.tx.try_send(Ok(event)).is_ok()
    }

    pub fn push_error(&self, error: ControlError) -> bool {
        self.tx.try_send(Err(error)).is_ok()
    }

    /// 接收端（订阅）是否已被 drop
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub fn status(code: EventCode, severity: &str, action: &str, args: &[(&str, &str)]) -> Event {
    Event::Status(StatusEvent {
        code,
        severity: Severity::from(severity),
        action: action.to_string(),
        arguments: args
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    })
}

pub fn bootstrap(severity: &str, args: &[(&str, &str)]) -> Event {
    status(EventCode::StatusClient, severity, "BOOTSTRAP", args)
}

/// 假 SOCKS5 服务端的行为
#[derive(Clone, Default)]
pub struct FakeSocksOptions {
    pub credentials: Option<(String, String)>,
    /// CONNECT 应答码，0 为成功
    pub reply: u8,
}

/// 只做握手然后回显数据的 SOCKS5 服务端
pub struct FakeSocks {
    pub addr: Option<SocketAddr>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeSocks {
    pub fn start(options: FakeSocksOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        thread::spawn(move || {
            for conn in listener.incoming() {
                let Ok(conn) = conn else { break };
                let options = options.clone();
                let recorded = recorded.clone();
                thread::spawn(move || serve(conn, &options, &recorded));
            }
        });

        Self {
            addr: Some(addr),
            requests,
        }
    }

    #[cfg(unix)]
    pub fn start_unix(path: &Path, options: FakeSocksOptions) -> Self {
        let listener = std::os::unix::net::UnixListener::bind(path).unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        thread::spawn(move || {
            for conn in listener.incoming() {
                let Ok(conn) = conn else { break };
                let options = options.clone();
                let recorded = recorded.clone();
                thread::spawn(move || serve(conn, &options, &recorded));
            }
        });

        Self { addr: None, requests }
    }

    pub fn address(&self) -> String {
        self.addr.map(|a| a.to_string()).unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve<S: Read + Write>(mut conn: S, options: &FakeSocksOptions, recorded: &Mutex<Vec<String>>) {
    if let Err(e) = handshake(&mut conn, options, recorded) {
        eprintln!("[FakeSocks] handshake error: {}", e);
        return;
    }
    let mut buf = [0u8; 1024];
    loop {
        match conn.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                if conn.write_all(&buf[..n]).is_err() {
                    return;
                }
            }
        }
    }
}

fn handshake<S: Read + Write>(
    conn: &mut S,
    options: &FakeSocksOptions,
    recorded: &Mutex<Vec<String>>,
) -> io::Result<()> {
    let mut head = [0u8; 2];
    conn.read_exact(&mut head)?;
    let mut methods = vec![0u8; head[1] as usize];
    conn.read_exact(&mut methods)?;

    match &options.credentials {
        Some((user, password)) => {
            if !methods.contains(&0x02) {
                conn.write_all(&[0x05, 0xff])?;
                return Err(io::Error::new(io::ErrorKind::Other, "client offered no user/pass"));
            }
            conn.write_all(&[0x05, 0x02])?;

            let mut ver_len = [0u8; 2];
            conn.read_exact(&mut ver_len)?;
            let mut got_user = vec![0u8; ver_len[1] as usize];
            conn.read_exact(&mut got_user)?;
            let mut plen = [0u8; 1];
            conn.read_exact(&mut plen)?;
            let mut got_password = vec![0u8; plen[0] as usize];
            conn.read_exact(&mut got_password)?;

            if got_user != user.as_bytes() || got_password != password.as_bytes() {
                conn.write_all(&[0x01, 0x01])?;
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "bad credentials"));
            }
            conn.write_all(&[0x01, 0x00])?;
        }
        None => conn.write_all(&[0x05, 0x00])?,
    }

    let mut request = [0u8; 4];
    conn.read_exact(&mut request)?;
    let host = match request[3] {
        0x01 => {
            let mut ip = [0u8; 4];
            conn.read_exact(&mut ip)?;
            std::net::Ipv4Addr::from(ip).to_string()
        }
        0x04 => {
            let mut ip = [0u8; 16];
            conn.read_exact(&mut ip)?;
            format!("[{}]", std::net::Ipv6Addr::from(ip))
        }
        0x03 => {
            let mut len = [0u8; 1];
            conn.read_exact(&mut len)?;
            let mut name = vec![0u8; len[0] as usize];
            conn.read_exact(&mut name)?;
            String::from_utf8_lossy(&name).into_owned()
        }
        other => return Err(io::Error::new(io::ErrorKind::InvalidData, format!("atyp {}", other))),
    };
    let mut port = [0u8; 2];
    conn.read_exact(&mut port)?;
    recorded
        .lock()
        .unwrap()
        .push(format!("{}:{}", host, u16::from_be_bytes(port)));

    // BND.ADDR 固定为 0.0.0.0:0
    conn.write_all(&[0x05, options.reply, 0x00, 0x01, 0, 0, 0, 0, 0, 0])?;
    if options.reply != 0 {
        return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "rejected"));
    }
    Ok(())
}

/// 接受连接后立刻回显的本地 TCP 服务
pub fn echo_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for conn in listener.incoming() {
            let Ok(mut conn) = conn else { break };
            thread::spawn(move || {
                let mut buf = [0u8; 1024];
                while let Ok(n) = conn.read(&mut buf) {
                    if n == 0 || conn.write_all(&buf[..n]).is_err() {
                        break;
                    }
                }
            });
        }
    });
    addr
}
