use anyhow::Context as _;
use clap::Parser;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tordial::{Auth, Context, ContextDialer, Network, ProxyEndpoint, Socks5Dialer, PROGRAM_VERSION_NAME};

#[derive(Parser)]
#[command(name = "tordial-connect")]
#[command(about = "Connect to a target through a SOCKS5 proxy and pipe stdin/stdout")]
struct Args {
    #[arg(short = 'x', long, default_value = "127.0.0.1:9050", help = "SOCKS5 proxy address")]
    proxy: String,

    #[arg(long, default_value = "tcp", help = "Proxy network (tcp or unix)")]
    proxy_network: String,

    #[arg(short = 'u', long, help = "Proxy username")]
    user: Option<String>,

    #[arg(short = 'p', long, help = "Proxy password")]
    password: Option<String>,

    #[arg(short = 't', long, help = "Connect timeout in seconds")]
    timeout: Option<u64>,

    #[arg(help = "Target host:port")]
    target: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let network: Network = args.proxy_network.parse()?;
    let auth = match (args.user, args.password) {
        (Some(user), Some(password)) => Some(Auth::new(user, password)),
        (None, None) => None,
        _ => anyhow::bail!("--user and --password must be given together"),
    };

    let socks = Socks5Dialer::new(ProxyEndpoint::new(network, args.proxy.clone()), auth, None)?;
    let dialer = ContextDialer::new(Arc::new(socks));

    let ctx = match args.timeout {
        Some(secs) => Context::background().with_timeout(Duration::from_secs(secs)),
        None => Context::background(),
    };

    info!("[Connect] {}", PROGRAM_VERSION_NAME);
    info!("[Connect] {} via {}", args.target, dialer.inner().endpoint());

    let conn = dialer
        .dial_context(&ctx, "tcp", &args.target)
        .await
        .with_context(|| format!("failed to connect to {}", args.target))?;
    info!("[Connect] Connected to {}", args.target);

    let (mut reader, mut writer) = tokio::io::split(conn);

    tokio::spawn(async move {
        if let Err(e) = tokio::io::copy(&mut tokio::io::stdin(), &mut writer).await {
            error!("[Connect] Stdin to target copy error: {}", e);
        }
        let _ = writer.shutdown().await;
    });

    match tokio::io::copy(&mut reader, &mut tokio::io::stdout()).await {
        Ok(bytes) => info!("[Connect] Target to stdout copy completed: {} bytes", bytes),
        Err(e) => error!("[Connect] Target to stdout copy error: {}", e),
    }

    // 读 stdin 的阻塞线程会拖住运行时退出，直接结束进程
    std::process::exit(0)
}
