mod accounts;
mod api;
mod common;
mod dataset;
mod http_client;
mod model;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use accounts::{
    AccountDirectory, AccountRepository, InMemoryAccountRepository, PasswordHasher,
    SqliteAccountRepository,
};
use api::{AppState, jwt::JwtManager};
use dataset::{BlobStore, ParseOptions, ReportService};
use model::config::Config;

/// 呼叫中心报表看板服务
#[derive(Parser, Debug)]
#[command(name = "callboard-rs", version, about)]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = Config::default_config_path())]
    config: String,

    /// 覆盖监听地址
    #[arg(long)]
    host: Option<String>,

    /// 覆盖监听端口
    #[arg(long)]
    port: Option<u16>,
}

/// 根据配置构建共享状态
fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let client = http_client::build_client(config.proxy_url.as_deref(), config.request_timeout_secs)
        .context("构建 HTTP Client 失败")?;
    let reports = ReportService::new(
        BlobStore::new(client, config.datasets.clone()),
        ParseOptions {
            analytics_validation: config.analytics_validation,
            missing_field_policy: config.missing_field_policy,
        },
    );

    let repo: Arc<dyn AccountRepository> = match config.accounts_db.as_deref() {
        Some(path) => Arc::new(SqliteAccountRepository::open(path).context("打开账户数据库失败")?),
        None => {
            tracing::warn!("未配置 accountsDb，账户仅保存在内存中，重启后丢失");
            Arc::new(InMemoryAccountRepository::new())
        }
    };
    let directory = AccountDirectory::new(
        repo,
        PasswordHasher::new(config.password_scheme, config.bcrypt_cost),
    );
    if config.seed_demo_account {
        directory.seed_demo_account()?;
    }
    tracing::info!("账户目录已就绪: {} 个账户", directory.count()?);

    let secret = match config.session_secret.clone() {
        Some(secret) => secret,
        None => {
            tracing::warn!("未配置 sessionSecret，使用随机密钥，重启后已签发的会话失效");
            uuid::Uuid::new_v4().to_string()
        }
    };
    let sessions = JwtManager::new(&secret, config.session_ttl_secs);

    Ok(AppState::new(reports, directory, sessions))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("监听退出信号失败: {}", e);
    }
    tracing::info!("收到退出信号，正在关闭");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::load(&args.config)?;
    config.apply_env_overrides();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(path) = config.config_path() {
        tracing::info!("配置文件: {}", path.display());
    }

    let state = build_state(&config)?;
    let app = api::create_router(state)
        .layer(api::cors_layer())
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("监听 {} 失败", addr))?;
    tracing::info!("callboard-rs 已启动: http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
