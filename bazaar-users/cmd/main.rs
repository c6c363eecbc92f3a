use bazaar_users::ApplicationBootstrap;
use tracing::error;

#[tokio::main]
async fn main() {
    // 加载配置（路径可由第一个参数指定）
    let config_path = std::env::args().nth(1);
    let config = match bazaar_core::load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load configuration: {err:#}");
            std::process::exit(1);
        }
    };

    bazaar_core::tracing::init(Some(&config.logging));

    // 致命启动错误以非零退出码结束进程，重启交给外部监控器
    if let Err(err) = ApplicationBootstrap::run(config).await {
        error!(error = %err, "users service failed");
        std::process::exit(1);
    }
}
