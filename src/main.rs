use product_service::app::product;
use product_service::infrastructure::logger::Logger;
use product_service::{Config, Server};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    Logger::init(&config.logging);

    info!("启动产品服务 (MODE={:?})", config.mode);

    let mut server = Server::new();
    product::register(&mut server);

    server.run(&config).await.map_err(|e| {
        error!("服务器异常退出: {:#}", e);
        e
    })
}
