//! gRPC 监听与服务循环
//!
//! 端口先于注册被显式绑定：绑定失败是本地非瞬态错误，立即致命；
//! 绑定成功后注册中心才会拿到这个地址。

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::server::Router;
use tracing::info;

use crate::error::FatalError;

/// 已绑定的监听端口
#[derive(Debug)]
pub struct BoundListener {
    listener: TcpListener,
    addr: SocketAddr,
}

impl BoundListener {
    pub async fn bind(bind_address: &str, port: u16) -> Result<Self, FatalError> {
        let addr: SocketAddr = format!("{bind_address}:{port}")
            .parse()
            .map_err(|err| FatalError::Config(format!("invalid listen address: {err}")))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| FatalError::Bind { addr, source })?;

        let addr = listener
            .local_addr()
            .map_err(|source| FatalError::Bind { addr, source })?;

        Ok(Self { listener, addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }
}

/// 在已绑定的端口上运行服务循环，直到服务出错或收到停止信号
pub async fn serve(router: Router, listener: BoundListener) -> Result<(), FatalError> {
    let incoming = TcpListenerStream::new(listener.listener);
    let server_future = router.serve_with_incoming(incoming);

    tokio::select! {
        result = server_future => result.map_err(FatalError::Serve),
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_on_ephemeral_port_succeeds() {
        let listener = BoundListener::bind("127.0.0.1", 0).await.unwrap();
        assert_ne!(listener.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn bind_on_occupied_port_is_fatal() {
        let first = BoundListener::bind("127.0.0.1", 0).await.unwrap();
        let port = first.local_addr().port();

        let err = BoundListener::bind("127.0.0.1", port).await.unwrap_err();
        assert!(matches!(err, FatalError::Bind { .. }));
    }

    #[tokio::test]
    async fn malformed_bind_address_is_a_config_error() {
        let err = BoundListener::bind("not an address", 50051).await.unwrap_err();
        assert!(matches!(err, FatalError::Config(_)));
    }
}
