use super::routes::Routes;
use crate::config::NetAddress;
use crate::net::{server::spawn_server, NetworkError};
use crate::registry::MatchRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot::Sender;
use tokio::task::JoinHandle;

pub struct UltmaServer {
    quit_tx: Sender<()>,
    local_addr: SocketAddr,
    handle: JoinHandle<Result<(), NetworkError>>,
}

impl UltmaServer {
    pub async fn new(addr: &NetAddress, registry: Arc<MatchRegistry>) -> Result<Self, NetworkError> {
        let routes = Arc::new(Routes::new(registry));
        let (local_addr, quit_tx, handle) = spawn_server(&format!("{}:{}", addr.host, addr.port), routes).await?;
        Ok(Self {
            quit_tx,
            local_addr,
            handle,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn shutdown(self) -> Result<(), NetworkError> {
        self.quit_tx.send(()).map_err(|_| NetworkError::Shutdown)?;
        self.handle.await.map_err(|_| NetworkError::Shutdown)?
    }
}
