pub mod routes;
pub mod ultma_server;
use super::{HttpRequest, HttpResponse, NetworkError, ResponseBody};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::{TokioIo, TokioTimer};
use routes::Routes;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::select;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info, warn};

const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(30);

async fn serve(request: Request<Incoming>, routes: Arc<Routes>) -> Result<Response<ResponseBody>, Infallible> {
    let response = match HttpRequest::read(request).await {
        Ok(request) => routes.handle(&request),
        Err(NetworkError::BodyTooLarge) => HttpResponse::error(
            StatusCode::PAYLOAD_TOO_LARGE,
            "validation",
            &NetworkError::BodyTooLarge.to_string(),
        ),
        Err(err) => {
            debug!(error = %err, "unreadable request");
            HttpResponse::error(StatusCode::BAD_REQUEST, "validation", &err.to_string())
        }
    };
    Ok(response.into_hyper())
}

pub async fn connection_loop(
    stream: TcpStream,
    routes: Arc<Routes>,
    mut quit_rx: broadcast::Receiver<()>,
    peer: SocketAddr,
) -> Result<(), NetworkError> {
    let service = service_fn(move |request| serve(request, routes.clone()));
    let connection = http1::Builder::new()
        .timer(TokioTimer::new())
        .header_read_timeout(HEADER_READ_TIMEOUT)
        .serve_connection(TokioIo::new(stream), service);
    tokio::pin!(connection);
    select! {
        served = connection.as_mut() => served?,
        _ = quit_rx.recv() => {
            debug!(%peer, "closing connection for shutdown");
            connection.as_mut().graceful_shutdown();
            connection.await?;
        }
    }
    Ok(())
}

async fn server_loop(listener: TcpListener, routes: Arc<Routes>, mut quit_rx: oneshot::Receiver<()>) -> Result<(), NetworkError> {
    let (conn_quit_tx, _conn_quit_rx) = broadcast::channel(1);
    loop {
        select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        let routes = routes.clone();
                        let quit_rx = conn_quit_tx.subscribe();
                        tokio::spawn(async move {
                            if let Err(err) = connection_loop(stream, routes, quit_rx, peer).await {
                                debug!(%peer, error = %err, "connection dropped");
                            }
                        });
                    }
                    Err(err) => warn!(error = %err, "failed to accept connection"),
                }
            }
            _ = &mut quit_rx => {
                conn_quit_tx.send(()).ok();
                info!("server shutting down");
                return Ok(());
            }
        }
    }
}

pub async fn spawn_server(
    addr: &str,
    routes: Arc<Routes>,
) -> Result<(SocketAddr, oneshot::Sender<()>, JoinHandle<Result<(), NetworkError>>), NetworkError> {
    let (quit_tx, quit_rx) = oneshot::channel();
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    info!(%local_addr, "listening");
    let handle = tokio::spawn(server_loop(listener, routes, quit_rx));
    Ok((local_addr, quit_tx, handle))
}
