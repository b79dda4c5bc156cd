use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Measure how long a TCP connect to `addr` takes.
pub async fn measure_latency(addr: &str, timeout: Duration) -> Result<Duration, String> {
    let start = Instant::now();
    match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(_stream)) => Ok(start.elapsed()),
        Ok(Err(e)) => Err(match e.kind() {
            std::io::ErrorKind::ConnectionRefused => "refused".to_string(),
            std::io::ErrorKind::NotFound => "host not found".to_string(),
            _ => e.to_string(),
        }),
        Err(_) => Err("timeout".to_string()),
    }
}

/// Fire-and-forget probe; the result comes back through `tx`. Nothing
/// retries, and a closed channel just drops the measurement.
pub fn spawn_probe<T, F>(addr: String, tx: UnboundedSender<T>, wrap: F)
where
    T: Send + 'static,
    F: FnOnce(Result<Duration, String>) -> T + Send + 'static,
{
    tokio::spawn(async move {
        let result = measure_latency(&addr, PROBE_TIMEOUT).await;
        debug!(%addr, ?result, "latency probe finished");
        let _ = tx.send(wrap(result));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn measures_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_probe(addr, tx, |r| r);
        let result = rx.recv().await.unwrap();
        assert!(result.unwrap() < PROBE_TIMEOUT);
    }

    #[tokio::test]
    async fn unparseable_address_is_an_error() {
        let result = measure_latency("not an address", PROBE_TIMEOUT).await;
        assert!(result.is_err());
    }
}
