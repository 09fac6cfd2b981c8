use crate::backend::BackendArgs;
use std::time::Instant;

pub async fn execute(backend: &BackendArgs) -> anyhow::Result<bool> {
    let session = backend.connect().await?;
    let started = Instant::now();
    session.client().ping().await?;
    println!(
        "PONG from {} in {:.2}ms",
        session.endpoint,
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(true)
}
