#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use task_planner::{Calendar, CalendarConfig, http_api, logging};

    logging::init_tracing();

    let addr: SocketAddr = std::env::var("TASK_PLANNER_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let calendar = match std::env::var("TASK_PLANNER_CONFIG") {
        Ok(path) => {
            let contents = std::fs::read_to_string(&path)?;
            let config: CalendarConfig = serde_json::from_str(&contents)?;
            tracing::info!(%path, config = %config.describe(), "loaded calendar config");
            Calendar::from_config(&config)?
        }
        Err(_) => Calendar::default(),
    };

    println!("task-planner HTTP API listening on http://{addr}");
    http_api::serve(addr, calendar).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
