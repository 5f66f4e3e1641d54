use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use log::info;

use nyc311_agent::{Agent, Config, Database, DeepSeekClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = Config::from_env()?;
    let database = Database::open(config.database_path.clone())?;
    let model = Arc::new(DeepSeekClient::new(&config)?);
    let agent = Agent::new(model, database);

    info!("NYC 311 analytics agent ready");
    println!("Ask a question about NYC 311 service requests (or 'quit' to exit).");

    let stdin = io::stdin();
    loop {
        print!("question> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "quit" | "exit") {
            break;
        }

        let reply = agent.process(question).await;
        println!("\n{}\n", reply.final_text);
        if let Some(viz) = &reply.visualization {
            let y = viz.y_column.as_deref().unwrap_or("(none)");
            println!(
                "[chart: bar over {} rows, x={}, y={}]\n",
                viz.rows.len(),
                viz.x_column,
                y
            );
        }
    }

    Ok(())
}
