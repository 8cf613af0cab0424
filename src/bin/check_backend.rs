//! Probes each table the app uses with the anon key and reports whether
//! the hosted backend answers.

use taskflow::config::Config;
use taskflow::infrastructure::supabase::SupabaseClient;
use taskflow::stores::{BOARDS_TABLE, CARDS_TABLE, LISTS_TABLE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let client = SupabaseClient::from_config(reqwest::Client::new(), &config);
    let rest = client.rest(client.anon_key());

    println!("Backend: {}", config.supabase_url);

    let mut failures = 0;
    for table in [BOARDS_TABLE, LISTS_TABLE, CARDS_TABLE] {
        let result = rest
            .table(table)
            .select("id")
            .limit(1)
            .fetch_all::<serde_json::Value>()
            .await;

        match result {
            Ok(rows) => println!("{table}: ok ({} visible row(s))", rows.len()),
            Err(e) => {
                failures += 1;
                println!("{table}: FAILED ({e})");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} table(s) unreachable");
    }

    Ok(())
}
