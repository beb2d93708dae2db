// Basic usage example for settree
//
// Run with: RUST_LOG=settree=debug cargo run --example basic_usage

use serde::Deserialize;
use serde_json::json;
use settree::{Config, LoadInstruction, Schema};

#[derive(Debug, Deserialize)]
struct Database {
    host: String,
    port: u16,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Declare the settings, then where overrides come from
    let schema = Schema::builder()
        .nested("database", |db| {
            db.setting("host", "localhost")?
                .setting("port", 5432)
        })?
        .nested("serializers", |s| s.setting("json", "native"))?
        .setting("steps", 22)?
        .load(LoadInstruction::file("./example_config/settings.json").strict(false))
        .load(LoadInstruction::env().prefix("BASIC_USAGE_").trim_prefix(true))
        .build();

    let mut config = Config::new(&schema)?;
    println!("Defaults: {}", serde_json::to_string_pretty(&config)?);

    // Attribute-style access
    config.set("serializers.json", "oj")?;
    println!("serializers.json = {}", config.get("serializers.json")?.to_value());

    // Index-style access
    config.settings_mut().at("database")?.set("port", 6543)?;
    let port = config.settings().at("database")?.get("port")?.to_value();
    println!("database.port = {port}");

    // Plain values never replace nested settings
    if let Err(e) = config.set("database", "postgres://elsewhere") {
        println!("Rejected: {e}");
    }

    // Layer another source at runtime
    config.load(&LoadInstruction::map(json!({"steps": 31})))?;

    let database: Database = serde_json::from_value(config.get("database")?.to_value())?;
    println!("Typed: {database:?}");
    println!("Final: {}", serde_json::to_string_pretty(&config)?);

    Ok(())
}
