// Derive macro example for settree
//
// Run with: cargo run --example derive_usage --features derive

use serde::{Deserialize, Serialize};
use settree::{DataSet, DeriveDataSet};

#[derive(Debug, Default, Serialize, Deserialize, DeriveDataSet)]
#[dataset(optional_file = "./example_config/app.json", env_prefix = "DERIVE_USAGE_")]
struct AppConfig {
    serializers: Serializers,

    #[setting(default = 22)]
    steps: u32,

    #[setting(rename = "maxAuthCount")]
    #[serde(rename = "maxAuthCount")]
    max_auth_count: u32,
}

#[derive(Debug, Default, Serialize, Deserialize, DeriveDataSet)]
struct Serializers {
    #[setting(default = "native")]
    json: String,

    #[setting(default = "native")]
    xml: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let schema = AppConfig::schema()?;
    println!("Declared keys: {:?}", schema.keys());

    let mut config = AppConfig::build()?;
    config.set("serializers.xml", "ox")?;
    config.set("maxAuthCount", 55)?;

    let typed: AppConfig = config.extract()?;
    println!("{typed:#?}");

    Ok(())
}
