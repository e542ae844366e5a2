use clap::Subcommand;
use timebuddy_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dot-separated key
    Get {
        /// Key such as "scheduler.max_iterations"
        key: String,
    },
    /// Change one value; "none" unsets optional keys such as the seed
    Set {
        key: String,
        value: String,
    },
    /// Print the whole configuration as JSON
    List,
    /// Print where the config file lives
    Path,
    /// Overwrite the file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            match config.get(&key) {
                Some(now) => println!("{key} = {now}"),
                None => println!("{key} unset"),
            }
        }
        ConfigAction::List => {
            println!("{}", serde_json::to_string_pretty(&Config::load()?)?);
        }
    }
    Ok(())
}
