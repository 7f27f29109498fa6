use anyhow::{bail, Context, Result};
use credstore::core::config::Config;
use credstore::core::error::StoreError;
use credstore::core::tracing_init::init_tracing;
use credstore::models::user::UserRecord;
use credstore::signup::workflow::{is_unique, reveal, signup, SignupOutcome};
use credstore::stores::record_store::{load, save};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_CONFIG_PATH: &str = "credstore.toml";

const USAGE: &str = "Usage: credstore [--config <path>] <command>

Commands:
  signup <username> <password>   register a new user
  check <username>               report whether a username is available
  list [--json]                  print stored usernames and keys
  reveal <username>              print the decoded password of a user
  compact                        rewrite the store, dropping malformed lines";

#[derive(Debug, PartialEq)]
enum Command {
    Signup { username: String, password: String },
    Check { username: String },
    List { json: bool },
    Reveal { username: String },
    Compact,
}

#[derive(Debug, PartialEq)]
struct Cli {
    config_path: Option<PathBuf>,
    command: Command,
}

fn parse_args(args: &[String]) -> Result<Cli> {
    let mut rest = args;
    let mut config_path = None;

    if rest.first().map(String::as_str) == Some("--config") {
        let Some(path) = rest.get(1) else {
            bail!("--config requires a path\n\n{USAGE}");
        };
        config_path = Some(PathBuf::from(path));
        rest = &rest[2..];
    }

    let command = match rest.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["signup", username, password] => Command::Signup {
            username: username.to_string(),
            password: password.to_string(),
        },
        ["check", username] => Command::Check {
            username: username.to_string(),
        },
        ["list"] => Command::List { json: false },
        ["list", "--json"] => Command::List { json: true },
        ["reveal", username] => Command::Reveal {
            username: username.to_string(),
        },
        ["compact"] => Command::Compact,
        _ => bail!("{USAGE}"),
    };

    Ok(Cli {
        config_path,
        command,
    })
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => Config::from_file(path).context(format!(
            "Failed to load configuration from '{}'",
            path.display()
        )),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                Config::from_file(default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

/// Load the store, falling back to an empty one only when the file does not exist yet
fn load_or_empty(path: &Path) -> Result<Vec<UserRecord>> {
    match load(path) {
        Ok(report) => Ok(report.records),
        Err(StoreError::Open { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Store file not found, starting with an empty store");
            Ok(Vec::new())
        }
        Err(e) => Err(e).context("Failed to load store"),
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    let config = load_config(cli.config_path.as_deref())?;
    init_tracing(&config.logging);

    let store_path = config.store.path.as_path();
    info!(store_path = %store_path.display(), "credstore starting");

    let mut records = load_or_empty(store_path)?;

    match cli.command {
        Command::Signup { username, password } => {
            let outcome = signup(&mut records, &username, &password, &mut rand::rng())
                .context("Failed to obfuscate password")?;
            if outcome == SignupOutcome::Successful {
                save(store_path, &records).context("Failed to save store")?;
            }
            println!("{outcome}");
        }
        Command::Check { username } => {
            let state = if is_unique(&username, &records) { "available" } else { "taken" };
            println!("{state}");
        }
        Command::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &records {
                    println!("{}\t{}", record.username, record.key);
                }
            }
        }
        Command::Reveal { username } => match reveal(&records, &username) {
            Some(decoded) => println!("{}", decoded.context("Failed to decode password")?),
            None => bail!("No such user: {username}"),
        },
        Command::Compact => {
            save(store_path, &records).context("Failed to save store")?;
            println!("{} records written", records.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_signup() {
        let cli = parse_args(&args(&["signup", "alice", "pw"])).unwrap();
        assert_eq!(cli.config_path, None);
        assert_eq!(
            cli.command,
            Command::Signup {
                username: "alice".to_string(),
                password: "pw".to_string()
            }
        );
    }

    #[test]
    fn test_parse_config_flag() {
        let cli = parse_args(&args(&["--config", "/etc/credstore.toml", "list", "--json"])).unwrap();
        assert_eq!(cli.config_path, Some(PathBuf::from("/etc/credstore.toml")));
        assert_eq!(cli.command, Command::List { json: true });
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        assert!(parse_args(&args(&["login", "alice"])).is_err());
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["--config"])).is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert!(parse_args(&args(&["signup", "alice"])).is_err());
        assert!(parse_args(&args(&["compact", "extra"])).is_err());
    }

    #[test]
    fn test_load_or_empty_missing_store() {
        let records = load_or_empty(Path::new("/nonexistent/path/userDB.txt")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_or_empty_propagates_other_open_errors() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let not_a_dir = temp_dir.path().join("plain.txt");
        std::fs::write(&not_a_dir, "alice\tbmjdf\t1\n").unwrap();

        // Opening a path below a regular file fails with something other than NotFound
        let err = load_or_empty(&not_a_dir.join("userDB.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to load store"));
    }
}
