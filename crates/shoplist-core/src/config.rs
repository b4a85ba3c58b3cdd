use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{errors::Error, Result};

/// Typed configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// Where the list is saved on shutdown and restored from on start.
    pub state_file: PathBuf,
    /// Print a `> ` prompt before each console line.
    pub show_prompt: bool,
    /// Accepted `/cmd@name` suffix. Commands addressed to another name are ignored.
    pub bot_name: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let state_file = lookup("SHOPLIST_STATE_FILE")
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("shopping_list.json"));
        if state_file.file_name().is_none() {
            return Err(Error::Config(format!(
                "SHOPLIST_STATE_FILE must name a file, got {}",
                state_file.display()
            )));
        }

        let show_prompt = match lookup("SHOPLIST_PROMPT") {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                Error::Config(format!("SHOPLIST_PROMPT is not a boolean: {v:?}"))
            })?,
            None => true,
        };

        let bot_name = lookup("SHOPLIST_BOT_NAME")
            .and_then(non_empty)
            .map(|s| s.trim().trim_start_matches('@').to_lowercase())
            .unwrap_or_else(|| "shoplist".to_string());

        Ok(Self {
            state_file,
            show_prompt,
            bot_name,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
