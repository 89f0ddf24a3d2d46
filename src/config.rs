use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::derive::Quirks;

pub const DEFAULT_DATA_PATH: &str = "data/Fifa_world_cup_matches.csv";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8050";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub quirks: Quirks,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            bind_addr: default_bind_addr(),
            quirks: Quirks::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let opt = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());
        let defaults = Quirks::default();

        Self {
            data_path: opt("WC22_DATA_PATH")
                .map(|val| PathBuf::from(val.trim()))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            bind_addr: opt("WC22_BIND_ADDR")
                .and_then(|val| val.trim().parse::<SocketAddr>().ok())
                .unwrap_or_else(default_bind_addr),
            quirks: Quirks {
                score_separator_on_home: opt("WC22_QUIRK_SCORE_SEPARATOR")
                    .and_then(|val| parse_flag(&val))
                    .unwrap_or(defaults.score_separator_on_home),
                free_kicks_mirror_team1: opt("WC22_QUIRK_FREE_KICKS_MIRROR")
                    .and_then(|val| parse_flag(&val))
                    .unwrap_or(defaults.free_kicks_mirror_team1),
            },
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8050))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
