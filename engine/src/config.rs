use std::path::PathBuf;

/// Remote store credentials. Absent credentials are not an error — the
/// engine degrades to pure offline mode against the local mirror.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub remote: Option<RemoteConfig>,
    pub muse_api_key: Option<String>,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Config {
        let remote = match (
            std::env::var("LOVEWALL_STORE_URL"),
            std::env::var("LOVEWALL_STORE_KEY"),
        ) {
            (Ok(url), Ok(api_key)) if !url.is_empty() && !api_key.is_empty() => {
                Some(RemoteConfig { url, api_key })
            }
            _ => None,
        };

        let muse_api_key = std::env::var("LOVEWALL_MUSE_KEY").ok().filter(|k| !k.is_empty());

        let data_dir = std::env::var("LOVEWALL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        Config {
            remote,
            muse_api_key,
            data_dir,
        }
    }

    pub fn is_offline(&self) -> bool {
        self.remote.is_none()
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lovewall")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_mean_offline() {
        let cfg = Config {
            remote: None,
            muse_api_key: None,
            data_dir: PathBuf::from("/tmp/x"),
        };
        assert!(cfg.is_offline());
    }
}
