//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn from_string_parses_sections_and_keys() {
        let content = r#"
[provider]
source = polygon
api_key = abc123
base_url = https://api.polygon.io

[holdings]
file = data/my_current_holdings.csv

[rules]
min_hold_days = 30
stop_loss_pct = 10.0
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("provider", "source"),
            Some("polygon".to_string())
        );
        assert_eq!(
            adapter.get_string("holdings", "file"),
            Some("data/my_current_holdings.csv".to_string())
        );
        assert_eq!(adapter.get_int("rules", "min_hold_days", 0), 30);
        assert_eq!(adapter.get_double("rules", "stop_loss_pct", 0.0), 10.0);
    }

    #[test]
    fn missing_keys_return_none_or_default() {
        let adapter = FileConfigAdapter::from_string("[rules]\nmin_hold_days = 30\n").unwrap();
        assert_eq!(adapter.get_string("rules", "absent"), None);
        assert_eq!(adapter.get_string("absent_section", "key"), None);
        assert_eq!(adapter.get_int("rules", "absent", 7), 7);
        assert_eq!(adapter.get_double("rules", "absent", 2.5), 2.5);
        assert!(adapter.get_bool("rules", "absent", true));
    }

    #[test]
    fn malformed_numerics_fall_back_to_default() {
        let adapter =
            FileConfigAdapter::from_string("[rules]\nmin_hold_days = soon\nstop_loss_pct = lots\n")
                .unwrap();
        assert_eq!(adapter.get_int("rules", "min_hold_days", 30), 30);
        assert_eq!(adapter.get_double("rules", "stop_loss_pct", 10.0), 10.0);
    }

    #[test]
    fn bool_accepts_common_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[monitor]\na = true\nb = Yes\nc = on\nd = 1\ne = false\nf = No\ng = off\nh = 0\n",
        )
        .unwrap();
        for key in ["a", "b", "c", "d"] {
            assert!(adapter.get_bool("monitor", key, false), "key {key}");
        }
        for key in ["e", "f", "g", "h"] {
            assert!(!adapter.get_bool("monitor", key, true), "key {key}");
        }
    }

    #[test]
    fn bool_unrecognized_value_falls_back_to_default() {
        let adapter = FileConfigAdapter::from_string("[monitor]\nverbose = maybe\n").unwrap();
        assert!(adapter.get_bool("monitor", "verbose", true));
        assert!(!adapter.get_bool("monitor", "verbose", false));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[provider]\nsource = csv\ndata_dir = bars\n").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("provider", "data_dir"),
            Some("bars".to_string())
        );
    }

    #[test]
    fn from_file_missing_path_errors() {
        assert!(FileConfigAdapter::from_file("/nonexistent/sellwatch.ini").is_err());
    }
}
