//! TOML config under ~/.cardscan/: cleaning ceiling and optional category
//! table overrides. Empty override lists mean "use the built-in tables".

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use cardscan_core::categories::{CategoryRule, CategoryTable, base_table, enhanced_table};
use cardscan_core::clean::CleanFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub clean: CleanSection,
    /// Ordered override for the first-pass table
    #[serde(default, rename = "base_category")]
    pub base_categories: Vec<CategoryRule>,
    /// Ordered override for the cleaning-pass table
    #[serde(default, rename = "enhanced_category")]
    pub enhanced_categories: Vec<CategoryRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanSection {
    pub max_amount: f64,
    pub bad_date_markers: Vec<String>,
    pub garbage_markers: Vec<String>,
}

impl Default for CleanSection {
    fn default() -> Self {
        let f = CleanFilter::default();
        Self {
            max_amount: f.max_amount,
            bad_date_markers: f.bad_date_markers,
            garbage_markers: f.garbage_markers,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clean: CleanSection::default(),
            base_categories: Vec::new(),
            enhanced_categories: Vec::new(),
        }
    }
}

impl Config {
    pub fn base_table(&self) -> CategoryTable {
        if self.base_categories.is_empty() {
            base_table()
        } else {
            CategoryTable::new(self.base_categories.clone())
        }
    }

    pub fn enhanced_table(&self) -> CategoryTable {
        if self.enhanced_categories.is_empty() {
            enhanced_table()
        } else {
            CategoryTable::new(self.enhanced_categories.clone())
        }
    }

    pub fn clean_filter(&self) -> CleanFilter {
        CleanFilter {
            max_amount: self.clean.max_amount,
            bad_date_markers: self.clean.bad_date_markers.clone(),
            garbage_markers: self.clean.garbage_markers.clone(),
        }
    }
}

pub fn cardscan_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".cardscan"))
}

pub fn ensure_cardscan_home() -> Result<PathBuf> {
    let dir = cardscan_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_cardscan_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote default config to {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_builtin_tables() {
        let cfg = Config::default();
        assert_eq!(cfg.base_table(), base_table());
        assert_eq!(cfg.enhanced_table(), enhanced_table());
        assert_eq!(cfg.clean_filter().max_amount, 100_000.0);
    }

    #[test]
    fn test_category_override_preserves_order() {
        let toml_src = r#"
[[base_category]]
name = "Coffee"
keywords = ["咖啡", "STARBUCKS"]

[[base_category]]
name = "Everything Else"
keywords = ["STARBUCKS RESERVE"]
"#;
        let cfg: Config = toml::from_str(toml_src).unwrap();
        let table = cfg.base_table();
        assert_eq!(table.rules.len(), 2);
        assert_eq!(table.assign("STARBUCKS RESERVE XINYI"), "Coffee");
    }

    #[test]
    fn test_config_round_trip() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.clean.max_amount, cfg.clean.max_amount);
        assert!(back.base_categories.is_empty());
    }
}
