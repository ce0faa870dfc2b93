//! Dashboard configuration.
//!
//! Built once at startup and passed by reference to whatever renders the
//! views. Nothing here is global.

use crate::error::{DashError, DashResult};
use salesboard_sheet::XlsxReadOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for turning uploaded bytes into a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Worksheet to read; the first worksheet when unset.
    #[serde(default)]
    pub sheet: Option<String>,
}

impl LoadOptions {
    #[must_use]
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub(crate) fn xlsx_options(&self) -> XlsxReadOptions {
        let options = XlsxReadOptions::default().with_headers(true);
        match &self.sheet {
            Some(sheet) => options.with_sheet(sheet.clone()),
            None => options,
        }
    }
}

/// Colors cycled through by each chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palettes {
    pub monthly: Vec<String>,
    pub product_line: Vec<String>,
    pub city: Vec<String>,
    pub payment: Vec<String>,
}

fn colors(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| (*c).to_string()).collect()
}

impl Default for Palettes {
    fn default() -> Self {
        Self {
            monthly: colors(&["#4cb944"]),
            product_line: colors(&["#ff6f9c", "#7ed957", "#f14f7b", "#4cb944"]),
            city: colors(&["#ff6f9c", "#7ed957", "#f14f7b"]),
            payment: colors(&["#ff6f9c", "#f14f7b", "#7ed957"]),
        }
    }
}

/// Rendering settings for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Browser page title.
    pub page_title: String,
    /// Banner shown above the KPI tiles.
    pub title: String,
    /// Prefix for currency KPIs.
    pub currency_symbol: String,
    /// Rows shown in the dataset preview; all rows when unset.
    pub preview_rows: Option<usize>,
    pub palettes: Palettes,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_title: "Supermarket Dashboard".to_string(),
            title: "SUPERMARKET SALES DASHBOARD".to_string(),
            currency_symbol: "$".to_string(),
            preview_rows: None,
            palettes: Palettes::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse a JSON config; omitted fields keep their defaults.
    pub fn from_json_str(content: &str) -> DashResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> DashResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check that every chart has at least one color.
    pub fn validate(&self) -> DashResult<()> {
        let palettes = [
            ("monthly", &self.palettes.monthly),
            ("product_line", &self.palettes.product_line),
            ("city", &self.palettes.city),
            ("payment", &self.palettes.payment),
        ];
        for (name, palette) in palettes {
            if palette.is_empty() {
                return Err(DashError::config(format!("palette '{name}' has no colors")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.title, "SUPERMARKET SALES DASHBOARD");
        assert_eq!(config.palettes.monthly, ["#4cb944"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DashboardConfig::from_json_str(
            r##"{"currency_symbol": "K", "palettes": {"city": ["#000"]}}"##,
        )
        .unwrap();
        assert_eq!(config.currency_symbol, "K");
        assert_eq!(config.palettes.city, ["#000"]);
        assert_eq!(config.palettes.payment.len(), 3);
        assert_eq!(config.page_title, "Supermarket Dashboard");
    }

    #[test]
    fn test_empty_palette_rejected() {
        let err = DashboardConfig::from_json_str(r#"{"palettes": {"payment": []}}"#).unwrap_err();
        assert!(matches!(err, DashError::Config(msg) if msg.contains("payment")));
    }

    #[test]
    fn test_bad_json() {
        let err = DashboardConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, DashError::Json(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{"preview_rows": 10}"#).unwrap();

        let config = DashboardConfig::from_json_file(&path).unwrap();
        assert_eq!(config.preview_rows, Some(10));
    }

    #[test]
    fn test_load_options_select_sheet() {
        let options = LoadOptions::default().with_sheet("Sales");
        let xlsx = options.xlsx_options();
        assert!(xlsx.has_headers);
        assert_eq!(xlsx.sheet.as_deref(), Some("Sales"));
    }
}
