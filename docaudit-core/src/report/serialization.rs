use crate::types::*;
use anyhow::{Context, Result};

impl ComplianceReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save_to_json(&self, path: &str) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).with_context(|| format!("Failed to write report to {path}"))?;
        Ok(())
    }

    /// Write the report as `yaml`; any other format name writes JSON.
    pub fn save_with_format(&self, path: &str, format: &str) -> Result<()> {
        match format {
            "yaml" | "yml" => {
                let yaml = self.to_yaml()?;
                std::fs::write(path, yaml)
                    .with_context(|| format!("Failed to write report to {path}"))?;
            }
            "json" | _ => {
                self.save_to_json(path)?;
            }
        }
        Ok(())
    }
}
