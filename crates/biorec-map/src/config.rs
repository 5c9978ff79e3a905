use std::path::Path;

use anyhow::Context;

use biorec_model::MappingConfig;

/// Reads a mapping profile from a JSON file.
pub fn load_mapping_config(path: &Path) -> anyhow::Result<MappingConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read mapping profile {}", path.display()))?;
    let config: MappingConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parse mapping profile {}", path.display()))?;
    Ok(config)
}

/// Writes a mapping profile as pretty-printed JSON, so a rejected-rows export
/// can be re-imported with the same mappings later.
pub fn save_mapping_config(path: &Path, config: &MappingConfig) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config).context("serialize mapping profile")?;
    std::fs::write(path, json)
        .with_context(|| format!("write mapping profile {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use biorec_model::FieldMapping;

    use super::*;

    #[test]
    fn profile_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        let config = MappingConfig {
            profile_name: "beetles-2019".to_string(),
            mappings: vec![FieldMapping {
                source_column: "Loc".to_string(),
                target_column: "Site.Locality".to_string(),
                is_fixed: false,
                default_value: None,
            }],
        };

        save_mapping_config(&path, &config).unwrap();
        let loaded = load_mapping_config(&path).unwrap();
        assert_eq!(loaded.profile_name, "beetles-2019");
        assert_eq!(loaded.mappings.len(), 1);
    }

    #[test]
    fn load_reports_the_offending_path() {
        let err = load_mapping_config(Path::new("/nonexistent/profile.json")).unwrap_err();
        assert!(err.to_string().contains("profile.json"));
    }
}
