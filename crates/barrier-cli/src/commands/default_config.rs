use crate::cli::ConfigArgs;
use crate::config::DefaultsConfig;
use crate::error::Result;
use tracing::info;

pub fn run(args: ConfigArgs) -> Result<()> {
    let content = render_defaults()?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &content)?;
            info!("Wrote default configuration to {:?}", path);
            println!("✓ Default configuration written to: {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

pub fn render_defaults() -> Result<String> {
    DefaultsConfig::default().to_file_config().to_toml_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;
    use tempfile::tempdir;

    #[test]
    fn rendered_defaults_contain_every_section() {
        let text = render_defaults().unwrap();
        for section in [
            "[system]",
            "[integrator]",
            "[run]",
            "[initial]",
            "[surface]",
            "[output]",
        ] {
            assert!(text.contains(section), "missing {} in:\n{}", section, text);
        }
        assert!(text.contains("temperature = 750.0"));
        assert!(!text.contains("seed"));
    }

    #[test]
    fn written_defaults_load_back_as_a_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("barriermd.toml");
        run(ConfigArgs {
            output: Some(path.clone()),
        })
        .unwrap();

        let loaded = FileConfig::from_file(&path).unwrap();
        assert_eq!(loaded, DefaultsConfig::default().to_file_config());
    }
}
