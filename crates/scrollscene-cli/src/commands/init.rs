use std::path::Path;

use anyhow::{bail, Result};

use scrollscene_core::config::{DurationSpec, ElementConfig, HookValue, PinConfig};
use scrollscene_core::scene::{ON_CENTER, ON_LEAVE};
use scrollscene_core::{AppConfig, SceneConfig};

pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists.\nUse --force to overwrite it.",
            path.display()
        );
    }

    starter_config()?.save(path)?;

    println!("Wrote starter configuration to {}", path.display());
    println!("\nTry it with:");
    println!("  scrollscene --config {} simulate", path.display());

    Ok(())
}

/// Default sections plus a pinned hero and a fade-in section
fn starter_config() -> Result<AppConfig> {
    let mut config = AppConfig::from_toml("")?;

    config.page.elements = vec![
        ElementConfig {
            id: "hero".to_string(),
            x: 0.0,
            y: 800.0,
            width: config.page.width,
            height: 400.0,
            style: "background: #223;".to_string(),
        },
        ElementConfig {
            id: "gallery".to_string(),
            x: 0.0,
            y: 2000.0,
            width: config.page.width,
            height: 600.0,
            style: String::new(),
        },
    ];

    config.scenes = vec![
        SceneConfig {
            name: Some("hero".to_string()),
            trigger_element: Some("hero".to_string()),
            trigger_hook: HookValue(ON_LEAVE),
            duration: DurationSpec::Ratio(1.0),
            pin: Some(PinConfig {
                element: "hero".to_string(),
                push_followers: true,
                relative_width: false,
                relative_height: false,
                auto_full_width: true,
            }),
            ..Default::default()
        },
        SceneConfig {
            name: Some("gallery".to_string()),
            trigger_element: Some("gallery".to_string()),
            trigger_hook: HookValue(ON_CENTER),
            duration: DurationSpec::Pixels(300.0),
            reverse: false,
            ..Default::default()
        },
    ];

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_config_round_trips() {
        let config = starter_config().unwrap();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.scenes.len(), 2);
        assert_eq!(parsed.scenes[0].duration, DurationSpec::Ratio(1.0));
        assert!(!parsed.scenes[1].reverse);
        assert_eq!(parsed.page.elements.len(), 2);
    }
}
