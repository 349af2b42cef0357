use std::rc::Rc;

use anyhow::{bail, Result};

use scrollscene_core::{AppConfig, Controller, ControllerOptions, Scene};

use super::{build_layout, scene_label};

pub fn run(config: &AppConfig) -> Result<()> {
    println!("Checking {} scene(s)...\n", config.scenes.len());

    // Attaching against the configured page surfaces missing elements too
    let layout = Rc::new(build_layout(&config.page));
    let options = ControllerOptions::from_config(config).with_smooth_scrolling(false);
    let mut controller = Controller::new(layout, options)?;

    let mut problems = 0;

    for (index, scene_config) in config.scenes.iter().enumerate() {
        let label = scene_label(scene_config.name.as_deref(), index);
        let mut messages: Vec<String> = Vec::new();

        let id = controller.add_scene(Scene::new(scene_config.scene_options(None)))?;
        if let Some(scene) = controller.scene(id) {
            messages.extend(scene.diagnostics().iter().map(|d| d.to_string()));
        }

        for screen in scene_config.breakpoints.keys() {
            if !config.breakpoints.contains_key(screen) {
                messages.push(format!("override for unknown breakpoint '{}'", screen));
                continue;
            }
            let options = scene_config.scene_options(Some(screen));
            for diagnostic in options.diagnostics() {
                let message = format!("[{}] {}", screen, diagnostic);
                if !messages.contains(&message) {
                    messages.push(message);
                }
            }
        }

        if messages.is_empty() {
            println!("  {} - ok", label);
        } else {
            println!("  {} - {} problem(s)", label, messages.len());
            for message in &messages {
                println!("    {}", message);
            }
            problems += messages.len();
        }
    }

    controller.destroy();

    if problems > 0 {
        bail!("{} problem(s) found", problems);
    }
    println!("\nConfiguration OK.");
    Ok(())
}
