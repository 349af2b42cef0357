use std::rc::Rc;
use std::time::Instant;

use anyhow::{bail, Result};
use tokio::time::Interval;
use tracing::{info, warn};

use scrollscene_core::smooth::timing::frame_interval;
use scrollscene_core::smooth::InertialScrollerFactory;
use scrollscene_core::{
    AppConfig, Axis, BreakpointResolver, Container, Controller, ControllerEvent, ControllerOptions, EventKind,
    GeometryProvider, Layout, Scene, SceneEvent,
};

use super::{build_layout, scene_label};

/// Upper bound on frames spent waiting for the smoothed position to settle
const MAX_SETTLE_FRAMES: usize = 600;

pub struct SimulateArgs {
    pub to: Option<f64>,
    pub step: f64,
    pub back: bool,
    pub smooth: bool,
    pub width: Option<f64>,
    pub progress: bool,
    pub json: bool,
}

/// Where the simulated user scrolls the container
struct Sweep<'a> {
    layout: &'a dyn Layout,
    container: Container,
    axis: Axis,
}

impl Sweep<'_> {
    async fn run(&self, controller: &mut Controller, ticker: &mut Interval, positions: &[f64]) {
        for &position in positions {
            ticker.tick().await;
            GeometryProvider::scroll_to(self.layout, &self.container, self.axis, position);
            controller.handle_event(ControllerEvent::Scroll);
            controller.handle_event(ControllerEvent::Frame(Instant::now()));
        }
    }

    /// Keep ticking until the smoothed position catches up with the raw one
    async fn settle(&self, controller: &mut Controller, ticker: &mut Interval) {
        if !controller.is_smooth_scrolling() {
            return;
        }
        let Some(raw) = GeometryProvider::scroll_offset(self.layout, &self.container, self.axis) else {
            return;
        };
        for _ in 0..MAX_SETTLE_FRAMES {
            if controller.info().scroll_pos == raw {
                return;
            }
            ticker.tick().await;
            controller.handle_event(ControllerEvent::Frame(Instant::now()));
        }
        warn!(position = controller.info().scroll_pos, raw, "Smoothed position did not settle");
    }
}

pub async fn run(config: &AppConfig, args: SimulateArgs) -> Result<()> {
    if !(args.step.is_finite() && args.step > 0.0) {
        bail!("--step must be a positive number");
    }

    let layout = Rc::new(build_layout(&config.page));
    let options = ControllerOptions::from_config(config).with_smooth_scrolling(config.controller.smooth_scrolling || args.smooth);
    let sweep = Sweep {
        layout: layout.as_ref(),
        container: options.container.clone(),
        axis: options.axis,
    };

    let factory = InertialScrollerFactory::new(config.smooth.clone());
    let mut controller = Controller::with_factory(layout.clone(), options, Box::new(factory))?;

    let mut breakpoints = BreakpointResolver::new(&config.breakpoints);
    let screen = breakpoints.observe(args.width.unwrap_or(config.page.width));
    info!(
        screen_size = screen.screen_size.as_deref().unwrap_or("-"),
        backend = controller.backend().as_str(),
        "Starting simulation"
    );

    for (index, scene_config) in config.scenes.iter().enumerate() {
        let mut scene = Scene::new(scene_config.scene_options(screen.screen_size.as_deref()));
        let label = scene_label(scene.name(), index);
        for kind in EventKind::ALL {
            if !args.progress && matches!(kind, EventKind::Progress | EventKind::Update) {
                continue;
            }
            let label = label.clone();
            let json = args.json;
            scene.on(kind, move |event| print_event(&label, event, json));
        }
        controller.add_scene(scene)?;
    }

    let end = sweep_end(args.to, config.page.max_scroll())?;
    let mut ticker = tokio::time::interval(frame_interval(config.smooth.animation_fps));

    sweep.run(&mut controller, &mut ticker, &positions(0.0, end, args.step)).await;
    sweep.settle(&mut controller, &mut ticker).await;
    if args.back {
        sweep.run(&mut controller, &mut ticker, &positions(end, 0.0, args.step)).await;
        sweep.settle(&mut controller, &mut ticker).await;
    }

    if !args.json {
        print_summary(&controller);
    }
    controller.destroy();

    Ok(())
}

/// Last position of the sweep, kept inside the page's scroll range
fn sweep_end(to: Option<f64>, max_scroll: f64) -> Result<f64> {
    let max_scroll = max_scroll.max(0.0);
    match to {
        Some(to) if !to.is_finite() => bail!("--to must be a finite number"),
        Some(to) => Ok(to.clamp(0.0, max_scroll)),
        None => Ok(max_scroll),
    }
}

/// Positions visited going from `from` to `to`, ending exactly on `to`
fn positions(from: f64, to: f64, step: f64) -> Vec<f64> {
    let distance = (to - from).abs();
    let count = (distance / step).ceil() as usize;
    (1..=count)
        .map(|i| {
            let travelled = (i as f64 * step).min(distance);
            if to >= from {
                from + travelled
            } else {
                from - travelled
            }
        })
        .collect()
}

fn print_event(label: &str, event: &SceneEvent, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Failed to encode event: {}", e),
        }
        return;
    }
    println!(
        "{:>8.1}  {:<16} {:<8} {:<6} {:.3}  {}",
        event.scroll_pos,
        label,
        event.kind.as_str(),
        event.state.as_str(),
        event.progress,
        event.scroll_direction.as_str(),
    );
}

fn print_summary(controller: &Controller) {
    println!("\nScenes ({}):\n", controller.scenes().len());

    for (index, scene) in controller.scenes().iter().enumerate() {
        let window = match scene.window() {
            Some(w) => format!("{:.0}..{:.0}", w.start, w.end()),
            None => "inert".to_string(),
        };
        println!(
            "  {} - {} ({:.3}) window {}",
            scene_label(scene.name(), index),
            scene.state().as_str(),
            scene.progress(),
            window
        );
        for diagnostic in scene.diagnostics() {
            println!("    warning: {}", diagnostic);
        }
    }
}
