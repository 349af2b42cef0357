pub mod breakpoint;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod pin;
pub mod scene;
pub mod smooth;

pub use breakpoint::{BreakpointChange, BreakpointResolver};
pub use config::{AppConfig, EasingType, SceneConfig, SmoothConfig};
pub use controller::{
    BackendKind, Controller, ControllerEvent, ControllerId, ControllerInfo, ControllerOptions, SmoothScroller,
    SmoothScrollerFactory,
};
pub use error::{Error, Result};
pub use geometry::{Axis, Container, Geometry, GeometryProvider, ScrollDirection};
pub use layout::{ElementRef, Layout, MemoryLayout, Rect};
pub use pin::{Pin, PinOptions, PinPhase};
pub use scene::{Diagnostic, EventKind, Scene, SceneDuration, SceneEvent, SceneId, SceneOptions, SceneState};
