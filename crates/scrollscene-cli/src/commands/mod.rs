pub mod check;
pub mod init;
pub mod simulate;

use scrollscene_core::config::PageConfig;
use scrollscene_core::{MemoryLayout, Rect};

/// Build the simulated page described by the `[page]` section
pub fn build_layout(page: &PageConfig) -> MemoryLayout {
    let layout = MemoryLayout::new(page.width, page.height);
    for element in &page.elements {
        layout.add_styled_element(
            element.id.as_str(),
            Rect::new(element.x, element.y, element.width, element.height),
            &element.style,
        );
    }
    layout
}

/// Label used for a scene in printed output
pub fn scene_label(name: Option<&str>, index: usize) -> String {
    match name {
        Some(name) => name.to_string(),
        None => format!("scene-{}", index + 1),
    }
}
