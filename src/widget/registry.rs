//! The live widget set for the current level, drawn in insertion order.

use log::debug;

use crate::error::HudError;
use crate::gfx::video::Video;
use crate::widget::{Canvas, Widget, WidgetValues};

#[derive(Default)]
pub struct WidgetRegistry {
    widgets: Vec<(&'static str, Widget)>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        WidgetRegistry {
            widgets: Vec::with_capacity(20),
        }
    }

    /// Append a widget under `tag`. Later widgets draw over earlier ones.
    pub fn push(&mut self, tag: &'static str, widget: impl Into<Widget>) {
        debug!("widget `{tag}` registered");
        self.widgets.push((tag, widget.into()));
    }

    pub fn get(&self, tag: &str) -> Option<&Widget> {
        self.widgets.iter().find(|(t, _)| *t == tag).map(|(_, w)| w)
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.widgets.iter().map(|(t, _)| *t)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn clear(&mut self) {
        self.widgets.clear();
    }

    /// Draw every widget. With `refresh` each one redraws regardless of its
    /// cache; otherwise only changed widgets touch the screen.
    pub fn draw_all<V: Video>(
        &mut self,
        refresh: bool,
        values: &impl WidgetValues,
        canvas: &mut Canvas<V>,
    ) -> Result<(), HudError> {
        for (_, widget) in self.widgets.iter_mut() {
            widget.draw(refresh, values, canvas)?;
        }
        Ok(())
    }
}
