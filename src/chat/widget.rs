use crate::render::Renderer;

/// Visibility of the chat widget.
///
/// The widget starts closed.  Opening it shows the widget, focuses the input, and brings the
/// newest message into view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetState {
    open: bool,
}

impl WidgetState {
    /// Creates a closed widget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the widget.  Opening an open widget refocuses it.
    pub fn open(&mut self, renderer: &mut dyn Renderer) {
        self.open = true;
        renderer.show_widget();
        renderer.focus_input();
        renderer.scroll_to_bottom();
    }

    /// Hides the widget.
    pub fn close(&mut self, renderer: &mut dyn Renderer) {
        self.open = false;
        renderer.hide_widget();
    }

    /// Returns true while the widget is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }
}
