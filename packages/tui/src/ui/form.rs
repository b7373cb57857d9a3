use ratatui::prelude::*;

use crate::state::AppState;

/// Form tab: delegates to the form widget with the in-flight flag from
/// the store.
pub fn render_with_area(frame: &mut Frame, state: &AppState, area: Rect) {
    state
        .form
        .render(frame, area, state.store.is_form_loading());
}
