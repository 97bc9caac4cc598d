//! Recording host shared by the integration tests.
//!
//! Keeps widget state in plain maps, applies every event to that state the
//! way a small application would, and logs events and invalidations so
//! tests can assert on exact sequences.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use twidgets::engine::Widget;
use twidgets::state::{ComboBoxState, FocusState, FocusStore, ListBoxState, TextBoxState, WidgetEvents, WidgetQueries};
use twidgets::{EditState, KeyCode, Rect, WidgetId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ButtonDown(WidgetId),
    ButtonUp(WidgetId),
    Toggle(WidgetId),
    RadioSelect(WidgetId),
    EditChange(WidgetId, String),
    PageChange(WidgetId, usize),
    ListSelect(WidgetId, usize),
    ListChange(WidgetId, usize),
    ComboSelect(WidgetId, usize),
    ComboChange(WidgetId, usize),
    ComboDrop(WidgetId, bool),
    TextScroll(WidgetId, usize),
    Custom(WidgetId),
    Unhandled(String),
}

#[derive(Debug, Clone, Default)]
pub struct TextBoxData {
    pub lines: Vec<String>,
    pub top_line: usize,
    pub changed: bool,
}

#[derive(Default)]
pub struct RecordingHost {
    pub focus: FocusState,
    pub events: Vec<Event>,
    pub invalidated: Vec<WidgetId>,

    pub disabled: HashSet<WidgetId>,
    pub hidden: HashSet<WidgetId>,
    pub checked: HashSet<WidgetId>,
    /// group id -> selected radio id
    pub radio_groups: HashMap<u16, u16>,
    pub radio_group_of: HashMap<WidgetId, u16>,
    pub pages: HashMap<WidgetId, usize>,
    pub lists: HashMap<WidgetId, (ListBoxState, Vec<String>)>,
    pub combos: HashMap<WidgetId, (ComboBoxState, Vec<String>)>,
    pub edits: HashMap<WidgetId, String>,
    pub text_boxes: HashMap<WidgetId, TextBoxData>,
    /// Consume every key sent to a Custom widget.
    pub custom_consumes: bool,
    /// Edits that refuse any typed text other than digits.
    pub digits_only: HashSet<WidgetId>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(mut self, id: WidgetId, items: &[&str]) -> Self {
        let st = ListBoxState { item: None, selected: None, count: items.len() };
        self.lists.insert(id, (st, items.iter().map(|s| s.to_string()).collect()));
        self
    }

    pub fn with_combo(mut self, id: WidgetId, items: &[&str]) -> Self {
        let st = ComboBoxState { item: 0, selected: 0, count: items.len(), drop_down: false };
        self.combos.insert(id, (st, items.iter().map(|s| s.to_string()).collect()));
        self
    }

    pub fn with_text_box(mut self, id: WidgetId, lines: usize) -> Self {
        let data = TextBoxData {
            lines: (0..lines).map(|i| format!("line {i}")).collect(),
            ..Default::default()
        };
        self.text_boxes.insert(id, data);
        self
    }

    pub fn list(&self, id: WidgetId) -> ListBoxState {
        self.lists.get(&id).map(|l| l.0).unwrap_or_default()
    }

    pub fn combo(&self, id: WidgetId) -> ComboBoxState {
        self.combos.get(&id).map(|c| c.0).unwrap_or_default()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn take_invalidated(&mut self) -> Vec<WidgetId> {
        std::mem::take(&mut self.invalidated)
    }
}

impl FocusStore for RecordingHost {
    fn focus_state(&self) -> &FocusState {
        &self.focus
    }

    fn focus_state_mut(&mut self) -> &mut FocusState {
        &mut self.focus
    }
}

impl WidgetQueries for RecordingHost {
    fn is_enabled(&self, w: &Widget) -> bool {
        !self.disabled.contains(&w.id)
    }

    fn is_visible(&self, w: &Widget) -> bool {
        !self.hidden.contains(&w.id)
    }

    fn checkbox_checked(&self, w: &Widget) -> bool {
        self.checked.contains(&w.id)
    }

    fn radio_index(&self, w: &Widget) -> Option<u16> {
        self.radio_group_of.get(&w.id).and_then(|g| self.radio_groups.get(g)).copied()
    }

    fn page_ctrl_page_index(&self, w: &Widget) -> usize {
        self.pages.get(&w.id).copied().unwrap_or(0)
    }

    fn list_box_state(&self, w: &Widget) -> ListBoxState {
        self.list(w.id)
    }

    fn list_box_item(&self, w: &Widget, idx: usize) -> String {
        self.lists.get(&w.id).and_then(|l| l.1.get(idx)).cloned().unwrap_or_default()
    }

    fn combo_box_state(&self, w: &Widget) -> ComboBoxState {
        self.combo(w.id)
    }

    fn combo_box_item(&self, w: &Widget, idx: usize) -> String {
        self.combos.get(&w.id).and_then(|c| c.1.get(idx)).cloned().unwrap_or_default()
    }

    fn text_box_state(&self, w: &Widget) -> TextBoxState<'_> {
        match self.text_boxes.get(&w.id) {
            Some(d) => TextBoxState { lines: &d.lines, top_line: d.top_line, changed: d.changed },
            None => TextBoxState::default(),
        }
    }

    fn edit_text(&self, w: &Widget) -> String {
        self.edits.get(&w.id).cloned().unwrap_or_default()
    }
}

impl WidgetEvents for RecordingHost {
    fn invalidate(&mut self, id: WidgetId) {
        self.invalidated.push(id);
    }

    fn on_button_down(&mut self, w: &Widget, _kc: &KeyCode) {
        self.events.push(Event::ButtonDown(w.id));
    }

    fn on_button_up(&mut self, w: &Widget, _kc: &KeyCode) {
        self.events.push(Event::ButtonUp(w.id));
    }

    fn on_checkbox_toggle(&mut self, w: &Widget) {
        if !self.checked.remove(&w.id) {
            self.checked.insert(w.id);
        }
        self.events.push(Event::Toggle(w.id));
    }

    fn on_radio_select(&mut self, w: &Widget) {
        if let twidgets::WidgetKind::Radio(p) = &w.kind {
            self.radio_groups.insert(p.group_id, p.radio_id);
            self.radio_group_of.insert(w.id, p.group_id);
        }
        self.events.push(Event::RadioSelect(w.id));
    }

    fn on_edit_change(&mut self, w: &Widget, text: &str) {
        self.edits.insert(w.id, text.to_string());
        self.events.push(Event::EditChange(w.id, text.to_string()));
    }

    fn on_edit_input_evt(&mut self, w: &Widget, kc: &KeyCode, _edit: &mut EditState) -> bool {
        if !self.digits_only.contains(&w.id) {
            return false;
        }
        match kc.text_seq().and_then(|t| t.as_str()) {
            Some(s) if !kc.has_modifiers() => !s.chars().all(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn on_page_control_page_change(&mut self, w: &Widget, page: usize) {
        self.pages.insert(w.id, page);
        self.events.push(Event::PageChange(w.id, page));
    }

    fn on_list_box_select(&mut self, w: &Widget, idx: usize) {
        if let Some(l) = self.lists.get_mut(&w.id) {
            l.0.selected = Some(idx);
        }
        self.events.push(Event::ListSelect(w.id, idx));
    }

    fn on_list_box_change(&mut self, w: &Widget, idx: usize) {
        if let Some(l) = self.lists.get_mut(&w.id) {
            l.0.item = Some(idx);
        }
        self.events.push(Event::ListChange(w.id, idx));
    }

    fn on_combo_box_select(&mut self, w: &Widget, idx: usize) {
        if let Some(c) = self.combos.get_mut(&w.id) {
            c.0.selected = idx;
            c.0.item = idx;
        }
        self.events.push(Event::ComboSelect(w.id, idx));
    }

    fn on_combo_box_change(&mut self, w: &Widget, idx: usize) {
        if let Some(c) = self.combos.get_mut(&w.id) {
            c.0.item = idx;
        }
        self.events.push(Event::ComboChange(w.id, idx));
    }

    fn on_combo_box_drop(&mut self, w: &Widget, open: bool) {
        if let Some(c) = self.combos.get_mut(&w.id) {
            c.0.drop_down = open;
        }
        self.events.push(Event::ComboDrop(w.id, open));
    }

    fn on_text_box_scroll(&mut self, w: &Widget, top_line: usize) {
        if let Some(d) = self.text_boxes.get_mut(&w.id) {
            d.top_line = top_line;
            d.changed = false;
        }
        self.events.push(Event::TextScroll(w.id, top_line));
    }

    fn on_custom_widget_draw(&mut self, w: &Widget, _rect: Rect, out: &mut dyn Write) -> io::Result<()> {
        write!(out, "<custom {}>", w.id)
    }

    fn on_custom_widget_input_evt(&mut self, w: &Widget, _kc: &KeyCode) -> bool {
        self.events.push(Event::Custom(w.id));
        self.custom_consumes
    }

    fn on_window_unhandled_input_evt(&mut self, _w: &Widget, kc: &KeyCode) -> bool {
        self.events.push(Event::Unhandled(kc.to_string()));
        false
    }
}
