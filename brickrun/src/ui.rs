//! Screen-space widgets: buttons, a text field and value-bound labels.
//!
//! Widgets are a closed set held by a [`UiLayer`]. Each frame the layer is fed
//! the [`InputState`], emits [`UiEvent`]s into its queue and pushes its draw
//! commands into the UI layer of a [`DrawList`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use winit::event::MouseButton;

use crate::config::load_json;
use crate::error::ConfigError;
use crate::events::EventQueue;
use crate::input::{InputState, MouseEvent, MouseEventKind, TypedKey};
use crate::math::{Rect, Vec2};
use crate::render::{Color, DrawList, Drawable, TextAlign};

const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
const GRAY: Color = [0.5, 0.5, 0.5, 1.0];
const FOCUS_GREEN: Color = [0.0, 1.0, 0.0, 1.0];

const PRESS_SHADE: f32 = -40.0 / 255.0;
const HOVER_SHADE: f32 = 20.0 / 255.0;
const TEXT_INSET: f64 = 5.0;
const BORDER: f64 = 2.0;

/// Events emitted by widgets, drained by the owner once per frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    ButtonClicked { id: String },
    Focused { id: String },
    Unfocused { id: String, text: String },
    TextChanged { id: String, text: String },
    Submitted { id: String, text: String },
}

/// Values a [`Label`] can display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelBinding {
    Fps,
    Score,
}

/// Snapshot of the bindable values for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LabelValues {
    pub fps: f64,
    pub score: i64,
}

impl LabelValues {
    fn format(&self, binding: LabelBinding) -> String {
        match binding {
            LabelBinding::Fps => format!("{:.1}", self.fps),
            LabelBinding::Score => self.score.to_string(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_z_index() -> i32 {
    100
}

fn default_font_size() -> f32 {
    24.0
}

fn default_max_length() -> usize {
    20
}

fn default_update_interval() -> f64 {
    1.0
}

fn never() -> f64 {
    f64::INFINITY
}

fn shade(color: Color, amount: f32) -> Color {
    [
        (color[0] + amount).clamp(0.0, 1.0),
        (color[1] + amount).clamp(0.0, 1.0),
        (color[2] + amount).clamp(0.0, 1.0),
        color[3],
    ]
}

// ------------------------------
// Button
// ------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Button {
    pub id: String,
    pub rect: Rect,
    pub text: String,
    pub color: Color,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_z_index")]
    pub z_index: i32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(skip)]
    hovered: bool,
    #[serde(skip)]
    pressed: bool,
}

impl Button {
    pub fn new(id: impl Into<String>, rect: Rect, text: impl Into<String>, color: Color) -> Self {
        Self {
            id: id.into(),
            rect,
            text: text.into(),
            color,
            font_size: default_font_size(),
            z_index: default_z_index(),
            visible: true,
            enabled: true,
            hovered: false,
            pressed: false,
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn handle_mouse(&mut self, event: &MouseEvent) -> Option<UiEvent> {
        let left = event.button == Some(MouseButton::Left);
        match event.kind {
            MouseEventKind::Moved => {
                self.hovered = self.rect.contains(event.position);
                None
            }
            MouseEventKind::Pressed if left => {
                self.hovered = self.rect.contains(event.position);
                if self.hovered {
                    self.pressed = true;
                }
                None
            }
            MouseEventKind::Released if left => {
                self.hovered = self.rect.contains(event.position);
                let clicked = self.pressed && self.hovered;
                self.pressed = false;
                clicked.then(|| UiEvent::ButtonClicked { id: self.id.clone() })
            }
            _ => None,
        }
    }

    fn draw(&self, list: &mut DrawList) {
        let background = if self.pressed {
            shade(self.color, PRESS_SHADE)
        } else if self.hovered {
            shade(self.color, HOVER_SHADE)
        } else {
            self.color
        };
        list.push_ui(
            self.rect,
            self.z_index,
            Drawable::Text {
                text: self.text.clone(),
                size: self.font_size,
                color: WHITE,
                background: Some(background),
                align: TextAlign::Center,
            },
        );
    }
}

// ------------------------------
// TextField
// ------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TextField {
    pub id: String,
    pub rect: Rect,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_z_index")]
    pub z_index: i32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(skip)]
    text: String,
    #[serde(skip)]
    focused: bool,
}

impl TextField {
    pub fn new(id: impl Into<String>, rect: Rect, placeholder: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rect,
            placeholder: placeholder.into(),
            max_length: default_max_length(),
            font_size: default_font_size(),
            z_index: default_z_index(),
            visible: true,
            enabled: true,
            text: String::new(),
            focused: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn handle_mouse(&mut self, event: &MouseEvent) -> Option<UiEvent> {
        if event.kind != MouseEventKind::Pressed {
            return None;
        }
        let was_focused = self.focused;
        self.focused = self.rect.contains(event.position);
        match (was_focused, self.focused) {
            (false, true) => Some(UiEvent::Focused { id: self.id.clone() }),
            (true, false) => Some(UiEvent::Unfocused {
                id: self.id.clone(),
                text: self.text.clone(),
            }),
            _ => None,
        }
    }

    fn handle_key(&mut self, key: &TypedKey) -> Option<UiEvent> {
        if !self.focused {
            return None;
        }
        match key {
            TypedKey::Enter => {
                self.focused = false;
                Some(UiEvent::Submitted {
                    id: self.id.clone(),
                    text: self.text.clone(),
                })
            }
            TypedKey::Backspace => {
                self.text.pop()?;
                Some(self.changed())
            }
            TypedKey::Char(ch) => {
                if ch.is_control() || self.text.chars().count() >= self.max_length {
                    return None;
                }
                self.text.push(*ch);
                Some(self.changed())
            }
        }
    }

    fn changed(&self) -> UiEvent {
        UiEvent::TextChanged {
            id: self.id.clone(),
            text: self.text.clone(),
        }
    }

    fn draw(&self, list: &mut DrawList) {
        let border = if self.focused { FOCUS_GREEN } else { GRAY };
        list.push_ui(self.rect, self.z_index, Drawable::ColorRect { color: border });
        let inner = Rect::new(
            self.rect.x + BORDER,
            self.rect.y + BORDER,
            (self.rect.w - 2.0 * BORDER).max(0.0),
            (self.rect.h - 2.0 * BORDER).max(0.0),
        );
        list.push_ui(inner, self.z_index, Drawable::ColorRect { color: WHITE });

        let (text, color) = if self.text.is_empty() {
            (self.placeholder.clone(), GRAY)
        } else {
            (self.text.clone(), BLACK)
        };
        if text.is_empty() {
            return;
        }
        let text_rect = Rect::new(
            self.rect.x + TEXT_INSET,
            self.rect.y,
            (self.rect.w - 2.0 * TEXT_INSET).max(0.0),
            self.rect.h,
        );
        list.push_ui(
            text_rect,
            self.z_index,
            Drawable::Text {
                text,
                size: self.font_size,
                color,
                background: None,
                align: TextAlign::Left,
            },
        );
    }
}

// ------------------------------
// Label
// ------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    /// Top-left corner in screen space.
    pub position: Vec2,
    /// Prefix shown before the bound value.
    pub text: String,
    #[serde(default)]
    pub binding: Option<LabelBinding>,
    #[serde(default = "default_update_interval")]
    pub update_interval: f64,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "label_color")]
    pub color: Color,
    #[serde(default)]
    pub background: Option<Color>,
    #[serde(default = "default_z_index")]
    pub z_index: i32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(skip)]
    display: String,
    #[serde(skip, default = "never")]
    since_refresh: f64,
}

fn label_color() -> Color {
    WHITE
}

impl Label {
    pub fn new(id: impl Into<String>, position: Vec2, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position,
            text: text.into(),
            binding: None,
            update_interval: default_update_interval(),
            font_size: default_font_size(),
            color: WHITE,
            background: None,
            z_index: default_z_index(),
            visible: true,
            display: String::new(),
            since_refresh: never(),
        }
    }

    pub fn with_binding(mut self, binding: LabelBinding, update_interval: f64) -> Self {
        self.binding = Some(binding);
        self.update_interval = update_interval;
        self
    }

    /// Text as currently shown.
    pub fn display_text(&self) -> &str {
        if self.display.is_empty() {
            &self.text
        } else {
            &self.display
        }
    }

    fn update(&mut self, dt: f64, values: &LabelValues) {
        if dt.is_finite() && dt > 0.0 {
            self.since_refresh += dt;
        }
        if self.since_refresh < self.update_interval {
            return;
        }
        self.since_refresh = 0.0;
        let next = match self.binding {
            Some(binding) => format!("{}{}", self.text, values.format(binding)),
            None => self.text.clone(),
        };
        if next != self.display {
            self.display = next;
        }
    }

    // Width is estimated; the renderer left-aligns and does not clip text.
    fn rect(&self) -> Rect {
        let size = self.font_size as f64;
        let chars = self.display_text().chars().count() as f64;
        Rect::new(self.position.x, self.position.y, chars * size * 0.6, size * 1.25)
    }

    fn draw(&self, list: &mut DrawList) {
        list.push_ui(
            self.rect(),
            self.z_index,
            Drawable::Text {
                text: self.display_text().to_string(),
                size: self.font_size,
                color: self.color,
                background: self.background,
                align: TextAlign::Left,
            },
        );
    }
}

// ------------------------------
// Widget / UiLayer
// ------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    Button(Button),
    TextField(TextField),
    Label(Label),
}

impl Widget {
    pub fn id(&self) -> &str {
        match self {
            Widget::Button(b) => &b.id,
            Widget::TextField(f) => &f.id,
            Widget::Label(l) => &l.id,
        }
    }

    pub fn z_index(&self) -> i32 {
        match self {
            Widget::Button(b) => b.z_index,
            Widget::TextField(f) => f.z_index,
            Widget::Label(l) => l.z_index,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Widget::Button(b) => b.visible,
            Widget::TextField(f) => f.visible,
            Widget::Label(l) => l.visible,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        match self {
            Widget::Button(b) => b.visible = visible,
            Widget::TextField(f) => {
                f.visible = visible;
                if !visible {
                    f.focused = false;
                }
            }
            Widget::Label(l) => l.visible = visible,
        }
    }

    /// Visible, enabled and able to take input. Labels never are.
    pub fn is_interactable(&self) -> bool {
        match self {
            Widget::Button(b) => b.visible && b.enabled,
            Widget::TextField(f) => f.visible && f.enabled,
            Widget::Label(_) => false,
        }
    }

    fn handle_mouse(&mut self, event: &MouseEvent) -> Option<UiEvent> {
        match self {
            Widget::Button(b) => b.handle_mouse(event),
            Widget::TextField(f) => f.handle_mouse(event),
            Widget::Label(_) => None,
        }
    }

    fn draw(&self, list: &mut DrawList) {
        match self {
            Widget::Button(b) => b.draw(list),
            Widget::TextField(f) => f.draw(list),
            Widget::Label(l) => l.draw(list),
        }
    }
}

/// Serialised widget layout, as stored in `config/ui.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UiLayout {
    pub widgets: Vec<Widget>,
}

impl Default for UiLayout {
    /// Title screen: Start/Quit buttons, a name field, FPS and score labels.
    fn default() -> Self {
        let mut name = TextField::new("name", Rect::new(300.0, 100.0, 200.0, 40.0), "Enter name...");
        name.max_length = 20;
        Self {
            widgets: vec![
                Widget::Button(Button::new(
                    "start",
                    Rect::new(100.0, 100.0, 200.0, 50.0),
                    "Start",
                    [0.0, 1.0, 0.0, 1.0],
                )),
                Widget::Button(Button::new(
                    "quit",
                    Rect::new(100.0, 200.0, 200.0, 50.0),
                    "Quit",
                    [1.0, 0.0, 0.0, 1.0],
                )),
                Widget::TextField(name),
                Widget::Label(
                    Label::new("fps", Vec2::new(300.0, 200.0), "FPS: ").with_binding(LabelBinding::Fps, 0.1),
                ),
                Widget::Label(
                    Label::new("score", Vec2::new(10.0, 10.0), "Score: ").with_binding(LabelBinding::Score, 0.0),
                ),
            ],
        }
    }
}

impl UiLayout {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_json(path.as_ref())
    }

    /// Load the layout, falling back to the built-in one if the file is missing.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("UI layout {} not found, using the built-in layout", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

/// All widgets of one screen plus their event queue.
pub struct UiLayer {
    widgets: Vec<Widget>,
    events: EventQueue<UiEvent>,
}

impl Default for UiLayer {
    fn default() -> Self {
        Self::new(UiLayout::default())
    }
}

impl UiLayer {
    pub fn new(layout: UiLayout) -> Self {
        let mut seen = std::collections::HashSet::new();
        for widget in &layout.widgets {
            if !seen.insert(widget.id().to_string()) {
                log::warn!("Duplicate UI widget id {:?}; lookups return the first", widget.id());
            }
        }
        Self {
            widgets: layout.widgets,
            events: EventQueue::new(),
        }
    }

    pub fn add(&mut self, widget: Widget) {
        self.widgets.push(widget);
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id() == id)
    }

    pub fn widget_mut(&mut self, id: &str) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.id() == id)
    }

    /// Returns false if no widget has this id.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        match self.widget_mut(id) {
            Some(widget) => {
                widget.set_visible(visible);
                true
            }
            None => false,
        }
    }

    /// Current contents of a text field.
    pub fn text_of(&self, id: &str) -> Option<&str> {
        match self.widget(id)? {
            Widget::TextField(field) => Some(field.text()),
            _ => None,
        }
    }

    /// True while a text field is taking keyboard input.
    pub fn has_focus(&self) -> bool {
        self.widgets
            .iter()
            .any(|w| matches!(w, Widget::TextField(f) if f.focused && f.visible))
    }

    /// Route this frame's mouse events and typed keys to the widgets.
    pub fn handle_input(&mut self, input: &InputState) {
        for event in input.mouse_events() {
            self.dispatch_mouse(event);
        }
        for key in input.typed_keys() {
            self.dispatch_key(key);
        }
    }

    /// Offer `event` to interactable widgets from the top z down, stopping at
    /// the first one that emits.
    pub fn dispatch_mouse(&mut self, event: &MouseEvent) {
        let mut order: Vec<usize> = (0..self.widgets.len())
            .filter(|&i| self.widgets[i].is_interactable())
            .collect();
        order.sort_by_key(|&i| std::cmp::Reverse(self.widgets[i].z_index()));

        for i in order {
            if let Some(ui_event) = self.widgets[i].handle_mouse(event) {
                log::debug!("UI event {:?}", ui_event);
                self.events.push(ui_event);
                break;
            }
        }
    }

    pub fn dispatch_key(&mut self, key: &TypedKey) {
        let focused = self.widgets.iter_mut().find_map(|w| match w {
            Widget::TextField(f) if f.focused && f.visible && f.enabled => Some(f),
            _ => None,
        });
        if let Some(ui_event) = focused.and_then(|f| f.handle_key(key)) {
            self.events.push(ui_event);
        }
    }

    /// Refresh bound labels.
    pub fn update(&mut self, dt: f64, values: &LabelValues) {
        for widget in &mut self.widgets {
            if let Widget::Label(label) = widget {
                label.update(dt, values);
            }
        }
    }

    pub fn drain_events(&self) -> Vec<UiEvent> {
        self.events.drain()
    }

    pub fn draw(&self, list: &mut DrawList) {
        for widget in self.widgets.iter().filter(|w| w.is_visible()) {
            widget.draw(list);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f64, y: f64) -> MouseEvent {
        MouseEvent {
            position: Vec2::new(x, y),
            button: None,
            kind: MouseEventKind::Moved,
        }
    }

    fn left(kind: MouseEventKind, x: f64, y: f64) -> MouseEvent {
        MouseEvent {
            position: Vec2::new(x, y),
            button: Some(MouseButton::Left),
            kind,
        }
    }

    fn click(ui: &mut UiLayer, x: f64, y: f64) {
        ui.dispatch_mouse(&left(MouseEventKind::Pressed, x, y));
        ui.dispatch_mouse(&left(MouseEventKind::Released, x, y));
    }

    #[test]
    fn button_clicks_only_when_pressed_and_released_inside() {
        let mut ui = UiLayer::default();
        ui.dispatch_mouse(&moved(150.0, 120.0));
        click(&mut ui, 150.0, 120.0);
        assert_eq!(
            ui.drain_events(),
            vec![UiEvent::ButtonClicked { id: "start".into() }]
        );

        // Press inside, release outside.
        ui.dispatch_mouse(&left(MouseEventKind::Pressed, 150.0, 120.0));
        ui.dispatch_mouse(&left(MouseEventKind::Released, 50.0, 50.0));
        // Press outside, release inside.
        ui.dispatch_mouse(&left(MouseEventKind::Pressed, 50.0, 50.0));
        ui.dispatch_mouse(&left(MouseEventKind::Released, 150.0, 120.0));
        assert!(ui.drain_events().is_empty());
    }

    #[test]
    fn hover_and_press_shade_the_button() {
        let mut ui = UiLayer::default();
        ui.dispatch_mouse(&moved(150.0, 220.0));
        ui.dispatch_mouse(&left(MouseEventKind::Pressed, 150.0, 220.0));
        let Some(Widget::Button(quit)) = ui.widget("quit") else {
            panic!("quit button missing");
        };
        assert!(quit.is_hovered());
        assert!(quit.is_pressed());

        let mut list = DrawList::new();
        ui.draw(&mut list);
        let background = list.sorted().iter().find_map(|c| match &c.drawable {
            Drawable::Text { text, background, .. } if text == "Quit" => *background,
            _ => None,
        });
        let background = background.unwrap();
        assert!((background[0] - (1.0 + PRESS_SHADE)).abs() < 1e-6);
    }

    #[test]
    fn text_field_focus_typing_and_submit() {
        let mut ui = UiLayer::default();
        click(&mut ui, 350.0, 120.0);
        assert!(ui.has_focus());
        assert_eq!(ui.drain_events(), vec![UiEvent::Focused { id: "name".into() }]);

        for key in [TypedKey::Char('a'), TypedKey::Char('b'), TypedKey::Backspace, TypedKey::Char('c')] {
            ui.dispatch_key(&key);
        }
        assert_eq!(ui.text_of("name"), Some("ac"));
        let changes = ui.drain_events();
        assert_eq!(changes.len(), 4);
        assert_eq!(
            changes.last(),
            Some(&UiEvent::TextChanged {
                id: "name".into(),
                text: "ac".into()
            })
        );

        ui.dispatch_key(&TypedKey::Enter);
        assert!(!ui.has_focus());
        assert_eq!(
            ui.drain_events(),
            vec![UiEvent::Submitted {
                id: "name".into(),
                text: "ac".into()
            }]
        );

        // Unfocused fields ignore typing.
        ui.dispatch_key(&TypedKey::Char('z'));
        assert_eq!(ui.text_of("name"), Some("ac"));
        assert!(ui.drain_events().is_empty());
    }

    #[test]
    fn text_field_respects_max_length_and_empty_backspace() {
        let mut field = TextField::new("f", Rect::new(0.0, 0.0, 100.0, 30.0), "");
        field.max_length = 3;
        field.focused = true;
        assert_eq!(field.handle_key(&TypedKey::Backspace), None);
        for ch in "abcd".chars() {
            field.handle_key(&TypedKey::Char(ch));
        }
        assert_eq!(field.text(), "abc");
    }

    #[test]
    fn clicking_away_unfocuses_with_the_current_text() {
        let mut ui = UiLayer::default();
        click(&mut ui, 350.0, 120.0);
        ui.dispatch_key(&TypedKey::Char('x'));
        ui.drain_events();

        ui.dispatch_mouse(&left(MouseEventKind::Pressed, 700.0, 500.0));
        assert_eq!(
            ui.drain_events(),
            vec![UiEvent::Unfocused {
                id: "name".into(),
                text: "x".into()
            }]
        );
    }

    #[test]
    fn dispatch_stops_at_the_topmost_emitter() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut low = Button::new("low", rect, "low", WHITE);
        low.z_index = 1;
        let mut high = Button::new("high", rect, "high", WHITE);
        high.z_index = 5;
        let mut ui = UiLayer::new(UiLayout {
            widgets: vec![Widget::Button(low), Widget::Button(high)],
        });

        click(&mut ui, 50.0, 50.0);
        assert_eq!(ui.drain_events(), vec![UiEvent::ButtonClicked { id: "high".into() }]);

        ui.set_visible("high", false);
        click(&mut ui, 50.0, 50.0);
        assert_eq!(ui.drain_events(), vec![UiEvent::ButtonClicked { id: "low".into() }]);
    }

    #[test]
    fn disabled_and_hidden_widgets_ignore_input() {
        let mut ui = UiLayer::default();
        if let Some(Widget::Button(start)) = ui.widget_mut("start") {
            start.enabled = false;
        }
        click(&mut ui, 150.0, 120.0);
        assert!(ui.drain_events().is_empty());

        assert!(ui.set_visible("name", false));
        click(&mut ui, 350.0, 120.0);
        assert!(!ui.has_focus());
        assert!(!ui.set_visible("missing", false));
    }

    #[test]
    fn labels_refresh_on_their_interval() {
        let mut label = Label::new("fps", Vec2::ZERO, "FPS: ").with_binding(LabelBinding::Fps, 0.1);
        assert_eq!(label.display_text(), "FPS: ");

        let values = LabelValues { fps: 59.96, score: 0 };
        label.update(0.016, &values);
        assert_eq!(label.display_text(), "FPS: 60.0");

        let slower = LabelValues { fps: 30.0, score: 0 };
        label.update(0.05, &slower);
        assert_eq!(label.display_text(), "FPS: 60.0");
        label.update(0.06, &slower);
        assert_eq!(label.display_text(), "FPS: 30.0");
    }

    #[test]
    fn layout_parses_from_json_with_defaults() {
        let json = r#"{
            "widgets": [
                { "type": "button", "id": "go", "rect": { "x": 10, "y": 10, "w": 80, "h": 30 },
                  "text": "Go", "color": [0.2, 0.4, 0.8, 1.0] },
                { "type": "text_field", "id": "name", "rect": { "x": 0, "y": 50, "w": 100, "h": 30 } },
                { "type": "label", "id": "score", "position": { "x": 5, "y": 5 },
                  "text": "Score: ", "binding": "score", "update_interval": 0.0 }
            ]
        }"#;
        let layout: UiLayout = serde_json::from_str(json).unwrap();
        let mut ui = UiLayer::new(layout);
        assert_eq!(ui.widgets().len(), 3);
        assert!(matches!(ui.widget("name"), Some(Widget::TextField(f)) if f.max_length == 20));

        ui.update(0.0, &LabelValues { fps: 0.0, score: 300 });
        let Some(Widget::Label(score)) = ui.widget("score") else {
            panic!("score label missing");
        };
        assert_eq!(score.display_text(), "Score: 300");
    }

    #[test]
    fn layout_file_loading() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert_eq!(UiLayout::load_or_default(&missing).unwrap().widgets.len(), 5);

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(UiLayout::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn text_field_draws_placeholder_then_text() {
        let mut ui = UiLayer::default();
        let mut list = DrawList::new();
        ui.draw(&mut list);
        assert!(list.sorted().iter().any(|c| matches!(
            &c.drawable,
            Drawable::Text { text, color, .. } if text == "Enter name..." && *color == GRAY
        )));

        click(&mut ui, 350.0, 120.0);
        ui.dispatch_key(&TypedKey::Char('q'));
        list.clear();
        ui.draw(&mut list);
        assert!(list.sorted().iter().any(|c| matches!(
            &c.drawable,
            Drawable::ColorRect { color } if *color == FOCUS_GREEN
        )));
        assert!(list.sorted().iter().any(|c| matches!(
            &c.drawable,
            Drawable::Text { text, color, .. } if text == "q" && *color == BLACK
        )));
    }
}
