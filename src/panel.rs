//! Settings panels.
//!
//! Two presentations drive the same contract: a persistent side panel for
//! wide viewports and a bottom sheet that opens over narrow ones. Neither
//! mutates settings; each control change comes back as a
//! [`PanelAction::Update`] carrying a [`SettingsPatch`] for the owner to merge.

use std::fmt;

use crate::settings::{Background, Language, Settings, SettingsPatch, WindowTheme};

/// Viewports at least this wide get the side panel.
pub const WIDE_BREAKPOINT: u32 = 1024;

pub const PADDING_SLIDER: SliderRange = SliderRange { min: 16, max: 96, step: 8 };
pub const SHADOW_SLIDER: SliderRange = SliderRange { min: 0, max: 100, step: 10 };

/// Bounds of a slider widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl SliderRange {
    /// Clamp to the range and round to the nearest step.
    pub fn snap(&self, raw: i64) -> u32 {
        let clamped = raw.clamp(self.min as i64, self.max as i64) as u32;
        let steps = (clamped - self.min + self.step / 2) / self.step;
        (self.min + steps * self.step).min(self.max)
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value) && (value - self.min) % self.step == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Side,
    Sheet,
}

/// Pick the presentation for a viewport width.
pub fn surface_for_width(width: u32) -> PanelKind {
    if width >= WIDE_BREAKPOINT {
        PanelKind::Side
    } else {
        PanelKind::Sheet
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    pub value: T,
    pub label: &'static str,
    pub selected: bool,
}

fn choices<T: Copy + PartialEq>(all: &[T], current: T, label: fn(&T) -> &'static str) -> Vec<Choice<T>> {
    all.iter()
        .map(|v| Choice { value: *v, label: label(v), selected: *v == current })
        .collect()
}

/// One widget as currently shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    LanguageSelect(Vec<Choice<Language>>),
    FileNameInput { value: String, placeholder: &'static str },
    BackgroundPicker(Vec<Choice<Background>>),
    ThemePicker(Vec<Choice<WindowTheme>>),
    PaddingSlider { value: u32, range: SliderRange },
    ShadowSlider { value: u32, range: SliderRange },
    LineNumbersToggle { checked: bool },
    ExportButton { enabled: bool, label: &'static str },
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn picked<T>(list: &[Choice<T>]) -> String {
            list.iter()
                .map(|c| if c.selected { format!("[{}]", c.label) } else { c.label.to_string() })
                .collect::<Vec<_>>()
                .join(" ")
        }
        match self {
            Control::LanguageSelect(list) => write!(f, "Language: {}", picked(list)),
            Control::FileNameInput { value, .. } => write!(f, "File Name: {}", value),
            Control::BackgroundPicker(list) => write!(f, "Background: {}", picked(list)),
            Control::ThemePicker(list) => write!(f, "Window Theme: {}", picked(list)),
            Control::PaddingSlider { value, range } => {
                write!(f, "Padding: {}px ({}..{} step {})", value, range.min, range.max, range.step)
            }
            Control::ShadowSlider { value, range } => {
                write!(f, "Shadow: {}% ({}..{} step {})", value, range.min, range.max, range.step)
            }
            Control::LineNumbersToggle { checked } => {
                write!(f, "Line Numbers: {}", if *checked { "on" } else { "off" })
            }
            Control::ExportButton { enabled, label } => {
                write!(f, "{}{}", label, if *enabled { "" } else { " (disabled)" })
            }
        }
    }
}

/// A change made on a control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    Language(Language),
    FileName(String),
    Background(Background),
    WindowTheme(WindowTheme),
    /// Raw slider position; snapped to the slider's range
    Padding(i64),
    ShadowIntensity(i64),
    LineNumbers(bool),
    ExportClicked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    Update(SettingsPatch),
    Export,
}

/// Controls of either presentation, in display order.
pub fn controls_for(settings: &Settings, exporting: bool) -> Vec<Control> {
    vec![
        Control::LanguageSelect(choices(&Language::ALL, settings.language, Language::label)),
        Control::FileNameInput { value: settings.file_name.clone(), placeholder: "filename.js" },
        Control::BackgroundPicker(choices(&Background::ALL, settings.background, Background::label)),
        Control::ThemePicker(choices(&WindowTheme::ALL, settings.window_theme, WindowTheme::label)),
        Control::PaddingSlider { value: settings.padding, range: PADDING_SLIDER },
        Control::ShadowSlider { value: settings.shadow_intensity, range: SHADOW_SLIDER },
        Control::LineNumbersToggle { checked: settings.show_line_numbers },
        Control::ExportButton {
            enabled: !exporting,
            label: if exporting { "Exporting..." } else { "Export PNG" },
        },
    ]
}

/// Map a control event to its action. Export clicks while exporting do nothing.
pub fn action_for(event: ControlEvent, exporting: bool) -> Option<PanelAction> {
    let patch = match event {
        ControlEvent::Language(l) => SettingsPatch::language(l),
        ControlEvent::FileName(name) => SettingsPatch::file_name(name),
        ControlEvent::Background(b) => SettingsPatch::background(b),
        ControlEvent::WindowTheme(t) => SettingsPatch::window_theme(t),
        ControlEvent::Padding(raw) => SettingsPatch::padding(PADDING_SLIDER.snap(raw)),
        ControlEvent::ShadowIntensity(raw) => SettingsPatch::shadow_intensity(SHADOW_SLIDER.snap(raw)),
        ControlEvent::LineNumbers(on) => SettingsPatch::show_line_numbers(on),
        ControlEvent::ExportClicked => {
            return if exporting { None } else { Some(PanelAction::Export) };
        }
    };
    Some(PanelAction::Update(patch))
}

/// A presentation of the settings controls
pub trait SettingsSurface {
    fn kind(&self) -> PanelKind;

    fn title(&self) -> &'static str;

    /// Whether the controls can currently be interacted with
    fn is_visible(&self) -> bool;

    fn controls(&self, settings: &Settings, exporting: bool) -> Vec<Control> {
        controls_for(settings, exporting)
    }

    fn handle(&mut self, event: ControlEvent, exporting: bool) -> Option<PanelAction> {
        if !self.is_visible() {
            return None;
        }
        action_for(event, exporting)
    }
}

/// Always-visible panel beside the preview
#[derive(Debug, Default, Clone)]
pub struct SidePanel;

impl SettingsSurface for SidePanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Side
    }

    fn title(&self) -> &'static str {
        "CodeCanvas Artist Studio"
    }

    fn is_visible(&self) -> bool {
        true
    }
}

/// Overlay sheet sliding up from the bottom; closed until opened.
#[derive(Debug, Default, Clone)]
pub struct BottomSheet {
    open: bool,
}

impl BottomSheet {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }
}

impl SettingsSurface for BottomSheet {
    fn kind(&self) -> PanelKind {
        PanelKind::Sheet
    }

    fn title(&self) -> &'static str {
        "Canvas Settings"
    }

    fn is_visible(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sliders_snap_to_range_and_step() {
        assert_eq!(PADDING_SLIDER.snap(48), 48);
        assert_eq!(PADDING_SLIDER.snap(51), 48);
        assert_eq!(PADDING_SLIDER.snap(53), 56);
        assert_eq!(PADDING_SLIDER.snap(0), 16);
        assert_eq!(PADDING_SLIDER.snap(1000), 96);
        assert_eq!(SHADOW_SLIDER.snap(-5), 0);
        assert_eq!(SHADOW_SLIDER.snap(44), 40);
        assert_eq!(SHADOW_SLIDER.snap(45), 50);
        assert_eq!(SHADOW_SLIDER.snap(250), 100);
        assert!(PADDING_SLIDER.contains(88));
        assert!(!PADDING_SLIDER.contains(90));
    }

    #[test]
    fn presentations_share_controls() {
        let s = Settings::default();
        let mut sheet = BottomSheet::default();
        sheet.open();
        assert_eq!(SidePanel.controls(&s, false), sheet.controls(&s, false));
        assert_eq!(SidePanel.controls(&s, false).len(), 8);
    }

    #[test]
    fn every_event_becomes_the_same_patch_on_both() {
        let events = vec![
            ControlEvent::Language(Language::Css),
            ControlEvent::FileName("style.css".into()),
            ControlEvent::Background(Background::Mesh4),
            ControlEvent::WindowTheme(WindowTheme::Glass),
            ControlEvent::Padding(70),
            ControlEvent::ShadowIntensity(33),
            ControlEvent::LineNumbers(false),
        ];
        let mut side = SidePanel;
        let mut sheet = BottomSheet::default();
        sheet.open();
        for e in events {
            let a = side.handle(e.clone(), false);
            let b = sheet.handle(e, false);
            assert!(matches!(a, Some(PanelAction::Update(_))));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn slider_events_are_bounded() {
        let action = SidePanel.handle(ControlEvent::Padding(3), false);
        assert_eq!(action, Some(PanelAction::Update(SettingsPatch::padding(16))));
        let action = SidePanel.handle(ControlEvent::ShadowIntensity(99), false);
        assert_eq!(action, Some(PanelAction::Update(SettingsPatch::shadow_intensity(100))));
    }

    #[test]
    fn export_disabled_while_busy() {
        let s = Settings::default();
        let controls = SidePanel.controls(&s, true);
        assert_eq!(
            controls.last(),
            Some(&Control::ExportButton { enabled: false, label: "Exporting..." })
        );
        assert_eq!(SidePanel.handle(ControlEvent::ExportClicked, true), None);
        assert_eq!(SidePanel.handle(ControlEvent::ExportClicked, false), Some(PanelAction::Export));
        // other controls stay live during an export
        assert!(SidePanel.handle(ControlEvent::LineNumbers(false), true).is_some());
    }

    #[test]
    fn closed_sheet_ignores_events() {
        let mut sheet = BottomSheet::default();
        assert_eq!(sheet.handle(ControlEvent::LineNumbers(false), false), None);
        sheet.toggle();
        assert!(sheet.handle(ControlEvent::LineNumbers(false), false).is_some());
        sheet.close();
        assert!(!sheet.is_visible());
    }

    #[test]
    fn background_picker_marks_selection() {
        let s = Settings::default();
        let picker = SidePanel
            .controls(&s, false)
            .into_iter()
            .find_map(|c| match c {
                Control::BackgroundPicker(list) => Some(list),
                _ => None,
            })
            .unwrap();
        assert_eq!(picker.len(), 6);
        assert_eq!(picker.iter().filter(|c| c.selected).count(), 1);
        assert!(picker[0].selected);
        assert_eq!(picker[0].label, "Cyber Neon");
    }

    #[test]
    fn breakpoint_picks_presentation() {
        assert_eq!(surface_for_width(1440), PanelKind::Side);
        assert_eq!(surface_for_width(1024), PanelKind::Side);
        assert_eq!(surface_for_width(390), PanelKind::Sheet);
    }

    #[test]
    fn controls_display() {
        let text: Vec<String> = controls_for(&Settings::default(), false).iter().map(|c| c.to_string()).collect();
        assert_eq!(text[4], "Padding: 48px (16..96 step 8)");
        assert!(text[3].contains("[Dark]"));
        assert_eq!(text[7], "Export PNG");
    }
}
