//! Application shell: owns the session state and keeps the preview current.

use log::debug;

use crate::export::{ExportJob, ExportPipeline};
use crate::highlight::Highlighter;
use crate::panel::{BottomSheet, Control, ControlEvent, PanelAction, PanelKind, SettingsSurface, SidePanel};
use crate::rendering::{compose, Preview};
use crate::settings::{Settings, SettingsPatch, DEFAULT_CODE};

/// Session state: code buffer, settings, the rendered preview and the export
/// pipeline. Every mutation re-renders the preview.
pub struct App {
    code: String,
    settings: Settings,
    preview: Option<Preview>,
    highlighter: &'static Highlighter,
    pipeline: ExportPipeline,
    side_panel: SidePanel,
    sheet: BottomSheet,
}

impl App {
    /// Start from the default code and settings.
    pub fn new(pipeline: ExportPipeline) -> Self {
        Self::with_state(DEFAULT_CODE.to_string(), Settings::default(), pipeline)
    }

    pub fn with_state(code: String, settings: Settings, pipeline: ExportPipeline) -> Self {
        let mut app = Self {
            code,
            settings,
            preview: None,
            highlighter: Highlighter::shared(),
            pipeline,
            side_panel: SidePanel,
            sheet: BottomSheet::default(),
        };
        app.render();
        app
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The live preview an export would capture
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn is_exporting(&self) -> bool {
        self.pipeline.is_busy()
    }

    pub fn pipeline(&self) -> &ExportPipeline {
        &self.pipeline
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
        self.render();
    }

    /// The single mutation entry point for settings.
    pub fn update_settings(&mut self, patch: &SettingsPatch) {
        self.settings = self.settings.merge(patch);
        self.render();
    }

    pub fn sheet_mut(&mut self) -> &mut BottomSheet {
        &mut self.sheet
    }

    /// Controls of a presentation, reflecting the current state.
    pub fn panel_controls(&self, kind: PanelKind) -> Vec<Control> {
        let exporting = self.is_exporting();
        match kind {
            PanelKind::Side => self.side_panel.controls(&self.settings, exporting),
            PanelKind::Sheet => self.sheet.controls(&self.settings, exporting),
        }
    }

    /// Route a control event through a presentation. Returns the export job
    /// when the event started one.
    pub fn dispatch(&mut self, kind: PanelKind, event: ControlEvent) -> Option<ExportJob> {
        let exporting = self.is_exporting();
        let action = match kind {
            PanelKind::Side => self.side_panel.handle(event, exporting),
            PanelKind::Sheet => self.sheet.handle(event, exporting),
        }?;
        match action {
            PanelAction::Update(patch) => {
                self.update_settings(&patch);
                None
            }
            PanelAction::Export => self.export(),
        }
    }

    /// Export the current preview. `None` when there is nothing rendered or
    /// an export is already running.
    pub fn export(&self) -> Option<ExportJob> {
        self.pipeline.trigger(self.preview.as_ref(), &self.settings.file_name)
    }

    fn render(&mut self) {
        let preview = compose(&self.code, &self.settings, self.highlighter);
        debug!("Preview re-rendered at {:?}", preview.size());
        self.preview = Some(preview);
    }
}
