//! DOM overlay state for the active scene
//!
//! The browser build keeps its menu, HUD text and recap panels in HTML.
//! `Overlay::from_app` decides what those elements show; `main.rs` only
//! copies the result into the document.

use crate::forms::PRINT_ACKNOWLEDGMENT;
use crate::recap::{EmailFlow, ExportFlow, RecapState, RecapView};
use crate::renderer::Label;
use crate::scene::{App, Scene};
use crate::sim::RunState;

/// CSS class that hides an element
pub const HIDDEN_CLASS: &str = "hidden";

/// `class` with the hidden token set or cleared; other tokens are kept
pub fn with_hidden(class: &str, hidden: bool) -> String {
    let mut tokens: Vec<&str> = class
        .split_whitespace()
        .filter(|&t| t != HIDDEN_CLASS)
        .collect();
    if hidden {
        tokens.push(HIDDEN_CLASS);
    }
    tokens.join(" ")
}

/// Markup for the distance labels on sign boards
pub fn sign_labels_html(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|l| {
            format!(
                r#"<div class="sign-label" style="left:{:.0}px;top:{:.0}px">{}</div>"#,
                l.screen.x, l.screen.y, l.text
            )
        })
        .collect()
}

/// Element visibility and text, keyed by element id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub visible: Vec<(&'static str, bool)>,
    pub text: Vec<(&'static str, String)>,
}

impl Overlay {
    pub fn from_app(app: &App) -> Self {
        let mut overlay = Self::default();
        overlay.show("menu", matches!(app.scene, Scene::Menu));
        overlay.show("hud", app.run().is_some());
        overlay.show("recap", app.recap().is_some());
        if let Some(run) = app.run() {
            overlay.run_hud(run);
        }
        if let Some(recap) = app.recap() {
            overlay.recap_panels(recap);
        }
        overlay
    }

    /// None when the element is left untouched in this scene
    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.visible.iter().find(|(k, _)| *k == id).map(|&(_, v)| v)
    }

    pub fn text_of(&self, id: &str) -> Option<&str> {
        self.text
            .iter()
            .find(|(k, _)| *k == id)
            .map(|(_, v)| v.as_str())
    }

    fn show(&mut self, id: &'static str, visible: bool) {
        self.visible.push((id, visible));
    }

    fn set(&mut self, id: &'static str, text: impl Into<String>) {
        self.text.push((id, text.into()));
    }

    fn run_hud(&mut self, run: &RunState) {
        self.set("hud-distance-value", format!("{}m", run.distance));
        self.show("end-run-btn", run.hud.end_run_button);
        self.show("aim-hint", run.hud.aim_line);
        self.show("power-hint", run.hud.power_meter);
    }

    fn recap_panels(&mut self, recap: &RecapState) {
        self.set("recap-distance", format!("{}m", recap.summary.distance));
        let items: Vec<String> = recap
            .summary
            .inventory
            .iter()
            .filter(|&(_, n)| n > 0)
            .map(|(color, n)| format!("{} x{}", color.as_str(), n))
            .collect();
        if items.is_empty() {
            self.set("recap-items", "Nothing collected");
        } else {
            self.set("recap-items", items.join(", "));
        }

        let overview = recap.view == RecapView::Overview;
        self.show("recap-overview", overview);
        let can_generate = matches!(recap.export, ExportFlow::Idle | ExportFlow::Failed { .. });
        self.show("generate-btn", overview && can_generate);
        self.show("export-loading", recap.export == ExportFlow::Generating);
        match &recap.export {
            ExportFlow::Failed { message } => {
                self.show("export-error", true);
                self.set("export-error", message.as_str());
            }
            _ => self.show("export-error", false),
        }
        self.show("download-panel", recap.export_bytes().is_some());

        let (status, editing) = match &recap.email {
            EmailFlow::Editing { error: Some(e) } => (e.to_string(), true),
            EmailFlow::Editing { error: None } => (String::new(), true),
            EmailFlow::Sending { .. } => ("Sending...".to_string(), false),
            EmailFlow::Sent { address } => (format!("Sent to {address}"), false),
        };
        self.set("email-status", status);
        self.show("email-input", editing);
        self.show("send-email-btn", editing);

        match &recap.view {
            RecapView::PrintForm { error, .. } => {
                self.show("print-form", true);
                self.show("print-done", false);
                self.set(
                    "print-error",
                    error.as_ref().map(|e| e.to_string()).unwrap_or_default(),
                );
            }
            RecapView::PrintSubmitted { request } => {
                self.show("print-form", false);
                self.show("print-done", true);
                self.set(
                    "print-ack",
                    format!("Thanks, {}! {}", request.name, PRINT_ACKNOWLEDGMENT),
                );
            }
            RecapView::Overview => {
                self.show("print-form", false);
                self.show("print-done", false);
            }
        }
        self.show("restart-btn", recap.restart_available());
    }
}
