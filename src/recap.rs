//! Run recap: composite volume, STL export, email stub and print request
//!
//! Export and email are explicit, user-triggered flows with simulated
//! latency driven by the recap's own timers.

use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::export;
use crate::forms::{LeadForm, PrintRequest, validate_email};
use crate::sim::{CollectibleColor, Inventory, RunSummary, Timers};
use crate::tuning::Tuning;

/// Fill of the composite when nothing was collected
pub const DEFAULT_COMPOSITE_COLOR: u32 = 0xffffff;

/// One slice of the unit composite volume. `start` and `height` are
/// fractions of the full edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeSegment {
    pub color: u32,
    pub start: f32,
    pub height: f32,
}

/// Slice the unit volume by each category's share of the total, in
/// `colors` order. Heights sum to exactly 1.
pub fn composite_segments(inventory: &Inventory, colors: &[CollectibleColor]) -> Vec<CompositeSegment> {
    let counted: Vec<_> = colors
        .iter()
        .map(|&c| (c, inventory.get(c)))
        .filter(|&(_, n)| n > 0)
        .collect();
    let total: u32 = counted.iter().map(|&(_, n)| n).sum();

    if total == 0 {
        return vec![CompositeSegment {
            color: DEFAULT_COMPOSITE_COLOR,
            start: 0.0,
            height: 1.0,
        }];
    }

    let mut segments = Vec::with_capacity(counted.len());
    let mut start = 0.0f32;
    let last = counted.len() - 1;
    for (i, (color, n)) in counted.into_iter().enumerate() {
        // The last slice absorbs rounding so the stack closes exactly
        let height = if i == last {
            1.0 - start
        } else {
            n as f32 / total as f32
        };
        segments.push(CompositeSegment {
            color: color.hex(),
            start,
            height,
        });
        start += height;
    }
    segments
}

/// STL generation call-to-action
#[derive(Debug, Clone, PartialEq)]
pub enum ExportFlow {
    Idle,
    /// Loading affordance is up; input to the flow is ignored
    Generating,
    Ready { bytes: Vec<u8> },
    Failed { message: String },
}

/// "Email this file" stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailFlow {
    /// Waiting for an address
    Editing { error: Option<FormError> },
    Sending { address: String },
    /// No backend exists; this is an acknowledgment only
    Sent { address: String },
}

/// Which recap panel is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecapView {
    Overview,
    PrintForm {
        form: LeadForm,
        error: Option<FormError>,
    },
    PrintSubmitted {
        request: PrintRequest,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecapAction {
    FinishExport,
    FinishEmail,
}

pub struct RecapState {
    pub summary: RunSummary,
    pub segments: Vec<CompositeSegment>,
    pub view: RecapView,
    pub export: ExportFlow,
    pub email: EmailFlow,
    /// Loading icon rotation (radians)
    pub spinner: f32,
    cube_size_mm: f32,
    export_delay_ms: f32,
    email_delay_ms: f32,
    timers: Timers<RecapAction>,
}

impl RecapState {
    pub fn new(summary: RunSummary, tuning: &Tuning) -> Self {
        let segments = composite_segments(&summary.inventory, &summary.colors);
        log::info!(
            "Recap: {}m, {} items, {} segments",
            summary.distance,
            summary.inventory.total(),
            segments.len()
        );
        Self {
            summary,
            segments,
            view: RecapView::Overview,
            export: ExportFlow::Idle,
            email: EmailFlow::Editing { error: None },
            spinner: 0.0,
            cube_size_mm: tuning.cube_size_mm,
            export_delay_ms: tuning.export_delay_ms,
            email_delay_ms: tuning.email_delay_ms,
            timers: Timers::new(),
        }
    }

    /// Restart is offered on the overview and after a print request, but
    /// not while a file is generating
    pub fn restart_available(&self) -> bool {
        !matches!(self.view, RecapView::PrintForm { .. }) && self.export != ExportFlow::Generating
    }

    /// Start STL generation. Returns false if a generation is running or a
    /// file is already ready.
    pub fn request_export(&mut self) -> bool {
        match self.export {
            ExportFlow::Idle | ExportFlow::Failed { .. } => {
                self.export = ExportFlow::Generating;
                self.spinner = 0.0;
                self.timers.schedule(self.export_delay_ms, RecapAction::FinishExport);
                log::info!("Generating STL...");
                true
            }
            ExportFlow::Generating | ExportFlow::Ready { .. } => false,
        }
    }

    /// Clear a failed export back to the call-to-action
    pub fn retry(&mut self) {
        if matches!(self.export, ExportFlow::Failed { .. }) {
            self.export = ExportFlow::Idle;
        }
    }

    /// Generated file, once ready
    pub fn export_bytes(&self) -> Option<&[u8]> {
        match &self.export {
            ExportFlow::Ready { bytes } => Some(bytes),
            _ => None,
        }
    }

    pub fn set_email_error(&mut self, error: FormError) {
        self.email = EmailFlow::Editing { error: Some(error) };
    }

    /// Pretend to email the generated file
    pub fn send_email(&mut self, input: &str) -> Result<(), FormError> {
        if self.export_bytes().is_none() || !matches!(self.email, EmailFlow::Editing { .. }) {
            return Ok(());
        }
        match validate_email(input) {
            Ok(address) => {
                self.email = EmailFlow::Sending { address };
                self.timers.schedule(self.email_delay_ms, RecapAction::FinishEmail);
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected email address");
                self.set_email_error(e.clone());
                Err(e)
            }
        }
    }

    pub fn open_print_form(&mut self) {
        if self.view == RecapView::Overview && self.export != ExportFlow::Generating {
            self.view = RecapView::PrintForm {
                form: LeadForm::default(),
                error: None,
            };
        }
    }

    /// Mutable form fields while the print form is open
    pub fn print_form_mut(&mut self) -> Option<&mut LeadForm> {
        match &mut self.view {
            RecapView::PrintForm { form, .. } => Some(form),
            _ => None,
        }
    }

    /// Validate and acknowledge the print request. On error the form stays
    /// up with the error attached.
    pub fn submit_print_form(&mut self) -> Result<(), FormError> {
        let RecapView::PrintForm { form, error } = &mut self.view else {
            return Ok(());
        };
        match form.submit() {
            Ok(request) => {
                log::info!("Print request from {}", request.email);
                self.view = RecapView::PrintSubmitted { request };
                Ok(())
            }
            Err(e) => {
                log::warn!("Print request rejected: {e}");
                *error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Back out of the print form, re-entering the recap from scratch
    pub fn cancel_print_form(&mut self, tuning: &Tuning) {
        if matches!(self.view, RecapView::PrintForm { .. }) {
            *self = RecapState::new(self.summary.clone(), tuning);
        }
    }

    pub fn tick(&mut self, dt_ms: f32) {
        if self.export == ExportFlow::Generating {
            // One turn per second
            self.spinner = (self.spinner + std::f32::consts::TAU * dt_ms / 1000.0) % std::f32::consts::TAU;
        }
        for action in self.timers.advance(dt_ms) {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: RecapAction) {
        match action {
            RecapAction::FinishExport => {
                if self.export != ExportFlow::Generating {
                    return;
                }
                self.export = match export::composite_stl(&self.segments, self.cube_size_mm) {
                    Ok(bytes) => ExportFlow::Ready { bytes },
                    Err(e) => {
                        log::error!("STL generation failed: {e}");
                        ExportFlow::Failed {
                            message: "ERROR GENERATING STL".to_string(),
                        }
                    }
                };
            }
            RecapAction::FinishEmail => {
                if let EmailFlow::Sending { address } = &self.email {
                    log::info!("Email stub 'sent' to {address}");
                    self.email = EmailFlow::Sent {
                        address: address.clone(),
                    };
                }
            }
        }
    }
}
