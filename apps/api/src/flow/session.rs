//! Session: one browser tab's flow controller plus the async work around it.
//!
//! The controller lock is never held across the provider call. Submit enters
//! Processing under the lock, runs the analysis on its own task (so a dropped
//! request cannot strand the flow in Processing) and re-locks to apply the outcome.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::{AnalysisError, ResumeAnalyzer};
use crate::errors::AppError;
use crate::flow::controller::{FlowController, FlowError, FlowSnapshot};
use crate::flow::input::ImportOutcome;
use crate::presenter::paywall::{Plan, SelectOutcome};
use crate::presenter::view::{DocumentTab, ViewMode};

pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    last_seen_ms: AtomicI64,
    payment_delay: Duration,
    flow: Arc<Mutex<FlowController>>,
}

impl Session {
    pub fn new(payment_delay: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_seen_ms: AtomicI64::new(now.timestamp_millis()),
            payment_delay,
            flow: Arc::new(Mutex::new(FlowController::new())),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn touch(&self) {
        self.last_seen_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    pub fn last_seen_ms(&self) -> i64 {
        self.last_seen_ms.load(Ordering::Relaxed)
    }

    pub async fn snapshot(&self) -> FlowSnapshot {
        self.flow.lock().await.snapshot()
    }

    pub async fn start(&self) -> FlowSnapshot {
        let mut flow = self.flow.lock().await;
        if flow.start() {
            info!(session_id = %self.id, "Flow started");
        }
        flow.snapshot()
    }

    pub async fn set_text(&self, text: String) -> Result<FlowSnapshot, AppError> {
        let mut flow = self.flow.lock().await;
        flow.set_text(text)?;
        Ok(flow.snapshot())
    }

    pub async fn import_file(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<FlowSnapshot, AppError> {
        let mut flow = self.flow.lock().await;
        match flow.import_file(file_name, content_type, bytes) {
            Ok(ImportOutcome::Replaced { chars }) => {
                info!(session_id = %self.id, chars, "Imported {file_name}");
            }
            Ok(ImportOutcome::Empty) => {
                info!(session_id = %self.id, "Imported empty file {file_name}, text unchanged");
            }
            Err(e) => {
                warn!(session_id = %self.id, "Rejected import of {file_name}: {e}");
                return Err(e.into());
            }
        }
        Ok(flow.snapshot())
    }

    /// Runs one analysis. On failure the flow is back in Input with a notice and
    /// `AppError::AnalysisFailed` is returned.
    pub async fn submit(
        &self,
        analyzer: Arc<dyn ResumeAnalyzer>,
    ) -> Result<FlowSnapshot, AppError> {
        let text = self.flow.lock().await.begin_submit()?;
        info!(
            session_id = %self.id,
            chars = text.chars().count(),
            "Submitting resume for analysis"
        );

        let flow = self.flow.clone();
        let task = tokio::spawn(async move {
            let outcome = analyzer.analyze(&text).await;
            let mut flow = flow.lock().await;
            let advanced = flow.finish_submit(outcome);
            (advanced, flow.snapshot())
        });

        match task.await {
            Ok((Ok(true), snapshot)) => Ok(snapshot),
            Ok((Ok(false), _)) => Err(AppError::AnalysisFailed),
            Ok((Err(e), _)) => Err(e.into()),
            Err(join_err) => {
                // The task never reached finish_submit; release Processing here.
                let mut flow = self.flow.lock().await;
                let _ = flow.finish_submit(Err(AnalysisError::Interrupted));
                Err(AppError::Internal(anyhow::anyhow!(
                    "analysis task failed: {join_err}"
                )))
            }
        }
    }

    pub async fn reset(&self) -> Result<FlowSnapshot, AppError> {
        let mut flow = self.flow.lock().await;
        flow.reset()?;
        info!(session_id = %self.id, "Flow reset");
        Ok(flow.snapshot())
    }

    pub async fn dismiss_notice(&self) -> FlowSnapshot {
        let mut flow = self.flow.lock().await;
        flow.dismiss_notice();
        flow.snapshot()
    }

    pub async fn set_view(
        &self,
        mode: Option<ViewMode>,
        tab: Option<DocumentTab>,
    ) -> Result<FlowSnapshot, AppError> {
        let mut flow = self.flow.lock().await;
        let view = flow.result_view_mut("change the layout")?;
        if let Some(mode) = mode {
            view.set_mode(mode);
        }
        if let Some(tab) = tab {
            view.set_active_tab(tab);
        }
        Ok(flow.snapshot())
    }

    pub async fn open_paywall(&self) -> Result<FlowSnapshot, AppError> {
        let mut flow = self.flow.lock().await;
        flow.result_view_mut("open the payment dialog")?
            .paywall_mut()
            .open_modal()
            .map_err(FlowError::from)?;
        Ok(flow.snapshot())
    }

    /// Closing the dialog cancels a payment that has not completed yet.
    pub async fn close_paywall(&self) -> Result<FlowSnapshot, AppError> {
        let mut flow = self.flow.lock().await;
        let paywall = flow.result_view_mut("close the payment dialog")?.paywall_mut();
        if let Some(plan) = paywall.pending_plan() {
            info!(
                session_id = %self.id,
                ?plan,
                "Payment dialog closed, simulated payment cancelled"
            );
        }
        paywall.close_modal();
        Ok(flow.snapshot())
    }

    /// Starts the simulated payment for `plan`. A second selection while one is
    /// running changes nothing.
    pub async fn purchase(&self, plan: Plan) -> Result<FlowSnapshot, AppError> {
        let mut flow = self.flow.lock().await;
        let outcome = flow
            .result_view_mut("purchase")?
            .paywall_mut()
            .select_plan(plan)
            .map_err(FlowError::from)?;

        match outcome {
            SelectOutcome::Started(ticket) => {
                info!(session_id = %self.id, ?plan, "Simulated payment started");
                let weak = Arc::downgrade(&self.flow);
                let delay = self.payment_delay;
                let session_id = self.id;
                let timer = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let Some(shared) = weak.upgrade() else {
                        return;
                    };
                    if shared.lock().await.complete_payment(ticket) {
                        info!(%session_id, "Simulated payment completed, result unlocked");
                    }
                });
                flow.result_view_mut("purchase")?
                    .paywall_mut()
                    .arm(ticket, timer.abort_handle());
            }
            SelectOutcome::AlreadyPending(pending) => {
                info!(
                    session_id = %self.id,
                    ?pending,
                    "Payment already in progress, ignoring selection"
                );
            }
        }
        Ok(flow.snapshot())
    }
}
