//! Paywall: locked flag, payment modal and the simulated payment.
//!
//! A selected plan yields a `PaymentTicket`. The session layer arms a timer for
//! that ticket; when it fires it calls `complete(ticket)`. The timer's
//! `AbortHandle` lives inside the pending payment, so closing the modal or
//! dropping the result view cancels it. A completion whose ticket is no longer
//! pending is ignored, which covers a timer that fired while its modal was closing.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::AbortHandle;

/// Height of the overlay masking the lower part of the document area.
pub const OVERLAY_HEIGHT_PX: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    SingleUse,
    Monthly,
}

impl Plan {
    pub const ALL: [Plan; 2] = [Plan::SingleUse, Plan::Monthly];

    pub fn title(&self) -> &'static str {
        match self {
            Plan::SingleUse => "单次深度优化",
            Plan::Monthly => "求职季月卡",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Plan::SingleUse => "包含中英双语 Word 下载",
            Plan::Monthly => "30天内无限次优化",
        }
    }

    pub fn price_label(&self) -> &'static str {
        match self {
            Plan::SingleUse => "¥9.9",
            Plan::Monthly => "¥29/月",
        }
    }

    /// Struck-through list price, if the plan is discounted.
    pub fn list_price_label(&self) -> Option<&'static str> {
        match self {
            Plan::SingleUse => Some("¥29.9"),
            Plan::Monthly => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// A new simulated payment began; arm a timer for this ticket.
    Started(PaymentTicket),
    /// A payment is already running; nothing new was started.
    AlreadyPending(Plan),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaywallError {
    #[error("The document is already unlocked")]
    AlreadyUnlocked,

    #[error("The payment dialog is not open")]
    ModalClosed,
}

#[derive(Debug)]
struct PendingPayment {
    ticket: PaymentTicket,
    plan: Plan,
    timer: Option<AbortHandle>,
}

impl Drop for PendingPayment {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[derive(Debug)]
pub struct Paywall {
    locked: bool,
    modal_open: bool,
    pending: Option<PendingPayment>,
    unlocked_with: Option<Plan>,
    next_ticket: u64,
}

impl Default for Paywall {
    fn default() -> Self {
        Self::new()
    }
}

impl Paywall {
    pub fn new() -> Self {
        Self {
            locked: true,
            modal_open: false,
            pending: None,
            unlocked_with: None,
            next_ticket: 1,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn pending_plan(&self) -> Option<Plan> {
        self.pending.as_ref().map(|p| p.plan)
    }

    pub fn open_modal(&mut self) -> Result<(), PaywallError> {
        if !self.locked {
            return Err(PaywallError::AlreadyUnlocked);
        }
        self.modal_open = true;
        Ok(())
    }

    /// Closes the modal. Any running payment is cancelled with it.
    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.pending = None;
    }

    pub fn select_plan(&mut self, plan: Plan) -> Result<SelectOutcome, PaywallError> {
        if !self.locked {
            return Err(PaywallError::AlreadyUnlocked);
        }
        if !self.modal_open {
            return Err(PaywallError::ModalClosed);
        }
        if let Some(pending) = &self.pending {
            return Ok(SelectOutcome::AlreadyPending(pending.plan));
        }

        let ticket = PaymentTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(PendingPayment {
            ticket,
            plan,
            timer: None,
        });
        Ok(SelectOutcome::Started(ticket))
    }

    /// Attaches the timer for `ticket`. A timer for a ticket that is no longer
    /// pending is aborted on the spot.
    pub fn arm(&mut self, ticket: PaymentTicket, timer: AbortHandle) {
        match self.pending.as_mut() {
            Some(pending) if pending.ticket == ticket => {
                if let Some(previous) = pending.timer.replace(timer) {
                    previous.abort();
                }
            }
            _ => timer.abort(),
        }
    }

    /// Finishes the payment for `ticket`. Returns true only for the call that
    /// actually unlocked.
    pub fn complete(&mut self, ticket: PaymentTicket) -> bool {
        let matches = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.ticket == ticket);
        if !matches {
            return false;
        }

        if let Some(mut pending) = self.pending.take() {
            // The timer is the caller; dropping its handle must not abort it.
            pending.timer = None;
            self.unlocked_with = Some(pending.plan);
        }
        self.locked = false;
        self.modal_open = false;
        true
    }

    pub fn view(&self) -> PaywallView {
        PaywallView {
            locked: self.is_locked(),
            modal_open: self.is_modal_open(),
            pending_plan: self.pending_plan(),
            unlocked_with: self.unlocked_with,
            overlay: self.locked.then(PaywallOverlay::standard),
            plans: if self.modal_open {
                Plan::ALL.iter().map(PlanOption::from).collect()
            } else {
                Vec::new()
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaywallOverlay {
    pub height_px: u32,
    pub headline: &'static str,
    pub body: &'static str,
    pub call_to_action: &'static str,
}

impl PaywallOverlay {
    fn standard() -> Self {
        Self {
            height_px: OVERLAY_HEIGHT_PX,
            headline: "解锁完整 Word/PDF",
            body: "当前仅为预览模式。支付后可获取 ATS 完美格式文档、去除水印并支持无限次修改。",
            call_to_action: "立即解锁 (¥9.9)",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanOption {
    pub plan: Plan,
    pub title: &'static str,
    pub description: &'static str,
    pub price: &'static str,
    pub list_price: Option<&'static str>,
}

impl From<&Plan> for PlanOption {
    fn from(plan: &Plan) -> Self {
        Self {
            plan: *plan,
            title: plan.title(),
            description: plan.description(),
            price: plan.price_label(),
            list_price: plan.list_price_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaywallView {
    pub locked: bool,
    pub modal_open: bool,
    pub pending_plan: Option<Plan>,
    pub unlocked_with: Option<Plan>,
    pub overlay: Option<PaywallOverlay>,
    pub plans: Vec<PlanOption>,
}
