use crate::backend::AttendanceApi;
use crate::clock::ClockField;
use crate::errors::FormError;
use crate::identity::CredentialDecoder;
use crate::models::{AttendancePayload, AttendanceReceipt, CHECKOUT_ACTION, Employee};
use crate::notify::{Notification, Notifications};
use crate::session::Session;
use crate::tasks::{TaskBlock, TaskBlocks, TaskInput};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const DEFAULT_ACTION: &str = "checkin";
pub const SUBMIT_LABEL: &str = "Submit";
pub const SUBMITTING_LABEL: &str = "Submitting";
pub const SUCCESS_MESSAGE: &str = "Attendance submitted successfully!";
pub const SIGN_IN_REQUIRED_MESSAGE: &str = "Please sign in first";

/// `Succeeded` and `Failed` behave like `Idle` but remember how the last attempt ended.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitButton {
    pub disabled: bool,
    pub label: String,
}

impl Default for SubmitButton {
    fn default() -> Self {
        Self {
            disabled: false,
            label: SUBMIT_LABEL.to_string(),
        }
    }
}

impl SubmitButton {
    fn busy(&mut self) {
        self.disabled = true;
        self.label = SUBMITTING_LABEL.to_string();
    }

    fn restore(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeFields {
    pub emp_id: String,
    pub office_email: String,
    pub full_name: String,
    pub nickname: String,
}

impl EmployeeFields {
    fn fill(&mut self, employee: &Employee) {
        self.emp_id = employee.id.clone();
        self.office_email = employee.office_email.clone();
        self.full_name = employee.full_name.clone();
        self.nickname = employee.nickname.clone();
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeLookup {
    Found(Employee),
    NotRegistered,
    Unavailable,
}

/// Everything the page shows, as one serializable snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormView {
    pub signed_in: bool,
    pub email: String,
    pub time_now: String,
    #[serde(flatten)]
    pub employee: EmployeeFields,
    pub action: String,
    pub form_visible: bool,
    pub sign_in_visible: bool,
    pub checkout_visible: bool,
    pub tasks: Vec<TaskBlock>,
    pub submit: SubmitButton,
    pub phase: SubmissionPhase,
    pub notifications: Vec<Notification>,
}

pub struct AttendanceForm<A, D> {
    api: A,
    decoder: D,
    session: Session,
    email_field: String,
    clock: ClockField,
    employee: EmployeeFields,
    action: String,
    form_visible: bool,
    sign_in_visible: bool,
    checkout_visible: bool,
    tasks: TaskBlocks,
    submit_button: SubmitButton,
    phase: SubmissionPhase,
    notifications: Notifications,
    companies: Option<Vec<String>>,
}

impl<A: AttendanceApi, D: CredentialDecoder> AttendanceForm<A, D> {
    pub fn new(api: A, decoder: D, clock_offset: FixedOffset) -> Self {
        Self {
            api,
            decoder,
            session: Session::default(),
            email_field: String::new(),
            clock: ClockField::new(clock_offset),
            employee: EmployeeFields::default(),
            action: DEFAULT_ACTION.to_string(),
            form_visible: false,
            sign_in_visible: true,
            checkout_visible: false,
            tasks: TaskBlocks::default(),
            submit_button: SubmitButton::default(),
            phase: SubmissionPhase::Idle,
            notifications: Notifications::default(),
            companies: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn task_ids(&self) -> Vec<u64> {
        self.tasks.ids()
    }

    /// Signs the user in from a widget credential and starts the employee lookup.
    pub async fn handle_credential(
        &mut self,
        credential: &str,
        now: DateTime<Utc>,
    ) -> Result<EmployeeLookup, FormError> {
        let email = match self.decoder.decode_email(credential) {
            Ok(email) => email,
            Err(err) => {
                self.notifications.failure(err.user_message());
                return Err(err);
            }
        };

        info!(%email, "signed in");
        self.session.sign_in(email.clone());
        self.companies = None;
        self.email_field = email.clone();
        self.form_visible = true;
        self.sign_in_visible = false;
        self.clock.stamp(now);

        Ok(self.load_employee_info(&email).await)
    }

    pub fn refresh_clock(&mut self, now: DateTime<Utc>) -> bool {
        self.clock.refresh(now)
    }

    pub async fn load_employee_info(&mut self, email: &str) -> EmployeeLookup {
        self.employee.clear();
        let directory = match self.api.employees().await {
            Ok(directory) => directory,
            Err(err) => {
                warn!(%email, "employee directory unavailable: {err}");
                self.notifications
                    .failure(format!("Could not load employee info: {err}"));
                return EmployeeLookup::Unavailable;
            }
        };

        match directory.into_iter().find(|employee| employee.matches_email(email)) {
            Some(employee) => {
                debug!(id = %employee.id, "employee found");
                self.employee.fill(&employee);
                EmployeeLookup::Found(employee)
            }
            None => {
                self.notifications.failure(FormError::NotRegistered.user_message());
                EmployeeLookup::NotRegistered
            }
        }
    }

    /// Appends an empty task block. Companies are fetched once per session.
    pub async fn add_task_block(&mut self) -> Result<u64, FormError> {
        let companies = match self.companies.clone() {
            Some(companies) => companies,
            None => match self.api.companies().await {
                Ok(companies) => {
                    self.companies = Some(companies.clone());
                    companies
                }
                Err(err) => {
                    self.notifications
                        .failure(format!("Could not load companies: {err}"));
                    return Err(err);
                }
            },
        };

        let id = self.tasks.push(&companies);
        debug!(id, blocks = self.tasks.len(), "task block added");
        Ok(id)
    }

    pub fn remove_task_block(&mut self, id: u64) -> Result<(), FormError> {
        if self.tasks.remove(id) {
            Ok(())
        } else {
            Err(FormError::UnknownTask(id))
        }
    }

    pub fn update_task_block(&mut self, id: u64, input: TaskInput) -> Result<(), FormError> {
        let block = self.tasks.get_mut(id).ok_or(FormError::UnknownTask(id))?;
        block.apply(input);
        Ok(())
    }

    /// Shows checkout fields (with at least one block) for checkout, and discards blocks otherwise.
    pub async fn set_action(&mut self, action: &str) -> Result<(), FormError> {
        let action = action.trim();
        if action == self.action {
            return Ok(());
        }
        self.action = action.to_string();

        if action == CHECKOUT_ACTION {
            self.checkout_visible = true;
            if self.tasks.is_empty() {
                self.add_task_block().await?;
            }
        } else {
            self.checkout_visible = false;
            self.tasks.clear();
        }
        Ok(())
    }

    /// Validates and posts the form. The submit button is restored on every path.
    pub async fn submit(&mut self) -> Result<AttendanceReceipt, FormError> {
        // The host's lock already serializes submits; this only guards direct callers
        // that drive the form without it.
        if self.phase == SubmissionPhase::Submitting {
            self.notifications.failure(FormError::Busy.user_message());
            return Err(FormError::Busy);
        }

        self.phase = SubmissionPhase::Submitting;
        self.submit_button.busy();
        let result = self.send_submission().await;
        self.submit_button.restore();

        match &result {
            Ok(receipt) => {
                info!(status = ?receipt.status, "attendance submitted");
                self.phase = SubmissionPhase::Succeeded;
                self.notifications.success(SUCCESS_MESSAGE);
                self.reset();
            }
            Err(err) => {
                self.phase = match err {
                    FormError::Validation(_) => SubmissionPhase::Idle,
                    _ => SubmissionPhase::Failed,
                };
                self.notifications.failure(err.user_message());
            }
        }
        result
    }

    async fn send_submission(&mut self) -> Result<AttendanceReceipt, FormError> {
        let email = self
            .session
            .email()
            .map(str::to_string)
            .ok_or_else(|| FormError::validation(SIGN_IN_REQUIRED_MESSAGE))?;
        let action = self.action.trim().to_string();
        let tasks = if action == CHECKOUT_ACTION {
            self.tasks.entries()?
        } else {
            Vec::new()
        };

        let payload = AttendancePayload::new(email, action, tasks);
        self.api.submit(&payload).await
    }

    fn reset(&mut self) {
        self.session.sign_out();
        self.companies = None;
        self.email_field.clear();
        self.clock.clear();
        self.employee.clear();
        self.action = DEFAULT_ACTION.to_string();
        self.form_visible = false;
        self.checkout_visible = false;
        self.tasks.clear();
        self.sign_in_visible = true;
    }

    pub fn pending_notifications(&self) -> &[Notification] {
        self.notifications.pending()
    }

    pub fn view(&self) -> FormView {
        FormView {
            signed_in: self.session.is_signed_in(),
            email: self.email_field.clone(),
            time_now: self.clock.value().to_string(),
            employee: self.employee.clone(),
            action: self.action.clone(),
            form_visible: self.form_visible,
            sign_in_visible: self.sign_in_visible,
            checkout_visible: self.checkout_visible,
            tasks: self.tasks.iter().cloned().collect(),
            submit: self.submit_button.clone(),
            phase: self.phase,
            notifications: self.notifications.pending().to_vec(),
        }
    }

    /// Like [`AttendanceForm::view`], but hands the pending notifications over to the caller.
    pub fn take_view(&mut self) -> FormView {
        let mut view = self.view();
        view.notifications = self.notifications.drain();
        view
    }
}
