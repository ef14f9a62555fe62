//! Registration wizard and contact form: field validation and submission
//! to the backend REST service.

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::FormError;

pub const REGISTER_PATH: &str = "/api/register";
pub const CONTACT_PATH: &str = "/api/contact";

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$").expect("valid phone regex"))
}

fn require(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Missing { field })
    } else {
        Ok(())
    }
}

fn require_email(value: &str, field: &'static str) -> Result<(), FormError> {
    require(value, field)?;
    if email_pattern().is_match(value.trim()) {
        Ok(())
    } else {
        Err(FormError::Invalid { field })
    }
}

fn require_phone(value: &str, field: &'static str) -> Result<(), FormError> {
    require(value, field)?;
    if phone_pattern().is_match(value.trim()) {
        Ok(())
    } else {
        Err(FormError::Invalid { field })
    }
}

/// Collect every failure instead of stopping at the first
fn collect(checks: Vec<Result<(), FormError>>) -> Result<(), Vec<FormError>> {
    let errors: Vec<FormError> = checks.into_iter().filter_map(Result::err).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn toggle(list: &mut Vec<String>, value: &str) {
    if let Some(idx) = list.iter().position(|v| v == value) {
        list.remove(idx);
    } else {
        list.push(value.to_string());
    }
}

// ============================================================================
// Registration
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    // Personal information
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,

    // Academic information
    pub university: String,
    pub degree: String,
    pub year: String,
    pub cgpa: String,
    pub expected_graduation: String,

    // Project information
    pub project_interest: String,
    pub technical_skills: Vec<String>,
    pub previous_projects: String,
    pub project_ideas: String,

    // Service selection
    pub selected_services: Vec<String>,
    pub timeline: String,
    pub budget: String,
    pub additional_requirements: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    PersonalInfo = 1,
    AcademicDetails = 2,
    ProjectInterests = 3,
    ServiceSelection = 4,
}

impl WizardStep {
    pub fn all() -> [WizardStep; 4] {
        [
            WizardStep::PersonalInfo,
            WizardStep::AcademicDetails,
            WizardStep::ProjectInterests,
            WizardStep::ServiceSelection,
        ]
    }

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::PersonalInfo => "Personal Info",
            WizardStep::AcademicDetails => "Academic Details",
            WizardStep::ProjectInterests => "Project Interests",
            WizardStep::ServiceSelection => "Service Selection",
        }
    }

    fn next(self) -> Self {
        match self {
            WizardStep::PersonalInfo => WizardStep::AcademicDetails,
            WizardStep::AcademicDetails => WizardStep::ProjectInterests,
            WizardStep::ProjectInterests | WizardStep::ServiceSelection => {
                WizardStep::ServiceSelection
            }
        }
    }

    fn prev(self) -> Self {
        match self {
            WizardStep::PersonalInfo | WizardStep::AcademicDetails => WizardStep::PersonalInfo,
            WizardStep::ProjectInterests => WizardStep::AcademicDetails,
            WizardStep::ServiceSelection => WizardStep::ProjectInterests,
        }
    }
}

impl RegistrationForm {
    pub fn validate_step(&self, step: WizardStep) -> Result<(), Vec<FormError>> {
        match step {
            WizardStep::PersonalInfo => collect(vec![
                require(&self.first_name, "firstName"),
                require(&self.last_name, "lastName"),
                require_email(&self.email, "email"),
                require_phone(&self.phone, "phone"),
            ]),
            WizardStep::AcademicDetails => collect(vec![
                require(&self.university, "university"),
                require(&self.degree, "degree"),
                require(&self.year, "year"),
            ]),
            WizardStep::ProjectInterests => {
                collect(vec![require(&self.project_interest, "projectInterest")])
            }
            WizardStep::ServiceSelection => collect(vec![require(&self.timeline, "timeline")]),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<FormError>> {
        let errors: Vec<FormError> = WizardStep::all()
            .into_iter()
            .filter_map(|step| self.validate_step(step).err())
            .flatten()
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn toggle_skill(&mut self, skill: &str) {
        toggle(&mut self.technical_skills, skill);
    }

    pub fn toggle_service(&mut self, service: &str) {
        toggle(&mut self.selected_services, service);
    }
}

/// Outcome of the last submission attempt, shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error(String),
}

/// The four-step registration flow
#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    pub form: RegistrationForm,
    step: WizardStep,
    status: FormStatus,
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            form: RegistrationForm::default(),
            step: WizardStep::PersonalInfo,
            status: FormStatus::Idle,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Advance once the current step's required fields are filled in
    pub fn next_step(&mut self) -> Result<WizardStep, Vec<FormError>> {
        self.form.validate_step(self.step)?;
        self.step = self.step.next();
        Ok(self.step)
    }

    pub fn prev_step(&mut self) -> WizardStep {
        self.step = self.step.prev();
        self.step
    }

    /// Submit the whole form. Entered data survives a failure so the user can retry.
    pub async fn submit(&mut self, client: &FormClient) -> Result<(), FormError> {
        if let Err(mut errors) = self.form.validate() {
            let first = errors.remove(0);
            self.status = FormStatus::Error(first.to_string());
            return Err(first);
        }

        self.status = FormStatus::Submitting;
        match client.submit(REGISTER_PATH, &self.form).await {
            Ok(()) => {
                self.form = RegistrationForm::default();
                self.step = WizardStep::PersonalInfo;
                self.status = FormStatus::Success;
                Ok(())
            }
            Err(e) => {
                self.status = FormStatus::Error(e.to_string());
                Err(e)
            }
        }
    }
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Contact
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub university: String,
    pub year: String,
    pub subject: String,
    pub message: String,
    pub service_type: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), Vec<FormError>> {
        let mut checks = vec![
            require(&self.name, "name"),
            require_email(&self.email, "email"),
            require(&self.subject, "subject"),
            require(&self.message, "message"),
        ];
        // Phone is optional but must look like a phone number when given
        if !self.phone.trim().is_empty() {
            checks.push(require_phone(&self.phone, "phone"));
        }
        collect(checks)
    }
}

// ============================================================================
// Backend client
// ============================================================================

#[derive(Clone)]
pub struct FormClient {
    client: Client,
    base_url: String,
}

impl FormClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST `payload` as JSON. Any 2xx is success; no retry.
    pub async fn submit<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<(), FormError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.post(&url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "form submission rejected");
            return Err(FormError::Status(status.as_u16()));
        }

        tracing::info!(%url, "form submitted");
        Ok(())
    }

    pub async fn submit_contact(&self, form: &ContactForm) -> Result<(), FormError> {
        if let Err(mut errors) = form.validate() {
            return Err(errors.remove(0));
        }
        self.submit(CONTACT_PATH, form).await
    }
}
