use anyhow::Result;
use clap::Args;

use codelancer_core::{FormClient, RegistrationForm, RegistrationWizard, WizardStep};

/// Registration form fields, grouped by wizard step
#[derive(Args, Debug, Default)]
pub struct RegisterArgs {
    // Step 1: Personal Info
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub date_of_birth: String,

    // Step 2: Academic Details
    #[arg(long, default_value = "")]
    pub university: String,
    #[arg(long, default_value = "")]
    pub degree: String,
    #[arg(long, default_value = "")]
    pub year: String,
    #[arg(long, default_value = "")]
    pub cgpa: String,
    #[arg(long, default_value = "")]
    pub expected_graduation: String,

    // Step 3: Project Interests
    #[arg(long, default_value = "")]
    pub project_interest: String,
    /// Repeat for each skill
    #[arg(long = "skill")]
    pub skills: Vec<String>,
    #[arg(long, default_value = "")]
    pub previous_projects: String,
    #[arg(long, default_value = "")]
    pub project_ideas: String,

    // Step 4: Service Selection
    /// Repeat for each service
    #[arg(long = "service")]
    pub services: Vec<String>,
    #[arg(long, default_value = "")]
    pub timeline: String,
    #[arg(long, default_value = "")]
    pub budget: String,
    #[arg(long, default_value = "")]
    pub additional_requirements: String,
}

impl RegisterArgs {
    /// Fill only the fields that belong to `step`
    fn fill(&self, form: &mut RegistrationForm, step: WizardStep) {
        match step {
            WizardStep::PersonalInfo => {
                form.first_name = self.first_name.clone();
                form.last_name = self.last_name.clone();
                form.email = self.email.clone();
                form.phone = self.phone.clone();
                form.date_of_birth = self.date_of_birth.clone();
            }
            WizardStep::AcademicDetails => {
                form.university = self.university.clone();
                form.degree = self.degree.clone();
                form.year = self.year.clone();
                form.cgpa = self.cgpa.clone();
                form.expected_graduation = self.expected_graduation.clone();
            }
            WizardStep::ProjectInterests => {
                form.project_interest = self.project_interest.clone();
                for skill in &self.skills {
                    if !form.technical_skills.contains(skill) {
                        form.toggle_skill(skill);
                    }
                }
                form.previous_projects = self.previous_projects.clone();
                form.project_ideas = self.project_ideas.clone();
            }
            WizardStep::ServiceSelection => {
                for service in &self.services {
                    if !form.selected_services.contains(service) {
                        form.toggle_service(service);
                    }
                }
                form.timeline = self.timeline.clone();
                form.budget = self.budget.clone();
                form.additional_requirements = self.additional_requirements.clone();
            }
        }
    }
}

/// Walk the four steps in order, stopping at the first step with invalid
/// fields, then submit the whole form.
pub async fn run(args: &RegisterArgs, client: &FormClient) -> Result<RegistrationWizard> {
    let mut wizard = RegistrationWizard::new();

    for step in WizardStep::all() {
        args.fill(&mut wizard.form, step);
        if let Err(errors) = wizard.next_step() {
            eprintln!("Step {}/4: {}", step.number(), step.title());
            for e in &errors {
                eprintln!("✗ {}", e);
            }
            anyhow::bail!(
                "Registration step {} has {} invalid field(s)",
                step.number(),
                errors.len()
            );
        }
        println!("✓ Step {}/4: {}", step.number(), step.title());
    }

    wizard.submit(client).await?;
    Ok(wizard)
}
