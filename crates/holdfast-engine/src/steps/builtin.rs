//! Steps for the registration form.

use super::registry::{StepCommand, StepError, StepRegistry};
use holdfast_common::intent::Intent;

pub const REGISTRATION_PATH: &str = "/register";

/// Payloads that must land in a field literally and never run.
pub const MALICIOUS_INPUTS: [&str; 6] = [
    r#"<script>alert("XSS")</script>"#,
    r#"javascript:alert("XSS")"#,
    "../../etc/passwd",
    "DROP TABLE users;",
    "${7*7}",
    "{{7*7}}",
];

const SPECIAL_CHARS: &str = r#"!@#$%^&*()_+{}|:"<>?[]\;',./`~"#;

/// 150 × `A` followed by every special character the form must accept.
pub fn long_text() -> String {
    let mut text = "A".repeat(150);
    text.push_str(SPECIAL_CHARS);
    text
}

fn arg(args: &[String], index: usize) -> &str {
    args.get(index).map(String::as_str).unwrap_or_default()
}

fn run(intent: Intent) -> StepCommand {
    StepCommand::Run(intent)
}

fn fill_all_except(skip: &str) -> Result<Vec<StepCommand>, StepError> {
    let mut commands = Vec::new();
    for (field, value) in [
        ("first name", "Test"),
        ("last name", "User"),
        ("email", "test@example.com"),
        ("password", "Password123!"),
    ] {
        if field != skip {
            commands.push(run(Intent::fill(field, value)?));
        }
    }
    commands.push(run(Intent::select("organization: TEST Org")?));
    commands.push(run(Intent::select("role: Student")?));
    commands.push(run(Intent::check("terms")?));
    Ok(commands)
}

pub fn registration_steps() -> Result<StepRegistry, StepError> {
    let mut steps = StepRegistry::new();

    // Navigation
    steps.register("I navigate to the SpeechPundit registration page", |_| {
        Ok(vec![StepCommand::Navigate(REGISTRATION_PATH.into())])
    })?;
    steps.register("I navigate to the registration page", |_| {
        Ok(vec![StepCommand::Navigate(REGISTRATION_PATH.into())])
    })?;
    steps.register("I navigate back to registration page", |_| {
        Ok(vec![StepCommand::Back])
    })?;
    steps.register("I should be on the registration page", |_| {
        Ok(vec![StepCommand::ExpectUrlContains(REGISTRATION_PATH.into())])
    })?;
    steps.register("I should be navigated to the login page", |_| {
        Ok(vec![StepCommand::ExpectUrlContains("/login".into())])
    })?;
    steps.register("the URL should contain {string}", |args| {
        Ok(vec![StepCommand::ExpectUrlContains(arg(args, 0).into())])
    })?;

    // Form input
    steps.register("I enter {string} as {text}", |args| {
        Ok(vec![run(Intent::fill(arg(args, 1), arg(args, 0))?)])
    })?;
    steps.register("I select {string} from organization dropdown", |args| {
        Ok(vec![run(Intent::select(&format!(
            "organization: {}",
            arg(args, 0)
        ))?)])
    })?;
    steps.register("I select {string} role", |args| {
        Ok(vec![run(Intent::select(&format!("role: {}", arg(args, 0)))?)])
    })?;
    steps.register("I accept the terms and conditions", |_| {
        Ok(vec![run(Intent::check("terms")?)])
    })?;
    steps.register("I check the terms and conditions checkbox", |_| {
        Ok(vec![run(Intent::check("terms")?)])
    })?;
    steps.register("I click the signup button", |_| {
        Ok(vec![run(Intent::click("signup")?)])
    })?;
    steps.register("I click the signup button without filling any fields", |_| {
        Ok(vec![run(Intent::click("signup")?)])
    })?;
    steps.register("I attempt to submit form without accepting terms", |_| {
        Ok(vec![run(Intent::click("signup")?)])
    })?;
    steps.register("I click on the organization dropdown", |_| {
        Ok(vec![run(Intent::click("organization dropdown")?)])
    })?;
    steps.register("I click on the {string} link", |args| {
        Ok(vec![run(Intent::click(&format!("link: {}", arg(args, 0)))?)])
    })?;
    steps.register("I close the terms and conditions modal", |_| {
        Ok(vec![run(Intent::click("close modal")?)])
    })?;
    steps.register("I click on the SpeechPundit logo", |_| {
        Ok(vec![run(Intent::click("logo")?)])
    })?;

    // Boundary and hostile input
    for (pattern, field) in [
        ("I enter a very long text in first name field", "first name"),
        ("I enter a very long text in last name field", "last name"),
        ("I enter a very long password", "password"),
    ] {
        steps.register(pattern, move |_| Ok(vec![run(Intent::fill(field, long_text())?)]))?;
    }
    steps.register("I enter a very long email address", |_| {
        Ok(vec![run(Intent::fill(
            "email",
            format!("{}@example.com", long_text()),
        )?)])
    })?;
    steps.register("I enter malicious content in form fields", |_| {
        let mut commands = Vec::new();
        for input in MALICIOUS_INPUTS {
            commands.push(run(Intent::fill("first name", input)?));
            commands.push(run(Intent::fill("email", format!("{}@test.com", input))?));
        }
        Ok(commands)
    })?;

    // Composite
    steps.register("I complete a valid registration form", |_| {
        Ok(vec![
            run(Intent::fill("first name", "John")?),
            run(Intent::fill("last name", "Doe")?),
            run(Intent::fill("email", "john.doe@example.com")?),
            run(Intent::fill("password", "Password123!")?),
            run(Intent::select("organization: TEST Org")?),
            run(Intent::select("role: Student")?),
            run(Intent::check("terms")?),
        ])
    })?;
    steps.register("I fill all required fields except email", |_| {
        fill_all_except("email")
    })?;
    steps.register("I fill all required fields except password", |_| {
        fill_all_except("password")
    })?;

    // Verification
    steps.register("the {string} role should be selected", |args| {
        Ok(vec![run(Intent::verify_checked(&format!(
            "role: {}",
            arg(args, 0)
        ))?)])
    })?;
    steps.register("the checkbox should be checked", |_| {
        Ok(vec![run(Intent::verify_checked("terms")?)])
    })?;
    steps.register("the terms and conditions checkbox should be checked", |_| {
        Ok(vec![run(Intent::verify_checked("terms")?)])
    })?;
    steps.register("I should see error message {string}", |args| {
        Ok(vec![run(Intent::verify_visible(&format!(
            "text: {}",
            arg(args, 0)
        ))?)])
    })?;
    steps.register("I should see error message {string} for {text}", |args| {
        Ok(vec![run(Intent::verify_visible(&format!(
            "text: {}",
            arg(args, 0)
        ))?)])
    })?;
    steps.register("the {text} field should be visible", |args| {
        Ok(vec![run(Intent::verify_visible(arg(args, 0))?)])
    })?;
    steps.register("the terms and conditions modal should open", |_| {
        Ok(vec![run(Intent::verify_visible("terms modal")?)])
    })?;
    steps.register("I should see the registration form", |_| {
        let mut commands = Vec::new();
        for field in [
            "first name",
            "last name",
            "email",
            "password",
            "organization dropdown",
        ] {
            commands.push(run(Intent::verify_visible(field)?));
        }
        Ok(commands)
    })?;
    steps.register("I should see both {string} and {string} radio buttons", |args| {
        Ok(vec![
            run(Intent::verify_visible(&format!("role: {}", arg(args, 0)))?),
            run(Intent::verify_visible(&format!("role: {}", arg(args, 1)))?),
        ])
    })?;

    Ok(steps)
}
