//! Message body rendering.
//!
//! Email bodies are HTML rendered through handlebars; WhatsApp bodies are
//! plain text assembled by hand since messengers strip markup anyway.

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

/// One line of a volunteer's personal roster.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentEntry {
    pub date: String,
    pub day_of_week: String,
    pub event: String,
    pub area: String,
}

const EMAIL_TEMPLATE: &str = r#"<html>
<body style="font-family: sans-serif; color: #222;">
  <h2>{{title}}</h2>
  <p>Hello {{name}},</p>
  <p>Here are your assignments for the month:</p>
  <table border="0" cellpadding="6" cellspacing="0">
    <tr><th align="left">Date</th><th align="left">Day</th><th align="left">Event</th><th align="left">Area</th></tr>
    {{#each assignments}}
    <tr><td>{{date}}</td><td>{{day_of_week}}</td><td>{{event}}</td><td>{{area}}</td></tr>
    {{/each}}
  </table>
  <p>Thank you for serving!</p>
</body>
</html>"#;

/// Render the HTML email body for one volunteer.
pub fn render_email(
    name: &str,
    title: &str,
    assignments: &[AssignmentEntry],
) -> anyhow::Result<String> {
    let handlebars = Handlebars::new();
    let body = handlebars.render_template(
        EMAIL_TEMPLATE,
        &json!({
            "name": name,
            "title": title,
            "assignments": assignments,
        }),
    )?;
    Ok(body)
}

/// Build the plain-text body for one volunteer.
pub fn plain_text(name: &str, title: &str, assignments: &[AssignmentEntry]) -> String {
    let mut body = format!("{title}\n\nHello {name}, here are your assignments:\n");
    for entry in assignments {
        body.push_str(&format!(
            "\n- {} ({}): {} / {}",
            entry.date, entry.day_of_week, entry.event, entry.area
        ));
    }
    body.push_str("\n\nThank you for serving!");
    body
}
