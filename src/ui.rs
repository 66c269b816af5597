use crate::form::FormView;
use crate::identity::WidgetSettings;
use crate::models::CHECKOUT_ACTION;
use crate::notify::NotificationKind;
use crate::tasks::TaskBlock;

pub const TOAST_MILLIS: u32 = 3000;
const ACTIONS: [(&str, &str); 2] = [("checkin", "Check In"), (CHECKOUT_ACTION, "Check Out")];

pub fn render_form(view: &FormView, widget: &WidgetSettings) -> String {
    let (toast_message, toast_class) = match view.notifications.last() {
        Some(note) => (
            escape(&note.message),
            match note.kind {
                NotificationKind::Success => "show success",
                NotificationKind::Failure => "show failure",
            },
        ),
        None => (String::new(), ""),
    };
    let tasks: String = view.tasks.iter().map(render_task_block).collect();

    INDEX_HTML
        .replace("{{CLIENT_ID}}", &js_string(&widget.client_id))
        .replace("{{PROMPT}}", if widget.prompt_on_load { "true" } else { "false" })
        .replace("{{SIGN_IN_HIDDEN}}", hidden(!view.sign_in_visible))
        .replace("{{FORM_HIDDEN}}", hidden(!view.form_visible))
        .replace("{{CHECKOUT_HIDDEN}}", hidden(!view.checkout_visible))
        .replace("{{EMAIL}}", &escape(&view.email))
        .replace("{{TIME_NOW}}", &escape(&view.time_now))
        .replace("{{EMP_ID}}", &escape(&view.employee.emp_id))
        .replace("{{OFFICE_EMAIL}}", &escape(&view.employee.office_email))
        .replace("{{FULL_NAME}}", &escape(&view.employee.full_name))
        .replace("{{NICKNAME}}", &escape(&view.employee.nickname))
        .replace("{{ACTION_OPTIONS}}", &render_action_options(&view.action))
        .replace("{{SUBMIT_DISABLED}}", if view.submit.disabled { "disabled" } else { "" })
        .replace("{{SUBMIT_LABEL}}", &escape(&view.submit.label))
        .replace("{{TOAST_CLASS}}", toast_class)
        .replace("{{TOAST_MILLIS}}", &TOAST_MILLIS.to_string())
        .replace("{{TASKS}}", &tasks)
        .replace("{{TOAST}}", &toast_message)
}

fn render_action_options(current: &str) -> String {
    let mut options: String = ACTIONS
        .iter()
        .map(|(value, label)| option(value, label, *value == current))
        .collect();
    if !current.is_empty() && !ACTIONS.iter().any(|(value, _)| *value == current) {
        options.push_str(&option(current, current, true));
    }
    options
}

fn render_task_block(block: &TaskBlock) -> String {
    let id = block.id;
    let mut options = option("", "-- select --", block.task_for.is_empty());
    for company in &block.options {
        options.push_str(&option(company, company, *company == block.task_for));
    }
    let other_style = if block.other_visible { "" } else { "display:none" };

    format!(
        r#"<div class="task-block" data-task="{id}">
  <button type="submit" class="remove-task" formaction="/form/tasks/{id}/remove" formnovalidate title="Remove task">&times;</button>
  <label for="task_for_{id}">Task For *</label>
  <select id="task_for_{id}" name="task_for_{id}" class="task-for">{options}</select>
  <input type="text" name="task_for_other_{id}" class="task-for-other" placeholder="Enter task for" style="{other_style}" value="{other}" />
  <label for="task_name_{id}">Task Name *</label>
  <input type="text" id="task_name_{id}" name="task_name_{id}" placeholder="Enter task name" value="{name}" />
  <label for="task_details_{id}">Task Details *</label>
  <textarea id="task_details_{id}" name="task_details_{id}" rows="3" placeholder="Enter task details">{details}</textarea>
  <label for="my_role_{id}">My Role to Complete Task *</label>
  <textarea id="my_role_{id}" name="my_role_{id}" rows="2" placeholder="Enter your role">{role}</textarea>
</div>
"#,
        other = escape(&block.task_for_other),
        name = escape(&block.task_name),
        details = escape(&block.task_details),
        role = escape(&block.my_role),
    )
}

fn option(value: &str, label: &str, selected: bool) -> String {
    format!(
        r#"<option value="{}"{}>{}</option>"#,
        escape(value),
        if selected { " selected" } else { "" },
        escape(label)
    )
}

fn hidden(is_hidden: bool) -> &'static str {
    if is_hidden { "hidden" } else { "" }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            other => out.push(other),
        }
    }
    out
}

/// A JSON string literal that is safe inside an inline script.
fn js_string(raw: &str) -> String {
    serde_json::Value::from(raw).to_string().replace("</", "<\\/")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Attendance</title>
  <script src="https://accounts.google.com/gsi/client" async defer></script>
  <style>
    body {
      margin: 0;
      min-height: 100vh;
      font-family: "Trebuchet MS", sans-serif;
      background: #f4f6f8;
      display: grid;
      place-items: center;
      padding: 24px 16px;
    }

    .card {
      width: min(560px, 100%);
      background: white;
      border-radius: 16px;
      box-shadow: 0 12px 32px rgba(0, 0, 0, 0.08);
      padding: 28px;
      display: grid;
      gap: 16px;
    }

    .hidden {
      display: none !important;
    }

    label {
      display: block;
      font-weight: 600;
      margin-top: 10px;
    }

    input, select, textarea {
      width: 100%;
      box-sizing: border-box;
      padding: 8px;
      margin-top: 4px;
    }

    .task-block {
      position: relative;
      border: 1px solid #dde3ea;
      border-radius: 12px;
      padding: 12px;
      margin-top: 12px;
    }

    .remove-task {
      position: absolute;
      top: 6px;
      right: 8px;
      border: none;
      background: transparent;
      font-size: 1.2rem;
      cursor: pointer;
    }

    .spinner {
      display: inline-block;
      width: 12px;
      height: 12px;
      border: 2px solid rgba(255, 255, 255, 0.4);
      border-top-color: white;
      border-radius: 50%;
      animation: spin 800ms linear infinite;
    }

    #toast {
      position: fixed;
      bottom: 24px;
      left: 50%;
      transform: translateX(-50%);
      padding: 12px 20px;
      border-radius: 8px;
      color: white;
      opacity: 0;
      transition: opacity 200ms ease;
    }

    #toast.show {
      opacity: 1;
    }

    #toast.success {
      background: #4bb543;
    }

    #toast.failure {
      background: #e74c3c;
    }

    @keyframes spin {
      to {
        transform: rotate(360deg);
      }
    }
  </style>
</head>
<body>
  <main class="card">
    <h1>Attendance</h1>
    <div id="googleSignInBtn" class="{{SIGN_IN_HIDDEN}}"></div>

    <form id="attForm" class="{{FORM_HIDDEN}}" method="post" action="/form/submit">
      <input type="hidden" id="email" name="email" value="{{EMAIL}}" />

      <label for="time_now">Time</label>
      <input type="text" id="time_now" value="{{TIME_NOW}}" readonly />
      <label for="emp_id">Employee ID</label>
      <input type="text" id="emp_id" value="{{EMP_ID}}" readonly />
      <label for="office_email">Office Email</label>
      <input type="text" id="office_email" value="{{OFFICE_EMAIL}}" readonly />
      <label for="full_name">Full Name</label>
      <input type="text" id="full_name" value="{{FULL_NAME}}" readonly />
      <label for="nickname">Nickname</label>
      <input type="text" id="nickname" value="{{NICKNAME}}" readonly />

      <label for="action">Action</label>
      <select id="action" name="action">{{ACTION_OPTIONS}}</select>

      <section id="checkoutFields" class="{{CHECKOUT_HIDDEN}}">
        <div id="tasks_container">
{{TASKS}}        </div>
        <button type="submit" id="addTaskBtn" formaction="/form/tasks" formnovalidate>+ Add Task</button>
      </section>

      <button type="submit" id="submitBtn" {{SUBMIT_DISABLED}}>{{SUBMIT_LABEL}}</button>
    </form>
  </main>

  <div id="toast" class="{{TOAST_CLASS}}">{{TOAST}}</div>

  <script>
    const attForm = document.getElementById("attForm");

    function postCredential(response) {
      const form = document.createElement("form");
      form.method = "post";
      form.action = "/session/credential";
      const field = document.createElement("input");
      field.type = "hidden";
      field.name = "credential";
      field.value = response.credential;
      form.appendChild(field);
      document.body.appendChild(form);
      form.submit();
    }

    window.onload = function () {
      if (!window.google) return;
      google.accounts.id.initialize({
        client_id: {{CLIENT_ID}},
        callback: postCredential,
      });
      google.accounts.id.renderButton(document.getElementById("googleSignInBtn"), {
        theme: "outline",
        size: "large",
        width: "100%",
      });
      if ({{PROMPT}}) google.accounts.id.prompt();
    };

    document.getElementById("action").addEventListener("change", () => {
      attForm.action = "/form/action";
      attForm.submit();
    });

    document.querySelectorAll(".task-block").forEach((block) => {
      const select = block.querySelector(".task-for");
      const other = block.querySelector(".task-for-other");
      select.addEventListener("change", () => {
        other.style.display = select.value === "Other" ? "block" : "none";
      });
    });

    attForm.addEventListener("submit", (e) => {
      const button = document.getElementById("submitBtn");
      if (e.submitter !== button) return;
      button.disabled = true;
      button.innerHTML = 'Submitting <span class="spinner"></span>';
    });

    const toast = document.getElementById("toast");
    if (toast.classList.contains("show")) {
      setTimeout(() => toast.classList.remove("show"), {{TOAST_MILLIS}});
    }

    setInterval(async () => {
      const field = document.getElementById("time_now");
      if (!field.value) return;
      try {
        const res = await fetch("/api/clock");
        const data = await res.json();
        if (data.time_now) field.value = data.time_now;
      } catch (err) {
        console.warn(err);
      }
    }, 60000);
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{EmployeeFields, SubmissionPhase, SubmitButton};
    use crate::notify::Notification;

    fn signed_out_view() -> FormView {
        FormView {
            signed_in: false,
            email: String::new(),
            time_now: String::new(),
            employee: EmployeeFields::default(),
            action: "checkin".into(),
            form_visible: false,
            sign_in_visible: true,
            checkout_visible: false,
            tasks: Vec::new(),
            submit: SubmitButton::default(),
            phase: SubmissionPhase::Idle,
            notifications: Vec::new(),
        }
    }

    #[test]
    fn signed_out_page_hides_form_and_embeds_client_id() {
        let html = render_form(&signed_out_view(), &WidgetSettings::new("client-123"));
        assert!(html.contains(r#"client_id: "client-123""#));
        assert!(html.contains(r#"<form id="attForm" class="hidden""#));
        assert!(html.contains(r#"<div id="googleSignInBtn" class="">"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn task_blocks_render_named_fields_and_escape_values() {
        let mut view = signed_out_view();
        view.form_visible = true;
        view.checkout_visible = true;
        let mut block = TaskBlock::new(3, &["Acme & Co".to_string()]);
        block.select_task_for("Other");
        block.task_name = "<script>".into();
        view.tasks.push(block);

        let html = render_form(&view, &WidgetSettings::new("id"));
        assert!(html.contains(r#"name="task_for_3""#));
        assert!(html.contains(r#"name="my_role_3""#));
        assert!(html.contains(r#"formaction="/form/tasks/3/remove""#));
        assert!(html.contains("Acme &amp; Co"));
        assert!(html.contains(r#"<option value="Other" selected>Other</option>"#));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains(r#"style="display:none" value="""#));
    }

    #[test]
    fn latest_notification_becomes_the_toast() {
        let mut view = signed_out_view();
        view.notifications.push(Notification {
            message: "Email not registered".into(),
            kind: NotificationKind::Failure,
        });
        let html = render_form(&view, &WidgetSettings::new("id"));
        assert!(html.contains(r#"<div id="toast" class="show failure">Email not registered</div>"#));
    }

    #[test]
    fn unknown_action_is_kept_selected() {
        let options = render_action_options("meeting");
        assert!(options.contains(r#"<option value="meeting" selected>meeting</option>"#));
        assert!(!options.contains(r#"value="checkin" selected"#));
    }
}
