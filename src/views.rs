use axum::response::Html;
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;

/// Rendering seam between request handlers and markup production. Handlers
/// hand over a view name and a map of variables; they never build markup
/// themselves.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, ctx: &Value) -> anyhow::Result<String>;
}

/// Render a view through the state's renderer into a response body.
pub fn page(state: &AppState, view: &str, ctx: &Value) -> Result<Html<String>, AppError> {
    state
        .views
        .render(view, ctx)
        .map(Html)
        .map_err(AppError::Internal)
}

/// Built-in renderer producing minimal server-side HTML, enough to drive
/// every flow from a browser. A real deployment would swap in a template
/// engine behind the same trait.
pub struct HtmlViews;

impl ViewRenderer for HtmlViews {
    fn render(&self, view: &str, ctx: &Value) -> anyhow::Result<String> {
        let msg = ctx["msg"].as_str().unwrap_or("");
        let page = match view {
            "index" => layout(
                "CampusHub",
                "<p>Welcome to CampusHub.</p>\
                 <ul>\
                 <li><a href=\"/login/student\">Student login</a></li>\
                 <li><a href=\"/register/student\">Student registration</a></li>\
                 <li><a href=\"/admin/login\">Admin login</a></li>\
                 <li><a href=\"/register/admin\">Admin registration</a></li>\
                 </ul>",
            ),
            "login_student" => layout(
                "Student Login",
                &credentials_form("/login/student", "Log in", msg),
            ),
            "admin_login" => layout(
                "Admin Login",
                &credentials_form("/admin/login", "Log in", msg),
            ),
            "register_student" => layout(
                "Student Registration",
                &credentials_form("/register/student", "Register", msg),
            ),
            "admin_register" => layout(
                "Admin Registration",
                &credentials_form("/register/admin", "Register", msg),
            ),
            "student_dashboard" => layout("Student Dashboard", &student_dashboard(ctx)),
            "admin_dashboard" => layout("Admin Dashboard", &admin_dashboard(ctx)),
            // Static course-description pages share one body; the router
            // only sends allow-listed view names here.
            other => layout(&title_from_view(other), &course_page(other)),
        };
        Ok(page)
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\
         <html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><h1>{title}</h1>{body}</body></html>",
        title = escape(title),
        body = body
    )
}

fn credentials_form(action: &str, submit: &str, msg: &str) -> String {
    let banner = if msg.is_empty() {
        String::new()
    } else {
        format!("<p class=\"msg\">{}</p>", escape(msg))
    };
    format!(
        "{banner}<form method=\"post\" action=\"{action}\">\
         <label>Username <input name=\"username\" required></label>\
         <label>Password <input name=\"password\" type=\"password\" required></label>\
         <button type=\"submit\">{submit}</button>\
         </form>"
    )
}

fn student_dashboard(ctx: &Value) -> String {
    let username = ctx["username"].as_str().unwrap_or("");
    let msg = ctx["msg"].as_str().unwrap_or("");
    let enrolled: Vec<i64> = ctx["enrolled_course_ids"]
        .as_array()
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default();

    let mut rows = String::new();
    if let Some(courses) = ctx["courses"].as_array() {
        for course in courses {
            let id = course["id"].as_i64().unwrap_or(0);
            let action = if enrolled.contains(&id) {
                "<em>Enrolled</em>".to_string()
            } else {
                format!(
                    "<form method=\"post\" action=\"/apply/{id}\">\
                     <button type=\"submit\">Apply</button></form>"
                )
            };
            rows.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                id,
                escape(course["title"].as_str().unwrap_or("")),
                escape(course["instructor"].as_str().unwrap_or("")),
                action
            ));
        }
    }

    let banner = if msg.is_empty() {
        String::new()
    } else {
        format!("<p class=\"msg\">{}</p>", escape(msg))
    };
    format!(
        "<p>Signed in as {user}. <a href=\"/logout\">Log out</a></p>{banner}\
         <table><tr><th>Id</th><th>Title</th><th>Instructor</th><th></th></tr>{rows}</table>",
        user = escape(username)
    )
}

fn admin_dashboard(ctx: &Value) -> String {
    let mut rows = String::new();
    if let Some(enrollments) = ctx["enrollments"].as_array() {
        for e in enrollments {
            rows.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(e["student_username"].as_str().unwrap_or("")),
                escape(e["course_title"].as_str().unwrap_or("")),
                escape(e["instructor"].as_str().unwrap_or("")),
                escape(e["enrollment_date"].as_str().unwrap_or(""))
            ));
        }
    }
    format!(
        "<p><a href=\"/admin/logout\">Log out</a></p>\
         <table><tr><th>Student</th><th>Course</th><th>Instructor</th><th>Enrolled</th></tr>\
         {rows}</table>"
    )
}

fn course_page(view: &str) -> String {
    format!(
        "<p>Course description for {}.</p>\
         <p><a href=\"/register/student\">Register</a> to apply.</p>",
        escape(&title_from_view(view))
    )
}

fn title_from_view(view: &str) -> String {
    view.replace('_', " ")
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_view_posts_to_the_student_login_route() {
        let html = HtmlViews
            .render("login_student", &json!({"msg": ""}))
            .unwrap();
        assert!(html.contains("action=\"/login/student\""));
        assert!(html.contains("name=\"username\""));
    }

    #[test]
    fn form_message_is_rendered_and_escaped() {
        let html = HtmlViews
            .render("register_student", &json!({"msg": "<b>taken</b>"}))
            .unwrap();
        assert!(html.contains("&lt;b&gt;taken&lt;/b&gt;"));
        assert!(!html.contains("<b>taken</b>"));
    }

    #[test]
    fn dashboard_marks_enrolled_courses() {
        let ctx = json!({
            "username": "alice",
            "msg": "",
            "courses": [
                {"id": 3, "title": "Nursing", "instructor": "Dr. Rao"},
                {"id": 4, "title": "Catering", "instructor": "Mr. Lee"},
            ],
            "enrolled_course_ids": [3],
        });
        let html = HtmlViews.render("student_dashboard", &ctx).unwrap();
        assert!(html.contains("<em>Enrolled</em>"));
        assert!(html.contains("action=\"/apply/4\""));
        assert!(!html.contains("action=\"/apply/3\""));
    }

    #[test]
    fn course_view_names_become_titles() {
        let html = HtmlViews.render("nursing_health_care", &json!({})).unwrap();
        assert!(html.contains("nursing health care"));
    }
}
