//! HTML templates for the server-rendered pages.
//!
//! Simple inline HTML templates without a template engine. Every interpolated
//! value goes through `html_escape`.

use todo_core::domain::{Todo, User};

/// Common CSS styles for all pages
const COMMON_STYLES: &str = r#"
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
        max-width: 480px;
        margin: 50px auto;
        padding: 0 20px;
        background: #f5f5f5;
    }
    .container {
        background: white;
        padding: 30px;
        border-radius: 8px;
        box-shadow: 0 2px 10px rgba(0,0,0,0.1);
    }
    h1 {
        text-align: center;
        color: #333;
    }
    .form-group {
        margin-bottom: 20px;
    }
    label {
        display: block;
        margin-bottom: 5px;
        color: #555;
        font-weight: bold;
    }
    input[type="text"],
    input[type="email"],
    input[type="password"] {
        width: 100%;
        padding: 10px;
        border: 1px solid #ddd;
        border-radius: 4px;
        font-size: 16px;
        box-sizing: border-box;
    }
    button {
        width: 100%;
        padding: 12px;
        background: #007bff;
        color: white;
        border: none;
        border-radius: 4px;
        font-size: 16px;
        cursor: pointer;
    }
    .error {
        color: #721c24;
        background: #f8d7da;
        padding: 10px;
        border-radius: 4px;
        margin-bottom: 20px;
    }
    .success {
        color: #155724;
        background: #d4edda;
        padding: 10px;
        border-radius: 4px;
    }
    ul.todos {
        list-style: none;
        padding: 0;
    }
    ul.todos li {
        padding: 10px;
        border-bottom: 1px solid #eee;
    }
    ul.todos li.done {
        color: #999;
        text-decoration: line-through;
    }
    nav {
        margin-top: 20px;
        text-align: center;
    }
"#;

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>{COMMON_STYLES}</style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>"#,
        title = html_escape(title),
    )
}

fn error_html(error: Option<&str>) -> String {
    error.map_or(String::new(), |e| {
        format!(r#"<div class="error">{}</div>"#, html_escape(e))
    })
}

fn explorer_link(show_explorer: bool) -> &'static str {
    if show_explorer {
        r#"<a href="/">Query explorer</a>"#
    } else {
        ""
    }
}

/// Registration form, optionally re-filled after a failed submission.
pub fn register_page(name: &str, email: &str, error: Option<&str>, show_explorer: bool) -> String {
    let body = format!(
        r#"        <h1>Register</h1>
        {error_html}
        <form method="POST" action="/register">
            <div class="form-group">
                <label for="name">Name</label>
                <input type="text" id="name" name="name" value="{name}" required autofocus>
            </div>
            <div class="form-group">
                <label for="email">Email</label>
                <input type="email" id="email" name="email" value="{email}" required>
            </div>
            <div class="form-group">
                <label for="password">Password</label>
                <input type="password" id="password" name="password" required>
            </div>
            <div class="form-group">
                <label for="confirmPassword">Confirm password</label>
                <input type="password" id="confirmPassword" name="confirmPassword" required>
            </div>
            <button type="submit">Register</button>
        </form>
        <nav>Already registered? <a href="/login">Log in</a> {explorer}</nav>"#,
        error_html = error_html(error),
        name = html_escape(name),
        email = html_escape(email),
        explorer = explorer_link(show_explorer),
    );
    page("Register", &body)
}

/// Shown after a successful registration. Does not log the user in.
pub fn register_success_page(name: &str, email: &str) -> String {
    let body = format!(
        r#"        <h1>Registration complete</h1>
        <div class="success">
            <p>Name: {name}</p>
            <p>Email: {email}</p>
        </div>
        <nav><a href="/login">Log in</a></nav>"#,
        name = html_escape(name),
        email = html_escape(email),
    );
    page("Registration complete", &body)
}

pub fn login_page(email: &str, error: Option<&str>, show_explorer: bool) -> String {
    let body = format!(
        r#"        <h1>Log in</h1>
        {error_html}
        <form method="POST" action="/login">
            <div class="form-group">
                <label for="email">Email</label>
                <input type="email" id="email" name="email" value="{email}" required autofocus>
            </div>
            <div class="form-group">
                <label for="password">Password</label>
                <input type="password" id="password" name="password" required>
            </div>
            <button type="submit">Log in</button>
        </form>
        <nav>No account yet? <a href="/register">Register</a> {explorer}</nav>"#,
        error_html = error_html(error),
        email = html_escape(email),
        explorer = explorer_link(show_explorer),
    );
    page("Log in", &body)
}

pub fn todos_page(user: &User, todos: &[Todo], show_explorer: bool) -> String {
    let items = if todos.is_empty() {
        "<li>No todos yet.</li>".to_string()
    } else {
        todos
            .iter()
            .map(|todo| {
                let class = if todo.done { r#" class="done""# } else { "" };
                format!("<li{class}>{}</li>", html_escape(&todo.text))
            })
            .collect::<Vec<_>>()
            .join("\n            ")
    };

    let body = format!(
        r#"        <h1>Todos</h1>
        <p>Logged in as {name} ({email})</p>
        <ul class="todos">
            {items}
        </ul>
        <div id="root"></div>
        <nav>
            <form method="POST" action="/logout"><button type="submit">Log out</button></form>
            {explorer}
        </nav>"#,
        name = html_escape(&user.name),
        email = html_escape(&user.email),
        explorer = explorer_link(show_explorer),
    );
    page("Todos", &body)
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn escapes_user_input() {
        let html = register_page("<script>", "a\"b@example.com", Some("bad & worse"), false);
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a&quot;b@example.com"));
        assert!(html.contains("bad &amp; worse"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn explorer_link_only_when_enabled() {
        assert!(login_page("", None, true).contains(r#"href="/""#));
        assert!(!login_page("", None, false).contains(r#"href="/""#));
    }

    #[test]
    fn success_page_echoes_name_and_email() {
        let html = register_success_page("Alice", "alice@example.com");
        assert!(html.contains("Name: Alice"));
        assert!(html.contains("Email: alice@example.com"));
    }

    #[test]
    fn todos_page_marks_done_items() {
        let now = Utc::now();
        let user = User {
            id: 1,
            name: "Alice".into(),
            email: "a@example.com".into(),
            created_at: now,
            updated_at: now,
        };
        let todo = |id, text: &str, done| Todo {
            id,
            text: text.into(),
            done,
            user_id: 1,
            created_at: now,
            updated_at: now,
        };

        let html = todos_page(&user, &[todo(1, "open", false), todo(2, "closed", true)], false);
        assert!(html.contains("<li>open</li>"));
        assert!(html.contains(r#"<li class="done">closed</li>"#));
    }
}
