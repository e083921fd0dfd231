//! Server-rendered HTML views.
//!
//! Three small pages; user-supplied values are escaped before interpolation.

use axum::response::Html;

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n{body}\n</body>\n\
         </html>\n"
    ))
}

fn flash_block(flash: Option<&str>) -> String {
    flash.map_or_else(String::new, |message| {
        format!("<p class=\"flash\">{}</p>\n", escape(message))
    })
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Home view: greets the user and carries the logout form.
#[must_use]
pub fn home(name: &str) -> Html<String> {
    page(
        "Home",
        &format!(
            "<h1>Hi {}</h1>\n\
             <form action=\"/logout?_method=DELETE\" method=\"post\">\n\
             <button type=\"submit\">Log Out</button>\n\
             </form>",
            escape(name)
        ),
    )
}

/// Login view, with the one-time flash message when one is pending.
#[must_use]
pub fn login(flash: Option<&str>) -> Html<String> {
    page(
        "Login",
        &format!(
            "<h1>Login</h1>\n\
             {}<form action=\"/login\" method=\"post\">\n\
             <label for=\"email\">Email</label>\n\
             <input type=\"email\" id=\"email\" name=\"email\" required>\n\
             <label for=\"password\">Password</label>\n\
             <input type=\"password\" id=\"password\" name=\"password\" required>\n\
             <button type=\"submit\">Login</button>\n\
             </form>\n\
             <a href=\"/register\">Register</a>",
            flash_block(flash)
        ),
    )
}

/// Registration view, with the one-time flash message when one is pending.
#[must_use]
pub fn register(flash: Option<&str>) -> Html<String> {
    page(
        "Register",
        &format!(
            "<h1>Register</h1>\n\
             {}<form action=\"/register\" method=\"post\">\n\
             <label for=\"fullname\">Name</label>\n\
             <input type=\"text\" id=\"fullname\" name=\"fullname\" required>\n\
             <label for=\"email\">Email</label>\n\
             <input type=\"email\" id=\"email\" name=\"email\" required>\n\
             <label for=\"password\">Password</label>\n\
             <input type=\"password\" id=\"password\" name=\"password\" required>\n\
             <button type=\"submit\">Register</button>\n\
             </form>\n\
             <a href=\"/login\">Login</a>",
            flash_block(flash)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_greets_by_name_and_escapes() {
        let Html(body) = home("<Alice>");
        assert!(body.contains("Hi &lt;Alice&gt;"));
        assert!(body.contains("action=\"/logout?_method=DELETE\""));
    }

    #[test]
    fn login_renders_flash_when_present() {
        let Html(body) = login(Some("Password incorrect"));
        assert!(body.contains("<p class=\"flash\">Password incorrect</p>"));
    }

    #[test]
    fn login_renders_without_flash() {
        let Html(body) = login(None);
        assert!(!body.contains("class=\"flash\""));
        assert!(body.contains("action=\"/login\""));
    }

    #[test]
    fn register_carries_the_original_form_fields() {
        let Html(body) = register(None);
        assert!(body.contains("name=\"fullname\""));
        assert!(body.contains("name=\"email\""));
        assert!(body.contains("name=\"password\""));
    }
}
