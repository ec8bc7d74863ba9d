use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
/// Credentials posted by the login page.
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Page to return to after signing in.
    #[serde(default, rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_form_requires_valid_email_and_password() {
        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: String::new(),
            callback_url: None,
        };
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));

        let form = LoginForm {
            email: "admin@example.com".to_string(),
            password: "secret".to_string(),
            callback_url: Some("/dashboard".to_string()),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn callback_url_uses_camel_case_key() {
        let form: LoginForm = serde_html_form::from_str(
            "email=admin%40example.com&password=x&callbackUrl=%2Flms%2Fcourses%3Fpage%3D2",
        )
        .unwrap();
        assert_eq!(form.callback_url.as_deref(), Some("/lms/courses?page=2"));
    }
}
