use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Account details entered on the sign-up form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignUpForm {
    pub username: String,
    pub name: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_response_name_is_optional() {
        let resp: SignInResponse =
            serde_json::from_str(r#"{"accessToken":"A1","refreshToken":"R1"}"#).expect("parses");
        assert_eq!(resp.access_token.as_deref(), Some("A1"));
        assert_eq!(resp.refresh_token.as_deref(), Some("R1"));
        assert_eq!(resp.name, None);
    }

    #[test]
    fn test_sign_up_body_field_names() {
        let form = SignUpForm {
            username: "a@b.co".into(),
            name: "Alice".into(),
            password: "secret1!x".into(),
            confirm_password: "secret1!x".into(),
        };
        let value = serde_json::to_value(&form).expect("serializes");
        assert_eq!(value["confirmPassword"], "secret1!x");
        assert_eq!(value["username"], "a@b.co");
        assert_eq!(value["name"], "Alice");
    }
}
