use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Аутентифицированный пользователь, каким его отдаёт провайдер идентификации.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Профиль пользователя из коллекции "users". Хранилище бессхемное,
/// поэтому все поля кроме имени и email имеют значения по умолчанию.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_role() -> String {
    "user".to_string()
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Контактные данные шага 2 мастера. Живут только внутри сессии
/// бронирования; предзаполняются из Principal и редактируются пользователем.
#[derive(Debug, Clone, Default, PartialEq, Validate, Serialize, Deserialize)]
pub struct ContactDetails {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(
        email(message = "email must look like local@domain.tld"),
        custom(function = email_has_tld)
    )]
    pub email: String,
    #[validate(custom(function = phone_shape))]
    pub phone: String,
}

impl ContactDetails {
    /// Предзаполнение из аутентифицированного пользователя. Телефона у
    /// провайдера нет - его пользователь вводит сам.
    pub fn prefill_from(principal: &Principal) -> Self {
        ContactDetails {
            name: principal.display_name.clone().unwrap_or_default(),
            email: principal.email.clone().unwrap_or_default(),
            phone: String::new(),
        }
    }

    /// Все три поля непустые. Этого достаточно, чтобы показать шаг
    /// подтверждения; формат проверяется полной валидацией.
    pub fn is_filled(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty() && !self.phone.is_empty()
    }
}

/// Email должен содержать точку в доменной части: local@domain.tld.
fn email_has_tld(email: &str) -> Result<(), ValidationError> {
    let domain = email.rsplit_once('@').map(|(_, d)| d).unwrap_or("");
    if domain.contains('.') && !domain.ends_with('.') {
        Ok(())
    } else {
        Err(ValidationError::new("email_tld")
            .with_message("email must look like local@domain.tld".into()))
    }
}

/// Телефон: цифры, пробелы, дефисы и '+', минимум 7 цифр.
fn phone_shape(phone: &str) -> Result<(), ValidationError> {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-' || c == '+');
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if allowed && digits >= 7 {
        Ok(())
    } else {
        Err(ValidationError::new("phone_shape")
            .with_message("phone must contain at least 7 digits (digits, spaces, - and + only)".into()))
    }
}
