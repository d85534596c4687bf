// src/common/validation.rs

use validator::ValidationError;

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 16;
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*";

/// Política de senha usada no cadastro, na criação pelo admin e na troca de senha.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();
    if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length) {
        let mut err = ValidationError::new("password_length");
        err.message = Some(
            format!(
                "A senha deve ter entre {} e {} caracteres.",
                PASSWORD_MIN_LENGTH, PASSWORD_MAX_LENGTH
            )
            .into(),
        );
        return Err(err);
    }

    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_special = password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));

    if !has_uppercase || !has_special {
        let mut err = ValidationError::new("password_pattern");
        err.message = Some(
            format!(
                "A senha deve conter uma letra maiúscula e um caractere especial ({}).",
                PASSWORD_SPECIAL_CHARS
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

// Campo opcional em branco vale como ausente (vai para o banco como NULL)
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
