// src/common/sorting.rs
//
// Parâmetro `sort` das listagens no formato `campo:direção` (ex.: `name:asc`).
// Só campos da allow-list chegam ao SQL; qualquer outro valor vira 400.

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Um campo ordenável de uma listagem.
pub trait SortField: Sized + Copy {
    const DEFAULT: Self;

    /// Nomes aceitos no parâmetro `sort`, na ordem em que aparecem nas mensagens.
    fn allowed() -> &'static [&'static str];

    fn from_name(name: &str) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: SortField> Default for SortSpec<F> {
    fn default() -> Self {
        Self { field: F::DEFAULT, direction: SortDirection::Desc }
    }
}

impl<F: SortField> SortSpec<F> {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(Self::default()),
            Some(value) => value,
        };

        let (field_name, direction_name) = match raw.split_once(':') {
            Some((field, direction)) => (field, Some(direction)),
            None => (raw, None),
        };

        let field = F::from_name(field_name).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Campo de ordenação inválido: '{}'. Use um de: {}.",
                field_name,
                F::allowed().join(", ")
            ))
        })?;

        let direction = match direction_name.map(|d| d.to_ascii_uppercase()) {
            None => SortDirection::Desc,
            Some(d) if d == "ASC" => SortDirection::Asc,
            Some(d) if d == "DESC" => SortDirection::Desc,
            Some(other) => {
                return Err(AppError::InvalidInput(format!(
                    "Direção de ordenação inválida: '{}'. Use ASC ou DESC.",
                    other
                )));
            }
        };

        Ok(Self { field, direction })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortField {
    Name,
    Email,
    Role,
    CreatedAt,
}

impl UserSortField {
    pub fn column(&self) -> &'static str {
        match self {
            UserSortField::Name => "name",
            UserSortField::Email => "email",
            UserSortField::Role => "role",
            UserSortField::CreatedAt => "created_at",
        }
    }
}

impl SortField for UserSortField {
    const DEFAULT: Self = UserSortField::CreatedAt;

    fn allowed() -> &'static [&'static str] {
        &["name", "email", "role", "created_at"]
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(UserSortField::Name),
            "email" => Some(UserSortField::Email),
            "role" => Some(UserSortField::Role),
            "created_at" => Some(UserSortField::CreatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreSortField {
    Name,
    AverageRating,
    CreatedAt,
}

impl StoreSortField {
    /// Expressão usada no ORDER BY da consulta agregada de lojas.
    pub fn order_expr(&self) -> &'static str {
        match self {
            StoreSortField::Name => "s.name",
            StoreSortField::AverageRating => "AVG(r.rating)",
            StoreSortField::CreatedAt => "s.created_at",
        }
    }
}

impl SortField for StoreSortField {
    const DEFAULT: Self = StoreSortField::CreatedAt;

    fn allowed() -> &'static [&'static str] {
        &["name", "averageRating", "created_at"]
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(StoreSortField::Name),
            "averageRating" => Some(StoreSortField::AverageRating),
            "created_at" => Some(StoreSortField::CreatedAt),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sort_defaults_to_newest_first() {
        let spec = SortSpec::<UserSortField>::parse(None).unwrap();
        assert_eq!(spec.field, UserSortField::CreatedAt);
        assert_eq!(spec.direction, SortDirection::Desc);

        let blank = SortSpec::<StoreSortField>::parse(Some("  ")).unwrap();
        assert_eq!(blank, SortSpec::default());
    }

    #[test]
    fn parses_field_and_direction_case_insensitively() {
        let spec = SortSpec::<UserSortField>::parse(Some("email:asc")).unwrap();
        assert_eq!(spec.field, UserSortField::Email);
        assert_eq!(spec.direction, SortDirection::Asc);

        let spec = SortSpec::<StoreSortField>::parse(Some("averageRating:Desc")).unwrap();
        assert_eq!(spec.field, StoreSortField::AverageRating);
        assert_eq!(spec.direction, SortDirection::Desc);
    }

    #[test]
    fn field_without_direction_sorts_descending() {
        let spec = SortSpec::<UserSortField>::parse(Some("name")).unwrap();
        assert_eq!(spec.direction, SortDirection::Desc);
    }

    #[test]
    fn rejects_fields_outside_the_allow_list() {
        let err = SortSpec::<UserSortField>::parse(Some("password_hash:asc")).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        // `averageRating` só existe para lojas
        assert!(SortSpec::<UserSortField>::parse(Some("averageRating")).is_err());
        assert!(SortSpec::<StoreSortField>::parse(Some("email")).is_err());
    }

    #[test]
    fn rejects_unknown_directions() {
        let err = SortSpec::<StoreSortField>::parse(Some("name:sideways")).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg.contains("SIDEWAYS")));
    }
}
