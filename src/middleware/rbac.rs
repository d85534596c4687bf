// src/middleware/rbac.rs
//
// Tabela única de acesso por grupo de rotas. O router usa a mesma tabela para
// decidir quais grupos recebem o `auth_guard`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError,
    models::auth::{Identity, Role},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteGroup {
    /// /api/auth/signup, /api/auth/login
    Auth,
    /// /api/auth/update-password
    Account,
    Admin,
    Owner,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Roles(&'static [Role]),
}

pub const ROUTE_POLICY: &[(RouteGroup, Access)] = &[
    (RouteGroup::Auth, Access::Public),
    (RouteGroup::Account, Access::Authenticated),
    (RouteGroup::Admin, Access::Roles(&[Role::Admin])),
    (RouteGroup::Owner, Access::Roles(&[Role::Owner])),
    (RouteGroup::User, Access::Roles(&[Role::User])),
];

impl RouteGroup {
    // Grupo fora da tabela não libera nenhum papel
    pub fn access(self) -> Access {
        ROUTE_POLICY
            .iter()
            .find(|(group, _)| *group == self)
            .map(|(_, access)| *access)
            .unwrap_or(Access::Roles(&[]))
    }
}

/// A identidade é sempre checada antes do papel: sem identidade é 401, nunca 403.
pub fn authorize(group: RouteGroup, identity: Option<&Identity>) -> Result<(), AppError> {
    match group.access() {
        Access::Public => Ok(()),
        Access::Authenticated => identity.map(|_| ()).ok_or(AppError::InvalidToken),
        Access::Roles(roles) => {
            let identity = identity.ok_or(AppError::InvalidToken)?;
            if roles.contains(&identity.role) {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
    }
}

// Roda depois do `auth_guard`, com o grupo da rota como estado
pub async fn enforce_policy(
    State(group): State<RouteGroup>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = request.extensions().get::<Identity>();

    if let Err(err) = authorize(group, identity) {
        tracing::warn!(
            "🚫 Acesso negado ao grupo {:?} para {:?}",
            group,
            identity.map(|i| (i.id, i.role))
        );
        return Err(err);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn identity(role: Role) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            name: "Maria Aparecida da Silva Souza".to_string(),
            email: "maria@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn every_group_has_exactly_one_entry() {
        for group in [
            RouteGroup::Auth,
            RouteGroup::Account,
            RouteGroup::Admin,
            RouteGroup::Owner,
            RouteGroup::User,
        ] {
            let entries = ROUTE_POLICY.iter().filter(|(g, _)| *g == group).count();
            assert_eq!(entries, 1, "grupo {:?}", group);
        }
    }

    #[test]
    fn public_group_needs_no_identity() {
        assert!(authorize(RouteGroup::Auth, None).is_ok());
    }

    #[test]
    fn missing_identity_is_unauthenticated_not_forbidden() {
        for group in [RouteGroup::Account, RouteGroup::Admin, RouteGroup::Owner, RouteGroup::User] {
            assert!(matches!(authorize(group, None), Err(AppError::InvalidToken)));
        }
    }

    #[test]
    fn any_role_may_change_its_password() {
        for role in [Role::Admin, Role::Owner, Role::User] {
            assert!(authorize(RouteGroup::Account, Some(&identity(role))).is_ok());
        }
    }

    #[test]
    fn each_role_only_reaches_its_own_group() {
        let cases = [
            (RouteGroup::Admin, Role::Admin),
            (RouteGroup::Owner, Role::Owner),
            (RouteGroup::User, Role::User),
        ];

        for (group, allowed) in cases {
            for role in [Role::Admin, Role::Owner, Role::User] {
                let result = authorize(group, Some(&identity(role)));
                if role == allowed {
                    assert!(result.is_ok(), "{:?} deveria acessar {:?}", role, group);
                } else {
                    assert!(
                        matches!(result, Err(AppError::Forbidden)),
                        "{:?} não deveria acessar {:?}",
                        role,
                        group
                    );
                }
            }
        }
    }
}
