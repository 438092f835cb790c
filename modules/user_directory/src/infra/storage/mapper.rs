use anyhow::anyhow;

use crate::contract::model::{ConsultantClientLink, User, UserType};
use crate::infra::storage::entity::{consultant_client, user};

/// Convert a database row to a contract model.
pub fn entity_to_contract(entity: user::Model) -> anyhow::Result<User> {
    let user_type = UserType::parse(&entity.user_type).ok_or_else(|| {
        anyhow!(
            "user {} has unknown user_type '{}'",
            entity.id,
            entity.user_type
        )
    })?;
    Ok(User {
        id: entity.id,
        name: entity.name,
        email: entity.email,
        user_type,
        phone: entity.phone,
        age: entity.age,
        cpf: entity.cpf,
        zip_code: entity.zip_code,
        state: entity.state,
        address: entity.address,
        complement: entity.complement,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    })
}

pub fn link_to_contract(entity: consultant_client::Model) -> ConsultantClientLink {
    ConsultantClientLink {
        id: entity.id,
        consultant_id: entity.consultant_id,
        client_id: entity.client_id,
        created_at: entity.created_at,
    }
}
