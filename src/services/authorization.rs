// src/services/authorization.rs

//! Regras de quem pode mexer em um feedback.
//!
//! Três papéis importam: o autor do feedback, um membro da empresa alvo e um
//! membro da empresa administradora da plataforma (`ADMIN_COMPANY_ID`).
//! As comparações são feitas sobre ids tipados; um id ausente nunca casa.

use std::str::FromStr;

use crate::models::{
    auth::{Claims, User},
    feedback::Feedback,
    EntityId, ADMIN_COMPANY_ID,
};

/// Quem está tentando agir.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: EntityId,
    pub company_id: Option<EntityId>,
}

impl Actor {
    fn is_platform_admin(&self) -> bool {
        self.company_id == Some(ADMIN_COMPANY_ID)
    }

    fn belongs_to(&self, company_id: EntityId) -> bool {
        self.company_id == Some(company_id)
    }
}

// A empresa vem do token (já assinado por nós)
impl From<&Claims> for Actor {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id,
            company_id: claims.company_id,
        }
    }
}

// A empresa vem do cadastro atual do usuário
impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            company_id: user.company_id,
        }
    }
}

/// Dono e empresa alvo do feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackOwnership {
    pub owner_user_id: EntityId,
    pub target_company_id: EntityId,
}

impl From<&Feedback> for FeedbackOwnership {
    fn from(feedback: &Feedback) -> Self {
        Self {
            owner_user_id: feedback.user_id,
            target_company_id: feedback.company_id,
        }
    }
}

/// Quem pode usar o PUT completo de feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedbackUpdatePolicy {
    /// Qualquer um, sem token.
    #[default]
    Open,
    /// Exige token e as mesmas regras da troca de status.
    Restricted,
}

impl FromStr for FeedbackUpdatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "restricted" => Ok(Self::Restricted),
            other => Err(format!("política desconhecida '{}' (use open ou restricted)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    pub feedback_update: FeedbackUpdatePolicy,
    /// Membros da empresa administradora também podem responder a qualquer feedback.
    pub admin_may_reply: bool,
}

/// Autor, membro da empresa alvo ou administrador da plataforma.
pub fn can_change_status(actor: &Actor, feedback: &FeedbackOwnership) -> bool {
    actor.user_id == feedback.owner_user_id
        || actor.belongs_to(feedback.target_company_id)
        || actor.is_platform_admin()
}

/// Autor ou membro da empresa alvo. O `actor` deve ser montado a partir do
/// cadastro do usuário (`From<&User>`), não das claims.
pub fn can_reply(actor: &Actor, feedback: &FeedbackOwnership, policy: &AuthorizationPolicy) -> bool {
    actor.user_id == feedback.owner_user_id
        || actor.belongs_to(feedback.target_company_id)
        || (policy.admin_may_reply && actor.is_platform_admin())
}
